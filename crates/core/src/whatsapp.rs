//! `wa.me` click-to-chat links with prefilled messages.

use std::fmt::Write as _;

use crate::cart::Cart;
use crate::catalog::Product;

const BASE: &str = "https://wa.me/";

/// Plain chat link with no prefilled text.
#[must_use]
pub fn contact(number: &str) -> String {
    format!("{BASE}{number}")
}

/// Link with `message` percent-encoded into the `text` parameter.
#[must_use]
pub fn with_message(number: &str, message: &str) -> String {
    format!("{BASE}{number}?text={}", urlencoding::encode(message))
}

#[must_use]
pub fn product_inquiry(number: &str, product: &Product) -> String {
    with_message(
        number,
        &format!(
            "Olá, quero saber mais sobre {} (SKU: {})",
            product.title, product.sku
        ),
    )
}

/// Order summary sent after checkout, one line per cart item.
#[must_use]
pub fn checkout_order(number: &str, cart: &Cart) -> String {
    let mut lines = String::new();
    for (i, item) in cart.items.iter().enumerate() {
        if i > 0 {
            lines.push('\n');
        }
        let _ = write!(
            lines,
            "- {} ({}x) [SKU: {}]",
            item.title, item.quantity, item.sku
        );
    }
    with_message(
        number,
        &format!(
            "Olá! Fiz um pedido pelo site e gostaria de finalizar o orçamento:\n\n{lines}\n\nFavor entrar em contato."
        ),
    )
}

#[must_use]
pub fn reservation_follow_up(number: &str, code: &str, product_title: &str) -> String {
    with_message(
        number,
        &format!("Olá, sobre minha reserva {code} do produto {product_title}"),
    )
}

/// "Peças raras" call-to-action on the catalog page.
#[must_use]
pub fn rare_parts(number: &str) -> String {
    with_message(
        number,
        "Olá! Não encontrei a peça que procuro no catálogo. Vocês poderiam me ajudar a encontrar?",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;

    const NUMBER: &str = "5511999999999";

    #[test]
    fn contact_link_has_no_query() {
        assert_eq!(contact(NUMBER), "https://wa.me/5511999999999");
    }

    #[test]
    fn inquiry_is_percent_encoded() {
        let p = product(1, "Sucata Gol", "SUC-GOL-G6", "Gol", "Volkswagen");
        let link = product_inquiry(NUMBER, &p);
        assert_eq!(
            link,
            "https://wa.me/5511999999999?text=Ol%C3%A1%2C%20quero%20saber%20mais%20sobre%20Sucata%20Gol%20%28SKU%3A%20SUC-GOL-G6%29"
        );
    }

    #[test]
    fn checkout_lists_each_line() {
        let mut cart = Cart::default();
        let gol = product(1, "Sucata Gol", "SUC-GOL-G6", "Gol", "Volkswagen");
        cart.add(&gol);
        cart.add(&gol);
        cart.add(&product(2, "Sucata Onix", "SUC-ONIX-19", "Onix", "Chevrolet"));

        let link = checkout_order(NUMBER, &cart);
        let (_, text) = link.split_once("?text=").unwrap_or_default();
        let decoded = urlencoding::decode(text).unwrap_or_default();
        assert_eq!(
            decoded,
            "Olá! Fiz um pedido pelo site e gostaria de finalizar o orçamento:\n\n\
             - Sucata Gol (2x) [SKU: SUC-GOL-G6]\n\
             - Sucata Onix (1x) [SKU: SUC-ONIX-19]\n\n\
             Favor entrar em contato."
        );
    }

    #[test]
    fn follow_up_mentions_code_and_product() {
        let link = reservation_follow_up(NUMBER, "K3J9XQ2ZA", "Sucata Onix");
        assert!(link.contains("K3J9XQ2ZA"));
        assert!(link.contains("Sucata%20Onix"));
    }

    #[test]
    fn rare_parts_encodes_question_mark() {
        assert!(rare_parts(NUMBER).ends_with("encontrar%3F"));
    }
}
