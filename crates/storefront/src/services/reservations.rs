//! Lead creation from the product page and from cart checkout.

use rand::Rng;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use autopart_core::reservation::{CODE_LENGTH, PHONE_PENDING, ValidLead};
use autopart_core::{Cart, NewReservation, Product, Reservation};

use crate::db::{ProductRepository, RepositoryError, ReservationRepository};
use crate::models::CurrentCustomer;

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Attempts before giving up on a colliding reference code.
const MAX_CODE_ATTEMPTS: usize = 3;

/// A fresh 9-character base-36 reference code.
#[must_use]
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let i = rng.random_range(0..CODE_ALPHABET.len());
            char::from(CODE_ALPHABET.get(i).copied().unwrap_or(b'0'))
        })
        .collect()
}

/// Insert, regenerating the code on the rare unique-violation.
async fn insert_with_fresh_code(
    repo: &ReservationRepository<'_>,
    mut new: NewReservation,
) -> Result<Reservation, RepositoryError> {
    let mut attempt = 1;
    loop {
        match repo.create(&new).await {
            Err(RepositoryError::Conflict(_)) if attempt < MAX_CODE_ATTEMPTS => {
                warn!(code = %new.code, attempt, "Reservation code collision, retrying");
                new.code = generate_code();
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// Record interest in one product from its page.
///
/// # Errors
///
/// Returns `RepositoryError` if the insert fails.
#[instrument(skip(pool, lead, customer), fields(product_id = %product.id))]
pub async fn create_lead(
    pool: &PgPool,
    product: &Product,
    lead: ValidLead,
    customer: Option<&CurrentCustomer>,
) -> Result<Reservation, RepositoryError> {
    let repo = ReservationRepository::new(pool);
    let reservation = insert_with_fresh_code(
        &repo,
        NewReservation {
            code: generate_code(),
            product_id: product.id,
            product_title: product.title.clone(),
            product_sku: product.sku.clone(),
            customer_id: customer.map(|c| c.id),
            customer_name: lead.name,
            customer_phone: lead.phone.into(),
            city: lead.city,
            observation: lead.observation,
        },
    )
    .await?;

    info!(code = %reservation.code, "Lead created from product page");
    Ok(reservation)
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// Cart lines whose product was sold or removed since it was added.
    #[error("no longer available: {}", .0.join(", "))]
    Unavailable(Vec<String>),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Titles of cart lines that can no longer be reserved.
///
/// `current` holds the freshly loaded product for each cart line, in order;
/// `None` means the product was deleted.
#[must_use]
pub fn unavailable_titles(cart: &Cart, current: &[Option<Product>]) -> Vec<String> {
    cart.items
        .iter()
        .zip(current)
        .filter(|(_, product)| !product.as_ref().is_some_and(Product::is_available))
        .map(|(item, _)| item.title.clone())
        .collect()
}

/// Turn every cart line into a lead for `customer`.
///
/// Every product is reloaded first; if any line was sold or deleted since it
/// was added, nothing is written. Each line is then a separate insert; a
/// failure part-way leaves the earlier leads in place and the cart untouched
/// so the visitor can retry.
///
/// # Errors
///
/// Returns `CheckoutError::Unavailable` naming the sold lines, or
/// `CheckoutError::Repository` on the first failed query.
#[instrument(skip(pool, cart, customer), fields(customer_id = %customer.id, lines = cart.items.len()))]
pub async fn checkout(
    pool: &PgPool,
    cart: &Cart,
    customer: &CurrentCustomer,
) -> Result<Vec<Reservation>, CheckoutError> {
    let products = ProductRepository::new(pool);
    let mut current = Vec::with_capacity(cart.items.len());
    for item in &cart.items {
        current.push(products.get_by_id(item.product_id).await?);
    }

    let unavailable = unavailable_titles(cart, &current);
    if !unavailable.is_empty() {
        warn!(?unavailable, "Checkout refused, cart holds unavailable parts");
        return Err(CheckoutError::Unavailable(unavailable));
    }

    let repo = ReservationRepository::new(pool);
    let mut created = Vec::with_capacity(cart.items.len());

    for item in &cart.items {
        let reservation = insert_with_fresh_code(
            &repo,
            NewReservation {
                code: generate_code(),
                product_id: item.product_id,
                product_title: item.title.clone(),
                product_sku: item.sku.clone(),
                customer_id: Some(customer.id),
                customer_name: customer.name.clone(),
                customer_phone: PHONE_PENDING.to_owned(),
                city: None,
                observation: (item.quantity > 1).then(|| format!("Quantidade: {}", item.quantity)),
            },
        )
        .await?;
        created.push(reservation);
    }

    info!(count = created.len(), "Checkout created reservations");
    Ok(created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use autopart_core::reservation::is_valid_code;
    use autopart_core::{Condition, ProductId, ProductStatus};
    use chrono::Utc;

    fn product(id: i32, title: &str, status: ProductStatus) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            slug: format!("peca-{id}"),
            sku: format!("SUC-{id}"),
            title: title.to_owned(),
            category: "Sucata Veículo".to_owned(),
            brand: "Toyota".to_owned(),
            model: "Corolla".to_owned(),
            year_from: 2015,
            year_to: 2015,
            condition: Condition::Usado,
            description: String::new(),
            compatibility: vec![],
            price_label: "Sob consulta".to_owned(),
            images: vec![],
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn part_sold_after_adding_blocks_checkout() {
        let motor = product(1, "Motor Corolla", ProductStatus::Available);
        let cambio = product(2, "Câmbio Gol", ProductStatus::Available);
        let mut cart = Cart::default();
        cart.add(&motor);
        cart.add(&cambio);

        let mut sold = cambio.clone();
        sold.status = ProductStatus::Sold;

        assert_eq!(
            unavailable_titles(&cart, &[Some(motor), Some(sold)]),
            vec!["Câmbio Gol".to_owned()]
        );
    }

    #[test]
    fn deleted_part_blocks_checkout() {
        let motor = product(1, "Motor Corolla", ProductStatus::Available);
        let mut cart = Cart::default();
        cart.add(&motor);
        assert_eq!(unavailable_titles(&cart, &[None]), vec!["Motor Corolla".to_owned()]);
    }

    #[test]
    fn available_cart_passes() {
        let motor = product(1, "Motor Corolla", ProductStatus::Available);
        let mut cart = Cart::default();
        cart.add(&motor);
        assert!(unavailable_titles(&cart, &[Some(motor)]).is_empty());
    }

    #[test]
    fn generated_codes_are_base36_uppercase() {
        for _ in 0..100 {
            let code = generate_code();
            assert!(is_valid_code(&code), "bad code {code}");
        }
    }

    #[test]
    fn generated_codes_vary() {
        assert_ne!(generate_code(), generate_code());
    }
}
