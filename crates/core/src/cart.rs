//! The visitor's parts list, kept in their session until checkout.
//!
//! Lines carry a snapshot of the product fields the cart page and the
//! WhatsApp order message need, so rendering the cart never touches the
//! catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::ProductId;

/// Per-line quantity ceiling.
pub const MAX_QUANTITY: u32 = 99;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub slug: String,
    pub title: String,
    pub sku: String,
    pub image: Option<String>,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Add one unit, appending a new line if the product is not in the cart.
    pub fn add(&mut self, product: &Product) {
        if let Some(item) = self.find_mut(product.id) {
            item.quantity = (item.quantity + 1).min(MAX_QUANTITY);
            return;
        }
        self.items.push(CartItem {
            product_id: product.id,
            slug: product.slug.clone(),
            title: product.title.clone(),
            sku: product.sku.clone(),
            image: product.first_image().map(str::to_owned),
            quantity: 1,
        });
    }

    /// Set a line's quantity. Zero or less removes it; unknown ids are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.find_mut(product_id) {
            item.quantity = u32::try_from(quantity).map_or(MAX_QUANTITY, |q| q.min(MAX_QUANTITY));
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities, shown on the header badge.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    fn find_mut(&mut self, product_id: ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;

    #[test]
    fn adding_twice_increments_instead_of_duplicating() {
        let corolla = product(1, "Sucata Corolla", "SUC-COR-15", "Corolla", "Toyota");
        let mut cart = Cart::default();
        cart.add(&corolla);
        cart.add(&corolla);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.items[0].image.as_deref(), Some("https://img.example/1.jpg"));
    }

    #[test]
    fn badge_counts_units_not_lines() {
        let mut cart = Cart::default();
        cart.add(&product(1, "A", "A1", "A", "Fiat"));
        cart.add(&product(1, "A", "A1", "A", "Fiat"));
        cart.add(&product(2, "B", "B1", "B", "Fiat"));
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn non_positive_quantity_removes_line() {
        let mut cart = Cart::default();
        cart.add(&product(1, "A", "A1", "A", "Fiat"));
        cart.add(&product(2, "B", "B1", "B", "Fiat"));
        cart.update_quantity(ProductId::new(1), 0);
        cart.update_quantity(ProductId::new(2), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn unknown_product_update_is_a_no_op() {
        let mut cart = Cart::default();
        cart.add(&product(1, "A", "A1", "A", "Fiat"));
        let before = cart.clone();
        cart.update_quantity(ProductId::new(99), 5);
        assert_eq!(cart, before);
    }

    #[test]
    fn quantity_is_capped() {
        let mut cart = Cart::default();
        cart.add(&product(1, "A", "A1", "A", "Fiat"));
        cart.update_quantity(ProductId::new(1), 500);
        assert_eq!(cart.items[0].quantity, MAX_QUANTITY);
        cart.add(&product(1, "A", "A1", "A", "Fiat"));
        assert_eq!(cart.items[0].quantity, MAX_QUANTITY);
    }

    #[test]
    fn clear_empties_cart() {
        let mut cart = Cart::default();
        cart.add(&product(1, "A", "A1", "A", "Fiat"));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }
}
