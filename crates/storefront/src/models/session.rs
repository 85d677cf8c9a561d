//! Values kept in the visitor's session.

use serde::{Deserialize, Serialize};

use autopart_core::{CustomerId, Email};

use super::Customer;

/// Session-stored customer identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCustomer {
    pub id: CustomerId,
    pub email: Email,
    pub name: String,
}

impl From<&Customer> for CurrentCustomer {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id,
            email: c.email.clone(),
            name: c.name.clone(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// The logged-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";

    /// The visitor's cart (`autopart_core::Cart`).
    pub const CART: &str = "cart";
}
