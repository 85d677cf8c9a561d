//! Storefront-local models.

pub mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use autopart_core::{CustomerId, Email};

pub use session::{CurrentCustomer, keys as session_keys};

/// A registered storefront customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
