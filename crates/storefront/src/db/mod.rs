//! Database access for the storefront.
//!
//! # Tables used
//!
//! - `shop.product` - catalog (read-only here)
//! - `shop.site_settings` - branding and contact settings (read-only here)
//! - `shop.customer` - storefront accounts
//! - `shop.reservation` - leads raised from product pages and checkout
//! - `storefront.session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations live in the workspace `migrations/` directory and are applied
//! explicitly:
//! ```bash
//! cargo run -p autopart-cli -- migrate
//! ```

pub mod customers;
pub mod products;
pub mod reservations;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use customers::CustomerRepository;
pub use products::ProductRepository;
pub use reservations::ReservationRepository;

/// Errors returned by the repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value failed to decode into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    #[error("not found")]
    NotFound,

    /// Unique constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique violation to `Conflict`, anything else to `Database`.
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
