//! Catalog seeding.
//!
//! Products are upserted by SKU, so re-running a seed refreshes rows instead
//! of duplicating them. Every entry is validated before the first write.

use std::path::Path;

use autopart_admin::services::catalog_seed;

use super::{CommandError, connect};

/// Seed products from `file`, or the starter catalog when `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an entry fails
/// validation, or a database write fails.
pub async fn products(file: Option<&Path>) -> Result<(), CommandError> {
    let products = match file {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading products from file");
            let content = tokio::fs::read_to_string(path).await?;
            catalog_seed::parse_yaml(&content)?
        }
        None => {
            tracing::info!("Using the starter catalog");
            catalog_seed::default_products()
        }
    };
    tracing::info!(count = products.len(), "Parsed products");

    let pool = connect().await?;
    let report = catalog_seed::import(&pool, products).await?;

    tracing::info!("Seeding complete! {} product(s) upserted", report.upserted);
    Ok(())
}
