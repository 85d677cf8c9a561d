//! Apply the workspace `migrations/` directory.
//!
//! The storefront and back-office never migrate on startup; run this after
//! every deploy that ships new migration files.

use super::{CommandError, connect};

/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../../migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
