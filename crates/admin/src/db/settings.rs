//! Site settings stored as a JSON document in `shop.site_settings`.

use sqlx::PgPool;
use tracing::instrument;

use autopart_core::SiteSettings;

use super::RepositoryError;

/// Row key of the settings document; shared with the storefront.
pub const SITE_SETTINGS_KEY: &str = "site";

/// Load the settings, falling back to defaults when none were saved yet.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails, or
/// `RepositoryError::DataCorruption` if the stored document does not decode.
#[instrument(skip(pool))]
pub async fn get_site_settings(pool: &PgPool) -> Result<SiteSettings, RepositoryError> {
    let value: Option<serde_json::Value> =
        sqlx::query_scalar("SELECT value FROM shop.site_settings WHERE key = $1")
            .bind(SITE_SETTINGS_KEY)
            .fetch_optional(pool)
            .await?;

    match value {
        Some(v) => serde_json::from_value(v)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid site settings: {e}"))),
        None => Ok(SiteSettings::default()),
    }
}

/// Replace the settings document.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the write fails.
#[instrument(skip(pool, settings))]
pub async fn save_site_settings(
    pool: &PgPool,
    settings: &SiteSettings,
) -> Result<(), RepositoryError> {
    let value = serde_json::to_value(settings)
        .map_err(|e| RepositoryError::DataCorruption(format!("unserializable settings: {e}")))?;

    sqlx::query(
        r"
        INSERT INTO shop.site_settings (key, value)
        VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
        ",
    )
    .bind(SITE_SETTINGS_KEY)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}
