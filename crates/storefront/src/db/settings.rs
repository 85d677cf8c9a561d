//! Site settings stored as a JSON document in `shop.site_settings`.

use sqlx::PgPool;

use autopart_core::SiteSettings;

use super::RepositoryError;

/// Row key of the settings document.
pub const SITE_SETTINGS_KEY: &str = "site";

/// Load the settings, falling back to defaults when none were saved yet.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails, or
/// `RepositoryError::DataCorruption` if the stored document does not decode.
pub async fn get_site_settings(pool: &PgPool) -> Result<SiteSettings, RepositoryError> {
    let value: Option<serde_json::Value> =
        sqlx::query_scalar("SELECT value FROM shop.site_settings WHERE key = $1")
            .bind(SITE_SETTINGS_KEY)
            .fetch_optional(pool)
            .await?;

    value.map_or_else(
        || Ok(SiteSettings::default()),
        |v| {
            serde_json::from_value(v).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid site settings: {e}"))
            })
        },
    )
}
