//! "Importar Catálogo": load the starter catalog.

use axum::{extract::State, response::Redirect};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireEditor;
use crate::services::catalog_seed;
use crate::state::AppState;

/// Upsert the default products by SKU, then return to the dashboard with a
/// count.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn import_defaults(
    State(state): State<AppState>,
    RequireEditor(admin): RequireEditor,
) -> Result<Redirect> {
    let report = catalog_seed::import(state.pool(), catalog_seed::default_products()).await?;
    add_breadcrumb(
        "catalog",
        "Default catalog imported",
        &[("upserted", &report.upserted.to_string())],
    );
    Ok(Redirect::to(&format!("/?imported={}", report.upserted)))
}
