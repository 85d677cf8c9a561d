//! Lead status changes from the dashboard.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::{info, instrument};

use autopart_core::{ReservationId, ReservationStatus};

use crate::db::ReservationRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireEditor;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: ReservationStatus,
}

/// Move a lead to `status`.
///
/// The lifecycle is checked against the current row, and the write only
/// lands if nobody changed the status in between (409 otherwise).
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireEditor(admin): RequireEditor,
    Path(id): Path<ReservationId>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let repo = ReservationRepository::new(state.pool());
    let current = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("reserva {id}")))?;

    let next = current.status.transition_to(form.status)?;
    let updated = repo.set_status(id, current.status, next).await?;

    info!(
        reservation_id = %id,
        code = %updated.code,
        from = %current.status,
        to = %updated.status,
        "Reservation status changed"
    );
    add_breadcrumb(
        "reservation",
        "Status changed",
        &[("code", &updated.code), ("status", updated.status.as_str())],
    );

    Ok(Redirect::to("/"))
}
