//! Dashboard: counters, the lead list and the catalog import button.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use autopart_core::{Reservation, ReservationStatus};

use crate::db::{ProductRepository, ReservationRepository, ReservationStats};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::AdminUserView;
use crate::state::AppState;

/// Button that moves a lead to another status.
pub struct StatusAction {
    pub value: &'static str,
    pub label: &'static str,
}

impl From<ReservationStatus> for StatusAction {
    fn from(status: ReservationStatus) -> Self {
        let label = match status {
            ReservationStatus::Contacted => "Marcar em contato",
            ReservationStatus::Completed => "Marcar atendido",
            ReservationStatus::Cancelled => "Cancelar",
            ReservationStatus::New => "Reabrir",
        };
        Self {
            value: status.as_str(),
            label,
        }
    }
}

pub struct ReservationRow {
    pub reservation: Reservation,
    pub created_at: String,
    pub status_label: &'static str,
    pub pending: bool,
    pub actions: Vec<StatusAction>,
}

impl From<Reservation> for ReservationRow {
    fn from(reservation: Reservation) -> Self {
        let status = reservation.status;
        Self {
            created_at: reservation.created_at.format("%d/%m/%Y %H:%M").to_string(),
            status_label: status.admin_label(),
            pending: status == ReservationStatus::New,
            actions: status.next_states().into_iter().map(StatusAction::from).collect(),
            reservation,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub product_count: i64,
    pub stats: ReservationStats,
    pub reservations: Vec<ReservationRow>,
    pub imported: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Set after "Importar Catálogo" to show how many products were written.
    pub imported: Option<usize>,
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<DashboardQuery>,
) -> Result<DashboardTemplate> {
    let products = ProductRepository::new(state.pool());
    let reservations = ReservationRepository::new(state.pool());
    let (product_count, stats, rows) = tokio::try_join!(
        products.count(),
        reservations.stats(),
        reservations.list(),
    )?;

    Ok(DashboardTemplate {
        admin_user: (&admin).into(),
        current_path: "/".to_owned(),
        product_count,
        stats,
        reservations: rows.into_iter().map(ReservationRow::from).collect(),
        imported: query.imported,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use autopart_core::ReservationId;

    use super::*;

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: ReservationId::new(1),
            code: "AB12CD34E".into(),
            product_id: None,
            product_title: "Sucata VW Gol G6 Batido para Peças".into(),
            product_sku: "SUC-GOL-G6".into(),
            customer_id: None,
            customer_name: "Maria".into(),
            customer_phone: "5511988887777".into(),
            city: Some("Campinas".into()),
            observation: None,
            status,
            created_at: Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn new_leads_offer_every_move() {
        let row = ReservationRow::from(reservation(ReservationStatus::New));
        let values: Vec<_> = row.actions.iter().map(|a| a.value).collect();
        assert_eq!(values, vec!["contacted", "completed", "cancelled"]);
        assert!(row.pending);
        assert_eq!(row.status_label, "Pendente");
    }

    #[test]
    fn finished_leads_have_no_buttons() {
        let row = ReservationRow::from(reservation(ReservationStatus::Completed));
        assert!(row.actions.is_empty());
        assert_eq!(row.created_at, "09/03/2025 14:05");
    }
}
