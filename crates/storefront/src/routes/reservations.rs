//! "Minhas Reservas": the logged-in customer's leads.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use autopart_core::{Reservation, whatsapp};

use crate::db::ReservationRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::PageContext;
use crate::state::AppState;

/// One row on the page, with its WhatsApp follow-up link.
pub struct ReservationView {
    pub reservation: Reservation,
    pub follow_up_link: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "reservations/index.html")]
pub struct ReservationsTemplate {
    pub page: PageContext,
    pub reservations: Vec<ReservationView>,
}

#[instrument(skip(state, session, customer), fields(customer_id = %customer.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(customer): RequireAuth,
) -> Result<ReservationsTemplate> {
    let rows = ReservationRepository::new(state.pool())
        .list_for_customer(customer.id)
        .await?;
    let page = PageContext::load(&state, &session, Some(customer)).await?;

    let reservations = rows
        .into_iter()
        .map(|reservation| ReservationView {
            follow_up_link: whatsapp::reservation_follow_up(
                &page.settings.whatsapp,
                &reservation.code,
                &reservation.product_title,
            ),
            reservation,
        })
        .collect();

    Ok(ReservationsTemplate { page, reservations })
}
