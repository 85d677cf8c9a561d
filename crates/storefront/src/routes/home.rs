//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use autopart_core::catalog::{BRANDS, featured};
use autopart_core::Product;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::PageContext;
use crate::state::AppState;

/// Products shown in the "Novidades" showcase.
pub const FEATURED_COUNT: usize = 10;

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub products: Vec<Product>,
    pub brands: &'static [&'static str],
}

#[instrument(skip(state, session, customer))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(customer): OptionalAuth,
) -> Result<HomeTemplate> {
    let products = state.catalog().products().await?;
    let page = PageContext::load(&state, &session, customer).await?;

    Ok(HomeTemplate {
        page,
        products: featured(&products, FEATURED_COUNT).to_vec(),
        brands: &BRANDS,
    })
}
