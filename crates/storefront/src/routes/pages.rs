//! Static content pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::PageContext;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
}

/// "Quem Somos". Store name, CNPJ and hours come from the site settings.
pub async fn about(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(customer): OptionalAuth,
) -> Result<AboutTemplate> {
    Ok(AboutTemplate {
        page: PageContext::load(&state, &session, customer).await?,
    })
}
