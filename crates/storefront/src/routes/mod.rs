//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page (hero + newest products)
//! GET  /health                    - Liveness
//! GET  /health/ready              - Database readiness
//!
//! # Catalog
//! GET  /produtos?q=&cat=&brand=   - Catalog with filters
//! GET  /produto/{slug}            - Product detail
//! POST /produto/{slug}/reservar   - "Tenho interesse" lead form
//! GET  /quem-somos                - About page
//!
//! # Cart (HTMX-aware, plain form posts also work)
//! GET  /carrinho                  - Cart page
//! POST /carrinho/adicionar        - Add product (HX-Trigger: cart-updated)
//! POST /carrinho/atualizar        - Set quantity
//! POST /carrinho/remover          - Remove line
//! GET  /carrinho/contagem         - Cart badge fragment
//! POST /carrinho/finalizar        - Checkout via WhatsApp (login required)
//!
//! # Account
//! GET  /minhas-reservas           - Logged-in customer's reservations
//! GET  /entrar, POST /entrar      - Login
//! GET  /cadastro, POST /cadastro  - Registration
//! POST /sair                      - Logout
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod pages;
pub mod products;
pub mod reservations;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use autopart_core::SiteSettings;

use crate::error::Result;
use crate::middleware::auth_rate_limiter;
use crate::models::CurrentCustomer;
use crate::state::AppState;

/// Data every page layout needs: branding, header badge and login state.
pub struct PageContext {
    pub settings: Arc<SiteSettings>,
    pub customer: Option<CurrentCustomer>,
    pub cart_count: u32,
}

impl PageContext {
    /// # Errors
    ///
    /// Returns `AppError::Database` if the settings cannot be loaded.
    pub async fn load(
        state: &AppState,
        session: &Session,
        customer: Option<CurrentCustomer>,
    ) -> Result<Self> {
        let settings = state.catalog().settings().await?;
        let cart_count = cart::load_cart(session).await.total_quantity();
        Ok(Self {
            settings,
            customer,
            cart_count,
        })
    }

    /// Plain `wa.me` link for the header and footer.
    #[must_use]
    pub fn whatsapp_link(&self) -> String {
        autopart_core::whatsapp::contact(&self.settings.whatsapp)
    }

    #[must_use]
    pub fn customer_name(&self) -> &str {
        self.customer.as_ref().map_or("", |c| c.name.as_str())
    }
}

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/adicionar", post(cart::add))
        .route("/atualizar", post(cart::update))
        .route("/remover", post(cart::remove))
        .route("/contagem", get(cart::count))
        .route("/finalizar", post(cart::checkout))
}

/// Login and registration. Form submissions are rate limited per client IP.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/entrar",
            get(auth::login_page).merge(post(auth::login).layer(auth_rate_limiter())),
        )
        .route(
            "/cadastro",
            get(auth::register_page).merge(post(auth::register).layer(auth_rate_limiter())),
        )
        .route("/sair", post(auth::logout))
}

/// All storefront routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/produtos", get(products::index))
        .route("/produto/{slug}", get(products::show))
        .route("/produto/{slug}/reservar", post(products::reserve))
        .route("/quem-somos", get(pages::about))
        .route("/minhas-reservas", get(reservations::index))
        .nest("/carrinho", cart_routes())
        .merge(auth_routes())
}
