//! HTTP route handlers for the back-office.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness
//! GET  /health/ready                - Database readiness
//!
//! # Auth (email + password, accounts created with the CLI)
//! GET  /auth/login                  - Login page
//! POST /auth/login                  - Login (rate limited)
//! POST /auth/logout                 - Logout
//!
//! # Dashboard
//! GET  /                            - Counters and lead list
//! POST /reservations/{id}/status    - Move a lead through its lifecycle
//! POST /import-defaults             - Upsert the starter catalog
//!
//! # Products
//! GET  /products?q=                 - Product list
//! GET  /products/new                - New product form
//! POST /products                    - Create
//! GET  /products/{id}/edit          - Edit form
//! POST /products/{id}               - Update
//! POST /products/{id}/delete        - Delete
//!
//! # Settings
//! GET  /settings                    - Site settings form
//! POST /settings                    - Save
//! ```
//!
//! Every page requires a logged-in admin. Mutations additionally require a
//! role that can edit; viewers get 403.

pub mod auth;
pub mod dashboard;
pub mod import;
pub mod products;
pub mod reservations;
pub mod settings;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::login_rate_limiter;
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Logged-in admin as shown in the layout.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
    pub role: String,
    pub can_edit: bool,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
            role: admin.role.to_string(),
            can_edit: admin.can_edit(),
        }
    }
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(login_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_page))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_page))
        .route("/{id}/delete", post(products::delete))
}

/// All back-office routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/reservations/{id}/status", post(reservations::update_status))
        .route("/import-defaults", post(import::import_defaults))
        .route("/settings", get(settings::show).post(settings::update))
        .nest("/products", product_routes())
        .nest("/auth", auth_routes())
}
