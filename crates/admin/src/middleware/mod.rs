//! HTTP middleware stack for the back-office.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID
//! 4. Security headers (no scripts, `no-store`)
//! 5. Session layer (tower-sessions with `PostgreSQL` store, `SameSite=Strict`)
//! 6. Rate limiting on the login POST (governor)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalAdminAuth, RequireAdminAuth, RequireEditor, clear_current_admin, set_current_admin,
};
pub use rate_limit::login_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
