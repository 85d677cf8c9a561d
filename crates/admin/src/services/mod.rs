//! Back-office services.

pub mod auth;
pub mod catalog_seed;

pub use auth::{AdminAuthError, AdminAuthService};
