//! Business logic sitting between route handlers and the repositories.

pub mod auth;
pub mod catalog;
pub mod reservations;

pub use catalog::CatalogCache;
