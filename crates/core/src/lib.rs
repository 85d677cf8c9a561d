//! AutoPart Core - shared domain library.
//!
//! Used by every AutoPart component:
//! - `storefront` - public catalog, cart and WhatsApp checkout
//! - `admin` - back-office for products, leads and site settings
//! - `cli` - migrations, admin accounts and catalog seeding
//!
//! # Architecture
//!
//! Pure types and functions only: no I/O, no database access, no HTTP. The
//! optional `postgres` feature adds `sqlx` encode/decode and `FromRow`
//! implementations so the web crates can load rows straight into these types.
//!
//! # Modules
//!
//! - [`types`] - IDs, email, WhatsApp number and status enums
//! - [`slug`] - product URL slugs
//! - [`catalog`] - products, form validation and listing filters
//! - [`cart`] - session cart operations
//! - [`reservation`] - leads and the public lead form
//! - [`whatsapp`] - `wa.me` link builders
//! - [`settings`] - site branding and contact settings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod reservation;
pub mod settings;
pub mod slug;
pub mod types;
pub mod whatsapp;

pub use cart::{Cart, CartItem};
pub use catalog::{CatalogFilter, NewProduct, Product, SearchScope, ValidationError};
pub use reservation::{NewReservation, Reservation};
pub use settings::{SiteSettings, WorkingHours};
pub use types::*;
