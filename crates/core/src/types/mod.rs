//! Value types shared across the AutoPart crates.

pub mod email;
pub mod id;
pub mod phone;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{PhoneError, WhatsAppNumber};
pub use status::*;
