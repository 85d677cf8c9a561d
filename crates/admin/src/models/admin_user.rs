//! Admin user domain types.

use chrono::{DateTime, Utc};

use autopart_core::{AdminRole, AdminUserId, Email};

/// A back-office account.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
