//! Session-stored admin identity.

use serde::{Deserialize, Serialize};

use autopart_core::{AdminRole, AdminUserId, Email};

use super::AdminUser;

/// The logged-in admin, as kept in the session.
///
/// The role is captured at login; a role change takes effect on the next
/// login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
}

impl CurrentAdmin {
    #[must_use]
    pub const fn can_edit(&self) -> bool {
        self.role.can_edit()
    }
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Session keys.
pub mod keys {
    pub const CURRENT_ADMIN: &str = "current_admin";
}
