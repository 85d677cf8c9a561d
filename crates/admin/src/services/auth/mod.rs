//! Back-office accounts: creation (from the CLI) and password login.

mod error;

pub use error::AdminAuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::instrument;

use autopart_core::{AdminRole, Email};

use crate::db::{AdminUserRepository, RepositoryError};
use crate::models::AdminUser;

/// Minimum password length. Back-office accounts get a stricter floor than
/// storefront customers.
pub const MIN_PASSWORD_LENGTH: usize = 12;

pub struct AdminAuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
        }
    }

    /// Create a back-office account.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::UserAlreadyExists` if the email is taken, or
    /// a validation variant for bad input.
    #[instrument(skip(self, password))]
    pub async fn create_admin(
        &self,
        email: &str,
        name: &str,
        role: AdminRole,
        password: &str,
    ) -> Result<AdminUser, AdminAuthError> {
        let email = Email::parse(email)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AdminAuthError::MissingName);
        }
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .create(&email, name, role, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AdminAuthError::UserAlreadyExists,
                other => AdminAuthError::Repository(other),
            })
    }

    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, AdminAuthError> {
        let email = Email::parse(email).map_err(|_| AdminAuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;
        Ok(user)
    }
}

fn validate_password(password: &str) -> Result<(), AdminAuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminAuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AdminAuthError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> Result<(), AdminAuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AdminAuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AdminAuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn admin_passwords_need_twelve_chars() {
        assert!(matches!(
            validate_password("onze-chars!"),
            Err(AdminAuthError::WeakPassword(_))
        ));
        assert!(validate_password("doze-chars!!").is_ok());
    }

    #[test]
    fn verify_rejects_other_password() {
        let hash = hash_password("patio-de-sucatas").unwrap();
        assert!(verify_password("patio-de-sucatas", &hash).is_ok());
        assert!(matches!(
            verify_password("patio-de-sucata", &hash),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn repository_failures_are_internal() {
        assert!(AdminAuthError::PasswordHash.is_internal());
        assert!(!AdminAuthError::InvalidCredentials.is_internal());
    }
}
