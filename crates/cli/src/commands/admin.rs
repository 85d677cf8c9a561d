//! Back-office account commands.
//!
//! # Environment Variables
//!
//! - `AUTOPART_ADMIN_PASSWORD` - password for `admin create`; when unset the
//!   first line of stdin is used, so it can be piped from a secret store.

use std::io::BufRead;

use autopart_admin::db::AdminUserRepository;
use autopart_admin::services::{AdminAuthError, AdminAuthService};
use autopart_core::AdminRole;

use super::{CommandError, connect};

const PASSWORD_ENV: &str = "AUTOPART_ADMIN_PASSWORD";

fn read_password() -> Result<String, CommandError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    tracing::info!("{PASSWORD_ENV} not set, reading password from stdin");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Create a back-office account.
///
/// # Errors
///
/// Returns `CommandError::Admin` for invalid input or an existing email.
pub async fn create_user(email: &str, name: &str, role: AdminRole) -> Result<(), CommandError> {
    let password = read_password()?;
    let pool = connect().await?;

    tracing::info!("Creating admin user: {} ({})", email, role);
    let user = AdminAuthService::new(&pool)
        .create_admin(email, name, role, &password)
        .await
        .map_err(|e| {
            if matches!(e, AdminAuthError::UserAlreadyExists) {
                tracing::error!("An account already exists for {email}");
            }
            e
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );
    Ok(())
}

/// Print every back-office account.
///
/// # Errors
///
/// Returns `CommandError` if the query fails.
pub async fn list_users() -> Result<(), CommandError> {
    let pool = connect().await?;
    let users = AdminUserRepository::new(&pool).list_all().await?;

    if users.is_empty() {
        tracing::info!("No admin users yet. Create one with `autopart admin create`.");
    }
    for user in users {
        tracing::info!(
            "{:>4}  {:<7}  {}  <{}>  since {}",
            user.id,
            user.role,
            user.name,
            user.email,
            user.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}
