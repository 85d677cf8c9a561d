//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] autopart_core::EmailError),

    /// Wrong password or unknown email; the two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("password validation failed: {0}")]
    WeakPassword(String),

    #[error("name is required")]
    MissingName,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Message safe to show on the login and registration forms.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(e) => e.to_string(),
            Self::InvalidCredentials => "E-mail ou senha incorretos".to_owned(),
            Self::UserAlreadyExists => "Já existe uma conta com este e-mail".to_owned(),
            Self::WeakPassword(msg) => msg.clone(),
            Self::MissingName => "Informe seu nome".to_owned(),
            Self::Repository(_) | Self::PasswordHash => {
                "Não foi possível concluir. Tente novamente.".to_owned()
            }
        }
    }

    /// Whether the failure is on our side rather than the visitor's input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::PasswordHash)
    }
}
