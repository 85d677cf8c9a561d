//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry; operators get a short message in Portuguese.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use autopart_core::TransitionError;

use crate::db::RepositoryError;
use crate::services::AdminAuthError;
use crate::services::catalog_seed::SeedError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Auth error: {0}")]
    Auth(#[from] AdminAuthError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Import error: {0}")]
    Seed(#[from] SeedError),

    /// Lead status change the lifecycle does not allow.
    #[error("Invalid transition: {0}")]
    Transition(#[from] TransitionError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Logged in, but the role does not allow the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Database(RepositoryError::NotFound | RepositoryError::Conflict(_))
            | Self::Seed(SeedError::Invalid { .. } | SeedError::Parse(_)) => false,
            Self::Database(_) | Self::Session(_) | Self::Seed(_) | Self::Internal(_) => true,
            Self::Auth(e) => e.is_internal(),
            Self::Transition(_)
            | Self::NotFound(_)
            | Self::Forbidden(_)
            | Self::BadRequest(_)
            | Self::Conflict(_) => false,
        }
    }

    const fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        match self {
            Self::Auth(AdminAuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Database(RepositoryError::Conflict(_))
            | Self::Auth(AdminAuthError::UserAlreadyExists)
            | Self::Transition(_)
            | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Seed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details
        let message = match &self {
            _ if self.is_server_error() => "Erro interno do servidor".to_string(),
            Self::Database(RepositoryError::NotFound) => "Registro não encontrado".to_string(),
            Self::Database(RepositoryError::Conflict(_)) => {
                "O registro foi alterado por outra pessoa. Recarregue a página.".to_string()
            }
            Self::Auth(AdminAuthError::InvalidCredentials) => {
                "E-mail ou senha incorretos".to_string()
            }
            Self::Transition(e) => format!(
                "Não é possível mudar de \"{}\" para \"{}\"",
                e.from.admin_label(),
                e.to.admin_label()
            ),
            Self::NotFound(what) => format!("Não encontrado: {what}"),
            Self::Forbidden(msg) | Self::BadRequest(msg) | Self::Conflict(msg) => msg.clone(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Associate subsequent Sentry events with the logged-in admin.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Record an admin action as a Sentry breadcrumb.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
