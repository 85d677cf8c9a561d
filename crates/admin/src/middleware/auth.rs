//! Authentication extractors for the back-office.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Login page path.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires a logged-in admin of any role.
///
/// Unauthenticated requests are redirected to the login page.
///
/// ```rust,ignore
/// async fn dashboard(RequireAdminAuth(admin): RequireAdminAuth) -> impl IntoResponse {
///     format!("Olá, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

pub enum AdminAuthRejection {
    RedirectToLogin,
    /// Session layer missing from the stack.
    Unavailable,
    /// Logged in as a read-only viewer.
    Forbidden,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Seu perfil tem acesso somente para leitura",
            )
                .into_response(),
        }
    }
}

async fn current_admin(parts: &Parts) -> Result<CurrentAdmin, AdminAuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AdminAuthRejection::Unavailable)?;

    session
        .get(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
        .ok_or(AdminAuthRejection::RedirectToLogin)
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_admin(parts).await.map(Self)
    }
}

/// Extractor for mutations: requires an admin whose role can edit.
///
/// Viewers get 403 Forbidden.
pub struct RequireEditor(pub CurrentAdmin);

impl<S> FromRequestParts<S> for RequireEditor
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = current_admin(parts).await?;
        if !admin.can_edit() {
            tracing::warn!(admin_id = %admin.id, path = %parts.uri.path(), "Viewer attempted a write");
            return Err(AdminAuthRejection::Forbidden);
        }
        Ok(Self(admin))
    }
}

/// Extractor that optionally gets the current admin.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_admin(parts).await.ok()))
    }
}

/// Store the admin in the session, rotating the session ID.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Log out by discarding the whole session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use tower_sessions::MemoryStore;

    use autopart_core::{AdminRole, AdminUserId, Email};

    use super::*;

    async fn parts_for(role: Option<AdminRole>) -> Parts {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        if let Some(role) = role {
            let admin = CurrentAdmin {
                id: AdminUserId::new(7),
                email: Email::parse("balcao@autopart.com.br").unwrap(),
                name: "Balcão".to_owned(),
                role,
            };
            set_current_admin(&session, &admin).await.unwrap();
        }

        let (mut parts, ()) = Request::builder()
            .method("POST")
            .uri("/products/3/delete")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(session);
        parts
    }

    fn status(rejection: AdminAuthRejection) -> StatusCode {
        rejection.into_response().status()
    }

    #[tokio::test]
    async fn viewer_is_forbidden_from_mutations() {
        let mut parts = parts_for(Some(AdminRole::Viewer)).await;
        let rejection = RequireEditor::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(status(rejection), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn viewer_can_still_read() {
        let mut parts = parts_for(Some(AdminRole::Viewer)).await;
        let RequireAdminAuth(admin) = RequireAdminAuth::from_request_parts(&mut parts, &())
            .await
            .ok()
            .unwrap();
        assert_eq!(admin.role, AdminRole::Viewer);
    }

    #[tokio::test]
    async fn admin_role_may_edit() {
        let mut parts = parts_for(Some(AdminRole::Admin)).await;
        let RequireEditor(admin) = RequireEditor::from_request_parts(&mut parts, &())
            .await
            .ok()
            .unwrap();
        assert!(admin.can_edit());
    }

    #[tokio::test]
    async fn anonymous_mutation_redirects_to_login() {
        let mut parts = parts_for(None).await;
        let rejection = RequireEditor::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        let resp = rejection.into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()["location"], LOGIN_PATH);
    }
}
