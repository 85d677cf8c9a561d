//! Back-office login and logout.
//!
//! Accounts are created from the CLI; there is no self-registration.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AdminAuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
}

pub async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate {
        email: String::new(),
        error: None,
    }
    .into_response()
}

#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AdminAuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            let admin = CurrentAdmin::from(&user);
            set_current_admin(&session, &admin).await?;
            set_sentry_user(&admin.id, Some(admin.email.as_str()));
            info!(admin_id = %admin.id, role = %admin.role, "Admin logged in");
            add_breadcrumb("auth", "Admin logged in", &[]);
            Ok(Redirect::to("/").into_response())
        }
        Err(e) if e.is_internal() => Err(AppError::Auth(e)),
        Err(e) => {
            tracing::warn!(error = %e, "Admin login rejected");
            let template = LoginTemplate {
                email: form.email,
                error: Some("E-mail ou senha incorretos".to_owned()),
            };
            Ok((StatusCode::UNAUTHORIZED, template).into_response())
        }
    }
}

pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/auth/login"))
}
