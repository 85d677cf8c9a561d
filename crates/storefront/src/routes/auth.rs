//! Customer login, registration and logout.
//!
//! Accounts are local: passwords are hashed with Argon2 and the logged-in
//! customer is kept in the session. Failed submissions re-render the form
//! with a message and the visitor's input.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_customer, safe_next, set_current_customer};
use crate::models::{CurrentCustomer, Customer};
use crate::routes::PageContext;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// `?next=` on the login and registration pages.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub email: String,
    pub next: String,
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub name: String,
    pub email: String,
    pub next: String,
    pub error: Option<String>,
}

// =============================================================================
// Login
// =============================================================================

pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(customer): OptionalAuth,
    Query(query): Query<NextQuery>,
) -> Result<Response> {
    let next = safe_next(query.next.as_deref()).to_owned();
    if customer.is_some() {
        return Ok(Redirect::to(&next).into_response());
    }

    let page = PageContext::load(&state, &session, None).await?;
    Ok(LoginTemplate {
        page,
        email: String::new(),
        next,
        error: None,
    }
    .into_response())
}

#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let next = safe_next(form.next.as_deref()).to_owned();

    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(customer) => {
            start_session(&session, &customer).await?;
            add_breadcrumb("auth", "Customer logged in", &[]);
            Ok(Redirect::to(&next).into_response())
        }
        Err(e) if e.is_internal() => Err(AppError::Auth(e)),
        Err(e) => {
            tracing::info!(error = %e, "Login rejected");
            let page = PageContext::load(&state, &session, None).await?;
            let template = LoginTemplate {
                page,
                email: form.email,
                next,
                error: Some(e.user_message()),
            };
            Ok((StatusCode::UNAUTHORIZED, template).into_response())
        }
    }
}

// =============================================================================
// Registration
// =============================================================================

pub async fn register_page(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(customer): OptionalAuth,
    Query(query): Query<NextQuery>,
) -> Result<Response> {
    let next = safe_next(query.next.as_deref()).to_owned();
    if customer.is_some() {
        return Ok(Redirect::to(&next).into_response());
    }

    let page = PageContext::load(&state, &session, None).await?;
    Ok(RegisterTemplate {
        page,
        name: String::new(),
        email: String::new(),
        next,
        error: None,
    }
    .into_response())
}

/// Create an account and log the new customer in straight away.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let next = safe_next(form.next.as_deref()).to_owned();

    let result = if form.password == form.password_confirm {
        AuthService::new(state.pool())
            .register(&form.email, &form.name, &form.password)
            .await
    } else {
        Err(AuthError::WeakPassword("As senhas não conferem".to_owned()))
    };

    match result {
        Ok(customer) => {
            start_session(&session, &customer).await?;
            add_breadcrumb("auth", "Customer registered", &[]);
            Ok(Redirect::to(&next).into_response())
        }
        Err(e) if e.is_internal() => Err(AppError::Auth(e)),
        Err(e) => {
            let status = match e {
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            let page = PageContext::load(&state, &session, None).await?;
            let template = RegisterTemplate {
                page,
                name: form.name,
                email: form.email,
                next,
                error: Some(e.user_message()),
            };
            Ok((status, template).into_response())
        }
    }
}

async fn start_session(session: &Session, customer: &Customer) -> Result<()> {
    set_current_customer(session, &CurrentCustomer::from(customer)).await?;
    set_sentry_user(&customer.id, Some(customer.email.as_str()));
    Ok(())
}

// =============================================================================
// Logout
// =============================================================================

/// Log out. The cart stays in the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_customer(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();
    Redirect::to("/").into_response()
}
