//! Cart route handlers.
//!
//! The cart lives in the session as an [`autopart_core::Cart`]. Every
//! mutation works as a plain form post (redirect back to the cart) and as an
//! HTMX request (fragment plus `HX-Trigger: cart-updated`).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use autopart_core::{Cart, ProductId, Reservation, whatsapp};

use crate::db::ProductRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::session_keys;
use crate::routes::PageContext;
use crate::services::reservations;
use crate::state::AppState;

const CART_PATH: &str = "/carrinho";

// =============================================================================
// Session Helpers
// =============================================================================

/// Cart stored in the session, or an empty one.
///
/// An undecodable cart (e.g. from an older release) is treated as empty.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("HX-Request")
}

/// Response for a cart mutation: badge fragment for HTMX, redirect otherwise.
fn mutation_response(headers: &HeaderMap, cart: &Cart, redirect_to: &str) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: cart.total_quantity(),
            },
        )
            .into_response()
    } else {
        Redirect::to(redirect_to).into_response()
    }
}

// =============================================================================
// Forms and Templates
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    /// Page to return to for non-HTMX posts.
    pub back: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: Cart,
}

/// Shown after checkout with the WhatsApp hand-off link.
#[derive(Template, WebTemplate)]
#[template(path = "cart/confirmation.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub reservations: Vec<Reservation>,
    pub whatsapp_link: String,
}

/// Cart count badge fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

#[instrument(skip(state, session, customer))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(customer): OptionalAuth,
) -> Result<CartShowTemplate> {
    let cart = load_cart(&session).await;
    let page = PageContext::load(&state, &session, customer).await?;
    Ok(CartShowTemplate { page, cart })
}

/// Add one unit of a product. Sold products are refused.
///
/// The product is read from the database rather than the catalog cache so a
/// part sold moments ago cannot be added.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(form.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("produto {}", form.product_id)))?;
    if !product.is_available() {
        return Err(AppError::BadRequest(
            "Este produto já foi vendido".to_owned(),
        ));
    }

    let mut cart = load_cart(&session).await;
    cart.add(&product);
    save_cart(&session, &cart).await?;

    let back = crate::middleware::safe_next(form.back.as_deref());
    let back = if back == "/" { CART_PATH } else { back };
    Ok(mutation_response(&headers, &cart, back))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    cart.update_quantity(form.product_id, form.quantity);
    save_cart(&session, &cart).await?;
    Ok(mutation_response(&headers, &cart, CART_PATH))
}

#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    cart.remove(form.product_id);
    save_cart(&session, &cart).await?;
    Ok(mutation_response(&headers, &cart, CART_PATH))
}

/// Cart badge fragment (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    CartCountTemplate {
        count: load_cart(&session).await.total_quantity(),
    }
}

/// Turn the cart into reservations and hand the order off to WhatsApp.
///
/// Requires a logged-in customer; anonymous visitors are sent to the login
/// page and come back to the cart afterwards. A line sold since it was added
/// fails the whole checkout with 400. The cart is only cleared once every
/// line has been recorded.
#[instrument(skip(state, session, customer))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(customer): RequireAuth,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to(CART_PATH).into_response());
    }

    let created = reservations::checkout(state.pool(), &cart, &customer).await?;
    let settings = state.catalog().settings().await?;
    let whatsapp_link = whatsapp::checkout_order(&settings.whatsapp, &cart);

    let count = created.len().to_string();
    add_breadcrumb("checkout", "Cart converted to reservations", &[("count", &count)]);

    cart.clear();
    save_cart(&session, &cart).await?;

    let page = PageContext::load(&state, &session, Some(customer)).await?;
    Ok(CheckoutTemplate {
        page,
        reservations: created,
        whatsapp_link,
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn htmx_detection_uses_request_header() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("HX-Request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn plain_post_redirects_back() {
        let response = mutation_response(&HeaderMap::new(), &Cart::default(), "/produtos");
        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers().get("location").map(HeaderValue::as_bytes),
            Some(b"/produtos".as_slice())
        );
    }

    #[test]
    fn htmx_post_triggers_cart_update() {
        let mut headers = HeaderMap::new();
        headers.insert("HX-Request", HeaderValue::from_static("true"));
        let response = mutation_response(&headers, &Cart::default(), CART_PATH);
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("HX-Trigger").map(HeaderValue::as_bytes),
            Some(b"cart-updated".as_slice())
        );
    }
}
