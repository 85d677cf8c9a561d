//! In-process requests against both routers.
//!
//! The pool is lazy and points at a database that need not exist; every
//! route exercised here answers from the session or the middleware alone.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use autopart_integration_tests::{admin_config, lazy_pool, storefront_config};

fn storefront() -> axum::Router {
    autopart_storefront::app(autopart_storefront::state::AppState::new(
        storefront_config(),
        lazy_pool(),
    ))
}

fn admin() -> axum::Router {
    autopart_admin::app(autopart_admin::state::AppState::new(
        admin_config(),
        lazy_pool(),
    ))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::empty())
        .unwrap()
}

fn location(resp: &axum::response::Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// ============================================================================
// Storefront
// ============================================================================

#[tokio::test]
async fn storefront_health() {
    let resp = storefront().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn storefront_echoes_request_id_and_sets_headers() {
    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "teste-123")
        .body(Body::empty())
        .unwrap();
    let resp = storefront().oneshot(req).await.unwrap();

    assert_eq!(resp.headers()["x-request-id"], "teste-123");
    assert_eq!(resp.headers()[header::X_FRAME_OPTIONS], "DENY");
    let csp = resp.headers()[header::CONTENT_SECURITY_POLICY]
        .to_str()
        .unwrap();
    assert!(csp.contains("https://unpkg.com"));
}

#[tokio::test]
async fn new_visitor_has_empty_cart_badge() {
    let resp = storefront()
        .oneshot(get("/carrinho/contagem"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), 4096).await.unwrap();
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("cart-count"));
    assert!(!html.contains("badge"));
}

#[tokio::test]
async fn checkout_sends_anonymous_visitor_to_login() {
    let resp = storefront()
        .oneshot(post("/carrinho/finalizar"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/entrar?next=%2Fcarrinho");
}

#[tokio::test]
async fn reservations_page_requires_login() {
    let resp = storefront()
        .oneshot(get("/minhas-reservas"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/entrar?next=%2Fminhas-reservas");
}

// ============================================================================
// Back-office
// ============================================================================

#[tokio::test]
async fn admin_health() {
    let resp = admin().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_pages_redirect_to_login() {
    for uri in ["/", "/products", "/products/new", "/settings"] {
        let resp = admin().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), "/auth/login", "{uri}");
    }
}

#[tokio::test]
async fn admin_mutations_redirect_to_login() {
    for uri in ["/import-defaults", "/products/1/delete", "/reservations/1/status"] {
        let resp = admin().oneshot(post(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), "/auth/login", "{uri}");
    }
}

#[tokio::test]
async fn admin_login_page_renders_without_scripts() {
    let resp = admin().oneshot(get("/auth/login")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers().clone();
    assert!(
        headers[header::CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap()
            .contains("script-src 'none'")
    );
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");

    let body = to_bytes(resp.into_body(), 16 * 1024).await.unwrap();
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("action=\"/auth/login\""));
    assert!(!html.contains("<script"));
}
