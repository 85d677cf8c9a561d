//! Storefront flows against a running server.
//!
//! These tests require:
//! - A migrated database with the starter catalog (`autopart seed products`)
//! - The storefront running (`cargo run -p autopart-storefront`)

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;

use autopart_integration_tests::{COROLLA_SLUG, client, input_value, storefront_url};

fn unique_email() -> String {
    format!("cliente-{}@autopart.test", chrono::Utc::now().timestamp_micros())
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn readiness_reports_database() {
    let resp = client()
        .get(format!("{}/health/ready", storefront_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn catalog_filters_by_category() {
    let resp = client()
        .get(format!("{}/produtos?cat=Sucata%20Caminh%C3%B5es", storefront_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Atego 1719"));
    assert!(!html.contains("Corolla 2015"));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn unknown_product_redirects_to_catalog() {
    let resp = client()
        .get(format!("{}/produto/nao-existe", storefront_url()))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()["location"], "/produtos");
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn guest_lead_hands_off_to_whatsapp() {
    let resp = client()
        .post(format!("{}/produto/{COROLLA_SLUG}/reservar", storefront_url()))
        .form(&[
            ("name", "Oficina do Zé"),
            ("phone", "(11) 98888-7777"),
            ("city", "Guarulhos"),
            ("observation", "Preciso do câmbio"),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    let location = resp.headers()["location"].to_str().unwrap();
    assert!(location.starts_with("https://wa.me/"));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn lead_without_phone_is_rejected() {
    let resp = client()
        .post(format!("{}/produto/{COROLLA_SLUG}/reservar", storefront_url()))
        .form(&[("name", "Sem Telefone"), ("phone", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn cart_checkout_creates_reservations() {
    let base = storefront_url();
    let client = client();

    let page = client
        .get(format!("{base}/produto/{COROLLA_SLUG}"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let product_id = input_value(&page, "product_id").unwrap().to_owned();

    // HTMX add answers with the badge fragment and an event header.
    let resp = client
        .post(format!("{base}/carrinho/adicionar"))
        .header("HX-Request", "true")
        .form(&[("product_id", product_id.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["hx-trigger"], "cart-updated");
    assert!(resp.text().await.unwrap().contains(">1<"));

    // Anonymous checkout goes to login first.
    let resp = client
        .post(format!("{base}/carrinho/finalizar"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["location"], "/entrar?next=%2Fcarrinho");

    let email = unique_email();
    let resp = client
        .post(format!("{base}/cadastro"))
        .form(&[
            ("name", "Cliente Teste"),
            ("email", email.as_str()),
            ("password", "senha-segura-1"),
            ("password_confirm", "senha-segura-1"),
            ("next", "/carrinho"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["location"], "/carrinho");

    // The cart survived login.
    let resp = client
        .post(format!("{base}/carrinho/finalizar"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("https://wa.me/"));

    let html = client
        .get(format!("{base}/minhas-reservas"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("SUC-COR-15"));
    assert!(html.contains("Aguardando Contato"));

    // Cart is empty again.
    let resp = client
        .post(format!("{base}/carrinho/finalizar"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["location"], "/carrinho");
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn duplicate_registration_conflicts() {
    let base = storefront_url();
    let email = unique_email();
    let form = [
        ("name", "Cliente"),
        ("email", email.as_str()),
        ("password", "senha-segura-1"),
        ("password_confirm", "senha-segura-1"),
    ];

    let first = client()
        .post(format!("{base}/cadastro"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert!(first.status().is_redirection());

    let second = client()
        .post(format!("{base}/cadastro"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}
