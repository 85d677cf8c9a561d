//! Back-office flows against a running server.
//!
//! These tests require:
//! - A migrated database
//! - The admin server running (`cargo run -p autopart-admin`)
//! - An `admin`-role account in `AUTOPART_TEST_ADMIN_EMAIL` /
//!   `AUTOPART_TEST_ADMIN_PASSWORD`
//!
//! The storefront must also be running for the lead round trip.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};

use autopart_integration_tests::{COROLLA_SLUG, admin_login, admin_url, client, storefront_url};

async fn logged_in() -> Client {
    let client = client();
    admin_login(&client).await;
    client
}

fn product_form<'a>(sku: &'a str, title: &'a str, year_to: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("sku", sku),
        ("title", title),
        ("category", "Sucata Veículo"),
        ("brand", "Fiat"),
        ("model", "Uno"),
        ("year_from", "2010"),
        ("year_to", year_to),
        ("condition", "Usado"),
        ("description", "Teste automatizado"),
        ("compatibility", "Fiat Uno 2010-2014"),
        ("price_label", ""),
        ("images", ""),
        ("status", "available"),
    ]
}

#[tokio::test]
#[ignore = "Requires running admin server and test account"]
async fn wrong_password_is_rejected() {
    let resp = client()
        .post(format!("{}/auth/login", admin_url()))
        .form(&[("email", "ninguem@autopart.test"), ("password", "senha-errada-123")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and test account"]
async fn import_defaults_is_idempotent() {
    let client = logged_in().await;
    let base = admin_url();

    for _ in 0..2 {
        let resp = client
            .post(format!("{base}/import-defaults"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.headers()["location"], "/?imported=5");
    }

    let html = client
        .get(format!("{base}/products?q=SUC-COR-15"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(html.matches("SKU: SUC-COR-15").count(), 1);
}

#[tokio::test]
#[ignore = "Requires running admin server and test account"]
async fn product_create_validate_and_conflict() {
    let client = logged_in().await;
    let base = admin_url();
    let sku = format!("QA-UNO-{}", chrono::Utc::now().timestamp_micros());
    let title = "Sucata Fiat Uno QA";

    // Year range reversed
    let resp = client
        .post(format!("{base}/products"))
        .form(&product_form(&sku, title, "2001"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains(&sku));

    let resp = client
        .post(format!("{base}/products"))
        .form(&product_form(&sku, title, "2014"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["location"], "/products");

    let resp = client
        .post(format!("{base}/products"))
        .form(&product_form(&sku, "Outro título", "2014"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(resp.text().await.unwrap().contains("SKU"));
}

#[tokio::test]
#[ignore = "Requires running admin server and test account"]
async fn invalid_whatsapp_is_rejected() {
    let client = logged_in().await;
    let resp = client
        .post(format!("{}/settings", admin_url()))
        .form(&[
            ("name", "AutoPart"),
            ("subtext", "Desmanche Especializado"),
            ("whatsapp", "abc"),
            ("cnpj", "00.000.000/0001-00"),
            ("weekdays", "08:00 às 18:00"),
            ("saturday", "08:00 às 12:00"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running admin server, storefront and test account"]
async fn lead_moves_through_lifecycle() {
    let admin = logged_in().await;
    let base = admin_url();
    admin
        .post(format!("{base}/import-defaults"))
        .send()
        .await
        .unwrap();

    let name = format!("Lead QA {}", chrono::Utc::now().timestamp_micros());
    let resp = client()
        .post(format!("{}/produto/{COROLLA_SLUG}/reservar", storefront_url()))
        .form(&[("name", name.as_str()), ("phone", "11988887777")])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    let html = admin.get(&base).send().await.unwrap().text().await.unwrap();
    let row_start = html.find(&name).unwrap();
    let row = html.get(row_start..).unwrap();
    let action_start = row.find("/reservations/").unwrap();
    let action = row.get(action_start..).unwrap();
    let path = action.get(..action.find('"').unwrap()).unwrap().to_owned();

    let resp = admin
        .post(format!("{base}{path}"))
        .form(&[("status", "contacted")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["location"], "/");

    // Contacted cannot go back to new.
    let resp = admin
        .post(format!("{base}{path}"))
        .form(&[("status", "new")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Same transition twice: the second sees a finished lead.
    let first = admin
        .post(format!("{base}{path}"))
        .form(&[("status", "completed")])
        .send()
        .await
        .unwrap();
    assert!(first.status().is_redirection());
    let second = admin
        .post(format!("{base}{path}"))
        .form(&[("status", "completed")])
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}
