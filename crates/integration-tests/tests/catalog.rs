//! The starter catalog flowing through core cart, filter and WhatsApp code.

#![allow(clippy::unwrap_used)]

use autopart_admin::services::catalog_seed::{default_products, prepare};
use autopart_core::{Cart, CatalogFilter, SearchScope, catalog, whatsapp};
use autopart_integration_tests::as_products;

#[test]
fn starter_catalog_passes_form_validation() {
    let prepared = prepare(default_products(), catalog::current_year()).unwrap();
    assert_eq!(prepared.len(), 5);
}

#[test]
fn starter_slugs_are_unique() {
    let products = as_products(default_products());
    let mut slugs: Vec<_> = products.iter().map(|p| p.slug.as_str()).collect();
    slugs.sort_unstable();
    slugs.dedup();
    assert_eq!(slugs.len(), products.len());
}

#[test]
fn truck_category_filter() {
    let products = as_products(default_products());
    let filter = CatalogFilter {
        category: Some("Sucata Caminhões".into()),
        ..CatalogFilter::default()
    };
    let skus: Vec<_> = filter
        .apply(&products, SearchScope::Storefront)
        .iter()
        .map(|p| p.sku.as_str())
        .collect();
    assert_eq!(skus.len(), 2);
    assert!(skus.contains(&"SUC-CAM-001"));
    assert!(skus.contains(&"SUC-SCA-R440"));
}

#[test]
fn admin_search_matches_sku_case_insensitively() {
    let products = as_products(default_products());
    let filter = CatalogFilter {
        search: Some("  suc-gol ".into()),
        ..CatalogFilter::default()
    };
    let hits = filter.apply(&products, SearchScope::Admin);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.first().map(|p| p.sku.as_str()), Some("SUC-GOL-G6"));
}

#[test]
fn checkout_message_lists_every_cart_line() {
    let products = as_products(default_products());
    let mut cart = Cart::default();
    for p in products.iter().take(2) {
        cart.add(p);
    }
    if let Some(first) = products.first() {
        cart.add(first);
    }

    let link = whatsapp::checkout_order("5511999999999", &cart);
    assert!(link.starts_with("https://wa.me/5511999999999?text="));
    assert!(link.contains("SUC-COR-15"));
    assert!(link.contains("SUC-CAM-001"));
    assert!(link.contains("%282x%29"));
    assert_eq!(cart.total_quantity(), 3);
}
