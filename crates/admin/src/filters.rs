//! Askama filters for the back-office templates.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Year used by product validation, so the footer and the year fields agree.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(autopart_core::catalog::current_year())
}

/// `1` becomes "1 produto", anything else "N produtos".
///
/// Usage in templates: `{{ total|product_count }}`
#[askama::filter_fn]
pub fn product_count(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(product_count_label(&value.to_string()))
}

fn product_count_label(n: &str) -> String {
    if n == "1" {
        "1 produto".to_owned()
    } else {
        format!("{n} produtos")
    }
}
