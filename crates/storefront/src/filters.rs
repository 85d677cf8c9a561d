//! Askama filters for the storefront templates.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Copyright year in the footer.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(autopart_core::catalog::current_year())
}

/// Formats a `wa.me` digit string for display: `5511999999999` becomes
/// `+55 (11) 99999-9999`. Other lengths are shown with a leading `+` only.
///
/// Usage in templates: `{{ settings.whatsapp|phone_display }}`
#[askama::filter_fn]
pub fn phone_display(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_phone(&value.to_string()))
}

fn format_phone(digits: &str) -> String {
    match (digits.get(..2), digits.get(2..4), digits.get(4..)) {
        (Some(country), Some(area), Some(rest)) if digits.len() == 13 || digits.len() == 12 => {
            let split = rest.len() - 4;
            format!(
                "+{country} ({area}) {}-{}",
                rest.get(..split).unwrap_or_default(),
                rest.get(split..).unwrap_or_default()
            )
        }
        _ => format!("+{digits}"),
    }
}

#[cfg(test)]
mod tests {
    use super::format_phone;

    #[test]
    fn formats_brazilian_mobile_and_landline() {
        assert_eq!(format_phone("5511999999999"), "+55 (11) 99999-9999");
        assert_eq!(format_phone("551133334444"), "+55 (11) 3333-4444");
    }

    #[test]
    fn other_lengths_fall_back() {
        assert_eq!(format_phone("1234567890"), "+1234567890");
    }
}
