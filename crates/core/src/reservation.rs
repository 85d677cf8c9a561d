//! Leads raised from the product page or the cart checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ValidationError;
use crate::types::{CustomerId, ProductId, ReservationId, ReservationStatus, WhatsAppNumber};

/// Phone recorded for checkout leads, where contact continues on WhatsApp.
pub const PHONE_PENDING: &str = "Pendente no WhatsApp";

/// Length of the public reference code.
pub const CODE_LENGTH: usize = 9;

/// A row of `shop.reservation`.
///
/// Product title and SKU are copied at creation so the lead stays readable
/// after the product is edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: ReservationId,
    pub code: String,
    pub product_id: Option<ProductId>,
    pub product_title: String,
    pub product_sku: String,
    pub customer_id: Option<CustomerId>,
    pub customer_name: String,
    pub customer_phone: String,
    pub city: Option<String>,
    pub observation: Option<String>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub code: String,
    pub product_id: ProductId,
    pub product_title: String,
    pub product_sku: String,
    pub customer_id: Option<CustomerId>,
    pub customer_name: String,
    pub customer_phone: String,
    pub city: Option<String>,
    pub observation: Option<String>,
}

/// The "Tenho interesse" form on a product page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub observation: String,
}

/// A lead form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLead {
    pub name: String,
    pub phone: WhatsAppNumber,
    pub city: Option<String>,
    pub observation: Option<String>,
}

impl LeadForm {
    /// # Errors
    ///
    /// Returns every field problem: a blank name or an invalid phone.
    pub fn validate(&self) -> Result<ValidLead, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::new("name", "Informe seu nome"));
        }
        let phone = WhatsAppNumber::parse(&self.phone)
            .map_err(|e| errors.push(ValidationError::new("phone", e.to_string())))
            .ok();

        match phone {
            Some(phone) if errors.is_empty() => Ok(ValidLead {
                name: name.to_owned(),
                phone,
                city: non_blank(&self.city),
                observation: non_blank(&self.observation),
            }),
            _ => Err(errors),
        }
    }
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_owned())
}

/// Whether `code` has the shape of a reference code.
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH
        && code
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lead_requires_name_and_phone() {
        let errors = LeadForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "phone"]);
    }

    #[test]
    fn lead_optional_fields_become_none_when_blank() {
        let lead = LeadForm {
            name: " Maria ".to_owned(),
            phone: "(11) 98888-7777".to_owned(),
            city: "  ".to_owned(),
            observation: "Preciso do motor".to_owned(),
        }
        .validate()
        .unwrap();
        assert_eq!(lead.name, "Maria");
        assert_eq!(lead.phone.as_str(), "11988887777");
        assert_eq!(lead.city, None);
        assert_eq!(lead.observation.as_deref(), Some("Preciso do motor"));
    }

    #[test]
    fn code_shape() {
        assert!(is_valid_code("A1B2C3D4E"));
        assert!(!is_valid_code("a1b2c3d4e"));
        assert!(!is_valid_code("A1B2C3D4"));
    }
}
