//! Storefront branding and contact details, edited from the back-office.

use serde::{Deserialize, Serialize};

use crate::catalog::ValidationError;
use crate::types::WhatsAppNumber;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub weekdays: String,
    pub saturday: String,
}

/// The singleton settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub name: String,
    pub subtext: String,
    /// Digits only, ready for `wa.me`.
    pub whatsapp: String,
    pub cnpj: String,
    pub working_hours: WorkingHours,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: "AutoPart".to_owned(),
            subtext: "Desmanche Especializado".to_owned(),
            whatsapp: "5511999999999".to_owned(),
            cnpj: "00.000.000/0001-00".to_owned(),
            working_hours: WorkingHours {
                weekdays: "08:00 às 18:00".to_owned(),
                saturday: "08:00 às 12:00".to_owned(),
            },
        }
    }
}

impl SiteSettings {
    /// Validate and normalize a submitted form.
    ///
    /// On success the WhatsApp number is reduced to digits and text fields
    /// are trimmed.
    ///
    /// # Errors
    ///
    /// Returns every field problem found.
    pub fn validate(mut self) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();

        for field in [
            &mut self.name,
            &mut self.subtext,
            &mut self.cnpj,
            &mut self.working_hours.weekdays,
            &mut self.working_hours.saturday,
        ] {
            *field = field.trim().to_owned();
        }

        if self.name.is_empty() {
            errors.push(ValidationError::new("name", "Nome da loja é obrigatório"));
        }
        match WhatsAppNumber::parse(&self.whatsapp) {
            Ok(n) => self.whatsapp = n.into(),
            Err(e) => errors.push(ValidationError::new("whatsapp", e.to_string())),
        }

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(errors)
        }
    }
}
