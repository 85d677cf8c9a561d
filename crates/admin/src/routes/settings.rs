//! "Configurações do Site": branding and contact details shown on the
//! storefront.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, instrument};

use autopart_core::{SiteSettings, ValidationError, WorkingHours};

use crate::db::settings::{get_site_settings, save_site_settings};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{RequireAdminAuth, RequireEditor};
use crate::models::CurrentAdmin;
use crate::routes::AdminUserView;
use crate::state::AppState;

/// Flat form fields; working hours are nested in [`SiteSettings`].
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsForm {
    pub name: String,
    #[serde(default)]
    pub subtext: String,
    pub whatsapp: String,
    #[serde(default)]
    pub cnpj: String,
    #[serde(default)]
    pub weekdays: String,
    #[serde(default)]
    pub saturday: String,
}

impl From<SettingsForm> for SiteSettings {
    fn from(f: SettingsForm) -> Self {
        Self {
            name: f.name,
            subtext: f.subtext,
            whatsapp: f.whatsapp,
            cnpj: f.cnpj,
            working_hours: WorkingHours {
                weekdays: f.weekdays,
                saturday: f.saturday,
            },
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub settings: SiteSettings,
    pub errors: Vec<ValidationError>,
    pub saved: bool,
}

impl SettingsTemplate {
    fn new(admin: &CurrentAdmin, settings: SiteSettings) -> Self {
        Self {
            admin_user: admin.into(),
            current_path: "/settings".to_owned(),
            settings,
            errors: Vec::new(),
            saved: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsQuery {
    #[serde(default)]
    pub saved: bool,
}

pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<SettingsQuery>,
) -> Result<SettingsTemplate> {
    let settings = get_site_settings(state.pool()).await?;
    Ok(SettingsTemplate {
        saved: query.saved,
        ..SettingsTemplate::new(&admin, settings)
    })
}

/// Save the settings. The storefront picks them up when its cache expires.
#[instrument(skip(state, admin, form), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(admin): RequireEditor,
    Form(form): Form<SettingsForm>,
) -> Result<Response> {
    let submitted = SiteSettings::from(form);
    match submitted.clone().validate() {
        Ok(settings) => {
            save_site_settings(state.pool(), &settings).await?;
            info!(name = %settings.name, "Site settings saved");
            add_breadcrumb("settings", "Site settings saved", &[]);
            Ok(Redirect::to("/settings?saved=true").into_response())
        }
        Err(errors) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            SettingsTemplate {
                errors,
                ..SettingsTemplate::new(&admin, submitted)
            },
        )
            .into_response()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn form_maps_working_hours() {
        let form = SettingsForm {
            name: "AutoPart".into(),
            subtext: "Desmanche".into(),
            whatsapp: "+55 (11) 98888-7777".into(),
            cnpj: String::new(),
            weekdays: "08:00 às 18:00".into(),
            saturday: "Fechado".into(),
        };
        let settings = SiteSettings::from(form).validate().unwrap();
        assert_eq!(settings.working_hours.saturday, "Fechado");
        assert_eq!(settings.whatsapp, "5511988887777");
    }
}
