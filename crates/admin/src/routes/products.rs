//! "Gestão de Estoque": product list and create/edit/delete forms.
//!
//! Forms post plain strings; [`ProductForm`] turns them into a
//! [`NewProduct`] and collects every problem so the page can be re-rendered
//! with the operator's input intact.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, instrument};

use autopart_core::{
    CatalogFilter, Condition, NewProduct, Product, ProductId, ProductStatus, SearchScope,
    ValidationError,
    catalog::{self, BRANDS, CATEGORIES},
};

use crate::db::products::{SKU_CONSTRAINT, SLUG_CONSTRAINT};
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{RequireAdminAuth, RequireEditor};
use crate::models::CurrentAdmin;
use crate::routes::AdminUserView;
use crate::state::AppState;

// =============================================================================
// Form
// =============================================================================

/// Raw product form as submitted.
///
/// Years are kept as text so a typo re-renders instead of failing
/// deserialization. List fields are one entry per line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub sku: String,
    pub title: String,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub year_from: String,
    pub year_to: String,
    pub condition: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub compatibility: String,
    #[serde(default)]
    pub price_label: String,
    #[serde(default)]
    pub images: String,
    pub status: String,
}

impl From<&NewProduct> for ProductForm {
    fn from(p: &NewProduct) -> Self {
        Self {
            sku: p.sku.clone(),
            title: p.title.clone(),
            category: p.category.clone(),
            brand: p.brand.clone(),
            model: p.model.clone(),
            year_from: p.year_from.to_string(),
            year_to: p.year_to.to_string(),
            condition: p.condition.label().to_owned(),
            description: p.description.clone(),
            compatibility: p.compatibility.join("\n"),
            price_label: p.price_label.clone(),
            images: p.images.join("\n"),
            status: p.status.as_str().to_owned(),
        }
    }
}

fn split_lines(s: &str) -> Vec<String> {
    s.lines().map(str::to_owned).collect()
}

impl ProductForm {
    /// Parse and validate.
    ///
    /// # Errors
    ///
    /// Returns every field problem, including unparseable years and unknown
    /// condition or status values.
    pub fn parse(&self, current_year: i32) -> std::result::Result<NewProduct, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let mut year = |field: &'static str, label: &str, raw: &str| {
            raw.trim().parse::<i32>().unwrap_or_else(|_| {
                errors.push(ValidationError::new(field, format!("{label} deve ser um número")));
                current_year
            })
        };
        let year_from = year("year_from", "Ano De", &self.year_from);
        let year_to = year("year_to", "Ano Até", &self.year_to);

        let condition = self.condition.parse::<Condition>().unwrap_or_else(|e| {
            errors.push(ValidationError::new("condition", e.to_string()));
            Condition::default()
        });
        let status = self.status.parse::<ProductStatus>().unwrap_or_else(|e| {
            errors.push(ValidationError::new("status", e.to_string()));
            ProductStatus::default()
        });

        let price_label = if self.price_label.trim().is_empty() {
            catalog::DEFAULT_PRICE_LABEL.to_owned()
        } else {
            self.price_label.clone()
        };

        let product = NewProduct {
            sku: self.sku.clone(),
            title: self.title.clone(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            year_from,
            year_to,
            condition,
            description: self.description.clone(),
            compatibility: split_lines(&self.compatibility),
            price_label,
            images: split_lines(&self.images),
            status,
        }
        .normalized();

        // Year errors from parsing would be duplicated by range checks on the
        // placeholder value.
        let parse_failed: Vec<&str> = errors.iter().map(|e| e.field).collect();
        errors.extend(
            product
                .validate(current_year)
                .into_iter()
                .filter(|e| !parse_failed.contains(&e.field)),
        );

        if errors.is_empty() {
            Ok(product)
        } else {
            Err(errors)
        }
    }
}

/// Form message for a unique violation.
fn conflict_message(constraint: &str) -> String {
    match constraint {
        SKU_CONSTRAINT => "Já existe um produto com este SKU".to_owned(),
        SLUG_CONSTRAINT => "Já existe um produto com este título e SKU".to_owned(),
        other => format!("Valor duplicado ({other})"),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// `<option>` entry.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

fn select(values: impl IntoIterator<Item = (String, String)>, current: &str) -> Vec<SelectOption> {
    values
        .into_iter()
        .map(|(value, label)| SelectOption {
            selected: value == current,
            value,
            label,
        })
        .collect()
}

/// Product row on the list page.
pub struct ProductRow {
    pub id: ProductId,
    pub sku: String,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub years: String,
    pub category: String,
    pub thumbnail: Option<String>,
    pub sold: bool,
    pub status_label: &'static str,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            sku: p.sku.clone(),
            title: p.title.clone(),
            brand: p.brand.clone(),
            model: p.model.clone(),
            years: p.year_range(),
            category: p.category.clone(),
            thumbnail: p.first_image().map(str::to_owned),
            sold: !p.is_available(),
            status_label: p.status.label(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub products: Vec<ProductRow>,
    pub total: usize,
    pub search: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub heading: &'static str,
    pub action: String,
    pub form: ProductForm,
    pub categories: Vec<SelectOption>,
    pub brands: Vec<SelectOption>,
    pub conditions: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub errors: Vec<ValidationError>,
}

impl ProductFormTemplate {
    fn new(
        admin: &CurrentAdmin,
        editing: Option<ProductId>,
        form: ProductForm,
        errors: Vec<ValidationError>,
    ) -> Self {
        let (heading, action) = editing.map_or_else(
            || ("Novo Produto", "/products".to_owned()),
            |id| ("Editar Produto", format!("/products/{id}")),
        );
        let named = |values: &[&str]| {
            values
                .iter()
                .map(|v| ((*v).to_owned(), (*v).to_owned()))
                .collect::<Vec<_>>()
        };
        Self {
            admin_user: admin.into(),
            current_path: "/products".to_owned(),
            heading,
            action,
            categories: select(named(&CATEGORIES), &form.category),
            brands: select(named(&BRANDS), &form.brand),
            conditions: select(
                Condition::ALL
                    .iter()
                    .map(|c| (c.label().to_owned(), c.label().to_owned())),
                &form.condition,
            ),
            statuses: select(
                ProductStatus::ALL
                    .iter()
                    .map(|s| (s.as_str().to_owned(), s.label().to_owned())),
                &form.status,
            ),
            form,
            errors,
        }
    }

    fn rejected(self, status: StatusCode) -> Response {
        (status, self).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub q: Option<String>,
}

/// Product list, filtered by title or SKU.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<ProductsQuery>,
) -> Result<ProductsIndexTemplate> {
    let products = ProductRepository::new(state.pool()).list().await?;
    let filter = CatalogFilter {
        search: query.q.clone(),
        ..CatalogFilter::default()
    };
    let rows: Vec<ProductRow> = filter
        .apply(&products, SearchScope::Admin)
        .into_iter()
        .map(ProductRow::from)
        .collect();

    Ok(ProductsIndexTemplate {
        admin_user: (&admin).into(),
        current_path: "/products".to_owned(),
        total: products.len(),
        products: rows,
        search: query.q.unwrap_or_default(),
    })
}

/// Empty "Novo Produto" form.
pub async fn new_page(RequireEditor(admin): RequireEditor) -> ProductFormTemplate {
    let blank = NewProduct::blank(catalog::current_year());
    ProductFormTemplate::new(&admin, None, ProductForm::from(&blank), Vec::new())
}

#[instrument(skip(state, admin, form), fields(admin_id = %admin.id, sku = %form.sku))]
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(admin): RequireEditor,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product = match form.parse(catalog::current_year()) {
        Ok(p) => p,
        Err(errors) => {
            return Ok(ProductFormTemplate::new(&admin, None, form, errors)
                .rejected(StatusCode::UNPROCESSABLE_ENTITY));
        }
    };

    match ProductRepository::new(state.pool()).create(&product).await {
        Ok(created) => {
            info!(product_id = %created.id, slug = %created.slug, "Product created");
            add_breadcrumb("product", "Product created", &[("sku", &created.sku)]);
            Ok(Redirect::to("/products").into_response())
        }
        Err(RepositoryError::Conflict(constraint)) => {
            let errors = vec![ValidationError::new("sku", conflict_message(&constraint))];
            Ok(ProductFormTemplate::new(&admin, None, form, errors).rejected(StatusCode::CONFLICT))
        }
        Err(e) => Err(e.into()),
    }
}

/// Product form; viewers get the same page with every field disabled.
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<ProductId>,
) -> Result<ProductFormTemplate> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("produto {id}")))?;
    let form = ProductForm::from(&NewProduct::from_product(&product));
    Ok(ProductFormTemplate::new(&admin, Some(id), form, Vec::new()))
}

#[instrument(skip(state, admin, form), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(admin): RequireEditor,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product = match form.parse(catalog::current_year()) {
        Ok(p) => p,
        Err(errors) => {
            return Ok(ProductFormTemplate::new(&admin, Some(id), form, errors)
                .rejected(StatusCode::UNPROCESSABLE_ENTITY));
        }
    };

    match ProductRepository::new(state.pool()).update(id, &product).await {
        Ok(updated) => {
            info!(product_id = %id, slug = %updated.slug, "Product updated");
            add_breadcrumb("product", "Product updated", &[("sku", &updated.sku)]);
            Ok(Redirect::to("/products").into_response())
        }
        Err(RepositoryError::Conflict(constraint)) => {
            let errors = vec![ValidationError::new("sku", conflict_message(&constraint))];
            Ok(ProductFormTemplate::new(&admin, Some(id), form, errors)
                .rejected(StatusCode::CONFLICT))
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(format!("produto {id}"))),
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(admin): RequireEditor,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("produto {id}")),
            other => other.into(),
        })?;
    info!(product_id = %id, "Product deleted");
    Ok(Redirect::to("/products"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            sku: "SUC-HB20-18".into(),
            title: "Sucata Hyundai HB20 2018".into(),
            category: "Sucata Veículo".into(),
            brand: "Hyundai".into(),
            model: "HB20".into(),
            year_from: "2017".into(),
            year_to: "2019".into(),
            condition: "Usado".into(),
            description: "Frente completa".into(),
            compatibility: "HB20 2013-2019\r\n\r\n HB20S \n".into(),
            price_label: "  ".into(),
            images: "https://picsum.photos/seed/hb20/800/600\n".into(),
            status: "available".into(),
        }
    }

    #[test]
    fn parses_lists_and_defaults_price() {
        let p = valid_form().parse(2025).unwrap();
        assert_eq!(p.compatibility, vec!["HB20 2013-2019", "HB20S"]);
        assert_eq!(p.images.len(), 1);
        assert_eq!(p.price_label, "Sob consulta");
        assert_eq!(p.slug(), "sucata-hyundai-hb20-2018-suc-hb20-18");
    }

    #[test]
    fn non_numeric_year_is_reported_once() {
        let form = ProductForm {
            year_from: "dois mil".into(),
            ..valid_form()
        };
        let errors = form.parse(2025).unwrap_err();
        let year_errors: Vec<_> = errors.iter().filter(|e| e.field == "year_from").collect();
        assert_eq!(year_errors.len(), 1);
    }

    #[test]
    fn unknown_condition_is_a_field_error() {
        let form = ProductForm {
            condition: "Seminovo".into(),
            ..valid_form()
        };
        let errors = form.parse(2025).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "condition"));
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let form = ProductForm {
            sku: " ".into(),
            title: String::new(),
            ..valid_form()
        };
        let fields: Vec<_> = form.parse(2025).unwrap_err().iter().map(|e| e.field).collect();
        assert!(fields.contains(&"sku"));
        assert!(fields.contains(&"title"));
    }

    #[test]
    fn form_round_trips_from_product_data() {
        let p = valid_form().parse(2025).unwrap();
        let again = ProductForm::from(&p).parse(2025).unwrap();
        assert_eq!(again, p);
    }

    #[test]
    fn conflict_messages_name_the_field() {
        assert_eq!(conflict_message(SKU_CONSTRAINT), "Já existe um produto com este SKU");
        assert!(conflict_message(SLUG_CONSTRAINT).contains("título"));
    }

    #[test]
    fn select_marks_current_value() {
        let opts = select(
            [("a".to_owned(), "A".to_owned()), ("b".to_owned(), "B".to_owned())],
            "b",
        );
        assert!(!opts.first().unwrap().selected);
        assert!(opts.get(1).unwrap().selected);
    }

    fn staff(role: autopart_core::AdminRole) -> CurrentAdmin {
        CurrentAdmin {
            id: autopart_core::AdminUserId::new(2),
            email: autopart_core::Email::parse("estoque@autopart.com.br").unwrap(),
            name: "Estoque".to_owned(),
            role,
        }
    }

    #[test]
    fn viewer_sees_product_form_read_only() {
        let page = ProductFormTemplate::new(
            &staff(autopart_core::AdminRole::Viewer),
            Some(ProductId::new(4)),
            valid_form(),
            Vec::new(),
        );
        let html = page.render().unwrap();
        assert!(html.contains("Sucata Hyundai HB20 2018"));
        assert!(html.contains(" disabled"));
        assert!(!html.contains("Salvar"));
    }

    #[test]
    fn editor_gets_submit_button() {
        let page = ProductFormTemplate::new(
            &staff(autopart_core::AdminRole::Admin),
            Some(ProductId::new(4)),
            valid_form(),
            Vec::new(),
        );
        let html = page.render().unwrap();
        assert!(html.contains("Salvar"));
        assert!(!html.contains("<fieldset class=\"form-grid\" disabled"));
    }
}
