//! Catalog listing, product detail and the product-page lead form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use autopart_core::catalog::{ALL_BRANDS, ALL_CATEGORIES, BRANDS, CATEGORIES};
use autopart_core::reservation::LeadForm;
use autopart_core::{CatalogFilter, Product, SearchScope, ValidationError, whatsapp};

use crate::db::ProductRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::PageContext;
use crate::services::reservations;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct CatalogTemplate {
    pub page: PageContext,
    pub products: Vec<Product>,
    pub search: String,
    pub category: String,
    pub brand: String,
    pub categories: Vec<FilterOption>,
    pub brands: Vec<FilterOption>,
    pub rare_parts_link: String,
}

/// One entry in the category or brand selector.
pub struct FilterOption {
    pub value: &'static str,
    pub selected: bool,
}

fn options(all: &'static str, values: &[&'static str], current: Option<&str>) -> Vec<FilterOption> {
    let current = current.unwrap_or(all);
    std::iter::once(all)
        .chain(values.iter().copied())
        .map(|value| FilterOption {
            value,
            selected: value == current,
        })
        .collect()
}

#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductTemplate {
    pub page: PageContext,
    pub product: Product,
    pub inquiry_link: String,
    pub lead: LeadForm,
    pub errors: Vec<ValidationError>,
}

/// Catalog page with search, category and brand filters.
#[instrument(skip(state, session, customer))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(customer): OptionalAuth,
    Query(filter): Query<CatalogFilter>,
) -> Result<CatalogTemplate> {
    let products = state.catalog().products().await?;
    let page = PageContext::load(&state, &session, customer).await?;

    let found: Vec<Product> = filter
        .apply(&products, SearchScope::Storefront)
        .into_iter()
        .cloned()
        .collect();

    Ok(CatalogTemplate {
        rare_parts_link: whatsapp::rare_parts(&page.settings.whatsapp),
        page,
        products: found,
        search: filter.search.clone().unwrap_or_default(),
        category: filter.category().unwrap_or(ALL_CATEGORIES).to_owned(),
        brand: filter.brand().unwrap_or(ALL_BRANDS).to_owned(),
        categories: options(ALL_CATEGORIES, &CATEGORIES, filter.category()),
        brands: options(ALL_BRANDS, &BRANDS, filter.brand()),
    })
}

/// Product detail. Unknown slugs go back to the catalog.
#[instrument(skip(state, session, customer))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(customer): OptionalAuth,
    Path(slug): Path<String>,
) -> Result<Response> {
    let Some(product) = state.catalog().product_by_slug(&slug).await? else {
        return Ok(Redirect::to("/produtos").into_response());
    };
    let page = PageContext::load(&state, &session, customer).await?;

    let lead = LeadForm {
        name: page.customer_name().to_owned(),
        ..LeadForm::default()
    };

    Ok(ProductTemplate {
        inquiry_link: whatsapp::product_inquiry(&page.settings.whatsapp, &product),
        page,
        product,
        lead,
        errors: Vec::new(),
    }
    .into_response())
}

/// Record a lead from the product page, then hand off to WhatsApp.
///
/// Invalid input re-renders the page with messages (422); sold products
/// cannot be reserved (400).
#[instrument(skip(state, session, customer, form))]
pub async fn reserve(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(customer): OptionalAuth,
    Path(slug): Path<String>,
    Form(form): Form<LeadForm>,
) -> Result<Response> {
    // Fresh read: the cached list may not know the part was just sold
    let Some(product) = ProductRepository::new(state.pool()).get_by_slug(&slug).await? else {
        return Err(AppError::NotFound(format!("produto {slug}")));
    };
    if !product.is_available() {
        return Err(AppError::BadRequest(
            "Este produto já foi vendido e não pode ser reservado".to_owned(),
        ));
    }

    let lead = match form.validate() {
        Ok(lead) => lead,
        Err(errors) => {
            let page = PageContext::load(&state, &session, customer).await?;
            let template = ProductTemplate {
                inquiry_link: whatsapp::product_inquiry(&page.settings.whatsapp, &product),
                page,
                product,
                lead: form,
                errors,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    let reservation =
        reservations::create_lead(state.pool(), &product, lead, customer.as_ref()).await?;
    add_breadcrumb(
        "reservation",
        "Lead created",
        &[("code", &reservation.code), ("sku", &product.sku)],
    );

    let settings = state.catalog().settings().await?;
    let link = whatsapp::reservation_follow_up(
        &settings.whatsapp,
        &reservation.code,
        &reservation.product_title,
    );
    Ok(Redirect::to(&link).into_response())
}
