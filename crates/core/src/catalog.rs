//! Catalog model, form validation and listing filters.
//!
//! The catalog is small (a salvage yard lists tens to hundreds of vehicles),
//! so filtering happens in memory over the cached product list rather than
//! in SQL.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::slug::product_slug;
use crate::types::{Condition, ProductId, ProductStatus};

/// Categories offered in the catalog sidebar and the product form.
pub const CATEGORIES: [&str; 2] = [DEFAULT_CATEGORY, "Sucata Caminhões"];

/// Preselected category on a blank product form.
pub const DEFAULT_CATEGORY: &str = "Sucata Veículo";

/// Preselected brand on a blank product form.
pub const DEFAULT_BRAND: &str = "Toyota";

/// Brands offered in the catalog sidebar and the product form.
pub const BRANDS: [&str; 14] = [
    DEFAULT_BRAND,
    "Volkswagen",
    "Fiat",
    "Chevrolet",
    "Ford",
    "Honda",
    "Hyundai",
    "Jeep",
    "Mercedes-Benz",
    "Volvo",
    "Scania",
    "Iveco",
    "MAN",
    "DAF",
];

/// Sentinel category value meaning "every category".
pub const ALL_CATEGORIES: &str = "Todos";
/// Sentinel brand value meaning "every brand".
pub const ALL_BRANDS: &str = "Todas";

/// Price label used when the form leaves it at its default.
pub const DEFAULT_PRICE_LABEL: &str = "Sob consulta";

/// Oldest model year accepted by the product form.
pub const MIN_YEAR: i32 = 1900;

/// A catalog entry as stored in `shop.product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub sku: String,
    pub title: String,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub year_from: i32,
    pub year_to: i32,
    pub condition: Condition,
    pub description: String,
    pub compatibility: Vec<String>,
    pub price_label: String,
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[must_use]
    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// "2014–2016", or a single year when both ends match.
    #[must_use]
    pub fn year_range(&self) -> String {
        if self.year_from == self.year_to {
            self.year_from.to_string()
        } else {
            format!("{}–{}", self.year_from, self.year_to)
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Available
    }
}

/// A single form field problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Product data coming from the back-office form or a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub title: String,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub year_from: i32,
    pub year_to: i32,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub compatibility: Vec<String>,
    #[serde(default = "default_price_label")]
    pub price_label: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
}

fn default_price_label() -> String {
    DEFAULT_PRICE_LABEL.to_owned()
}

impl NewProduct {
    /// Blank form as shown on "Novo Produto".
    #[must_use]
    pub fn blank(current_year: i32) -> Self {
        Self {
            sku: String::new(),
            title: String::new(),
            category: DEFAULT_CATEGORY.to_owned(),
            brand: DEFAULT_BRAND.to_owned(),
            model: String::new(),
            year_from: current_year,
            year_to: current_year,
            condition: Condition::Usado,
            description: String::new(),
            compatibility: Vec::new(),
            price_label: default_price_label(),
            images: Vec::new(),
            status: ProductStatus::Available,
        }
    }

    /// Prefill the edit form from an existing row.
    #[must_use]
    pub fn from_product(p: &Product) -> Self {
        Self {
            sku: p.sku.clone(),
            title: p.title.clone(),
            category: p.category.clone(),
            brand: p.brand.clone(),
            model: p.model.clone(),
            year_from: p.year_from,
            year_to: p.year_to,
            condition: p.condition,
            description: p.description.clone(),
            compatibility: p.compatibility.clone(),
            price_label: p.price_label.clone(),
            images: p.images.clone(),
            status: p.status,
        }
    }

    /// Trim text fields and drop blank list entries.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.sku,
            &mut self.title,
            &mut self.category,
            &mut self.brand,
            &mut self.model,
            &mut self.description,
            &mut self.price_label,
        ] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_owned();
            }
        }
        self.compatibility = clean_lines(self.compatibility);
        self.images = clean_lines(self.images);
        self
    }

    #[must_use]
    pub fn slug(&self) -> String {
        product_slug(&self.title, &self.sku)
    }

    /// Check every rule and report all violations.
    ///
    /// `current_year` bounds `year_to` at one model year ahead.
    #[must_use]
    pub fn validate(&self, current_year: i32) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (field, value, label) in [
            ("title", &self.title, "Título"),
            ("sku", &self.sku, "SKU"),
            ("model", &self.model, "Modelo"),
            ("category", &self.category, "Categoria"),
            ("brand", &self.brand, "Marca"),
            ("price_label", &self.price_label, "Preço"),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(field, format!("{label} é obrigatório")));
            }
        }

        // Title and SKU made only of symbols leave nothing to put in the URL.
        let has_identity = !self.title.trim().is_empty() || !self.sku.trim().is_empty();
        if has_identity && self.slug().is_empty() {
            errors.push(ValidationError::new(
                "slug",
                "Título ou SKU precisa conter letras ou números",
            ));
        }

        let max_year = current_year + 1;
        if self.year_from < MIN_YEAR || self.year_from > max_year {
            errors.push(ValidationError::new(
                "year_from",
                format!("Ano inicial deve estar entre {MIN_YEAR} e {max_year}"),
            ));
        }
        if self.year_to < MIN_YEAR || self.year_to > max_year {
            errors.push(ValidationError::new(
                "year_to",
                format!("Ano final deve estar entre {MIN_YEAR} e {max_year}"),
            ));
        }
        if self.year_from > self.year_to {
            errors.push(ValidationError::new(
                "year_to",
                "Ano final não pode ser anterior ao ano inicial",
            ));
        }

        for image in self.images.iter().filter(|i| !i.trim().is_empty()) {
            if !is_http_url(image.trim()) {
                errors.push(ValidationError::new(
                    "images",
                    format!("URL de imagem inválida: {image}"),
                ));
            }
        }

        errors
    }
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|l| l.trim().to_owned())
        .filter(|l| !l.is_empty())
        .collect()
}

fn is_http_url(s: &str) -> bool {
    url::Url::parse(s).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
}

/// Current calendar year in UTC.
#[must_use]
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Which fields a free-text search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Title, SKU and model.
    #[default]
    Storefront,
    /// Title and SKU.
    Admin,
}

/// Catalog listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    #[serde(default, rename = "q")]
    pub search: Option<String>,
    #[serde(default, rename = "cat")]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl CatalogFilter {
    /// Search needle, lowercased; `None` when blank.
    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Selected category, `None` for "Todos" or blank.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }

    /// Selected brand, `None` for "Todas" or blank.
    #[must_use]
    pub fn brand(&self) -> Option<&str> {
        self.brand
            .as_deref()
            .filter(|b| !b.is_empty() && *b != ALL_BRANDS)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle().is_none() && self.category().is_none() && self.brand().is_none()
    }

    /// Products matching every active constraint, in input order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product], scope: SearchScope) -> Vec<&'a Product> {
        let needle = self.needle();
        let category = self.category();
        let brand = self.brand();

        products
            .iter()
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|n| matches_search(p, n, scope))
            })
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| brand.is_none_or(|b| p.brand == b))
            .collect()
    }
}

fn matches_search(product: &Product, needle: &str, scope: SearchScope) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(needle);
    hit(&product.title)
        || hit(&product.sku)
        || (scope == SearchScope::Storefront && hit(&product.model))
}

/// The first `n` products, for the home page showcase.
#[must_use]
pub fn featured(products: &[Product], n: usize) -> &[Product] {
    products.split_at(n.min(products.len())).0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: i32, title: &str, sku: &str, model: &str, brand: &str) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            slug: product_slug(title, sku),
            sku: sku.to_owned(),
            title: title.to_owned(),
            category: DEFAULT_CATEGORY.to_owned(),
            brand: brand.to_owned(),
            model: model.to_owned(),
            year_from: 2014,
            year_to: 2016,
            condition: Condition::Usado,
            description: String::new(),
            compatibility: vec![],
            price_label: DEFAULT_PRICE_LABEL.to_owned(),
            images: vec!["https://img.example/1.jpg".to_owned()],
            status: ProductStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    fn catalog() -> Vec<Product> {
        let mut truck = product(2, "Sucata Atego 1719", "SUC-CAM-001", "Atego 1719", "Mercedes-Benz");
        truck.category = "Sucata Caminhões".to_owned();
        vec![
            product(1, "Sucata Toyota Corolla", "SUC-COR-15", "Corolla", "Toyota"),
            truck,
            product(3, "Sucata VW Gol G6", "SUC-GOL-G6", "Gol", "Volkswagen"),
        ]
    }

    fn ids(found: &[&Product]) -> Vec<i32> {
        found.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let products = catalog();
        let filter = CatalogFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(&products, SearchScope::Storefront)), vec![1, 2, 3]);
    }

    #[test]
    fn sentinel_values_mean_no_constraint() {
        let products = catalog();
        let filter = CatalogFilter {
            search: Some("   ".to_owned()),
            category: Some(ALL_CATEGORIES.to_owned()),
            brand: Some(ALL_BRANDS.to_owned()),
        };
        assert_eq!(filter.apply(&products, SearchScope::Storefront).len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_sku() {
        let products = catalog();
        let by_title = CatalogFilter {
            search: Some("COROLLA".to_owned()),
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&by_title.apply(&products, SearchScope::Admin)), vec![1]);

        let by_sku = CatalogFilter {
            search: Some("gol-g6".to_owned()),
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&by_sku.apply(&products, SearchScope::Admin)), vec![3]);
    }

    #[test]
    fn model_search_only_applies_to_storefront() {
        let mut products = catalog();
        products[1].title = "Sucata Caminhão".to_owned();
        let filter = CatalogFilter {
            search: Some("atego".to_owned()),
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&products, SearchScope::Storefront)), vec![2]);
        assert!(filter.apply(&products, SearchScope::Admin).is_empty());
    }

    #[test]
    fn category_and_brand_match_exactly() {
        let products = catalog();
        let filter = CatalogFilter {
            search: None,
            category: Some("Sucata Veículo".to_owned()),
            brand: Some("Volkswagen".to_owned()),
        };
        assert_eq!(ids(&filter.apply(&products, SearchScope::Storefront)), vec![3]);

        let partial = CatalogFilter {
            brand: Some("Volks".to_owned()),
            ..CatalogFilter::default()
        };
        assert!(partial.apply(&products, SearchScope::Storefront).is_empty());
    }

    #[test]
    fn featured_caps_at_catalog_size() {
        let products = catalog();
        assert_eq!(featured(&products, 10).len(), 3);
        assert_eq!(featured(&products, 2).len(), 2);
    }

    #[test]
    fn year_range_collapses_single_year() {
        let mut p = catalog().remove(0);
        assert_eq!(p.year_range(), "2014–2016");
        p.year_to = 2014;
        assert_eq!(p.year_range(), "2014");
    }

    fn valid_form() -> NewProduct {
        NewProduct {
            sku: "SUC-ONIX-19".to_owned(),
            title: "Sucata Chevrolet Onix 2019".to_owned(),
            model: "Onix".to_owned(),
            images: vec!["https://picsum.photos/seed/onix/800/600".to_owned()],
            ..NewProduct::blank(2024)
        }
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(valid_form().validate(2024).is_empty());
    }

    #[test]
    fn reports_every_missing_field() {
        let form = NewProduct {
            sku: " ".to_owned(),
            title: String::new(),
            ..valid_form()
        };
        let fields: Vec<_> = form.validate(2024).iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "sku"]);
    }

    #[test]
    fn symbol_only_identity_has_no_slug() {
        let form = NewProduct {
            title: "★".to_owned(),
            sku: "##".to_owned(),
            ..valid_form()
        };
        let fields: Vec<_> = form.validate(2024).iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["slug"]);
    }

    #[test]
    fn symbol_title_with_real_sku_still_slugs() {
        let form = NewProduct {
            title: "★★★".to_owned(),
            ..valid_form()
        };
        assert!(form.validate(2024).is_empty());
        assert_eq!(form.slug(), "suc-onix-19");
    }

    #[test]
    fn blank_form_preselects_first_options() {
        let blank = NewProduct::blank(2024);
        assert_eq!(Some(&blank.category.as_str()), CATEGORIES.first());
        assert_eq!(Some(&blank.brand.as_str()), BRANDS.first());
    }

    #[test]
    fn year_bounds() {
        let future = NewProduct {
            year_to: 2026,
            ..valid_form()
        };
        assert!(future.validate(2024).iter().any(|e| e.field == "year_to"));

        let next_model_year = NewProduct {
            year_to: 2025,
            ..valid_form()
        };
        assert!(next_model_year.validate(2024).is_empty());

        let inverted = NewProduct {
            year_from: 2020,
            year_to: 2010,
            ..valid_form()
        };
        assert_eq!(inverted.validate(2024).len(), 1);

        let ancient = NewProduct {
            year_from: 1899,
            ..valid_form()
        };
        assert!(ancient.validate(2024).iter().any(|e| e.field == "year_from"));
    }

    #[test]
    fn images_must_be_http_urls() {
        let form = NewProduct {
            images: vec!["ftp://x/y.jpg".to_owned(), "not a url".to_owned()],
            ..valid_form()
        };
        assert_eq!(form.validate(2024).len(), 2);
    }

    #[test]
    fn normalization_trims_and_drops_blank_lines() {
        let form = NewProduct {
            title: "  Sucata Onix ".to_owned(),
            compatibility: vec!["Onix 2013-2019".to_owned(), "   ".to_owned()],
            images: vec![String::new()],
            ..valid_form()
        }
        .normalized();
        assert_eq!(form.title, "Sucata Onix");
        assert_eq!(form.compatibility, vec!["Onix 2013-2019"]);
        assert!(form.images.is_empty());
        assert_eq!(form.slug(), "sucata-onix-suc-onix-19");
    }

    #[test]
    fn seed_yaml_fields_default_sensibly() {
        let json = r#"{"sku":"A","title":"B","category":"Sucata Veículo","brand":"Fiat","model":"Uno","year_from":2010,"year_to":2012}"#;
        let form: NewProduct = serde_json::from_str(json).unwrap();
        assert_eq!(form.price_label, DEFAULT_PRICE_LABEL);
        assert_eq!(form.condition, Condition::Usado);
        assert_eq!(form.status, ProductStatus::Available);
    }
}
