//! Starter catalog and bulk import.
//!
//! "Importar Catálogo" on the dashboard and `autopart seed products` both
//! upsert by SKU, so running an import twice leaves one row per SKU.

use sqlx::PgPool;
use tracing::{info, instrument, warn};

use autopart_core::{Condition, NewProduct, ProductStatus, ValidationError, catalog};

use crate::db::{ProductRepository, RepositoryError};

/// Errors from loading or importing a catalog.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("invalid catalog file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A product failed validation; nothing was written.
    #[error("product {sku}: {}", format_errors(.errors))]
    Invalid {
        sku: String,
        errors: Vec<ValidationError>,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub upserted: usize,
}

#[allow(clippy::too_many_arguments)]
fn product(
    sku: &str,
    title: &str,
    category: &str,
    brand: &str,
    model: &str,
    years: (i32, i32),
    description: &str,
    compatibility: &[&str],
    image: &str,
) -> NewProduct {
    NewProduct {
        sku: sku.to_owned(),
        title: title.to_owned(),
        category: category.to_owned(),
        brand: brand.to_owned(),
        model: model.to_owned(),
        year_from: years.0,
        year_to: years.1,
        condition: Condition::Usado,
        description: description.to_owned(),
        compatibility: compatibility.iter().map(|s| (*s).to_owned()).collect(),
        price_label: catalog::DEFAULT_PRICE_LABEL.to_owned(),
        images: vec![image.to_owned()],
        status: ProductStatus::Available,
    }
}

/// The five salvage units the shop launched with.
#[must_use]
pub fn default_products() -> Vec<NewProduct> {
    vec![
        product(
            "SUC-COR-15",
            "Sucata Toyota Corolla 2015 para Peças",
            "Sucata Veículo",
            "Toyota",
            "Corolla",
            (2014, 2016),
            "Sucata inteira para retirada de peças. Motor, câmbio e suspensão em ótimo estado.",
            &["Toyota Corolla 2014-2017"],
            "https://picsum.photos/seed/corolla-scrap/800/600",
        ),
        product(
            "SUC-CAM-001",
            "Sucata Caminhão Mercedes-Benz Atego 1719",
            "Sucata Caminhões",
            "Mercedes-Benz",
            "Atego 1719",
            (2021, 2023),
            "Sucata de caminhão Mercedes-Benz Atego 1719 ano 2022. Diversas peças mecânicas e cabine disponíveis.",
            &["Mercedes Atego 1719", "Atego 1419"],
            "https://images.unsplash.com/photo-1601584115197-04ecc0da31d7?auto=format&fit=crop&q=80&w=800",
        ),
        product(
            "SUC-GOL-G6",
            "Sucata VW Gol G6 Batido para Peças",
            "Sucata Veículo",
            "Volkswagen",
            "Gol",
            (2013, 2016),
            "Veículo com colisão traseira. Frente completa e motorização OK.",
            &["Volkswagen Gol G6"],
            "https://picsum.photos/seed/gol-scrap/800/600",
        ),
        product(
            "SUC-SCA-R440",
            "Sucata Cavalo Mecânico Scania R440 2014",
            "Sucata Caminhões",
            "Scania",
            "R440",
            (2013, 2015),
            "Sucata de cavalo mecânico Scania R440. Motor e diferencial disponíveis para venda de peças.",
            &["Scania R440", "Scania G440"],
            "https://picsum.photos/seed/scania-scrap/800/600",
        ),
        product(
            "SUC-ONIX-19",
            "Sucata Chevrolet Onix 2019 para Desmonte",
            "Sucata Veículo",
            "Chevrolet",
            "Onix",
            (2017, 2019),
            "Onix 2019 com procedência de seguradora. Peças de lataria e interior impecáveis.",
            &["Chevrolet Onix 2013-2019"],
            "https://picsum.photos/seed/onix-scrap/800/600",
        ),
    ]
}

/// Parse a YAML list of products.
///
/// Omitted optional fields take the same defaults as the product form.
///
/// # Errors
///
/// Returns `SeedError::Parse` if the document is not a list of products.
pub fn parse_yaml(source: &str) -> Result<Vec<NewProduct>, SeedError> {
    Ok(serde_yaml::from_str(source)?)
}

/// Normalize and validate every product up front.
///
/// # Errors
///
/// Returns `SeedError::Invalid` for the first product that fails.
pub fn prepare(products: Vec<NewProduct>, current_year: i32) -> Result<Vec<NewProduct>, SeedError> {
    products
        .into_iter()
        .map(|p| {
            let p = p.normalized();
            let errors = p.validate(current_year);
            if errors.is_empty() {
                Ok(p)
            } else {
                Err(SeedError::Invalid {
                    sku: p.sku.clone(),
                    errors,
                })
            }
        })
        .collect()
}

/// Validate then upsert every product by SKU.
///
/// Validation runs before any write, so a bad entry leaves the catalog
/// untouched.
///
/// # Errors
///
/// Returns `SeedError::Invalid` or `SeedError::Repository`.
#[instrument(skip(pool, products), fields(count = products.len()))]
pub async fn import(pool: &PgPool, products: Vec<NewProduct>) -> Result<ImportReport, SeedError> {
    let products = prepare(products, catalog::current_year())?;
    let repo = ProductRepository::new(pool);

    let mut report = ImportReport::default();
    for p in &products {
        if let Err(e) = repo.upsert_by_sku(p).await {
            warn!(sku = %p.sku, error = %e, "Catalog import stopped");
            return Err(e.into());
        }
        report.upserted += 1;
    }

    info!(upserted = report.upserted, "Catalog import finished");
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let prepared = prepare(default_products(), 2025).unwrap();
        assert_eq!(prepared.len(), 5);
    }

    #[test]
    fn default_skus_are_unique() {
        let mut skus: Vec<_> = default_products().into_iter().map(|p| p.sku).collect();
        skus.sort();
        skus.dedup();
        assert_eq!(skus.len(), 5);
    }

    #[test]
    fn default_slugs_combine_title_and_sku() {
        let products = default_products();
        let onix = products.iter().find(|p| p.sku == "SUC-ONIX-19").unwrap();
        assert_eq!(onix.slug(), "sucata-chevrolet-onix-2019-para-desmonte-suc-onix-19");
    }

    #[test]
    fn yaml_uses_form_defaults() {
        let products = parse_yaml(
            r"
- sku: SUC-HB20-18
  title: Sucata Hyundai HB20 2018
  category: Sucata Veículo
  brand: Hyundai
  model: HB20
  year_from: 2017
  year_to: 2019
",
        )
        .unwrap();
        let p = products.first().unwrap();
        assert_eq!(p.condition, Condition::Usado);
        assert_eq!(p.price_label, "Sob consulta");
        assert_eq!(p.status, ProductStatus::Available);
        assert!(p.images.is_empty());
    }

    #[test]
    fn invalid_entry_is_reported_with_its_sku() {
        let mut bad = default_products();
        if let Some(p) = bad.get_mut(2) {
            p.year_from = 2030;
            p.year_to = 2020;
        }
        match prepare(bad, 2025) {
            Err(SeedError::Invalid { sku, errors }) => {
                assert_eq!(sku, "SUC-GOL-G6");
                assert!(errors.iter().any(|e| e.field == "year_to"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        assert!(matches!(parse_yaml("sku: [unclosed"), Err(SeedError::Parse(_))));
    }
}
