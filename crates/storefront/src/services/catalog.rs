//! In-memory cache in front of the catalog and settings tables.
//!
//! Uses `moka` with a short TTL so back-office edits show up within a minute
//! without any cross-process invalidation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use autopart_core::{Product, SiteSettings};

use crate::db::{ProductRepository, RepositoryError, settings};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Products,
    Settings,
}

#[derive(Debug, Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Settings(Arc<SiteSettings>),
}

/// Cached catalog reads. Cheap to clone.
#[derive(Clone)]
pub struct CatalogCache {
    pool: PgPool,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogCache {
    #[must_use]
    pub fn new(pool: PgPool, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(8).time_to_live(ttl).build();
        Self { pool, cache }
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog has to be reloaded and the
    /// query fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, RepositoryError> {
        if let Some(CacheValue::Products(products)) = self.cache.get(&CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = Arc::new(ProductRepository::new(&self.pool).list().await?);
        self.cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// Look up a product page by slug.
    ///
    /// Served from the cached list when possible; a miss falls through to the
    /// database so a product created seconds ago is still reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails.
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        if let Some(p) = self.products().await?.iter().find(|p| p.slug == slug) {
            return Ok(Some(p.clone()));
        }
        ProductRepository::new(&self.pool).get_by_slug(slug).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError` if the settings have to be reloaded and the
    /// query fails.
    #[instrument(skip(self))]
    pub async fn settings(&self) -> Result<Arc<SiteSettings>, RepositoryError> {
        if let Some(CacheValue::Settings(s)) = self.cache.get(&CacheKey::Settings).await {
            return Ok(s);
        }

        let s = Arc::new(settings::get_site_settings(&self.pool).await?);
        self.cache
            .insert(CacheKey::Settings, CacheValue::Settings(Arc::clone(&s)))
            .await;
        Ok(s)
    }
}
