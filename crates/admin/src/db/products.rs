//! Catalog writes.

use sqlx::PgPool;
use tracing::instrument;

use autopart_core::{NewProduct, Product, ProductId};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, slug, sku, title, category, brand, model, \
     year_from, year_to, condition, description, compatibility, price_label, images, \
     status, created_at, updated_at";

/// Unique constraint on `shop.product.sku`.
pub const SKU_CONSTRAINT: &str = "product_sku_key";
/// Unique constraint on `shop.product.slug`.
pub const SLUG_CONSTRAINT: &str = "product_slug_key";

pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let n = sqlx::query_scalar("SELECT COUNT(*) FROM shop.product")
            .fetch_one(self.pool)
            .await?;
        Ok(n)
    }

    /// Insert a validated product. The slug is derived from title and SKU.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` with the violated constraint name
    /// when the SKU or slug is already taken.
    #[instrument(skip(self, p), fields(sku = %p.sku))]
    pub async fn create(&self, p: &NewProduct) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO shop.product
                (slug, sku, title, category, brand, model, year_from, year_to,
                 condition, description, compatibility, price_label, images, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(p.slug())
        .bind(&p.sku)
        .bind(&p.title)
        .bind(&p.category)
        .bind(&p.brand)
        .bind(&p.model)
        .bind(p.year_from)
        .bind(p.year_to)
        .bind(p.condition)
        .bind(&p.description)
        .bind(&p.compatibility)
        .bind(&p.price_label)
        .bind(&p.images)
        .bind(p.status)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)
    }

    /// Replace every editable field. The slug is regenerated so it follows
    /// title and SKU changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist and
    /// `RepositoryError::Conflict` on a duplicate SKU or slug.
    #[instrument(skip(self, p), fields(sku = %p.sku))]
    pub async fn update(&self, id: ProductId, p: &NewProduct) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE shop.product SET
                slug = $2, sku = $3, title = $4, category = $5, brand = $6, model = $7,
                year_from = $8, year_to = $9, condition = $10, description = $11,
                compatibility = $12, price_label = $13, images = $14, status = $15
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(p.slug())
        .bind(&p.sku)
        .bind(&p.title)
        .bind(&p.category)
        .bind(&p.brand)
        .bind(&p.model)
        .bind(p.year_from)
        .bind(p.year_to)
        .bind(p.condition)
        .bind(&p.description)
        .bind(&p.compatibility)
        .bind(&p.price_label)
        .bind(&p.images)
        .bind(p.status)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)
    }

    /// Insert or, when the SKU exists, overwrite.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the generated slug belongs to a
    /// product with a different SKU.
    #[instrument(skip(self, p), fields(sku = %p.sku))]
    pub async fn upsert_by_sku(&self, p: &NewProduct) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO shop.product
                (slug, sku, title, category, brand, model, year_from, year_to,
                 condition, description, compatibility, price_label, images, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (sku) DO UPDATE SET
                slug = EXCLUDED.slug, title = EXCLUDED.title,
                category = EXCLUDED.category, brand = EXCLUDED.brand,
                model = EXCLUDED.model, year_from = EXCLUDED.year_from,
                year_to = EXCLUDED.year_to, condition = EXCLUDED.condition,
                description = EXCLUDED.description,
                compatibility = EXCLUDED.compatibility,
                price_label = EXCLUDED.price_label, images = EXCLUDED.images,
                status = EXCLUDED.status
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(p.slug())
        .bind(&p.sku)
        .bind(&p.title)
        .bind(&p.category)
        .bind(&p.brand)
        .bind(&p.model)
        .bind(p.year_from)
        .bind(p.year_to)
        .bind(p.condition)
        .bind(&p.description)
        .bind(&p.compatibility)
        .bind(&p.price_label)
        .bind(&p.images)
        .bind(p.status)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)
    }

    /// Delete a product. Its reservations keep their title/SKU snapshot and
    /// lose the link (`ON DELETE SET NULL`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing was deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
