//! Lead creation and the customer's own reservation list.

use sqlx::PgPool;
use tracing::instrument;

use autopart_core::{CustomerId, NewReservation, Reservation};

use super::RepositoryError;

const RESERVATION_COLUMNS: &str = "id, code, product_id, product_title, product_sku, \
     customer_id, customer_name, customer_phone, city, observation, status, created_at";

pub struct ReservationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReservationRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a lead with status `new`.
    ///
    /// A product deleted since it was put in the cart leaves `product_id`
    /// null; the title and SKU snapshot still identify it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the reference code is taken.
    #[instrument(skip(self, new), fields(code = %new.code, product_id = %new.product_id))]
    pub async fn create(&self, new: &NewReservation) -> Result<Reservation, RepositoryError> {
        sqlx::query_as::<_, Reservation>(&format!(
            r"
            INSERT INTO shop.reservation
                (code, product_id, product_title, product_sku, customer_id,
                 customer_name, customer_phone, city, observation)
            VALUES ($1, (SELECT id FROM shop.product WHERE id = $2),
                    $3, $4, $5, $6, $7, $8, $9)
            RETURNING {RESERVATION_COLUMNS}
            "
        ))
        .bind(&new.code)
        .bind(new.product_id)
        .bind(&new.product_title)
        .bind(&new.product_sku)
        .bind(new.customer_id)
        .bind(&new.customer_name)
        .bind(&new.customer_phone)
        .bind(new.city.as_deref())
        .bind(new.observation.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "reservation code"))
    }

    /// A customer's reservations, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let rows = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM shop.reservation \
             WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
