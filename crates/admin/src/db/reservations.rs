//! Lead list, dashboard counters and status changes.

use sqlx::PgPool;
use tracing::instrument;

use autopart_core::{Reservation, ReservationId, ReservationStatus};

use super::RepositoryError;

const RESERVATION_COLUMNS: &str = "id, code, product_id, product_title, product_sku, \
     customer_id, customer_name, customer_phone, city, observation, status, created_at";

/// Counters on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct ReservationStats {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
}

pub struct ReservationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReservationRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every lead, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let rows = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM shop.reservation ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        let row = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM shop.reservation WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<ReservationStats, RepositoryError> {
        let stats = sqlx::query_as::<_, ReservationStats>(
            r"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'new') AS pending,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed
            FROM shop.reservation
            ",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(stats)
    }

    /// Move a lead from `from` to `to`.
    ///
    /// The update only applies while the row is still in `from`, so two
    /// people acting on the same lead cannot both win.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the status changed in the
    /// meantime (or the row is gone).
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<Reservation, RepositoryError> {
        sqlx::query_as::<_, Reservation>(&format!(
            "UPDATE shop.reservation SET status = $3 WHERE id = $1 AND status = $2 \
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| RepositoryError::Conflict("reservation status changed".to_owned()))
    }
}
