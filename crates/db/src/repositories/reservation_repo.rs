//! Repository for the `reservations` table.
//!
//! Inserts happen only through the admission controller's transaction
//! (see [`crate::admission`]); this repository covers the read side and
//! operator cancellation.

use quayside_core::reservation::DateRange;
use quayside_core::types::DbId;
use sqlx::PgPool;

use crate::models::reservation::Reservation;

/// Column list for `reservations` queries.
const COLUMNS: &str = "\
    id, portal_id, asset_id, start_date, end_date, \
    customer_name, customer_email, confirmation_code, status, \
    created_at, updated_at";

pub struct ReservationRepo;

impl ReservationRepo {
    /// Find a reservation by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Asset ids within the given set that have a confirmed reservation
    /// overlapping the window. Feeds the availability projection.
    pub async fn reserved_asset_ids(
        pool: &PgPool,
        asset_ids: &[DbId],
        window: &DateRange,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT DISTINCT asset_id FROM reservations \
             WHERE asset_id = ANY($1) AND status = 'confirmed' \
               AND start_date < $3 AND end_date > $2",
        )
        .bind(asset_ids)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// All reservations taken through a portal, newest first.
    pub async fn list_for_portal(
        pool: &PgPool,
        portal_id: DbId,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations WHERE portal_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(portal_id)
            .fetch_all(pool)
            .await
    }

    /// Cancel a confirmed reservation, freeing its window. Returns the
    /// updated row, or None if the reservation is missing or already
    /// cancelled.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "UPDATE reservations SET status = 'cancelled', updated_at = NOW() \
             WHERE id = $1 AND status = 'confirmed' RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
