//! Repository for the `listings` table — the disclosure relation.
//!
//! `get` and `list_for_portal` are the Listing Store contract consumed by
//! the disclosure resolver's read path; the mutations serve the operator
//! management surface. At most one listing exists per (portal, asset)
//! pair; a duplicate insert violates `uq_listings_portal_asset` and is
//! surfaced to the operator as a conflict, never to public callers.

use quayside_core::types::DbId;
use sqlx::PgPool;

use crate::models::listing::{CreateListing, Listing, UpdateListing};

/// Column list for `listings` queries.
const COLUMNS: &str =
    "id, portal_id, asset_id, active, visibility, display_order, created_at, updated_at";

/// Presentation order: explicit positions first, then creation order.
const ORDERING: &str = "display_order ASC NULLS LAST, created_at ASC";

pub struct ListingRepo;

impl ListingRepo {
    /// Expose an asset on a portal. Duplicate (portal, asset) pairs fail
    /// with a unique-constraint violation.
    pub async fn create(
        pool: &PgPool,
        portal_id: DbId,
        input: &CreateListing,
    ) -> Result<Listing, sqlx::Error> {
        let active = input.active.unwrap_or(true);
        let visibility = input.visibility.as_deref().unwrap_or("public");

        let query = format!(
            "INSERT INTO listings (portal_id, asset_id, active, visibility, display_order) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(portal_id)
            .bind(input.asset_id)
            .bind(active)
            .bind(visibility)
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// The listing for one (portal, asset) pair, if any.
    pub async fn get(
        pool: &PgPool,
        portal_id: DbId,
        asset_id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM listings WHERE portal_id = $1 AND asset_id = $2");
        sqlx::query_as::<_, Listing>(&query)
            .bind(portal_id)
            .bind(asset_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a listing by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All listings on a portal in presentation order, regardless of
    /// active/visibility state (the operator view).
    pub async fn list_for_portal(
        pool: &PgPool,
        portal_id: DbId,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings WHERE portal_id = $1 ORDER BY {ORDERING}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(portal_id)
            .fetch_all(pool)
            .await
    }

    /// Update the active flag and/or visibility of a listing.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateListing,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET \
                active = COALESCE($2, active), \
                visibility = COALESCE($3, visibility), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(input.active)
            .bind(input.visibility.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the explicit presentation position.
    pub async fn set_display_order(
        pool: &PgPool,
        id: DbId,
        display_order: Option<i32>,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET display_order = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(display_order)
            .fetch_optional(pool)
            .await
    }

    /// Withdraw a listing, revoking disclosure for subsequent reads.
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
