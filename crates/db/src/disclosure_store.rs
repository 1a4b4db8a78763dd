//! sqlx-backed implementation of the disclosure store seam.
//!
//! [`PgDisclosureStore`] wraps a mutable connection reference, so the same
//! implementation serves the pooled read path (availability) and the
//! reservation-insert transaction (admission re-check): both observe
//! whatever snapshot their connection is on.

use async_trait::async_trait;
use quayside_core::disclosure::{
    AssetFacts, AssetLifecycle, DisclosureStore, ListingFacts, PairFacts, Visibility,
};
use quayside_core::error::StoreError;
use quayside_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgConnection};

/// Disclosure facts read through a live PostgreSQL connection.
pub struct PgDisclosureStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgDisclosureStore<'c> {
    /// Wrap a connection or transaction (`&mut *tx`).
    pub fn new(conn: &'c mut PgConnection) -> Self {
        PgDisclosureStore { conn }
    }
}

#[derive(FromRow)]
struct ListingFactsRow {
    listing_id: DbId,
    active: bool,
    visibility: String,
    display_order: Option<i32>,
    created_at: Timestamp,
}

#[derive(FromRow)]
struct AssetFactsRow {
    asset_id: DbId,
    name: String,
    asset_type: String,
    status: String,
}

#[derive(FromRow)]
struct PortalFactsRow {
    listing_id: DbId,
    active: bool,
    visibility: String,
    display_order: Option<i32>,
    created_at: Timestamp,
    asset_id: DbId,
    name: String,
    asset_type: String,
    status: String,
}

impl ListingFactsRow {
    fn into_facts(self) -> ListingFacts {
        ListingFacts {
            listing_id: self.listing_id,
            active: self.active,
            // Unparseable visibility reads as private: default-deny.
            visibility: Visibility::parse(&self.visibility).unwrap_or(Visibility::Private),
            display_order: self.display_order,
            created_at: self.created_at,
        }
    }
}

impl AssetFactsRow {
    fn into_facts(self) -> AssetFacts {
        AssetFacts {
            asset_id: self.asset_id,
            name: self.name,
            asset_type: self.asset_type,
            // Unparseable status reads as suspended: default-deny.
            lifecycle: AssetLifecycle::parse(&self.status).unwrap_or(AssetLifecycle::Suspended),
        }
    }
}

#[async_trait]
impl DisclosureStore for PgDisclosureStore<'_> {
    async fn pair_facts(
        &mut self,
        portal_id: DbId,
        asset_id: DbId,
    ) -> Result<PairFacts, StoreError> {
        let listing: Option<ListingFactsRow> = sqlx::query_as(
            "SELECT id AS listing_id, active, visibility, display_order, created_at \
             FROM listings WHERE portal_id = $1 AND asset_id = $2",
        )
        .bind(portal_id)
        .bind(asset_id)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(classify_store_error)?;

        let asset: Option<AssetFactsRow> = sqlx::query_as(
            "SELECT id AS asset_id, name, asset_type, status FROM assets WHERE id = $1",
        )
        .bind(asset_id)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(classify_store_error)?;

        Ok(PairFacts {
            listing: listing.map(ListingFactsRow::into_facts),
            asset: asset.map(AssetFactsRow::into_facts),
        })
    }

    async fn portal_facts(
        &mut self,
        portal_id: DbId,
    ) -> Result<Vec<(ListingFacts, AssetFacts)>, StoreError> {
        let rows: Vec<PortalFactsRow> = sqlx::query_as(
            "SELECT l.id AS listing_id, l.active, l.visibility, l.display_order, \
                    l.created_at, \
                    a.id AS asset_id, a.name, a.asset_type, a.status \
             FROM listings l \
             JOIN assets a ON a.id = l.asset_id \
             WHERE l.portal_id = $1 \
             ORDER BY l.display_order ASC NULLS LAST, l.created_at ASC",
        )
        .bind(portal_id)
        .fetch_all(&mut *self.conn)
        .await
        .map_err(classify_store_error)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let listing = ListingFactsRow {
                    listing_id: row.listing_id,
                    active: row.active,
                    visibility: row.visibility,
                    display_order: row.display_order,
                    created_at: row.created_at,
                };
                let asset = AssetFactsRow {
                    asset_id: row.asset_id,
                    name: row.name,
                    asset_type: row.asset_type,
                    status: row.status,
                };
                (listing.into_facts(), asset.into_facts())
            })
            .collect())
    }
}

/// Classify a sqlx error into the core store-error taxonomy.
///
/// Connectivity failures and serialization aborts (40001) are retryable
/// `Unavailable`; everything else is `Backend`. Neither is ever folded
/// into a disclosure refusal.
pub fn classify_store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => StoreError::Unavailable(err.to_string()),
        sqlx::Error::Database(db) if db.code().as_deref() == Some("40001") => {
            StoreError::Unavailable(err.to_string())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}
