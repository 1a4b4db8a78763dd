//! Repository for the `assets` table.
//!
//! The disclosure engine only reads assets; mutations here serve the
//! tenant-management surface and test fixtures.

use quayside_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{Asset, CreateAsset};

/// Column list for `assets` queries.
const COLUMNS: &str =
    "id, tenant_id, name, asset_type, description, status, created_at, updated_at";

pub struct AssetRepo;

impl AssetRepo {
    /// Register a new asset for a tenant, in active status.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (tenant_id, name, asset_type, description) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.asset_type)
            .bind(input.description.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a tenant's assets.
    pub async fn list_for_tenant(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets WHERE tenant_id = $1 ORDER BY name, id"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    /// Change an asset's lifecycle status (active / retired / suspended).
    /// Disclosure revocation takes effect on the next read.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET status = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
