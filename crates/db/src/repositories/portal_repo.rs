//! Repository for the `portals` table.

use quayside_core::types::DbId;
use sqlx::PgPool;

use crate::models::portal::{CreatePortal, Portal};

/// Column list for `portals` queries.
const COLUMNS: &str = "id, tenant_id, slug, name, status, created_at, updated_at";

pub struct PortalRepo;

impl PortalRepo {
    /// Create a portal for a tenant, in active status.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreatePortal,
    ) -> Result<Portal, sqlx::Error> {
        let query = format!(
            "INSERT INTO portals (tenant_id, slug, name) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Portal>(&query)
            .bind(tenant_id)
            .bind(&input.slug)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a portal by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Portal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM portals WHERE id = $1");
        sqlx::query_as::<_, Portal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a portal by its public slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Portal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM portals WHERE slug = $1");
        sqlx::query_as::<_, Portal>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List a tenant's portals, newest last.
    pub async fn list_for_tenant(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Vec<Portal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM portals WHERE tenant_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Portal>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    /// Change a portal's lifecycle status. Returns the updated row.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Portal>, sqlx::Error> {
        let query = format!(
            "UPDATE portals SET status = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Portal>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
