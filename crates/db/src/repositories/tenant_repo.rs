//! Repository for the `tenants` table.

use quayside_core::types::DbId;
use sqlx::PgPool;

use crate::models::tenant::{CreateTenant, Tenant};

/// Column list for `tenants` queries.
const COLUMNS: &str = "id, name, slug, status, created_at, updated_at";

pub struct TenantRepo;

impl TenantRepo {
    /// Register a new tenant in active status.
    pub async fn create(pool: &PgPool, input: &CreateTenant) -> Result<Tenant, sqlx::Error> {
        let query = format!(
            "INSERT INTO tenants (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// Find a tenant by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE id = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tenant by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE slug = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }
}
