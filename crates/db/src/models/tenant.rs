use quayside_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tenants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
}
