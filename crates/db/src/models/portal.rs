use quayside_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `portals` table. The slug is the public lookup key.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Portal {
    pub id: DbId,
    pub tenant_id: DbId,
    pub slug: String,
    pub name: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a portal.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePortal {
    pub slug: String,
    pub name: String,
}
