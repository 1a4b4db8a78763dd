//! Asset registry models. Assets are mutated by tenant-management
//! operations; the disclosure engine only reads them.

use quayside_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub asset_type: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub name: String,
    pub asset_type: String,
    pub description: Option<String>,
}
