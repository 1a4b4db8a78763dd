//! Operator API key models.
//!
//! Only the SHA-256 hash of a key is persisted; the raw key is returned
//! once at issue time and never again.

use quayside_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `api_keys` table.
///
/// `key_hash` is never serialized; `key_prefix` identifies the key to
/// operators.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApiKey {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    #[serde(skip_serializing)]
    pub key_hash: String,
    pub key_prefix: String,
    pub is_active: bool,
    pub last_used_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of issuing a new key: the record plus the one-time raw key.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedApiKey {
    /// The raw key. Shown exactly once.
    pub key: String,
    #[serde(flatten)]
    pub record: ApiKey,
}
