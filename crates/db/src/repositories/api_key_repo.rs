//! Repository for operator API keys.

use quayside_core::types::DbId;
use rand::distr::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::models::api_key::{ApiKey, IssuedApiKey};

/// Column list for `api_keys` queries.
const COLUMNS: &str = "\
    id, tenant_id, name, key_hash, key_prefix, is_active, \
    last_used_at, created_at, updated_at";

/// Length of the random key body after the `qk_` prefix.
const KEY_BODY_LEN: usize = 40;

pub struct ApiKeyRepo;

impl ApiKeyRepo {
    /// Issue a new key for a tenant. The raw key is returned once; only
    /// its SHA-256 hash is stored.
    pub async fn issue(
        pool: &PgPool,
        tenant_id: DbId,
        name: &str,
    ) -> Result<IssuedApiKey, sqlx::Error> {
        let body: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(KEY_BODY_LEN)
            .map(char::from)
            .collect();
        let key = format!("qk_{body}");
        let key_hash = hash_key(&key);
        let key_prefix: String = key.chars().take(10).collect();

        let query = format!(
            "INSERT INTO api_keys (tenant_id, name, key_hash, key_prefix) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, ApiKey>(&query)
            .bind(tenant_id)
            .bind(name)
            .bind(&key_hash)
            .bind(&key_prefix)
            .fetch_one(pool)
            .await?;

        Ok(IssuedApiKey { key, record })
    }

    /// Look up an active key by its raw value, stamping last_used_at.
    /// Returns None for unknown or deactivated keys.
    pub async fn authenticate(
        pool: &PgPool,
        raw_key: &str,
    ) -> Result<Option<ApiKey>, sqlx::Error> {
        let query = format!(
            "UPDATE api_keys SET last_used_at = NOW() \
             WHERE key_hash = $1 AND is_active RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(hash_key(raw_key))
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a key. Returns true if a row changed.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE api_keys SET is_active = FALSE, updated_at = NOW() \
             WHERE id = $1 AND is_active",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// SHA-256 hex digest of a raw key.
fn hash_key(raw: &str) -> String {
    format!("{:x}", Sha256::digest(raw.as_bytes()))
}
