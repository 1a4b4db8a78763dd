//! API-key authentication extractor for the operator management surface.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use quayside_core::error::CoreError;
use quayside_core::types::DbId;
use quayside_db::repositories::ApiKeyRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated operator extracted from a Bearer API key in the
/// `Authorization` header.
///
/// Every `/manage` handler takes this as a parameter; the resolved
/// `tenant_id` scopes all further lookups to the operator's own tenant.
#[derive(Debug, Clone)]
pub struct OperatorAuth {
    /// The tenant the key belongs to.
    pub tenant_id: DbId,
    /// The key row id, for audit logging.
    pub api_key_id: DbId,
}

impl FromRequestParts<AppState> for OperatorAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let raw_key = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <api key>".into(),
            ))
        })?;

        let key = ApiKeyRepo::authenticate(&state.pool, raw_key)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Invalid or revoked API key".into()))
            })?;

        Ok(OperatorAuth {
            tenant_id: key.tenant_id,
            api_key_id: key.id,
        })
    }
}
