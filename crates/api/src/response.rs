//! Response envelope types.
//!
//! The operator surface uses the `{ "data": … }` envelope; the public
//! storefront endpoints use the explicit shapes below, which are part of
//! the anonymous API contract.

use quayside_core::availability::{AssetAvailability, AvailabilitySummary};
use quayside_core::types::DbId;
use serde::Serialize;
use uuid::Uuid;

/// Standard `{ "data": T }` response envelope for operator endpoints.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Portal identification in the public availability response.
#[derive(Debug, Serialize)]
pub struct PortalSummary {
    pub id: DbId,
    pub slug: String,
    pub name: String,
}

/// Public availability view: disclosed assets plus summary counters.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub success: bool,
    pub portal: PortalSummary,
    pub assets: Vec<AssetAvailability>,
    pub summary: AvailabilitySummary,
}

/// Public reservation response.
///
/// Refusal bodies are byte-identical per rejection code: absent fields are
/// skipped, so every `not_disclosed` response serializes the same
/// regardless of the underlying cause.
#[derive(Debug, Serialize)]
pub struct ReserveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}
