//! The disclosure relation: one listing per (portal, asset) pair a tenant
//! has explicitly exposed. Absence of a row means not disclosed.

use quayside_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub portal_id: DbId,
    pub asset_id: DbId,
    pub active: bool,
    pub visibility: String,
    pub display_order: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for exposing an asset on a portal.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListing {
    pub asset_id: DbId,
    /// Defaults to true.
    pub active: Option<bool>,
    /// `public` or `private`; defaults to `public`.
    pub visibility: Option<String>,
    pub display_order: Option<i32>,
}

/// DTO for pausing/unpausing or changing visibility of a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateListing {
    pub active: Option<bool>,
    pub visibility: Option<String>,
}

/// DTO for moving a listing in the presentation order. A null value clears
/// the explicit position and sends the listing to the end.
#[derive(Debug, Clone, Deserialize)]
pub struct SetDisplayOrder {
    pub display_order: Option<i32>,
}
