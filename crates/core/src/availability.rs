//! Public availability projection.
//!
//! A pure consumer of resolver output: an asset appears here only if it
//! already passed the disclosure check at query time. Booking state comes
//! in as the set of asset ids with a confirmed reservation overlapping the
//! queried window.

use std::collections::HashSet;

use serde::Serialize;

use crate::disclosure::DisclosedAsset;
use crate::types::DbId;

/// Per-asset availability within the queried window.
#[derive(Debug, Clone, Serialize)]
pub struct AssetAvailability {
    pub id: DbId,
    pub name: String,
    pub asset_type: String,
    pub available: bool,
    pub reserved: bool,
}

/// Aggregate counters across the disclosed set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilitySummary {
    pub total: i64,
    pub available: i64,
    pub reserved: i64,
}

/// Project disclosed assets onto the booking calendar.
///
/// Preserves the input order. An empty disclosed set yields an empty list
/// and zero counters, never an error.
pub fn project(
    disclosed: Vec<DisclosedAsset>,
    reserved_ids: &HashSet<DbId>,
) -> (Vec<AssetAvailability>, AvailabilitySummary) {
    let mut summary = AvailabilitySummary::default();

    let assets = disclosed
        .into_iter()
        .map(|d| {
            let reserved = reserved_ids.contains(&d.asset_id);
            summary.total += 1;
            if reserved {
                summary.reserved += 1;
            } else {
                summary.available += 1;
            }
            AssetAvailability {
                id: d.asset_id,
                name: d.name,
                asset_type: d.asset_type,
                available: !reserved,
                reserved,
            }
        })
        .collect();

    (assets, summary)
}
