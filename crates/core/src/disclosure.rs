//! Disclosure authorization.
//!
//! The single predicate deciding, per (portal, asset) pair, whether an
//! anonymous caller may see and reserve the asset. Both the availability
//! read path and the reservation write path resolve through this module;
//! neither re-implements the check inline.
//!
//! An asset is disclosed on a portal iff a listing exists for the pair with
//! `active = true` and `visibility = public`, and the asset itself is
//! active. The three conditions are independently necessary. Every failure
//! mode collapses into the same [`Resolution::NotDisclosed`] verdict so a
//! caller probing arbitrary asset ids cannot distinguish "private" from
//! "nonexistent" from "retired".

use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::StoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Facts
// ---------------------------------------------------------------------------

/// Listing visibility tier. Only `Public` is ever disclosed to anonymous
/// callers; there is no intermediate "unlisted" tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// Parse a stored visibility value. Unknown values yield `None` and
    /// must be treated as non-disclosing by the caller.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Asset lifecycle status as recorded in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetLifecycle {
    Active,
    Retired,
    Suspended,
}

impl AssetLifecycle {
    /// Parse a stored status value. Unknown values yield `None` and must be
    /// treated as non-disclosing by the caller.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(AssetLifecycle::Active),
            "retired" => Some(AssetLifecycle::Retired),
            "suspended" => Some(AssetLifecycle::Suspended),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetLifecycle::Active => "active",
            AssetLifecycle::Retired => "retired",
            AssetLifecycle::Suspended => "suspended",
        }
    }
}

/// Disclosure-relevant fields of a listing row.
#[derive(Debug, Clone)]
pub struct ListingFacts {
    pub listing_id: DbId,
    pub active: bool,
    pub visibility: Visibility,
    pub display_order: Option<i32>,
    pub created_at: Timestamp,
}

/// Disclosure-relevant fields of an asset row.
#[derive(Debug, Clone)]
pub struct AssetFacts {
    pub asset_id: DbId,
    pub name: String,
    pub asset_type: String,
    pub lifecycle: AssetLifecycle,
}

/// An asset that passed the disclosure check on some portal.
#[derive(Debug, Clone, Serialize)]
pub struct DisclosedAsset {
    pub asset_id: DbId,
    pub name: String,
    pub asset_type: String,
    pub display_order: Option<i32>,
    pub listed_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Verdict for a single (portal, asset) pair.
///
/// `NotDisclosed` deliberately carries no payload: the cause never leaves
/// this module except through the operator audit log.
#[derive(Debug, Clone)]
pub enum Resolution {
    Disclosed(DisclosedAsset),
    NotDisclosed,
}

impl Resolution {
    pub fn is_disclosed(&self) -> bool {
        matches!(self, Resolution::Disclosed(_))
    }
}

/// Why a pair failed the check. Audit-channel only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefusalCause {
    NoListing,
    NoAsset,
    ListingPaused,
    NotPublic,
    AssetUnavailable,
}

impl fmt::Display for RefusalCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RefusalCause::NoListing => "no_listing",
            RefusalCause::NoAsset => "no_asset",
            RefusalCause::ListingPaused => "listing_paused",
            RefusalCause::NotPublic => "not_public",
            RefusalCause::AssetUnavailable => "asset_unavailable",
        };
        f.write_str(s)
    }
}

/// Evaluate the disclosure predicate for one pair.
///
/// All three conditions are independently necessary: the listing must be
/// active, its visibility public, and the asset active. Missing facts on
/// either side refuse as well (default-deny).
fn evaluate(
    listing: Option<&ListingFacts>,
    asset: Option<&AssetFacts>,
) -> Result<DisclosedAsset, RefusalCause> {
    let listing = listing.ok_or(RefusalCause::NoListing)?;
    let asset = asset.ok_or(RefusalCause::NoAsset)?;

    if !listing.active {
        return Err(RefusalCause::ListingPaused);
    }
    if listing.visibility != Visibility::Public {
        return Err(RefusalCause::NotPublic);
    }
    if asset.lifecycle != AssetLifecycle::Active {
        return Err(RefusalCause::AssetUnavailable);
    }

    Ok(DisclosedAsset {
        asset_id: asset.asset_id,
        name: asset.name.clone(),
        asset_type: asset.asset_type.clone(),
        display_order: listing.display_order,
        listed_at: listing.created_at,
    })
}

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Joined facts for one (portal, asset) pair. Either side may be absent.
#[derive(Debug, Default)]
pub struct PairFacts {
    pub listing: Option<ListingFacts>,
    pub asset: Option<AssetFacts>,
}

/// Read access to the listing relation and asset registry.
///
/// Implementations carry their own connection or transaction, so the
/// resolver can run against a pooled connection on the read path and
/// against the reservation-insert transaction on the write path. Reads
/// have no side effects; not-found is an empty result, never an error.
#[async_trait]
pub trait DisclosureStore: Send {
    /// Listing and asset facts for one (portal, asset) pair.
    async fn pair_facts(
        &mut self,
        portal_id: DbId,
        asset_id: DbId,
    ) -> Result<PairFacts, StoreError>;

    /// Every listing on a portal joined with its asset, in presentation
    /// order: `display_order` ascending with nulls last, then `created_at`
    /// ascending. Includes paused/private listings and non-active assets;
    /// filtering is the resolver's job.
    async fn portal_facts(
        &mut self,
        portal_id: DbId,
    ) -> Result<Vec<(ListingFacts, AssetFacts)>, StoreError>;
}

/// Stable presentation order for listings: `display_order` ascending with
/// nulls last, ties broken by creation time. SQL-backed stores order in the
/// query; in-memory stores sort with this.
pub fn presentation_order(a: &ListingFacts, b: &ListingFacts) -> Ordering {
    match (a.display_order, b.display_order) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.created_at.cmp(&b.created_at)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.created_at.cmp(&b.created_at),
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Evaluates the disclosure predicate against a store. Stateless; safe to
/// invoke concurrently from independent requests.
pub struct DisclosureResolver;

impl DisclosureResolver {
    /// Resolve one (portal, asset) pair to a uniform verdict.
    ///
    /// The refusal cause is logged at debug level for operators and then
    /// discarded; the returned verdict is indistinguishable across causes.
    pub async fn resolve_one<S: DisclosureStore + ?Sized>(
        store: &mut S,
        portal_id: DbId,
        asset_id: DbId,
    ) -> Result<Resolution, StoreError> {
        let facts = store.pair_facts(portal_id, asset_id).await?;

        match evaluate(facts.listing.as_ref(), facts.asset.as_ref()) {
            Ok(disclosed) => Ok(Resolution::Disclosed(disclosed)),
            Err(cause) => {
                tracing::debug!(portal_id, asset_id, %cause, "disclosure refused");
                Ok(Resolution::NotDisclosed)
            }
        }
    }

    /// Resolve the full disclosed inventory of a portal, preserving the
    /// store's presentation order. Assets whose registry status is not
    /// active are excluded even if a stale listing still marks them public.
    pub async fn resolve_portal_inventory<S: DisclosureStore + ?Sized>(
        store: &mut S,
        portal_id: DbId,
    ) -> Result<Vec<DisclosedAsset>, StoreError> {
        let rows = store.portal_facts(portal_id).await?;

        let mut disclosed = Vec::with_capacity(rows.len());
        for (listing, asset) in &rows {
            if let Ok(d) = evaluate(Some(listing), Some(asset)) {
                disclosed.push(d);
            }
        }
        Ok(disclosed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
