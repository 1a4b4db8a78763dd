//! Operator management handlers: listing CRUD and reservation oversight,
//! scoped to the authenticated operator's own tenant.
//!
//! Listings are the only way an asset becomes disclosed; nothing here is
//! reachable without a valid tenant API key.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quayside_core::disclosure::Visibility;
use quayside_core::error::CoreError;
use quayside_core::types::DbId;
use quayside_db::models::listing::{CreateListing, Listing, SetDisplayOrder, UpdateListing};
use quayside_db::models::portal::Portal;
use quayside_db::repositories::{
    AssetRepo, ListingRepo, PortalRepo, ReservationRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::operator_auth::OperatorAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load a portal and verify it belongs to the operator's tenant.
async fn owned_portal(
    state: &AppState,
    portal_id: DbId,
    tenant_id: DbId,
) -> AppResult<Portal> {
    let portal = PortalRepo::find_by_id(&state.pool, portal_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Portal",
            id: portal_id,
        }))?;

    if portal.tenant_id != tenant_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Portal belongs to another tenant".into(),
        )));
    }
    Ok(portal)
}

/// Load a listing together with its (ownership-checked) portal.
async fn owned_listing(
    state: &AppState,
    listing_id: DbId,
    tenant_id: DbId,
) -> AppResult<Listing> {
    let listing = ListingRepo::find_by_id(&state.pool, listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    owned_portal(state, listing.portal_id, tenant_id).await?;
    Ok(listing)
}

/// Reject visibility strings outside the two-value model.
fn validate_visibility(visibility: Option<&str>) -> AppResult<()> {
    if let Some(v) = visibility {
        if Visibility::parse(v).is_none() {
            return Err(AppError::BadRequest(format!(
                "visibility must be 'public' or 'private', got '{v}'"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Portals
// ---------------------------------------------------------------------------

/// GET /api/v1/manage/portals
///
/// The operator's own portals.
pub async fn list_portals(
    auth: OperatorAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let portals = PortalRepo::list_for_tenant(&state.pool, auth.tenant_id).await?;
    Ok(Json(DataResponse { data: portals }))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/manage/portals/{id}/listings
///
/// All listings on one portal in presentation order, including paused and
/// private ones (this is the operator view, not the public one).
pub async fn list_listings(
    auth: OperatorAuth,
    State(state): State<AppState>,
    Path(portal_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    owned_portal(&state, portal_id, auth.tenant_id).await?;

    let listings = ListingRepo::list_for_portal(&state.pool, portal_id).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// POST /api/v1/manage/portals/{id}/listings
///
/// Expose an asset on a portal. The asset must belong to the same tenant
/// as the portal; a duplicate (portal, asset) pair is a conflict.
pub async fn create_listing(
    auth: OperatorAuth,
    State(state): State<AppState>,
    Path(portal_id): Path<DbId>,
    Json(input): Json<CreateListing>,
) -> AppResult<impl IntoResponse> {
    owned_portal(&state, portal_id, auth.tenant_id).await?;
    validate_visibility(input.visibility.as_deref())?;

    let asset = AssetRepo::find_by_id(&state.pool, input.asset_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id: input.asset_id,
        }))?;
    if asset.tenant_id != auth.tenant_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Asset belongs to another tenant".into(),
        )));
    }

    let listing = ListingRepo::create(&state.pool, portal_id, &input).await?;

    tracing::info!(
        listing_id = listing.id,
        portal_id,
        asset_id = input.asset_id,
        api_key_id = auth.api_key_id,
        "Listing created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}

/// PATCH /api/v1/manage/listings/{id}
///
/// Pause/unpause a listing or change its visibility. Takes effect on the
/// next public read.
pub async fn update_listing(
    auth: OperatorAuth,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<UpdateListing>,
) -> AppResult<impl IntoResponse> {
    owned_listing(&state, listing_id, auth.tenant_id).await?;
    validate_visibility(input.visibility.as_deref())?;

    let listing = ListingRepo::update(&state.pool, listing_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    tracing::info!(
        listing_id,
        active = listing.active,
        visibility = %listing.visibility,
        api_key_id = auth.api_key_id,
        "Listing updated",
    );

    Ok(Json(DataResponse { data: listing }))
}

/// PUT /api/v1/manage/listings/{id}/display-order
///
/// Set or clear the listing's explicit presentation position.
pub async fn set_display_order(
    auth: OperatorAuth,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<SetDisplayOrder>,
) -> AppResult<impl IntoResponse> {
    owned_listing(&state, listing_id, auth.tenant_id).await?;

    let listing = ListingRepo::set_display_order(&state.pool, listing_id, input.display_order)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    Ok(Json(DataResponse { data: listing }))
}

/// DELETE /api/v1/manage/listings/{id}
///
/// Withdraw a listing, revoking disclosure for subsequent reads.
pub async fn delete_listing(
    auth: OperatorAuth,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    owned_listing(&state, listing_id, auth.tenant_id).await?;

    let deleted = ListingRepo::delete(&state.pool, listing_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }));
    }

    tracing::info!(listing_id, api_key_id = auth.api_key_id, "Listing deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

/// GET /api/v1/manage/portals/{id}/reservations
///
/// Reservations taken through one portal, newest first.
pub async fn list_reservations(
    auth: OperatorAuth,
    State(state): State<AppState>,
    Path(portal_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    owned_portal(&state, portal_id, auth.tenant_id).await?;

    let reservations = ReservationRepo::list_for_portal(&state.pool, portal_id).await?;
    Ok(Json(DataResponse { data: reservations }))
}

/// POST /api/v1/manage/reservations/{id}/cancel
///
/// Cancel a confirmed reservation, freeing its window.
pub async fn cancel_reservation(
    auth: OperatorAuth,
    State(state): State<AppState>,
    Path(reservation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let reservation = ReservationRepo::find_by_id(&state.pool, reservation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reservation",
            id: reservation_id,
        }))?;

    owned_portal(&state, reservation.portal_id, auth.tenant_id).await?;

    let cancelled = ReservationRepo::cancel(&state.pool, reservation_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Reservation already cancelled".into()))
        })?;

    tracing::info!(
        reservation_id,
        api_key_id = auth.api_key_id,
        "Reservation cancelled",
    );

    Ok(Json(DataResponse { data: cancelled }))
}
