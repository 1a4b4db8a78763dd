//! Public storefront handlers: availability read and reservation write.
//!
//! Both paths authorize through the disclosure resolver; neither carries
//! its own copy of the check. A refusal is indistinguishable across
//! causes: unknown portal slugs 404, and every non-disclosing (portal,
//! asset) pair produces the same `not_disclosed` body.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use quayside_core::availability;
use quayside_core::disclosure::DisclosureResolver;
use quayside_core::error::CoreError;
use quayside_core::reservation::{AdmissionOutcome, DateRange, RejectReason};
use quayside_core::types::DbId;
use quayside_db::admission::{self, AdmissionRequest};
use quayside_db::disclosure_store::{classify_store_error, PgDisclosureStore};
use quayside_db::models::portal::Portal;
use quayside_db::models::reservation::CustomerDetails;
use quayside_db::repositories::{PortalRepo, ReservationRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::{AvailabilityResponse, PortalSummary, ReserveResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Resolve a public portal slug to an active portal, or 404. A retired
/// portal is indistinguishable from a nonexistent one.
async fn active_portal(state: &AppState, slug: &str) -> AppResult<Portal> {
    PortalRepo::find_by_slug(&state.pool, slug)
        .await?
        .filter(|p| p.status == "active")
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Portal",
                key: slug.to_string(),
            })
        })
}

// ---------------------------------------------------------------------------
// Availability read
// ---------------------------------------------------------------------------

/// Query window for the availability read.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// GET /api/v1/public/portals/{slug}/availability
///
/// Disclosed inventory of a portal projected onto the booking calendar.
/// An empty disclosed set yields an empty assets array and zero counters,
/// never an error.
pub async fn availability(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<impl IntoResponse> {
    let window = DateRange::new(query.start, query.end)?;
    let portal = active_portal(&state, &slug).await?;

    let mut conn = state.pool.acquire().await.map_err(classify_store_error)?;
    let disclosed = {
        let mut store = PgDisclosureStore::new(&mut conn);
        DisclosureResolver::resolve_portal_inventory(&mut store, portal.id).await?
    };
    drop(conn);

    let asset_ids: Vec<DbId> = disclosed.iter().map(|d| d.asset_id).collect();
    let reserved: HashSet<DbId> =
        ReservationRepo::reserved_asset_ids(&state.pool, &asset_ids, &window)
            .await?
            .into_iter()
            .collect();

    let (assets, summary) = availability::project(disclosed, &reserved);

    Ok(Json(AvailabilityResponse {
        success: true,
        portal: PortalSummary {
            id: portal.id,
            slug: portal.slug,
            name: portal.name,
        },
        assets,
        summary,
    }))
}

// ---------------------------------------------------------------------------
// Reservation write
// ---------------------------------------------------------------------------

/// Customer contact payload on a reservation request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// Public reservation request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReserveRequest {
    pub asset_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(nested)]
    pub customer: CustomerPayload,
}

/// POST /api/v1/public/portals/{slug}/reservations
///
/// Runs the admission controller: disclosure is re-checked inside the
/// insert transaction regardless of what any earlier availability read
/// showed. Rejections return the uniform refusal shapes.
pub async fn reserve(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<ReserveRequest>,
) -> AppResult<Response> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let window = DateRange::new(input.start_date, input.end_date)?;
    let portal = active_portal(&state, &slug).await?;

    let request = AdmissionRequest {
        portal_id: portal.id,
        asset_id: input.asset_id,
        window,
        customer: CustomerDetails {
            name: input.customer.name,
            email: input.customer.email,
        },
    };

    match admission::admit(&state.pool, &request).await? {
        AdmissionOutcome::Committed {
            reservation_id,
            confirmation_code,
        } => Ok((
            StatusCode::CREATED,
            Json(ReserveResponse {
                success: true,
                reservation_id: Some(reservation_id),
                confirmation_code: Some(confirmation_code),
                error: None,
            }),
        )
            .into_response()),
        AdmissionOutcome::Rejected(reason) => {
            let status = match reason {
                RejectReason::NotDisclosed => StatusCode::NOT_FOUND,
                RejectReason::Conflict => StatusCode::CONFLICT,
            };
            Ok((
                status,
                Json(ReserveResponse {
                    success: false,
                    reservation_id: None,
                    confirmation_code: None,
                    error: Some(reason.code()),
                }),
            )
                .into_response())
        }
    }
}
