//! Route definitions for the operator management surface.
//!
//! All routes are mounted under `/manage` and require a tenant API key.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::manage;
use crate::state::AppState;

/// Operator management routes mounted at `/manage`.
///
/// ```text
/// GET    /portals                      -> list_portals
/// GET    /portals/{id}/listings        -> list_listings
/// POST   /portals/{id}/listings        -> create_listing
/// GET    /portals/{id}/reservations    -> list_reservations
/// PATCH  /listings/{id}                -> update_listing
/// DELETE /listings/{id}                -> delete_listing
/// PUT    /listings/{id}/display-order  -> set_display_order
/// POST   /reservations/{id}/cancel     -> cancel_reservation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/portals", get(manage::list_portals))
        .route(
            "/portals/{id}/listings",
            get(manage::list_listings).post(manage::create_listing),
        )
        .route("/portals/{id}/reservations", get(manage::list_reservations))
        .route(
            "/listings/{id}",
            patch(manage::update_listing).delete(manage::delete_listing),
        )
        .route(
            "/listings/{id}/display-order",
            put(manage::set_display_order),
        )
        .route(
            "/reservations/{id}/cancel",
            post(manage::cancel_reservation),
        )
}
