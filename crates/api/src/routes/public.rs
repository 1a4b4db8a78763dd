//! Route definitions for the anonymous storefront surface.
//!
//! All routes are mounted under `/public`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Public storefront routes mounted at `/public`.
///
/// ```text
/// GET  /portals/{slug}/availability  -> availability
/// POST /portals/{slug}/reservations  -> reserve
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/portals/{slug}/availability", get(public::availability))
        .route("/portals/{slug}/reservations", post(public::reserve))
}
