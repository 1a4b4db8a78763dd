pub mod health;
pub mod manage;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /public/portals/{slug}/availability       anonymous availability read
/// /public/portals/{slug}/reservations       anonymous reservation write
///
/// /manage/portals                           operator portal list
/// /manage/portals/{id}/listings             list, create
/// /manage/portals/{id}/reservations         list
/// /manage/listings/{id}                     update, delete
/// /manage/listings/{id}/display-order       set/clear position
/// /manage/reservations/{id}/cancel          cancel
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/public", public::router())
        .nest("/manage", manage::router())
}
