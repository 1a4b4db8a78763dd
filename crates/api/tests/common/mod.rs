//! Shared helpers for API integration tests: router construction matching
//! production, oneshot request helpers, and database fixtures.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use quayside_api::config::ServerConfig;
use quayside_api::router::build_app_router;
use quayside_api::state::AppState;
use quayside_core::types::DbId;
use quayside_db::models::asset::{Asset, CreateAsset};
use quayside_db::models::listing::{CreateListing, Listing};
use quayside_db::models::portal::{CreatePortal, Portal};
use quayside_db::models::tenant::{CreateTenant, Tenant};
use quayside_db::repositories::{ApiKeyRepo, AssetRepo, ListingRepo, PortalRepo, TenantRepo};

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, path: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send an authenticated request with an optional JSON body.
pub async fn send_auth(
    app: Router,
    method: Method,
    path: &str,
    api_key: &str,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {api_key}"));
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_tenant(pool: &PgPool, slug: &str) -> Tenant {
    TenantRepo::create(
        pool,
        &CreateTenant {
            name: format!("Tenant {slug}"),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_portal(pool: &PgPool, tenant_id: DbId, slug: &str) -> Portal {
    PortalRepo::create(
        pool,
        tenant_id,
        &CreatePortal {
            slug: slug.to_string(),
            name: format!("Portal {slug}"),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_asset(pool: &PgPool, tenant_id: DbId, name: &str) -> Asset {
    AssetRepo::create(
        pool,
        tenant_id,
        &CreateAsset {
            name: name.to_string(),
            asset_type: "cabin".to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_listing(pool: &PgPool, portal_id: DbId, asset_id: DbId) -> Listing {
    ListingRepo::create(
        pool,
        portal_id,
        &CreateListing {
            asset_id,
            active: None,
            visibility: None,
            display_order: None,
        },
    )
    .await
    .unwrap()
}

/// Issue an operator API key for a tenant, returning the raw key.
pub async fn seed_api_key(pool: &PgPool, tenant_id: DbId) -> String {
    ApiKeyRepo::issue(pool, tenant_id, "test key")
        .await
        .unwrap()
        .key
}

/// JSON body for a reservation request.
pub fn reserve_body(asset_id: DbId, start: &str, end: &str) -> serde_json::Value {
    serde_json::json!({
        "asset_id": asset_id,
        "start_date": start,
        "end_date": end,
        "customer": { "name": "Pat Example", "email": "pat@example.com" },
    })
}
