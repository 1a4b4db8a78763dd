//! Integration tests for the reservation admission controller: the
//! transactional disclosure re-check, calendar conflicts, and the
//! at-most-one-commit guarantee under concurrent attempts.

use chrono::NaiveDate;
use quayside_core::reservation::{AdmissionOutcome, DateRange, RejectReason};
use quayside_core::types::DbId;
use quayside_db::admission::{admit, AdmissionRequest};
use quayside_db::models::asset::{Asset, CreateAsset};
use quayside_db::models::listing::CreateListing;
use quayside_db::models::portal::{CreatePortal, Portal};
use quayside_db::models::reservation::CustomerDetails;
use quayside_db::models::tenant::CreateTenant;
use quayside_db::repositories::{AssetRepo, ListingRepo, PortalRepo, ReservationRepo, TenantRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Tenant + portal + one active asset. The asset is NOT listed; tests
/// opt in explicitly.
async fn seed(pool: &PgPool) -> (Portal, Asset) {
    let tenant = TenantRepo::create(
        pool,
        &CreateTenant {
            name: "Bamfield Adventures".to_string(),
            slug: "bamfield-adventures".to_string(),
        },
    )
    .await
    .unwrap();

    let portal = PortalRepo::create(
        pool,
        tenant.id,
        &CreatePortal {
            slug: "experience-bamfield".to_string(),
            name: "Experience Bamfield".to_string(),
        },
    )
    .await
    .unwrap();

    let asset = AssetRepo::create(
        pool,
        tenant.id,
        &CreateAsset {
            name: "Harbourview Cabin".to_string(),
            asset_type: "cabin".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    (portal, asset)
}

async fn list_publicly(pool: &PgPool, portal_id: DbId, asset_id: DbId) {
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
    .unwrap();
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn request(portal_id: DbId, asset_id: DbId, start: &str, end: &str) -> AdmissionRequest {
    AdmissionRequest {
        portal_id,
        asset_id,
        window: DateRange::new(d(start), d(end)).unwrap(),
        customer: CustomerDetails {
            name: "Pat Example".to_string(),
            email: "pat@example.com".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Disclosure re-check
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn unlisted_asset_is_rejected_not_disclosed(pool: PgPool) {
    let (portal, asset) = seed(&pool).await;

    let outcome = admit(&pool, &request(portal.id, asset.id, "2026-02-01", "2026-02-07"))
        .await
        .unwrap();
    match outcome {
        AdmissionOutcome::Rejected(reason) => assert_eq!(reason, RejectReason::NotDisclosed),
        other => panic!("expected rejection, got {other:?}"),
    }

    // No partial row left behind.
    let reservations = ReservationRepo::list_for_portal(&pool, portal.id)
        .await
        .unwrap();
    assert!(reservations.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn paused_listing_is_rejected_not_disclosed(pool: PgPool) {
    let (portal, asset) = seed(&pool).await;
    let listing = ListingRepo::create(
        &pool,
        portal.id,
        &CreateListing {
            asset_id: asset.id,
            active: Some(false),
            visibility: None,
            display_order: None,
        },
    )
    .await
    .unwrap();
    assert!(!listing.active);

    let outcome = admit(&pool, &request(portal.id, asset.id, "2026-02-01", "2026-02-07"))
        .await
        .unwrap();
    match outcome {
        AdmissionOutcome::Rejected(reason) => assert_eq!(reason, RejectReason::NotDisclosed),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn retiring_the_asset_revokes_admission(pool: PgPool) {
    let (portal, asset) = seed(&pool).await;
    list_publicly(&pool, portal.id, asset.id).await;
    AssetRepo::set_status(&pool, asset.id, "retired")
        .await
        .unwrap();

    let outcome = admit(&pool, &request(portal.id, asset.id, "2026-02-01", "2026-02-07"))
        .await
        .unwrap();
    assert!(!outcome.is_committed());
}

// ---------------------------------------------------------------------------
// Successful commit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn disclosed_asset_with_clear_window_commits(pool: PgPool) {
    let (portal, asset) = seed(&pool).await;
    list_publicly(&pool, portal.id, asset.id).await;

    let outcome = admit(&pool, &request(portal.id, asset.id, "2026-02-01", "2026-02-07"))
        .await
        .unwrap();
    let reservation_id = match outcome {
        AdmissionOutcome::Committed { reservation_id, .. } => reservation_id,
        other => panic!("expected commit, got {other:?}"),
    };

    let stored = ReservationRepo::find_by_id(&pool, reservation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.asset_id, asset.id);
    assert_eq!(stored.status, "confirmed");
    assert_eq!(stored.start_date, d("2026-02-01"));
    assert_eq!(stored.end_date, d("2026-02-07"));

    // The committed window now shows as reserved.
    let window = DateRange::new(d("2026-02-01"), d("2026-02-07")).unwrap();
    let reserved = ReservationRepo::reserved_asset_ids(&pool, &[asset.id], &window)
        .await
        .unwrap();
    assert_eq!(reserved, vec![asset.id]);
}

// ---------------------------------------------------------------------------
// Calendar conflicts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn overlapping_window_is_rejected_conflict(pool: PgPool) {
    let (portal, asset) = seed(&pool).await;
    list_publicly(&pool, portal.id, asset.id).await;

    let first = admit(&pool, &request(portal.id, asset.id, "2026-02-01", "2026-02-07"))
        .await
        .unwrap();
    assert!(first.is_committed());

    let second = admit(&pool, &request(portal.id, asset.id, "2026-02-05", "2026-02-10"))
        .await
        .unwrap();
    match second {
        AdmissionOutcome::Rejected(reason) => assert_eq!(reason, RejectReason::Conflict),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn touching_windows_both_commit(pool: PgPool) {
    let (portal, asset) = seed(&pool).await;
    list_publicly(&pool, portal.id, asset.id).await;

    let first = admit(&pool, &request(portal.id, asset.id, "2026-02-01", "2026-02-05"))
        .await
        .unwrap();
    assert!(first.is_committed());

    // Checkout day equals the next check-in day: no conflict.
    let second = admit(&pool, &request(portal.id, asset.id, "2026-02-05", "2026-02-09"))
        .await
        .unwrap();
    assert!(second.is_committed());
}

#[sqlx::test(migrations = "../../migrations")]
async fn cancelled_reservation_frees_the_window(pool: PgPool) {
    let (portal, asset) = seed(&pool).await;
    list_publicly(&pool, portal.id, asset.id).await;

    let outcome = admit(&pool, &request(portal.id, asset.id, "2026-02-01", "2026-02-07"))
        .await
        .unwrap();
    let reservation_id = match outcome {
        AdmissionOutcome::Committed { reservation_id, .. } => reservation_id,
        other => panic!("expected commit, got {other:?}"),
    };

    ReservationRepo::cancel(&pool, reservation_id)
        .await
        .unwrap()
        .unwrap();

    let retry = admit(&pool, &request(portal.id, asset.id, "2026-02-01", "2026-02-07"))
        .await
        .unwrap();
    assert!(retry.is_committed());
}

// ---------------------------------------------------------------------------
// At most one concurrent commit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_overlapping_attempts_commit_at_most_once(pool: PgPool) {
    let (portal, asset) = seed(&pool).await;
    list_publicly(&pool, portal.id, asset.id).await;

    let a = request(portal.id, asset.id, "2026-02-01", "2026-02-07");
    let b = request(portal.id, asset.id, "2026-02-03", "2026-02-09");

    let (ra, rb) = tokio::join!(admit(&pool, &a), admit(&pool, &b));

    let mut committed = 0;
    for result in [ra, rb] {
        match result {
            Ok(outcome) if outcome.is_committed() => committed += 1,
            Ok(AdmissionOutcome::Rejected(reason)) => {
                assert_eq!(reason, RejectReason::Conflict)
            }
            Ok(_) => {}
            // A serialization abort is a retryable transient, acceptable
            // for the loser of the race.
            Err(e) => assert!(e.is_retryable(), "unexpected failure: {e}"),
        }
    }
    assert!(committed <= 1, "double booking: both attempts committed");

    // The calendar holds at most one confirmed reservation.
    let window = DateRange::new(d("2026-02-01"), d("2026-02-09")).unwrap();
    let reserved = ReservationRepo::reserved_asset_ids(&pool, &[asset.id], &window)
        .await
        .unwrap();
    assert!(reserved.len() <= 1);
}
