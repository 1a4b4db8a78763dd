//! Reservation admission controller.
//!
//! One serializable transaction per attempt: re-resolve disclosure, check
//! the calendar, insert, commit. The disclosure re-check runs inside the
//! same transaction as the insert even when an earlier availability read
//! already showed the asset, so a listing deactivation racing with the
//! attempt lands deterministically on one side of the commit. A rejected
//! attempt is an outcome, not an error; only store failures return `Err`.

use quayside_core::disclosure::{DisclosureResolver, Resolution};
use quayside_core::error::StoreError;
use quayside_core::reservation::{AdmissionOutcome, AdmissionPhase, DateRange, RejectReason};
use quayside_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::disclosure_store::{classify_store_error, PgDisclosureStore};
use crate::models::reservation::CustomerDetails;

/// One reservation attempt, as handed over by the request layer after
/// payload validation.
#[derive(Debug, Clone)]
pub struct AdmissionRequest {
    pub portal_id: DbId,
    pub asset_id: DbId,
    pub window: DateRange,
    pub customer: CustomerDetails,
}

/// Run one admission attempt to a terminal state.
pub async fn admit(
    pool: &PgPool,
    request: &AdmissionRequest,
) -> Result<AdmissionOutcome, StoreError> {
    let mut tx = pool.begin().await.map_err(classify_store_error)?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await
        .map_err(classify_store_error)?;

    tracing::debug!(
        portal_id = request.portal_id,
        asset_id = request.asset_id,
        window = %request.window,
        phase = %AdmissionPhase::Received,
        "admission attempt",
    );

    // Disclosure re-check on the insert transaction's snapshot. Client or
    // cached disclosure results are never trusted here.
    let resolution = {
        let mut store = PgDisclosureStore::new(&mut tx);
        DisclosureResolver::resolve_one(&mut store, request.portal_id, request.asset_id).await?
    };
    if let Resolution::NotDisclosed = resolution {
        tx.rollback().await.map_err(classify_store_error)?;
        return Ok(AdmissionOutcome::Rejected(RejectReason::NotDisclosed));
    }
    tracing::debug!(
        asset_id = request.asset_id,
        phase = %AdmissionPhase::DisclosureChecked,
        "disclosure confirmed",
    );

    // Calendar conflict check on the same snapshot.
    let (overlap,): (bool,) = sqlx::query_as(
        "SELECT EXISTS ( \
            SELECT 1 FROM reservations \
            WHERE asset_id = $1 AND status = 'confirmed' \
              AND start_date < $3 AND end_date > $2 \
         )",
    )
    .bind(request.asset_id)
    .bind(request.window.start)
    .bind(request.window.end)
    .fetch_one(&mut *tx)
    .await
    .map_err(classify_store_error)?;

    if overlap {
        tx.rollback().await.map_err(classify_store_error)?;
        return Ok(AdmissionOutcome::Rejected(RejectReason::Conflict));
    }
    tracing::debug!(
        asset_id = request.asset_id,
        phase = %AdmissionPhase::CalendarChecked,
        "window clear",
    );

    let confirmation_code = Uuid::now_v7();
    let inserted: Result<(DbId,), sqlx::Error> = sqlx::query_as(
        "INSERT INTO reservations \
            (portal_id, asset_id, start_date, end_date, \
             customer_name, customer_email, confirmation_code) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(request.portal_id)
    .bind(request.asset_id)
    .bind(request.window.start)
    .bind(request.window.end)
    .bind(&request.customer.name)
    .bind(&request.customer.email)
    .bind(confirmation_code)
    .fetch_one(&mut *tx)
    .await;

    let (reservation_id,) = match inserted {
        Ok(row) => row,
        // The exclusion constraint caught a concurrent insert the overlap
        // check could not see yet.
        Err(e) if is_window_conflict(&e) => {
            let _ = tx.rollback().await;
            return Ok(AdmissionOutcome::Rejected(RejectReason::Conflict));
        }
        Err(e) => {
            let _ = tx.rollback().await;
            return Err(classify_store_error(e));
        }
    };

    match tx.commit().await {
        Ok(()) => {
            tracing::info!(
                reservation_id,
                portal_id = request.portal_id,
                asset_id = request.asset_id,
                phase = %AdmissionPhase::Committed,
                "reservation committed",
            );
            Ok(AdmissionOutcome::Committed {
                reservation_id,
                confirmation_code,
            })
        }
        Err(e) if is_window_conflict(&e) => {
            Ok(AdmissionOutcome::Rejected(RejectReason::Conflict))
        }
        Err(e) => Err(classify_store_error(e)),
    }
}

/// Unique or exclusion violation on the reservation window constraints.
fn is_window_conflict(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        matches!(db.code().as_deref(), Some("23505") | Some("23P01"))
    } else {
        false
    }
}
