use chrono::NaiveDate;
use quayside_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `reservations` table. Windows are half-open:
/// `end_date` is the checkout day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub portal_id: DbId,
    pub asset_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub customer_name: String,
    pub customer_email: String,
    pub confirmation_code: Uuid,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Customer contact details attached to a reservation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
}
