//! Reservation admission domain types.
//!
//! Booking windows, the admission state machine vocabulary, and the
//! terminal outcome of an attempt. The controller that walks the states
//! lives in the db crate (it owns the transaction); the types and the
//! overlap arithmetic live here.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::{DateKey, DbId};

// ---------------------------------------------------------------------------
// Booking window
// ---------------------------------------------------------------------------

/// Half-open booking window `[start, end)`.
///
/// `end` is the checkout day: a reservation ending on a date never
/// conflicts with one starting that same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateKey,
    pub end: DateKey,
}

impl DateRange {
    /// Build a validated window. The start must be strictly before the end.
    pub fn new(start: DateKey, end: DateKey) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::Validation(format!(
                "start_date {start} must be before end_date {end}"
            )));
        }
        Ok(DateRange { start, end })
    }

    /// Whether two half-open windows share at least one night.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Number of nights covered by the window.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Admission state machine
// ---------------------------------------------------------------------------

/// Progress of one admission attempt. Transitions are strictly forward:
/// `Received -> DisclosureChecked -> CalendarChecked -> Committed`, with
/// rejection terminal at any point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionPhase {
    Received,
    DisclosureChecked,
    CalendarChecked,
    Committed,
}

impl fmt::Display for AdmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdmissionPhase::Received => "received",
            AdmissionPhase::DisclosureChecked => "disclosure_checked",
            AdmissionPhase::CalendarChecked => "calendar_checked",
            AdmissionPhase::Committed => "committed",
        };
        f.write_str(s)
    }
}

/// Why an admission attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The asset failed the disclosure check, for any reason. The public
    /// response is identical across all underlying causes.
    NotDisclosed,
    /// The requested window overlaps an existing confirmed reservation.
    Conflict,
}

impl RejectReason {
    /// Stable wire code for the public response body.
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::NotDisclosed => "not_disclosed",
            RejectReason::Conflict => "conflict",
        }
    }
}

/// Terminal state of one admission attempt.
///
/// Rejection is a value, not an error: only store failures travel the
/// error channel, so a transient outage can never be read as a refusal.
#[derive(Debug, Clone)]
pub enum AdmissionOutcome {
    Committed {
        reservation_id: DbId,
        confirmation_code: Uuid,
    },
    Rejected(RejectReason),
}

impl AdmissionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, AdmissionOutcome::Committed { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use super::*;

    fn d(s: &str) -> DateKey {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(d(start), d(end)).unwrap()
    }

    // -- validation ---------------------------------------------------------

    #[test]
    fn start_must_precede_end() {
        assert_matches!(
            DateRange::new(d("2026-02-07"), d("2026-02-01")),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            DateRange::new(d("2026-02-01"), d("2026-02-01")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn nights_counts_the_half_open_span() {
        assert_eq!(range("2026-02-01", "2026-02-07").nights(), 6);
        assert_eq!(range("2026-02-01", "2026-02-02").nights(), 1);
    }

    // -- overlap matrix -----------------------------------------------------

    #[test]
    fn identical_windows_overlap() {
        let a = range("2026-02-01", "2026-02-07");
        assert!(a.overlaps(&a));
    }

    #[test]
    fn partial_overlap_detected_both_directions() {
        let a = range("2026-02-01", "2026-02-05");
        let b = range("2026-02-04", "2026-02-09");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn contained_window_overlaps() {
        let outer = range("2026-02-01", "2026-02-28");
        let inner = range("2026-02-10", "2026-02-12");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        // Checkout day equals the next check-in day.
        let a = range("2026-02-01", "2026-02-05");
        let b = range("2026-02-05", "2026-02-09");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        let a = range("2026-02-01", "2026-02-03");
        let b = range("2026-02-10", "2026-02-12");
        assert!(!a.overlaps(&b));
    }

    // -- wire codes ---------------------------------------------------------

    #[test]
    fn reject_reason_codes_are_stable() {
        assert_eq!(RejectReason::NotDisclosed.code(), "not_disclosed");
        assert_eq!(RejectReason::Conflict.code(), "conflict");
    }

    #[test]
    fn admission_phases_render_for_audit() {
        assert_eq!(AdmissionPhase::Received.to_string(), "received");
        assert_eq!(AdmissionPhase::Committed.to_string(), "committed");
    }
}
