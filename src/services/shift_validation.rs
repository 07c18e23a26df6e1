//! Shift stop-sequence validation and conflict detection.
//!
//! A shift is schedulable when its stop list is structurally valid and the
//! [departure, arrival] window derived from it does not overlap the window
//! of any other shift assigned to the same bus or the same driver.
//!
//! Everything in this module is pure: callers materialize the windows of
//! the other shifts (see `db::queries::shift`) and pass them in.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::defaults::MIN_STOPS_PER_SHIFT;

/// A candidate stop as submitted by the client form.
#[derive(Debug, Clone)]
pub struct StopCandidate {
    pub place_id: Uuid,
    pub time: DateTime<Utc>,
    /// Entry is pending removal and must be ignored by validation.
    pub delete: bool,
}

/// The [departure, arrival] window of a shift, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
}

impl ShiftWindow {
    pub fn duration(&self) -> Duration {
        self.arrival - self.departure
    }
}

/// A structurally valid stop list with its derived window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidStops {
    /// Remaining (place, time) pairs after deletion-flag filtering.
    pub stops: Vec<(Uuid, DateTime<Utc>)>,
    pub window: ShiftWindow,
}

/// A reason a shift cannot be scheduled.
///
/// Every variant is recoverable: the caller corrects the submission and
/// tries again. Messages are surfaced verbatim to the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("A bus shift must have at least two valid stops.")]
    InsufficientStops,
    #[error("A shift cannot contain two stops at the same place and time.")]
    DuplicateStop,
    #[error("This bus already has a conflicting shift.")]
    BusConflict,
    #[error("This driver already has a conflicting shift.")]
    DriverConflict,
}

impl Violation {
    /// Stable wire code for frontend dispatch.
    pub const fn code(self) -> &'static str {
        match self {
            Violation::InsufficientStops => "INSUFFICIENT_STOPS",
            Violation::DuplicateStop => "DUPLICATE_STOP",
            Violation::BusConflict => "BUS_CONFLICT",
            Violation::DriverConflict => "DRIVER_CONFLICT",
        }
    }
}

/// Validate a candidate stop list and derive its shift window.
///
/// Entries flagged for deletion are dropped before any check runs. The
/// count check precedes the duplicate check; the first structural failure
/// is returned and conflict checking must not proceed.
pub fn validate_stops(candidates: &[StopCandidate]) -> Result<ValidStops, Violation> {
    let stops: Vec<(Uuid, DateTime<Utc>)> = candidates
        .iter()
        .filter(|c| !c.delete)
        .map(|c| (c.place_id, c.time))
        .collect();

    if stops.len() < MIN_STOPS_PER_SHIFT {
        return Err(Violation::InsufficientStops);
    }

    let mut seen = HashSet::with_capacity(stops.len());
    for stop in &stops {
        if !seen.insert(*stop) {
            return Err(Violation::DuplicateStop);
        }
    }

    // At least two stops remain, so min and max exist. Two stops may share
    // a timestamp at different places; min/max stay well-defined.
    let departure = stops.iter().map(|&(_, t)| t).min().expect("at least two stops");
    let arrival = stops.iter().map(|&(_, t)| t).max().expect("at least two stops");

    Ok(ValidStops {
        stops,
        window: ShiftWindow { departure, arrival },
    })
}

/// Closed-interval intersection: boundary touching counts as overlap.
///
/// A bus or driver cannot be in two places at once even for an instant, so
/// a shift starting exactly when another ends is still a conflict.
pub fn overlaps(a: &ShiftWindow, b: &ShiftWindow) -> bool {
    a.departure <= b.arrival && b.departure <= a.arrival
}

/// True iff `candidate` overlaps at least one window in `existing`.
pub fn conflicts_with_any(candidate: &ShiftWindow, existing: &[ShiftWindow]) -> bool {
    existing.iter().any(|w| overlaps(candidate, w))
}

/// Check a candidate window against the other shift windows of its bus and
/// its driver.
///
/// Both checks always run: a shift can conflict on both resources, and the
/// caller must see both reasons. The passed slices must already exclude
/// the candidate shift's own window on the update path.
pub fn resource_conflicts(
    candidate: &ShiftWindow,
    bus_windows: &[ShiftWindow],
    driver_windows: &[ShiftWindow],
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if conflicts_with_any(candidate, bus_windows) {
        violations.push(Violation::BusConflict);
    }
    if conflicts_with_any(candidate, driver_windows) {
        violations.push(Violation::DriverConflict);
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Base timestamp plus an hour offset, UTC.
    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap() + Duration::hours(h as i64)
    }

    fn stop(place_id: Uuid, time: DateTime<Utc>) -> StopCandidate {
        StopCandidate { place_id, time, delete: false }
    }

    fn deleted_stop(place_id: Uuid, time: DateTime<Utc>) -> StopCandidate {
        StopCandidate { place_id, time, delete: true }
    }

    fn window(from: DateTime<Utc>, to: DateTime<Utc>) -> ShiftWindow {
        ShiftWindow { departure: from, arrival: to }
    }

    #[test]
    fn test_two_stops_derive_departure_and_arrival() {
        let valid = validate_stops(&[
            stop(Uuid::new_v4(), hour(8)),
            stop(Uuid::new_v4(), hour(10)),
        ])
        .unwrap();

        assert_eq!(valid.window.departure, hour(8));
        assert_eq!(valid.window.arrival, hour(10));
        assert_eq!(valid.window.duration(), Duration::hours(2));
    }

    #[test]
    fn test_unordered_stop_times_still_derive_window() {
        let valid = validate_stops(&[
            stop(Uuid::new_v4(), hour(14)),
            stop(Uuid::new_v4(), hour(6)),
            stop(Uuid::new_v4(), hour(10)),
        ])
        .unwrap();

        assert_eq!(valid.window.departure, hour(6));
        assert_eq!(valid.window.arrival, hour(14));
        assert_eq!(valid.stops.len(), 3);
    }

    #[test]
    fn test_empty_stop_list_is_insufficient() {
        assert_eq!(validate_stops(&[]), Err(Violation::InsufficientStops));
    }

    #[test]
    fn test_single_stop_is_insufficient() {
        let result = validate_stops(&[stop(Uuid::new_v4(), hour(8))]);
        assert_eq!(result, Err(Violation::InsufficientStops));
    }

    #[test]
    fn test_deleted_entries_are_filtered_before_counting() {
        let result = validate_stops(&[
            stop(Uuid::new_v4(), hour(8)),
            deleted_stop(Uuid::new_v4(), hour(10)),
        ]);
        assert_eq!(result, Err(Violation::InsufficientStops));
    }

    #[test]
    fn test_deleted_duplicate_does_not_trigger_duplicate_check() {
        let place = Uuid::new_v4();
        let valid = validate_stops(&[
            stop(place, hour(8)),
            deleted_stop(place, hour(8)),
            stop(Uuid::new_v4(), hour(10)),
        ])
        .unwrap();
        assert_eq!(valid.stops.len(), 2);
    }

    #[test]
    fn test_duplicate_place_and_time_rejected() {
        let place = Uuid::new_v4();
        let result = validate_stops(&[
            stop(place, hour(8)),
            stop(place, hour(8)),
            stop(Uuid::new_v4(), hour(10)),
        ]);
        assert_eq!(result, Err(Violation::DuplicateStop));
    }

    #[test]
    fn test_same_time_at_different_places_allowed() {
        let valid = validate_stops(&[
            stop(Uuid::new_v4(), hour(8)),
            stop(Uuid::new_v4(), hour(8)),
        ])
        .unwrap();
        assert_eq!(valid.window.departure, valid.window.arrival);
        assert_eq!(valid.window.duration(), Duration::zero());
    }

    #[test]
    fn test_same_place_at_different_times_allowed() {
        let place = Uuid::new_v4();
        let valid = validate_stops(&[stop(place, hour(8)), stop(place, hour(12))]);
        assert!(valid.is_ok());
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = window(hour(8), hour(10));
        let b = window(hour(9), hour(12));
        assert_eq!(overlaps(&a, &b), overlaps(&b, &a));

        let c = window(hour(20), hour(22));
        assert_eq!(overlaps(&a, &c), overlaps(&c, &a));
    }

    #[test]
    fn test_touching_boundaries_overlap() {
        // [t0,t1] and [t1,t2] share exactly one instant; back-to-back shifts
        // with zero transition time are a conflict.
        let earlier = window(hour(8), hour(10));
        let later = window(hour(10), hour(12));
        assert!(overlaps(&earlier, &later));
        assert!(overlaps(&later, &earlier));
    }

    #[test]
    fn test_identical_windows_overlap() {
        let a = window(hour(8), hour(10));
        assert!(overlaps(&a, &a));
    }

    #[test]
    fn test_strict_gap_is_disjoint() {
        let earlier = window(hour(8), hour(10));
        let later = window(hour(11), hour(12));
        assert!(!overlaps(&earlier, &later));
        assert!(!overlaps(&later, &earlier));
    }

    #[test]
    fn test_contained_window_overlaps() {
        let outer = window(hour(8), hour(18));
        let inner = window(hour(10), hour(11));
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn test_bus_overlap_reports_bus_conflict() {
        // Existing bus shift [T, T+2h], candidate [T+1h, T+4h].
        let existing = window(hour(0), hour(2));
        let candidate = window(hour(1), hour(4));

        let violations = resource_conflicts(&candidate, &[existing], &[]);
        assert_eq!(violations, vec![Violation::BusConflict]);
    }

    #[test]
    fn test_driver_overlap_only_reports_driver_conflict() {
        // Existing driver shift spans four days; candidate runs on a
        // different bus inside that span.
        let existing = window(hour(0), hour(96));
        let candidate = window(hour(1), hour(3));

        let violations = resource_conflicts(&candidate, &[], &[existing]);
        assert_eq!(violations, vec![Violation::DriverConflict]);
    }

    #[test]
    fn test_back_to_back_on_same_bus_conflicts() {
        // Existing [T, T+2h], candidate starts exactly at T+2h.
        let existing = window(hour(0), hour(2));
        let candidate = window(hour(2), hour(4));

        let violations = resource_conflicts(&candidate, &[existing], &[]);
        assert_eq!(violations, vec![Violation::BusConflict]);
    }

    #[test]
    fn test_conflicts_on_both_resources_report_both() {
        let candidate = window(hour(9), hour(11));
        let bus_other = window(hour(8), hour(10));
        let driver_other = window(hour(10), hour(12));

        let violations = resource_conflicts(&candidate, &[bus_other], &[driver_other]);
        assert_eq!(
            violations,
            vec![Violation::BusConflict, Violation::DriverConflict]
        );
    }

    #[test]
    fn test_no_other_windows_means_no_conflict() {
        // The update path excludes the shift's own window from the lookup,
        // so re-validating an unchanged shift sees empty slices here.
        let candidate = window(hour(8), hour(10));
        assert!(resource_conflicts(&candidate, &[], &[]).is_empty());
    }

    #[test]
    fn test_conflict_among_several_disjoint_windows() {
        let candidate = window(hour(9), hour(11));
        let others = [
            window(hour(0), hour(2)),
            window(hour(4), hour(6)),
            window(hour(10), hour(14)),
        ];
        assert!(conflicts_with_any(&candidate, &others));

        let clear = window(hour(7), hour(8));
        assert!(!conflicts_with_any(&clear, &others));
    }

    #[test]
    fn test_violation_codes_are_stable() {
        assert_eq!(Violation::InsufficientStops.code(), "INSUFFICIENT_STOPS");
        assert_eq!(Violation::DuplicateStop.code(), "DUPLICATE_STOP");
        assert_eq!(Violation::BusConflict.code(), "BUS_CONFLICT");
        assert_eq!(Violation::DriverConflict.code(), "DRIVER_CONFLICT");
    }

    #[test]
    fn test_violation_messages_are_user_facing() {
        assert_eq!(
            Violation::InsufficientStops.to_string(),
            "A bus shift must have at least two valid stops."
        );
        assert_eq!(
            Violation::BusConflict.to_string(),
            "This bus already has a conflicting shift."
        );
    }
}
