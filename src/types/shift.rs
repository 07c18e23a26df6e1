//! Shift and stop types
//!
//! A shift assigns one bus and one driver to an ordered sequence of stops.
//! Its departure, arrival and duration are derived from the stop times on
//! every read; they are never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::services::shift_validation::Violation;

/// A stop with its place name joined, for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShiftStopWithPlace {
    pub id: Uuid,
    pub shift_id: Uuid,
    pub place_id: Uuid,
    pub place_name: String,
    /// Scheduled time of arrival at the stop
    pub time: DateTime<Utc>,
}

/// Shift with joined resource names and derived times.
///
/// `departure`/`arrival`/`duration_minutes` are null while the shift has
/// fewer than two stops.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShiftWithTimes {
    pub id: Uuid,
    pub bus_id: Uuid,
    pub driver_id: Uuid,
    pub licence_plate: String,
    pub driver_name: String,
    pub departure: Option<DateTime<Utc>>,
    pub arrival: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One stop entry in a save request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopInput {
    pub place_id: Uuid,
    pub time: DateTime<Utc>,
    /// Marks the entry for removal; flagged entries are ignored by
    /// validation and not persisted.
    #[serde(default)]
    pub delete: bool,
}

/// Request to create or update a shift with its full stop list.
///
/// `id` is set on the update path; the stop list replaces the previous one
/// atomically when all checks pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveShiftRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub bus_id: Uuid,
    pub driver_id: Uuid,
    pub stops: Vec<StopInput>,
}

/// Request to list shifts
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListShiftsRequest {
    pub bus_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
}

/// Request to get or delete a single shift by ID
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftIdRequest {
    pub id: Uuid,
}

/// Response for list of shifts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftListResponse {
    pub items: Vec<ShiftWithTimes>,
    pub total: i64,
}

/// Response with shift and its stops ordered by time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetShiftResponse {
    pub shift: ShiftWithTimes,
    pub stops: Vec<ShiftStopWithPlace>,
}

/// Wire form of a scheduling violation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationMessage {
    pub code: String,
    pub message: String,
}

impl From<Violation> for ViolationMessage {
    fn from(violation: Violation) -> Self {
        Self {
            code: violation.code().to_string(),
            message: violation.to_string(),
        }
    }
}

/// Response for a dry-run validation of a shift
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateShiftResponse {
    pub valid: bool,
    pub violations: Vec<ViolationMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_shift_request_deserialize() {
        let json = r#"{
            "busId": "123e4567-e89b-12d3-a456-426614174000",
            "driverId": "223e4567-e89b-12d3-a456-426614174000",
            "stops": [
                {"placeId": "323e4567-e89b-12d3-a456-426614174000", "time": "2026-03-15T08:00:00Z"},
                {"placeId": "423e4567-e89b-12d3-a456-426614174000", "time": "2026-03-15T10:00:00Z", "delete": true}
            ]
        }"#;

        let request: SaveShiftRequest = serde_json::from_str(json).unwrap();
        assert!(request.id.is_none());
        assert_eq!(request.stops.len(), 2);
        assert!(!request.stops[0].delete);
        assert!(request.stops[1].delete);
    }

    #[test]
    fn test_stop_input_delete_defaults_to_false() {
        let json = r#"{
            "placeId": "323e4567-e89b-12d3-a456-426614174000",
            "time": "2026-03-15T08:00:00Z"
        }"#;

        let stop: StopInput = serde_json::from_str(json).unwrap();
        assert!(!stop.delete);
    }

    #[test]
    fn test_save_shift_request_with_id_for_update() {
        let json = r#"{
            "id": "523e4567-e89b-12d3-a456-426614174000",
            "busId": "123e4567-e89b-12d3-a456-426614174000",
            "driverId": "223e4567-e89b-12d3-a456-426614174000",
            "stops": []
        }"#;

        let request: SaveShiftRequest = serde_json::from_str(json).unwrap();
        assert!(request.id.is_some());
        assert!(request.stops.is_empty());
    }

    #[test]
    fn test_shift_with_times_serializes_null_window_when_underfilled() {
        let shift = ShiftWithTimes {
            id: Uuid::nil(),
            bus_id: Uuid::nil(),
            driver_id: Uuid::nil(),
            licence_plate: "AB-123-CD".to_string(),
            driver_name: "Jana Novak".to_string(),
            departure: None,
            arrival: None,
            duration_minutes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&shift).unwrap();
        assert!(json.contains("\"departure\":null"));
        assert!(json.contains("\"arrival\":null"));
        assert!(json.contains("\"durationMinutes\":null"));
    }

    #[test]
    fn test_violation_message_from_violation() {
        let message: ViolationMessage = Violation::DriverConflict.into();
        assert_eq!(message.code, "DRIVER_CONFLICT");
        assert_eq!(message.message, "This driver already has a conflicting shift.");
    }

    #[test]
    fn test_validate_shift_response_serialize() {
        let response = ValidateShiftResponse {
            valid: false,
            violations: vec![Violation::BusConflict.into()],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"valid\":false"));
        assert!(json.contains("\"code\":\"BUS_CONFLICT\""));
    }
}
