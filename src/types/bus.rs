//! Bus types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Bus entity - a vehicle that can be assigned to shifts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: Uuid,
    pub licence_plate: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusRequest {
    pub licence_plate: String,
}

/// Request to update an existing bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusRequest {
    pub id: Uuid,
    pub licence_plate: Option<String>,
}

/// Request to list buses
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListBusesRequest {
    pub search: Option<String>,
}

/// Request to delete a bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBusRequest {
    pub id: Uuid,
}

/// Response for list of buses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusListResponse {
    pub items: Vec<Bus>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_bus_request_deserialize() {
        let json = r#"{"licencePlate": "AB-123-CD"}"#;

        let request: CreateBusRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.licence_plate, "AB-123-CD");
    }

    #[test]
    fn test_update_bus_request_partial() {
        let json = r#"{
            "id": "123e4567-e89b-12d3-a456-426614174000",
            "licencePlate": "EF-456-GH"
        }"#;

        let request: UpdateBusRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.licence_plate, Some("EF-456-GH".to_string()));
    }

    #[test]
    fn test_list_buses_request_empty_object() {
        let request: ListBusesRequest = serde_json::from_str("{}").unwrap();
        assert!(request.search.is_none());
    }

    #[test]
    fn test_bus_serialize() {
        let bus = Bus {
            id: Uuid::nil(),
            licence_plate: "AB-123-CD".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&bus).unwrap();
        assert!(json.contains("\"licencePlate\":\"AB-123-CD\""));
    }
}
