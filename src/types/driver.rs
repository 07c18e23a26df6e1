//! Driver types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Driver entity - a person that can be assigned to shifts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    pub name: String,
}

/// Request to update an existing driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverRequest {
    pub id: Uuid,
    pub name: Option<String>,
}

/// Request to list drivers
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListDriversRequest {
    pub search: Option<String>,
}

/// Request to delete a driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDriverRequest {
    pub id: Uuid,
}

/// Response for list of drivers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverListResponse {
    pub items: Vec<Driver>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_driver_request_deserialize() {
        let json = r#"{"name": "Jana Novak"}"#;

        let request: CreateDriverRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Jana Novak");
    }

    #[test]
    fn test_update_driver_request_partial() {
        let json = r#"{
            "id": "123e4567-e89b-12d3-a456-426614174000"
        }"#;

        let request: UpdateDriverRequest = serde_json::from_str(json).unwrap();
        assert!(request.name.is_none());
    }

    #[test]
    fn test_driver_serialize() {
        let driver = Driver {
            id: Uuid::nil(),
            name: "Jana Novak".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&driver).unwrap();
        assert!(json.contains("\"name\":\"Jana Novak\""));
        assert!(json.contains("\"createdAt\""));
    }
}
