//! Place types
//!
//! A place is an opaque location reference from the scheduling core's point
//! of view; coordinates are carried for map display only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Place entity - a named location buses stop at
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new place
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaceRequest {
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Request to update an existing place
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaceRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Request to list places
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListPlacesRequest {
    pub search: Option<String>,
}

/// Request to delete a place
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePlaceRequest {
    pub id: Uuid,
}

/// Response for list of places
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceListResponse {
    pub items: Vec<Place>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_place_request_deserialize() {
        let json = r#"{
            "name": "Gare de Lyon",
            "lat": 48.8443,
            "lng": 2.3743
        }"#;

        let request: CreatePlaceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Gare de Lyon");
        assert_eq!(request.lat, Some(48.8443));
    }

    #[test]
    fn test_create_place_request_minimal() {
        let json = r#"{"name": "Depot"}"#;

        let request: CreatePlaceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Depot");
        assert!(request.lat.is_none());
        assert!(request.lng.is_none());
    }

    #[test]
    fn test_place_serialize() {
        let place = Place {
            id: Uuid::nil(),
            name: "Gare de Lyon".to_string(),
            lat: Some(48.8443),
            lng: Some(2.3743),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&place).unwrap();
        assert!(json.contains("\"name\":\"Gare de Lyon\""));
        assert!(json.contains("\"lat\":48.8443"));
    }
}
