// src/models/location.rs
// DOCUMENTATION: State / City / Area hierarchy
// PURPOSE: Database records and request/response DTOs for locations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::de::{blank_as_none, optional_uuid};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "state")]
    pub state_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "city")]
    pub city_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /api/state
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStateRequest {
    pub name: Option<String>,
}

/// POST /api/city
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_uuid")]
    pub state_id: Option<Uuid>,
}

/// POST /api/area
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAreaRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_uuid")]
    pub city_id: Option<Uuid>,
}

/// GET /api/location-details
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationDetailsQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub state: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub city: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub area: Option<Uuid>,
}

/// Resolved names for a state/city/area triple
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LocationNames {
    pub state: Option<String>,
    pub city: Option<String>,
    pub area: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_query_ignores_blank_ids() {
        let area = Uuid::new_v4();
        let query = actix_web::web::Query::<LocationDetailsQuery>::from_query(&format!(
            "state=&city=&area={}",
            area
        ))
        .unwrap()
        .into_inner();
        assert!(query.state.is_none());
        assert!(query.city.is_none());
        assert_eq!(query.area, Some(area));
    }

    #[test]
    fn test_city_request_accepts_camel_case() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"name": "Jabalpur", "stateId": "{}"}}"#, id);
        let req: CreateCityRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.name.as_deref(), Some("Jabalpur"));
        assert_eq!(req.state_id, Some(id));
    }

    #[test]
    fn test_location_names_serialize_nulls() {
        let names = LocationNames {
            state: Some("Madhya Pradesh".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(names).unwrap();
        assert_eq!(value["state"], "Madhya Pradesh");
        assert!(value["city"].is_null());
        assert!(value["area"].is_null());
    }
}
