// src/models/listing_request.rs
// DOCUMENTATION: Requests from prospective owners to get a property listed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const LISTING_REQUEST_PROPERTY_TYPES: [&str; 6] =
    ["room", "hostel", "flat", "hotel", "commercial", "house"];

pub const LISTING_REQUEST_STATUSES: [&str; 7] = [
    "new", "pending", "on-hold", "listed", "rejected", "fraud", "closed",
];

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub address: String,
    pub property_type: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /api/listing-requests
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub property_type: Option<String>,
}

/// PUT /api/listing-requests/update/{id}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<String>,
}

/// GET /api/listing-requests/filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequestFilterQuery {
    pub status: Option<String>,
    pub property_type: Option<String>,
}
