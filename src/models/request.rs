// src/models/request.rs
// DOCUMENTATION: Booking requests filed against a listing's Horoo ID

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const BOOKING_STATUSES: [&str; 5] = ["New", "Pending", "Booked", "Not Booked", "Fraud"];

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub id: Uuid,
    pub horoo_id: String,
    pub user_name: String,
    pub user_phone_no: String,
    pub status: String,
    #[serde(rename = "user")]
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /api/requests
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub horoo_id: Option<String>,
    pub user_name: Option<String>,
    pub user_phone_no: Option<String>,
}

/// PUT /api/requests/update/{id}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub horoo_id: Option<String>,
    pub user_name: Option<String>,
    pub user_phone_no: Option<String>,
    pub status: Option<String>,
}

/// GET /api/requests/filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilterQuery {
    pub status: Option<String>,
    pub horoo_id: Option<String>,
}

/// GET /api/requests/search and /api/listing-requests/search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextSearchQuery {
    pub query: Option<String>,
}
