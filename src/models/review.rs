// src/models/review.rs
// DOCUMENTATION: User reviews of listings
// PURPOSE: Review record (joined with its author) and API DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::de::{blank_as_none, optional_uuid};

/// Review row joined with the author's public fields
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_type: String,
    pub property_id: Uuid,
    pub rating: i16,
    pub message: String,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub author_email: String,
    pub author_picture: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReviewAuthor {
    pub name: String,
    pub profile_picture: Option<String>,
}

/// Full review, returned to its author and to admins
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user: ReviewAuthor,
    pub property_type: String,
    pub property_id: Uuid,
    pub rating: i16,
    pub message: String,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review as shown on a listing page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReviewResponse {
    pub id: Uuid,
    pub user: PublicReviewAuthor,
    pub rating: i16,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn to_response(&self) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            user: ReviewAuthor {
                id: self.user_id,
                name: self.author_name.clone(),
                email: self.author_email.clone(),
                profile_picture: self.author_picture.clone(),
            },
            property_type: self.property_type.clone(),
            property_id: self.property_id,
            rating: self.rating,
            message: self.message.clone(),
            is_approved: self.is_approved,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn to_public(&self) -> PublicReviewResponse {
        PublicReviewResponse {
            id: self.id,
            user: PublicReviewAuthor {
                name: self.author_name.clone(),
                profile_picture: self.author_picture.clone(),
            },
            rating: self.rating,
            message: self.message.clone(),
            created_at: self.created_at,
        }
    }
}

/// POST /api/review
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "optional_uuid")]
    pub property_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub message: Option<String>,
}

/// PUT /api/review/{id}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditReviewRequest {
    pub rating: Option<i32>,
    pub message: Option<String>,
}

/// PUT /api/admin/review/{id}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEditReviewRequest {
    pub rating: Option<i32>,
    pub message: Option<String>,
    pub is_approved: Option<bool>,
    pub is_active: Option<bool>,
}

/// GET /api/reviews
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_approved: Option<bool>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_ignores_blank_flags() {
        let query = actix_web::web::Query::<ReviewListQuery>::from_query("isApproved=&isActive=true")
            .unwrap()
            .into_inner();
        assert!(query.is_approved.is_none());
        assert_eq!(query.is_active, Some(true));
    }

    #[test]
    fn test_public_review_omits_email() {
        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            property_type: "Room".into(),
            property_id: Uuid::new_v4(),
            rating: 4,
            message: "Clean and quiet".into(),
            is_approved: true,
            is_active: true,
            created_at: now,
            updated_at: now,
            author_name: "Asha".into(),
            author_email: "asha@example.com".into(),
            author_picture: None,
        };

        let public = serde_json::to_value(review.to_public()).unwrap();
        assert_eq!(public["user"]["name"], "Asha");
        assert!(public["user"].get("email").is_none());

        let full = serde_json::to_value(review.to_response()).unwrap();
        assert_eq!(full["user"]["email"], "asha@example.com");
        assert_eq!(full["propertyType"], "Room");
    }

    #[test]
    fn test_create_request_shape() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"propertyType": "Hostel", "propertyId": "{}", "rating": 5, "message": "ok"}}"#,
            id
        );
        let req: CreateReviewRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.property_id, Some(id));
        assert_eq!(req.rating, Some(5));
    }
}
