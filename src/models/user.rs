// src/models/user.rs
// DOCUMENTATION: End-user accounts
// PURPOSE: User record, API views and request DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::account::validate_mobile;
use super::BookingRequest;

/// User row from the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    /// None for accounts created through Google
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub profile_picture: Option<String>,
    pub otp: Option<String>,
    pub otp_expiry: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub profile_picture: Option<String>,
    pub is_google_account: bool,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Created through Google and never given a password
    pub fn is_google_only(&self) -> bool {
        self.google_id.is_some() && self.password_hash.is_none()
    }

    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            profile_picture: self.profile_picture.clone(),
            is_google_account: self.google_id.is_some(),
            is_active: self.is_active,
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User profile with the booking requests they filed
#[derive(Debug, Clone, Serialize)]
pub struct UserProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub requests: Vec<BookingRequest>,
}

/// POST /api/user/register
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: Option<String>,

    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,

    #[validate(custom = "validate_mobile")]
    pub mobile: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: Option<String>,
}

/// POST /api/user/login
#[derive(Debug, Clone, Deserialize)]
pub struct UserLoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// PUT /api/user/complete-profile/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteProfileRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
}

/// PUT /api/user/profile/{id}
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfileRequest {
    pub name: Option<String>,
    #[validate(custom = "validate_mobile")]
    pub mobile: Option<String>,
    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_only_detection() {
        let now = Utc::now();
        let mut user = User {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            mobile: None,
            password_hash: None,
            google_id: Some("g-123".into()),
            profile_picture: None,
            otp: None,
            otp_expiry: None,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        assert!(user.is_google_only());
        assert!(user.to_response().is_google_account);

        user.password_hash = Some("$argon2id$...".into());
        assert!(!user.is_google_only());
    }

    #[test]
    fn test_profile_update_mobile_checked() {
        let req = UpdateUserProfileRequest {
            mobile: Some("12".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        assert!(UpdateUserProfileRequest::default().validate().is_ok());
    }
}
