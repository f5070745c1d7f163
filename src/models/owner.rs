// src/models/owner.rs
// DOCUMENTATION: Property owner accounts
// PURPOSE: Owner record, API views and request DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

use super::account::validate_mobile;
use super::OwnedListingSummary;

/// Owner row from the `owners` table
#[derive(Debug, Clone, FromRow)]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
    pub otp: Option<String>,
    pub otp_expiry: Option<DateTime<Utc>>,
    pub is_verified_owner: bool,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub alternate_number: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner without credentials or OTP state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub is_verified_owner: bool,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub alternate_number: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owner {
    pub fn to_response(&self) -> OwnerResponse {
        OwnerResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            is_verified_owner: self.is_verified_owner,
            address: self.address.clone(),
            state: self.state.clone(),
            city: self.city.clone(),
            pincode: self.pincode.clone(),
            alternate_number: self.alternate_number.clone(),
            is_active: self.is_active,
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Owner profile with listings grouped by family (keyed by property type)
#[derive(Debug, Clone, Serialize)]
pub struct OwnerProfileResponse {
    #[serde(flatten)]
    pub owner: OwnerResponse,
    pub listings: BTreeMap<String, Vec<OwnedListingSummary>>,
}

/// POST /api/owner/register
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOwnerRequest {
    pub name: Option<String>,

    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,

    #[validate(custom = "validate_mobile")]
    pub mobile: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: Option<String>,

    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub alternate_number: Option<String>,
}

/// POST /api/owner/login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerLoginRequest {
    pub email_or_mobile: Option<String>,
    pub password: Option<String>,
}

/// PUT /api/owner/profile/{id}
/// DOCUMENTATION: Credentials, contact identifiers and listings are not part
/// of this body; unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOwnerProfileRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub alternate_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, confirm: &str, mobile: &str) -> RegisterOwnerRequest {
        RegisterOwnerRequest {
            name: Some("Ravi".into()),
            email: Some("ravi@example.com".into()),
            mobile: Some(mobile.into()),
            password: Some(password.into()),
            confirm_password: Some(confirm.into()),
            address: None,
            state: None,
            city: None,
            pincode: None,
            alternate_number: None,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("secret1", "secret1", "9876543210").validate().is_ok());
        assert!(register("secret1", "secret2", "9876543210").validate().is_err());
        assert!(register("abc", "abc", "9876543210").validate().is_err());
        assert!(register("secret1", "secret1", "12345").validate().is_err());
    }

    #[test]
    fn test_profile_update_ignores_protected_fields() {
        let json = r#"{"name": "New", "email": "x@y.z", "password": "p", "mobile": "1"}"#;
        let req: UpdateOwnerProfileRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name.as_deref(), Some("New"));
        assert!(req.address.is_none());
    }
}
