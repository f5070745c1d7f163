// src/models/account.rs
// DOCUMENTATION: DTOs shared by owner and user accounts
// PURPOSE: Password-reset requests and field validators

use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: u64 = 6;

/// Exactly ten ASCII digits
pub fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    if mobile.len() == 10 && mobile.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("mobile");
        err.message = Some("Please provide a valid 10-digit mobile number".into());
        Err(err)
    }
}

/// Lower-cased, trimmed email used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// POST /forgot-password
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// POST /verify-otp
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

/// POST /reset-password
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Response data for a password-reset request
#[derive(Debug, Clone, Serialize)]
pub struct OtpIssued {
    pub email: String,
    /// Present only when OTP echo is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("9876543210").is_ok());
        assert!(validate_mobile("987654321").is_err());
        assert!(validate_mobile("98765432100").is_err());
        assert!(validate_mobile("98765x3210").is_err());
        assert!(validate_mobile("").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Asha@Example.COM "), "asha@example.com");
    }
}
