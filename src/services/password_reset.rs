// src/services/password_reset.rs
// DOCUMENTATION: OTP-based password reset shared by owners and users
// PURPOSE: forgot-password -> verify-otp -> reset-password

use crate::config::Config;
use crate::db::{AccountTable, CredentialRecord, CredentialRepository};
use crate::errors::HorooError;
use crate::models::de::non_blank;
use crate::models::{
    normalize_email, ForgotPasswordRequest, OtpIssued, ResetPasswordRequest, VerifyOtpRequest,
    MIN_PASSWORD_LEN,
};
use crate::services::auth::{generate_otp, hash_password};
use crate::services::rate_limit::OtpLimiter;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

pub struct PasswordResetService;

impl PasswordResetService {
    /// Issue a fresh OTP for the account with this email
    pub async fn forgot_password(
        pool: &PgPool,
        config: &Config,
        limiter: &OtpLimiter,
        table: AccountTable,
        req: ForgotPasswordRequest,
    ) -> Result<OtpIssued, HorooError> {
        let email = non_blank(&req.email)
            .map(normalize_email)
            .ok_or_else(|| HorooError::InvalidInput("Email is required".to_string()))?;
        limiter.check(&email)?;

        let account = CredentialRepository::find_by_email(pool, table, &email)
            .await?
            .ok_or_else(|| HorooError::NotFound("No account found with this email".to_string()))?;

        if account.password_hash.is_none() && account.google_id.is_some() {
            return Err(HorooError::InvalidInput(
                "This account uses Google Sign-In. Please login with Google.".to_string(),
            ));
        }

        let otp = generate_otp();
        let expires_at = Utc::now() + Duration::minutes(config.otp_ttl_minutes);
        CredentialRepository::store_otp(pool, table, account.id, &otp, expires_at).await?;

        log::info!("Password reset OTP for {}: {}", email, otp);

        Ok(OtpIssued {
            email,
            otp: config.expose_otp.then_some(otp),
        })
    }

    pub async fn verify_otp(
        pool: &PgPool,
        table: AccountTable,
        req: VerifyOtpRequest,
    ) -> Result<(), HorooError> {
        let (email, otp) = match (non_blank(&req.email), non_blank(&req.otp)) {
            (Some(e), Some(o)) => (normalize_email(e), o.to_string()),
            _ => {
                return Err(HorooError::InvalidInput(
                    "Email and OTP are required".to_string(),
                ))
            }
        };

        let account = Self::account(pool, table, &email).await?;
        check_otp(&account, &otp, Utc::now())
    }

    pub async fn reset_password(
        pool: &PgPool,
        table: AccountTable,
        req: ResetPasswordRequest,
    ) -> Result<(), HorooError> {
        let (email, otp, new_password, confirm) = match (
            non_blank(&req.email),
            non_blank(&req.otp),
            req.new_password.as_deref().filter(|p| !p.is_empty()),
            req.confirm_password.as_deref().filter(|p| !p.is_empty()),
        ) {
            (Some(e), Some(o), Some(p), Some(c)) => (normalize_email(e), o, p, c),
            _ => {
                return Err(HorooError::InvalidInput(
                    "Email, OTP, newPassword and confirmPassword are required".to_string(),
                ))
            }
        };

        if new_password != confirm {
            return Err(HorooError::InvalidInput("Passwords do not match".to_string()));
        }
        if (new_password.chars().count() as u64) < MIN_PASSWORD_LEN {
            return Err(HorooError::InvalidInput(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }

        let account = Self::account(pool, table, &email).await?;
        check_otp(&account, otp, Utc::now())?;

        let hash = hash_password(new_password)?;
        CredentialRepository::replace_password(pool, table, account.id, &hash).await?;

        log::info!("Password reset completed for {}", email);
        Ok(())
    }

    async fn account(
        pool: &PgPool,
        table: AccountTable,
        email: &str,
    ) -> Result<CredentialRecord, HorooError> {
        CredentialRepository::find_by_email(pool, table, email)
            .await?
            .ok_or_else(|| HorooError::NotFound("No account found with this email".to_string()))
    }
}

/// The stored OTP must match and must not have expired
fn check_otp(account: &CredentialRecord, otp: &str, now: DateTime<Utc>) -> Result<(), HorooError> {
    match (&account.otp, account.otp_expiry) {
        (Some(stored), Some(expiry)) if stored == otp => {
            if expiry < now {
                Err(HorooError::InvalidInput(
                    "OTP has expired. Please request a new one.".to_string(),
                ))
            } else {
                Ok(())
            }
        }
        _ => Err(HorooError::InvalidInput("Invalid OTP".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(otp: Option<&str>, expiry: Option<DateTime<Utc>>) -> CredentialRecord {
        CredentialRecord {
            id: Uuid::new_v4(),
            password_hash: Some("$argon2id$...".into()),
            google_id: None,
            otp: otp.map(str::to_string),
            otp_expiry: expiry,
        }
    }

    #[test]
    fn test_matching_otp_within_ttl() {
        let now = Utc::now();
        let account = record(Some("123456"), Some(now + Duration::minutes(5)));
        assert!(check_otp(&account, "123456", now).is_ok());
    }

    #[test]
    fn test_wrong_otp() {
        let now = Utc::now();
        let account = record(Some("123456"), Some(now + Duration::minutes(5)));
        let err = check_otp(&account, "654321", now).unwrap_err();
        assert_eq!(err.to_string(), "Invalid OTP");
    }

    #[test]
    fn test_expired_otp() {
        let now = Utc::now();
        let account = record(Some("123456"), Some(now - Duration::seconds(1)));
        let err = check_otp(&account, "123456", now).unwrap_err();
        assert!(err.to_string().starts_with("OTP has expired"));
    }

    #[test]
    fn test_no_otp_issued() {
        let account = record(None, None);
        assert!(check_otp(&account, "123456", Utc::now()).is_err());
    }
}
