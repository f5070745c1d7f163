// src/services/auth.rs
// DOCUMENTATION: Credential primitives
// PURPOSE: Argon2 password hashing, HS256 bearer tokens and OTP generation

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::HorooError;

/// Account type carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Owner,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Owner => "owner",
            Role::Admin => "admin",
        };
        f.write_str(s)
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String, HorooError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Failed to hash password: {}", e);
            HorooError::InternalError("Error while hashing password".to_string())
        })
}

/// False for a wrong password; an unreadable stored hash is an error
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, HorooError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        log::error!("Stored password hash is malformed: {}", e);
        HorooError::InternalError("Invalid password hash format".to_string())
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn issue_token(
    subject: Uuid,
    role: Role,
    secret: &str,
    expires_in_days: i64,
) -> Result<String, HorooError> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject,
        role,
        iat: now.timestamp(),
        exp: (now + Duration::days(expires_in_days)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        log::error!("Failed to sign token: {}", e);
        HorooError::InternalError("Failed to create token".to_string())
    })
}

/// Decode and validate a bearer token (HS256, `exp` checked)
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, HorooError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            HorooError::Unauthorized("Token expired. Please login again.".to_string())
        }
        _ => HorooError::Unauthorized("Invalid token.".to_string()),
    })
}

/// Six-digit one-time password
pub fn generate_otp() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(100000..=999999))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(verify_password("secret123", "plain-text").is_err());
    }

    #[test]
    fn test_token_claims() {
        let id = Uuid::new_v4();
        let token = issue_token(id, Role::Owner, SECRET, 90).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Owner);
        assert!(claims.exp - claims.iat >= 90 * 24 * 3600 - 1);
    }

    #[test]
    fn test_expired_token() {
        let token = issue_token(Uuid::new_v4(), Role::User, SECRET, -1).unwrap();
        match decode_token(&token, SECRET) {
            Err(HorooError::Unauthorized(msg)) => assert_eq!(msg, "Token expired. Please login again."),
            other => panic!("expected expiry error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue_token(Uuid::new_v4(), Role::Admin, SECRET, 1).unwrap();
        match decode_token(&token, "other-secret") {
            Err(HorooError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token."),
            other => panic!("expected invalid token, got {:?}", other),
        }
        assert!(decode_token("not-a-jwt", SECRET).is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
        assert_eq!(Role::Owner.to_string(), "owner");
    }

    #[test]
    fn test_generate_otp() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
            assert!(!otp.starts_with('0'));
        }
    }
}
