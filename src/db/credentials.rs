// src/db/credentials.rs
// DOCUMENTATION: OTP and password columns shared by owners and users
// PURPOSE: Password-reset storage without duplicating queries per account table

use crate::errors::HorooError;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Account tables that support password reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountTable {
    Owners,
    Users,
}

impl AccountTable {
    fn table(&self) -> &'static str {
        match self {
            AccountTable::Owners => "owners",
            AccountTable::Users => "users",
        }
    }

    /// Owners never sign in through Google
    fn google_column(&self) -> &'static str {
        match self {
            AccountTable::Owners => "NULL::text",
            AccountTable::Users => "google_id",
        }
    }
}

/// Credential state of one account
#[derive(Debug, Clone, FromRow)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub otp: Option<String>,
    pub otp_expiry: Option<DateTime<Utc>>,
}

pub struct CredentialRepository;

impl CredentialRepository {
    pub async fn find_by_email(
        pool: &PgPool,
        table: AccountTable,
        email: &str,
    ) -> Result<Option<CredentialRecord>, HorooError> {
        let sql = format!(
            "SELECT id, password_hash, {} AS google_id, otp, otp_expiry FROM {} WHERE email = $1",
            table.google_column(),
            table.table()
        );
        sqlx::query_as::<_, CredentialRecord>(&sql)
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch credentials from {}: {}", table.table(), e);
                HorooError::DatabaseError(e.to_string())
            })
    }

    pub async fn store_otp(
        pool: &PgPool,
        table: AccountTable,
        id: Uuid,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), HorooError> {
        let sql = format!(
            "UPDATE {} SET otp = $2, otp_expiry = $3, updated_at = NOW() WHERE id = $1",
            table.table()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(otp)
            .bind(expires_at)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to store OTP in {}: {}", table.table(), e);
                HorooError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }

    /// Store a new password hash and clear the OTP
    pub async fn replace_password(
        pool: &PgPool,
        table: AccountTable,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), HorooError> {
        let sql = format!(
            r#"
            UPDATE {} SET password_hash = $2, otp = NULL, otp_expiry = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
            table.table()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to reset password in {}: {}", table.table(), e);
                HorooError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }
}
