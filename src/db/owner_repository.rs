// src/db/owner_repository.rs
// DOCUMENTATION: Owner account queries

use crate::errors::{is_unique_violation, HorooError};
use crate::models::{Owner, UpdateOwnerProfileRequest};
use sqlx::PgPool;
use uuid::Uuid;

const OWNER_COLUMNS: &str = r#"
    id, name, email, mobile, password_hash, otp, otp_expiry, is_verified_owner,
    address, state, city, pincode, alternate_number, is_active, last_login,
    created_at, updated_at
"#;

/// Values for a new owner row
#[derive(Debug, Clone)]
pub struct NewOwner {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub alternate_number: Option<String>,
}

pub struct OwnerRepository;

fn db_error(action: &str, e: sqlx::Error) -> HorooError {
    log::error!("Failed to {}: {}", action, e);
    HorooError::DatabaseError(e.to_string())
}

impl OwnerRepository {
    pub async fn create(pool: &PgPool, new: &NewOwner) -> Result<Owner, HorooError> {
        let sql = format!(
            r#"
            INSERT INTO owners (
                name, email, mobile, password_hash,
                address, state, city, pincode, alternate_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            OWNER_COLUMNS
        );

        sqlx::query_as::<_, Owner>(&sql)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.mobile)
            .bind(&new.password_hash)
            .bind(&new.address)
            .bind(&new.state)
            .bind(&new.city)
            .bind(&new.pincode)
            .bind(&new.alternate_number)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    HorooError::InvalidInput(
                        "Owner with this email or mobile number already exists".to_string(),
                    )
                } else {
                    db_error("create owner", e)
                }
            })
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Owner>, HorooError> {
        let sql = format!("SELECT {} FROM owners WHERE id = $1", OWNER_COLUMNS);
        sqlx::query_as::<_, Owner>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("fetch owner", e))
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Owner>, HorooError> {
        let sql = format!("SELECT {} FROM owners WHERE email = $1", OWNER_COLUMNS);
        sqlx::query_as::<_, Owner>(&sql)
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("fetch owner by email", e))
    }

    pub async fn find_by_mobile(pool: &PgPool, mobile: &str) -> Result<Option<Owner>, HorooError> {
        let sql = format!("SELECT {} FROM owners WHERE mobile = $1", OWNER_COLUMNS);
        sqlx::query_as::<_, Owner>(&sql)
            .bind(mobile)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("fetch owner by mobile", e))
    }

    /// Login lookup: matches the lower-cased email or the raw mobile
    pub async fn find_by_email_or_mobile(
        pool: &PgPool,
        email: &str,
        mobile: &str,
    ) -> Result<Option<Owner>, HorooError> {
        let sql = format!(
            "SELECT {} FROM owners WHERE email = $1 OR mobile = $2 LIMIT 1",
            OWNER_COLUMNS
        );
        sqlx::query_as::<_, Owner>(&sql)
            .bind(email)
            .bind(mobile)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("fetch owner for login", e))
    }

    pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<(), HorooError> {
        sqlx::query("UPDATE owners SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| db_error("stamp owner login", e))?;
        Ok(())
    }

    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        changes: &UpdateOwnerProfileRequest,
    ) -> Result<Option<Owner>, HorooError> {
        let sql = format!(
            r#"
            UPDATE owners SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                state = COALESCE($4, state),
                city = COALESCE($5, city),
                pincode = COALESCE($6, pincode),
                alternate_number = COALESCE($7, alternate_number),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            OWNER_COLUMNS
        );

        sqlx::query_as::<_, Owner>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.address)
            .bind(&changes.state)
            .bind(&changes.city)
            .bind(&changes.pincode)
            .bind(&changes.alternate_number)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("update owner profile", e))
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Owner>, HorooError> {
        let sql = format!("SELECT {} FROM owners ORDER BY created_at DESC", OWNER_COLUMNS);
        sqlx::query_as::<_, Owner>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("list owners", e))
    }

    pub async fn set_verified(pool: &PgPool, id: Uuid) -> Result<Option<Owner>, HorooError> {
        let sql = format!(
            "UPDATE owners SET is_verified_owner = TRUE, updated_at = NOW() WHERE id = $1 RETURNING {}",
            OWNER_COLUMNS
        );
        sqlx::query_as::<_, Owner>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("verify owner", e))
    }

    pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<Option<Owner>, HorooError> {
        let sql = format!(
            "UPDATE owners SET is_active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING {}",
            OWNER_COLUMNS
        );
        sqlx::query_as::<_, Owner>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("deactivate owner", e))
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, HorooError> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM owners WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(|e| db_error("check owner", e))?;
        Ok(row.0)
    }
}
