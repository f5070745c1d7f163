// src/db/user_repository.rs
// DOCUMENTATION: End-user account queries

use crate::errors::{is_unique_violation, HorooError};
use crate::models::{UpdateUserProfileRequest, User};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = r#"
    id, name, email, mobile, password_hash, google_id, profile_picture,
    otp, otp_expiry, is_active, last_login, created_at, updated_at
"#;

pub struct UserRepository;

fn db_error(action: &str, e: sqlx::Error) -> HorooError {
    log::error!("Failed to {}: {}", action, e);
    HorooError::DatabaseError(e.to_string())
}

impl UserRepository {
    pub async fn create(
        pool: &PgPool,
        name: &str,
        email: &str,
        mobile: &str,
        password_hash: &str,
    ) -> Result<User, HorooError> {
        let sql = format!(
            r#"
            INSERT INTO users (name, email, mobile, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .bind(email)
            .bind(mobile)
            .bind(password_hash)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    HorooError::InvalidInput("User with this email already exists".to_string())
                } else {
                    db_error("create user", e)
                }
            })
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, HorooError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("fetch user", e))
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, HorooError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("fetch user by email", e))
    }

    pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<(), HorooError> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| db_error("stamp user login", e))?;
        Ok(())
    }

    pub async fn complete_profile(
        pool: &PgPool,
        id: Uuid,
        name: &str,
        mobile: &str,
    ) -> Result<Option<User>, HorooError> {
        let sql = format!(
            r#"
            UPDATE users SET name = $2, mobile = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(name)
            .bind(mobile)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("complete user profile", e))
    }

    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        changes: &UpdateUserProfileRequest,
    ) -> Result<Option<User>, HorooError> {
        let sql = format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                mobile = COALESCE($3, mobile),
                profile_picture = COALESCE($4, profile_picture),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.mobile)
            .bind(&changes.profile_picture)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("update user profile", e))
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, HorooError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("list users", e))
    }

    pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<Option<User>, HorooError> {
        let sql = format!(
            "UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("deactivate user", e))
    }
}
