// src/db/admin_repository.rs
// DOCUMENTATION: Master admin account queries

use crate::errors::{is_unique_violation, HorooError};
use crate::models::MasterAdmin;
use sqlx::PgPool;
use uuid::Uuid;

pub struct AdminRepository;

impl AdminRepository {
    pub async fn count(pool: &PgPool) -> Result<i64, HorooError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM master_admins")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to count admins: {}", e);
                HorooError::DatabaseError(e.to_string())
            })?;
        Ok(row.0)
    }

    pub async fn create(
        pool: &PgPool,
        name: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<MasterAdmin, HorooError> {
        sqlx::query_as::<_, MasterAdmin>(
            r#"
            INSERT INTO master_admins (name, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, username, password_hash, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(username)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                HorooError::InvalidInput("Username already exists".to_string())
            } else {
                log::error!("Failed to create admin: {}", e);
                HorooError::DatabaseError(e.to_string())
            }
        })
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<MasterAdmin>, HorooError> {
        sqlx::query_as::<_, MasterAdmin>(
            r#"
            SELECT id, name, username, password_hash, created_at, updated_at
            FROM master_admins WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch admin: {}", e);
            HorooError::DatabaseError(e.to_string())
        })
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, HorooError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM master_admins WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await
                .map_err(|e| {
                    log::error!("Failed to check admin: {}", e);
                    HorooError::DatabaseError(e.to_string())
                })?;
        Ok(row.0)
    }
}
