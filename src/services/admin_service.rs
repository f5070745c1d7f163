// src/services/admin_service.rs
// DOCUMENTATION: Master admin accounts

use crate::config::Config;
use crate::db::AdminRepository;
use crate::errors::HorooError;
use crate::models::de::non_blank;
use crate::models::{AdminLoginRequest, CreateMasterAdminRequest, MasterAdminResponse, MIN_PASSWORD_LEN};
use crate::services::auth::{hash_password, issue_token, verify_password, Role};
use sqlx::PgPool;

pub struct AdminService;

impl AdminService {
    /// Whether the bootstrap route is still open
    pub async fn has_admins(pool: &PgPool) -> Result<bool, HorooError> {
        Ok(AdminRepository::count(pool).await? > 0)
    }

    pub async fn create_master_admin(
        pool: &PgPool,
        req: CreateMasterAdminRequest,
    ) -> Result<MasterAdminResponse, HorooError> {
        let (name, username, password) = match (
            non_blank(&req.name),
            non_blank(&req.username),
            req.password.as_deref().filter(|p| !p.is_empty()),
        ) {
            (Some(n), Some(u), Some(p)) => (n, u.to_lowercase(), p),
            _ => {
                return Err(HorooError::InvalidInput(
                    "Name, username and password are required".to_string(),
                ))
            }
        };
        if (password.chars().count() as u64) < MIN_PASSWORD_LEN {
            return Err(HorooError::InvalidInput(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }

        let hash = hash_password(password)?;
        let admin = AdminRepository::create(pool, name, &username, &hash).await?;

        log::info!("Created master admin {}", admin.username);
        Ok(admin.to_response())
    }

    pub async fn login(
        pool: &PgPool,
        config: &Config,
        req: AdminLoginRequest,
    ) -> Result<(String, MasterAdminResponse), HorooError> {
        let (username, password) = match (
            non_blank(&req.username),
            req.password.as_deref().filter(|p| !p.is_empty()),
        ) {
            (Some(u), Some(p)) => (u.to_lowercase(), p),
            _ => {
                return Err(HorooError::InvalidInput(
                    "Username and password are required".to_string(),
                ))
            }
        };

        let admin = AdminRepository::find_by_username(pool, &username)
            .await?
            .ok_or_else(|| HorooError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(password, &admin.password_hash)? {
            log::warn!("Failed admin login for {}", username);
            return Err(HorooError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = issue_token(admin.id, Role::Admin, &config.jwt_secret, config.jwt_expires_in_days)?;
        Ok((token, admin.to_response()))
    }
}
