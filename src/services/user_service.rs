// src/services/user_service.rs
// DOCUMENTATION: End-user accounts

use crate::config::Config;
use crate::db::{RequestRepository, UserRepository};
use crate::errors::HorooError;
use crate::models::account::validate_mobile;
use crate::models::de::non_blank;
use crate::models::{
    normalize_email, CompleteProfileRequest, RegisterUserRequest, UpdateUserProfileRequest, User,
    UserLoginRequest, UserProfileResponse, UserResponse,
};
use crate::services::auth::{hash_password, issue_token, verify_password, Role};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct UserService;

impl UserService {
    pub async fn register(
        pool: &PgPool,
        config: &Config,
        req: RegisterUserRequest,
    ) -> Result<(String, UserResponse), HorooError> {
        let (name, email, mobile, password) = match (
            non_blank(&req.name),
            non_blank(&req.email),
            non_blank(&req.mobile),
            req.password.as_deref().filter(|p| !p.is_empty()),
            req.confirm_password.as_deref().filter(|p| !p.is_empty()),
        ) {
            (Some(n), Some(e), Some(m), Some(p), Some(_)) => (n, normalize_email(e), m, p),
            _ => {
                return Err(HorooError::InvalidInput(
                    "Please provide name, email, mobile, password and confirmPassword".to_string(),
                ))
            }
        };
        req.validate()?;

        if UserRepository::find_by_email(pool, &email).await?.is_some() {
            return Err(HorooError::InvalidInput(
                "User with this email already exists".to_string(),
            ));
        }

        let hash = hash_password(password)?;
        let user = UserRepository::create(pool, name, &email, mobile, &hash).await?;
        let token = issue_token(user.id, Role::User, &config.jwt_secret, config.jwt_expires_in_days)?;

        log::info!("Registered user {} ({})", user.id, user.email);
        Ok((token, user.to_response()))
    }

    pub async fn login(
        pool: &PgPool,
        config: &Config,
        req: UserLoginRequest,
    ) -> Result<(String, UserResponse), HorooError> {
        let (email, password) = match (
            non_blank(&req.email),
            req.password.as_deref().filter(|p| !p.is_empty()),
        ) {
            (Some(e), Some(p)) => (normalize_email(e), p),
            _ => {
                return Err(HorooError::InvalidInput(
                    "Please provide email and password".to_string(),
                ))
            }
        };

        let user = UserRepository::find_by_email(pool, &email)
            .await?
            .ok_or_else(invalid_credentials)?;

        let stored_hash = match &user.password_hash {
            Some(hash) => hash,
            None if user.google_id.is_some() => {
                return Err(HorooError::InvalidInput(
                    "This account uses Google Sign-In. Please login with Google.".to_string(),
                ))
            }
            None => return Err(invalid_credentials()),
        };

        if !user.is_active {
            return Err(HorooError::Forbidden(
                "Your account has been deactivated. Please contact support.".to_string(),
            ));
        }
        if !verify_password(password, stored_hash)? {
            log::warn!("Failed user login for {}", user.id);
            return Err(invalid_credentials());
        }

        UserRepository::touch_last_login(pool, user.id).await?;
        let token = issue_token(user.id, Role::User, &config.jwt_secret, config.jwt_expires_in_days)?;

        let mut response = user.to_response();
        response.last_login = Some(chrono::Utc::now());
        Ok((token, response))
    }

    /// Fill in name and mobile, typically after a Google sign-up
    pub async fn complete_profile(
        pool: &PgPool,
        id: Uuid,
        req: CompleteProfileRequest,
    ) -> Result<UserResponse, HorooError> {
        let (name, mobile) = match (non_blank(&req.name), non_blank(&req.mobile)) {
            (Some(n), Some(m)) => (n, m),
            _ => {
                return Err(HorooError::InvalidInput(
                    "Name and mobile are required".to_string(),
                ))
            }
        };
        validate_mobile(mobile).map_err(|_| {
            HorooError::ValidationError("Please provide a valid 10-digit mobile number".to_string())
        })?;

        UserRepository::complete_profile(pool, id, name, mobile)
            .await?
            .map(|u| u.to_response())
            .ok_or_else(user_not_found)
    }

    /// Profile with the booking requests the user filed
    pub async fn profile(pool: &PgPool, id: Uuid) -> Result<UserProfileResponse, HorooError> {
        let user = Self::get(pool, id).await?;
        let requests = RequestRepository::list_by_user(pool, user.id).await?;
        Ok(UserProfileResponse {
            user: user.to_response(),
            requests,
        })
    }

    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        changes: UpdateUserProfileRequest,
    ) -> Result<UserResponse, HorooError> {
        changes.validate()?;
        UserRepository::update_profile(pool, id, &changes)
            .await?
            .map(|u| u.to_response())
            .ok_or_else(user_not_found)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<User, HorooError> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(user_not_found)
    }

    pub async fn all(pool: &PgPool) -> Result<Vec<UserResponse>, HorooError> {
        let users = UserRepository::list_all(pool).await?;
        Ok(users.iter().map(User::to_response).collect())
    }

    pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<UserResponse, HorooError> {
        let user = UserRepository::deactivate(pool, id)
            .await?
            .ok_or_else(user_not_found)?;
        log::info!("User {} deactivated", id);
        Ok(user.to_response())
    }
}

fn invalid_credentials() -> HorooError {
    HorooError::Unauthorized("Invalid credentials".to_string())
}

fn user_not_found() -> HorooError {
    HorooError::NotFound("User not found".to_string())
}
