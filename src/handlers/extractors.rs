// src/handlers/extractors.rs
// DOCUMENTATION: Request guards for bearer tokens and the admin token
// PURPOSE: Resolve the caller once, before the handler body runs

use crate::config::Config;
use crate::db::{AdminRepository, OwnerRepository, UserRepository};
use crate::errors::HorooError;
use crate::models::{Owner, User};
use crate::services::auth::{decode_token, Claims, Role};
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use uuid::Uuid;

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Token after `Bearer `, if any
fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn app_config(req: &HttpRequest) -> Result<web::Data<Config>, HorooError> {
    req.app_data::<web::Data<Config>>()
        .cloned()
        .ok_or_else(|| HorooError::InternalError("Configuration not available".to_string()))
}

fn app_pool(req: &HttpRequest) -> Result<web::Data<PgPool>, HorooError> {
    req.app_data::<web::Data<PgPool>>()
        .cloned()
        .ok_or_else(|| HorooError::InternalError("Database pool not available".to_string()))
}

/// Decode the bearer token and require the given role
fn claims_for(req: &HttpRequest, config: &Config, role: Role) -> Result<Claims, HorooError> {
    let token = bearer_token(req).ok_or_else(|| {
        HorooError::Unauthorized("Access denied. No token provided.".to_string())
    })?;
    let claims = decode_token(&token, &config.jwt_secret)?;

    if claims.role != role {
        log::warn!(
            "{} token used on a {} route for {}",
            claims.role,
            role,
            req.path()
        );
        return Err(HorooError::Forbidden(format!(
            "Access denied. {} account required.",
            role
        )));
    }
    Ok(claims)
}

fn deactivated() -> HorooError {
    HorooError::Forbidden("Your account has been deactivated.".to_string())
}

/// Signed-in end user
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = HorooError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let config = app_config(&req)?;
            let claims = claims_for(&req, &config, Role::User)?;
            let pool = app_pool(&req)?;

            let user = UserRepository::find_by_id(pool.get_ref(), claims.sub)
                .await?
                .ok_or_else(|| HorooError::Unauthorized("Invalid token. User not found.".to_string()))?;
            if !user.is_active {
                return Err(deactivated());
            }
            Ok(AuthenticatedUser(user))
        })
    }
}

/// Signed-in property owner
pub struct AuthenticatedOwner(pub Owner);

impl FromRequest for AuthenticatedOwner {
    type Error = HorooError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let config = app_config(&req)?;
            let claims = claims_for(&req, &config, Role::Owner)?;
            let pool = app_pool(&req)?;

            let owner = OwnerRepository::find_by_id(pool.get_ref(), claims.sub)
                .await?
                .ok_or_else(|| HorooError::Unauthorized("Invalid token. Owner not found.".to_string()))?;
            if !owner.is_active {
                return Err(deactivated());
            }
            Ok(AuthenticatedOwner(owner))
        })
    }
}

/// Signed-in user id when a valid user token is present, otherwise None
pub struct OptionalUser(pub Option<Uuid>);

impl FromRequest for OptionalUser {
    type Error = HorooError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if bearer_token(req).is_none() {
            return Box::pin(async { Ok(OptionalUser(None)) });
        }

        let user = AuthenticatedUser::from_request(req, payload);
        Box::pin(async move {
            match user.await {
                Ok(AuthenticatedUser(user)) => Ok(OptionalUser(Some(user.id))),
                Err(e) => {
                    log::debug!("Ignoring unusable bearer token: {}", e);
                    Ok(OptionalUser(None))
                }
            }
        })
    }
}

/// Administrator, via the static admin token or an admin bearer token
#[derive(Debug, Clone, PartialEq)]
pub enum AdminAccess {
    StaticToken,
    Account(Uuid),
}

impl FromRequest for AdminAccess {
    type Error = HorooError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let config = app_config(&req)?;

            if let Some(token) = req
                .headers()
                .get(ADMIN_TOKEN_HEADER)
                .and_then(|h| h.to_str().ok())
            {
                if !config.admin_token.is_empty() && token == config.admin_token {
                    return Ok(AdminAccess::StaticToken);
                }
                log::warn!("Admin request with invalid token on {}", req.path());
                return Err(HorooError::Forbidden("Invalid admin token".to_string()));
            }

            let claims = claims_for(&req, &config, Role::Admin)?;
            let pool = app_pool(&req)?;
            if !AdminRepository::exists(pool.get_ref(), claims.sub).await? {
                return Err(HorooError::Unauthorized(
                    "Invalid token. Admin not found.".to_string(),
                ));
            }
            Ok(AdminAccess::Account(claims.sub))
        })
    }
}
