// src/handlers/owners.rs
// DOCUMENTATION: HTTP handlers under /owner

use crate::config::Config;
use crate::db::AccountTable;
use crate::errors::HorooError;
use crate::handlers::extractors::{AdminAccess, AuthenticatedOwner};
use crate::models::{
    ApiResponse, ForgotPasswordRequest, OwnerLoginRequest, RegisterOwnerRequest,
    ResetPasswordRequest, UpdateOwnerProfileRequest, VerifyOtpRequest,
};
use crate::services::{OtpLimiter, OwnerService, PasswordResetService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// A profile route is only for the owner it names
fn ensure_self(owner_id: Uuid, path_id: Uuid) -> Result<(), HorooError> {
    if owner_id == path_id {
        Ok(())
    } else {
        log::warn!("Owner {} tried to access profile {}", owner_id, path_id);
        Err(HorooError::Forbidden("Access denied".to_string()))
    }
}

pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<RegisterOwnerRequest>,
) -> Result<impl Responder, HorooError> {
    let (token, owner) = OwnerService::register(pool.get_ref(), &config, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(
        ApiResponse::ok(owner)
            .with_token(token)
            .with_message("Owner registered successfully"),
    ))
}

pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<OwnerLoginRequest>,
) -> Result<impl Responder, HorooError> {
    let (token, owner) = OwnerService::login(pool.get_ref(), &config, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(owner)
            .with_token(token)
            .with_message("Login successful"),
    ))
}

pub async fn forgot_password(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<OtpLimiter>,
    body: web::Json<ForgotPasswordRequest>,
) -> Result<impl Responder, HorooError> {
    let issued = PasswordResetService::forgot_password(
        pool.get_ref(),
        &config,
        &limiter,
        AccountTable::Owners,
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(issued).with_message("OTP sent to your email")))
}

pub async fn verify_otp(
    pool: web::Data<PgPool>,
    body: web::Json<VerifyOtpRequest>,
) -> Result<impl Responder, HorooError> {
    PasswordResetService::verify_otp(pool.get_ref(), AccountTable::Owners, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_only(
        "OTP verified successfully. You can now reset your password.",
    )))
}

pub async fn reset_password(
    pool: web::Data<PgPool>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<impl Responder, HorooError> {
    PasswordResetService::reset_password(pool.get_ref(), AccountTable::Owners, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_only("Password reset successfully")))
}

/// GET /owner/profile/{id}
pub async fn get_profile(
    AuthenticatedOwner(owner): AuthenticatedOwner,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HorooError> {
    let id = path.into_inner();
    ensure_self(owner.id, id)?;
    let profile = OwnerService::profile(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}

/// PUT /owner/profile/{id}
pub async fn update_profile(
    AuthenticatedOwner(owner): AuthenticatedOwner,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOwnerProfileRequest>,
) -> Result<impl Responder, HorooError> {
    let id = path.into_inner();
    ensure_self(owner.id, id)?;
    let updated = OwnerService::update_profile(pool.get_ref(), id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(updated).with_message("Profile updated successfully")))
}

/// GET /owner/listings
pub async fn my_listings(
    AuthenticatedOwner(owner): AuthenticatedOwner,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, HorooError> {
    let listings = OwnerService::my_listings(pool.get_ref(), &owner).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(listings)))
}

pub async fn all_owners(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, HorooError> {
    let owners = OwnerService::all(pool.get_ref()).await?;
    let count = owners.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(owners).with_count(count)))
}

pub async fn verify_owner(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HorooError> {
    let owner = OwnerService::verify(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(owner).with_message("Owner verified successfully")))
}

pub async fn deactivate_owner(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HorooError> {
    let owner = OwnerService::deactivate(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(owner).with_message("Owner deactivated successfully")))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/owner")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/forgot-password", web::post().to(forgot_password))
            .route("/verify-otp", web::post().to(verify_otp))
            .route("/reset-password", web::post().to(reset_password))
            .service(
                web::resource("/profile/{id}")
                    .route(web::get().to(get_profile))
                    .route(web::put().to(update_profile)),
            )
            .route("/listings", web::get().to(my_listings))
            .route("/all", web::get().to(all_owners))
            .route("/verify/{id}", web::put().to(verify_owner))
            .route("/deactivate/{id}", web::put().to(deactivate_owner)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_access_is_self_only() {
        let id = Uuid::new_v4();
        assert!(ensure_self(id, id).is_ok());
        assert!(matches!(
            ensure_self(id, Uuid::new_v4()),
            Err(HorooError::Forbidden(_))
        ));
    }
}
