// src/handlers/users.rs
// DOCUMENTATION: HTTP handlers under /user

use crate::config::Config;
use crate::db::AccountTable;
use crate::errors::HorooError;
use crate::handlers::extractors::{AdminAccess, AuthenticatedUser};
use crate::models::{
    ApiResponse, CompleteProfileRequest, ForgotPasswordRequest, RegisterUserRequest,
    ResetPasswordRequest, UpdateUserProfileRequest, UserLoginRequest, VerifyOtpRequest,
};
use crate::services::{OtpLimiter, PasswordResetService, UserService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

fn ensure_self(user_id: Uuid, path_id: Uuid) -> Result<(), HorooError> {
    if user_id == path_id {
        Ok(())
    } else {
        log::warn!("User {} tried to access profile {}", user_id, path_id);
        Err(HorooError::Forbidden("Access denied".to_string()))
    }
}

pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<RegisterUserRequest>,
) -> Result<impl Responder, HorooError> {
    let (token, user) = UserService::register(pool.get_ref(), &config, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(
        ApiResponse::ok(user)
            .with_token(token)
            .with_message("User registered successfully"),
    ))
}

pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<UserLoginRequest>,
) -> Result<impl Responder, HorooError> {
    let (token, user) = UserService::login(pool.get_ref(), &config, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(user)
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
        AccountTable::Users,
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(issued).with_message("OTP sent to your email")))
}

pub async fn verify_otp(
    pool: web::Data<PgPool>,
    body: web::Json<VerifyOtpRequest>,
) -> Result<impl Responder, HorooError> {
    PasswordResetService::verify_otp(pool.get_ref(), AccountTable::Users, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_only(
        "OTP verified successfully. You can now reset your password.",
    )))
}

pub async fn reset_password(
    pool: web::Data<PgPool>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<impl Responder, HorooError> {
    PasswordResetService::reset_password(pool.get_ref(), AccountTable::Users, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_only("Password reset successfully")))
}

/// PUT /user/complete-profile/{id}
pub async fn complete_profile(
    AuthenticatedUser(user): AuthenticatedUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    body: web::Json<CompleteProfileRequest>,
) -> Result<impl Responder, HorooError> {
    let id = path.into_inner();
    ensure_self(user.id, id)?;
    let updated = UserService::complete_profile(pool.get_ref(), id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(updated).with_message("Profile completed successfully")))
}

pub async fn get_profile(
    AuthenticatedUser(user): AuthenticatedUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HorooError> {
    let id = path.into_inner();
    ensure_self(user.id, id)?;
    let profile = UserService::profile(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}

pub async fn update_profile(
    AuthenticatedUser(user): AuthenticatedUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserProfileRequest>,
) -> Result<impl Responder, HorooError> {
    let id = path.into_inner();
    ensure_self(user.id, id)?;
    let updated = UserService::update_profile(pool.get_ref(), id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(updated).with_message("Profile updated successfully")))
}

pub async fn all_users(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, HorooError> {
    let users = UserService::all(pool.get_ref()).await?;
    let count = users.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(users).with_count(count)))
}

pub async fn deactivate_user(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HorooError> {
    let user = UserService::deactivate(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user).with_message("User deactivated successfully")))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/forgot-password", web::post().to(forgot_password))
            .route("/verify-otp", web::post().to(verify_otp))
            .route("/reset-password", web::post().to(reset_password))
            .route("/complete-profile/{id}", web::put().to(complete_profile))
            .service(
                web::resource("/profile/{id}")
                    .route(web::get().to(get_profile))
                    .route(web::put().to(update_profile)),
            )
            .route("/all", web::get().to(all_users))
            .route("/deactivate/{id}", web::put().to(deactivate_user)),
    );
}
