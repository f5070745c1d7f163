// src/handlers/auth.rs
// DOCUMENTATION: Master admin account handlers under /auth

use crate::config::Config;
use crate::errors::HorooError;
use crate::handlers::extractors::AdminAccess;
use crate::models::{AdminLoginRequest, ApiResponse, CreateMasterAdminRequest};
use crate::services::AdminService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// POST /auth/create-master-admin
/// Open until the first admin exists; afterwards an admin must call it
pub async fn create_master_admin(
    admin: Option<AdminAccess>,
    pool: web::Data<PgPool>,
    body: web::Json<CreateMasterAdminRequest>,
) -> Result<impl Responder, HorooError> {
    if admin.is_none() && AdminService::has_admins(pool.get_ref()).await? {
        log::warn!("Rejected master admin creation without admin credentials");
        return Err(HorooError::Forbidden(
            "Only an administrator can create another admin".to_string(),
        ));
    }

    let created = AdminService::create_master_admin(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(
        ApiResponse::ok(created).with_message("Master admin created successfully"),
    ))
}

/// POST /auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<AdminLoginRequest>,
) -> Result<impl Responder, HorooError> {
    let (token, admin) = AdminService::login(pool.get_ref(), &config, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(admin)
            .with_token(token)
            .with_message("Login successful"),
    ))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/create-master-admin", web::post().to(create_master_admin))
            .route("/login", web::post().to(login)),
    );
}
