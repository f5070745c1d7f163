// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, media storage and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{CloudinaryClient, MediaStore, OtpLimiter};
use std::io;
use std::sync::Arc;

fn cors_for(config: &Config) -> Cors {
    config
        .cors_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-admin-token"),
        ])
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting horoo-listings service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if config.run_migrations {
        if let Err(e) = config::run_migrations(&pool).await {
            log::error!("Failed to apply migrations: {}", e);
            std::process::exit(1);
        }
    }

    // 5. Shared services
    let media: Arc<dyn MediaStore> = Arc::new(CloudinaryClient::from_config(&config));
    let media = web::Data::from(media);
    let otp_limiter = web::Data::new(OtpLimiter::new(config.otp_requests_per_minute));
    log::info!(
        "OTP requests limited to {} per email per minute",
        config.otp_requests_per_minute
    );

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let payload_limit = config.max_payload_mb * 1024 * 1024;
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(media.clone())
            .app_data(otp_limiter.clone())
            // Extractor settings
            .app_data(handlers::json_config(payload_limit))
            .app_data(handlers::query_config())
            .app_data(handlers::path_config())
            // Middleware
            .wrap(cors_for(&config_clone))
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .service(web::scope("/api").configure(handlers::api_config))
    })
    .bind(&server_addr)?
    .run()
    .await
}
