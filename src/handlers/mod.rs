// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components and shared extractor configuration

pub mod auth;
pub mod extractors;
pub mod health;
pub mod listings;
pub mod locations;
pub mod owners;
pub mod requests;
pub mod reviews;
pub mod users;

pub use auth::config as auth_config;
pub use health::config as health_config;
pub use listings::config as listings_config;
pub use locations::config as locations_config;
pub use owners::config as owners_config;
pub use requests::config as requests_config;
pub use reviews::config as reviews_config;
pub use users::config as users_config;

use crate::errors::HorooError;
use actix_web::web;

/// JSON body extractor settings; malformed bodies become 400s in the error envelope
pub fn json_config(limit_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit_bytes)
        .error_handler(|err, req| {
            log::warn!("Rejected JSON body on {}: {}", req.path(), err);
            HorooError::InvalidInput(format!("Invalid request body: {}", err)).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        HorooError::InvalidInput(format!("Invalid query parameters: {}", err)).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        HorooError::InvalidInput(format!("Invalid path parameter: {}", err)).into()
    })
}

/// Every route served under /api
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(listings_config)
        .configure(locations_config)
        .configure(reviews_config)
        .configure(owners_config)
        .configure(users_config)
        .configure(auth_config)
        .configure(requests_config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::auth::{issue_token, Role};
    use actix_web::{http::StatusCode, test, App};
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    macro_rules! test_app {
        ($config:expr) => {{
            let config = $config;
            let pool = PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(pool))
                    .app_data(web::Data::new(config))
                    .app_data(json_config(1024 * 1024))
                    .app_data(query_config())
                    .app_data(path_config())
                    .configure(health_config)
                    .service(web::scope("/api").configure(api_config)),
            )
            .await
        }};
    }

    async fn body_json(resp: actix_web::dev::ServiceResponse) -> serde_json::Value {
        let bytes = test::read_body(resp).await;
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test_app!(Config::for_tests());
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "horoo-listings");
    }

    #[actix_web::test]
    async fn test_admin_route_without_token() {
        let app = test_app!(Config::for_tests());
        let req = test::TestRequest::get().uri("/api/reviews").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Access denied. No token provided.");
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[actix_web::test]
    async fn test_wrong_admin_token_is_forbidden() {
        let app = test_app!(Config::for_tests());
        let req = test::TestRequest::get()
            .uri("/api/owner/all")
            .insert_header(("X-Admin-Token", "not-the-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body = body_json(resp).await;
        assert_eq!(body["message"], "Invalid admin token");
    }

    #[actix_web::test]
    async fn test_admin_token_disabled_when_empty() {
        let mut config = Config::for_tests();
        config.admin_token = String::new();
        let app = test_app!(config);
        let req = test::TestRequest::get()
            .uri("/api/requests")
            .insert_header(("X-Admin-Token", ""))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_invalid_bearer_token() {
        let app = test_app!(Config::for_tests());
        let req = test::TestRequest::get()
            .uri("/api/my-reviews")
            .insert_header(("Authorization", "Bearer garbage.token.value"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(resp).await;
        assert_eq!(body["message"], "Invalid token.");
    }

    #[actix_web::test]
    async fn test_token_signed_with_other_secret() {
        let app = test_app!(Config::for_tests());
        let token = issue_token(Uuid::new_v4(), Role::User, "another-secret", 1).unwrap();
        let req = test::TestRequest::get()
            .uri("/api/my-reviews")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_user_token_on_admin_route() {
        let config = Config::for_tests();
        let token = issue_token(Uuid::new_v4(), Role::User, &config.jwt_secret, 1).unwrap();
        let app = test_app!(config);
        let req = test::TestRequest::get()
            .uri("/api/user/all")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body = body_json(resp).await;
        assert_eq!(body["message"], "Access denied. admin account required.");
    }

    #[actix_web::test]
    async fn test_owner_token_on_user_route() {
        let config = Config::for_tests();
        let token = issue_token(Uuid::new_v4(), Role::Owner, &config.jwt_secret, 1).unwrap();
        let app = test_app!(config);
        let req = test::TestRequest::post()
            .uri("/api/review")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(serde_json::json!({"propertyType": "room", "rating": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_malformed_path_uuid() {
        let app = test_app!(Config::for_tests());
        let req = test::TestRequest::get()
            .uri("/api/reviews/room/not-a-uuid")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[actix_web::test]
    async fn test_malformed_json_body() {
        let app = test_app!(Config::for_tests());
        let req = test::TestRequest::post()
            .uri("/api/listing-requests")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_collection_routes_accept_trailing_slash() {
        let app = test_app!(Config::for_tests());
        for uri in ["/api/requests/", "/api/listing-requests/"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }

        let req = test::TestRequest::post()
            .uri("/api/listing-requests/")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unknown_route() {
        let app = test_app!(Config::for_tests());
        let req = test::TestRequest::get().uri("/api/nothing-here").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
