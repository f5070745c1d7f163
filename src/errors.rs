// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum HorooError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("{0}")]
    ExternalApiError(String),

    #[error("Too many requests, please try again later")]
    RateLimitExceeded,
}

impl HorooError {
    /// Machine-readable code included in every error body
    pub fn code(&self) -> &'static str {
        match self {
            HorooError::NotFound(_) => "NOT_FOUND",
            HorooError::AlreadyExists(_) => "ALREADY_EXISTS",
            HorooError::DatabaseError(_) => "DATABASE_ERROR",
            HorooError::InvalidInput(_) => "INVALID_INPUT",
            HorooError::ValidationError(_) => "VALIDATION_ERROR",
            HorooError::Unauthorized(_) => "UNAUTHORIZED",
            HorooError::Forbidden(_) => "FORBIDDEN",
            HorooError::InternalError(_) => "INTERNAL_ERROR",
            HorooError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            HorooError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

impl From<validator::ValidationErrors> for HorooError {
    fn from(errors: validator::ValidationErrors) -> Self {
        HorooError::ValidationError(errors.to_string())
    }
}

/// Convert HorooError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and the JSON envelope
/// shared with successful responses (`success: false`)
impl ResponseError for HorooError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "success": false,
            "message": self.to_string(),
            "error": {
                "code": self.code(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            HorooError::NotFound(_) => StatusCode::NOT_FOUND,
            HorooError::AlreadyExists(_) => StatusCode::CONFLICT,
            HorooError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HorooError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            HorooError::ValidationError(_) => StatusCode::BAD_REQUEST,
            HorooError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HorooError::Forbidden(_) => StatusCode::FORBIDDEN,
            HorooError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HorooError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            HorooError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

/// True when a sqlx error is a unique-constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            HorooError::NotFound("Room not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HorooError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HorooError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            HorooError::ExternalApiError("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            HorooError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn test_error_body_envelope() {
        let err = HorooError::NotFound("State not found".to_string());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "State not found");
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert!(body["error"]["timestamp"].is_string());
    }

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
