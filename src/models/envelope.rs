// src/models/envelope.rs
// DOCUMENTATION: Success envelope shared by every endpoint
// PURPOSE: `{success, message?, count?, token?, data?}` response body

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            count: None,
            token: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl ApiResponse<()> {
    /// Envelope carrying only a message
    pub fn message_only(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            count: None,
            token: None,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_skips_absent_fields() {
        let body = serde_json::to_value(ApiResponse::ok(vec![1, 2]).with_count(2)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"], serde_json::json!([1, 2]));
        assert!(body.get("message").is_none());
        assert!(body.get("token").is_none());
    }

    #[test]
    fn test_message_only() {
        let body = serde_json::to_value(ApiResponse::message_only("Review deleted")).unwrap();
        assert_eq!(body["message"], "Review deleted");
        assert!(body.get("data").is_none());
    }
}
