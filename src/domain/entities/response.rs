use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Standard response envelope shared by every endpoint outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            timestamp: Utc::now(),
            details: None,
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            message: message.into(),
            timestamp: Utc::now(),
            details: None,
            data: None,
        }
    }

    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    pub fn with_data(mut self, data: impl Serialize) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_carries_data_and_omits_details() {
        let body = serde_json::to_value(
            ApiResponse::success("Thank you").with_data(json!({"id": "abc123"})),
        )
        .unwrap();

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!("Thank you"));
        assert_eq!(body["data"]["id"], json!("abc123"));
        assert!(body.get("details").is_none());
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn failure_envelope_carries_details_and_omits_data() {
        let body = serde_json::to_value(
            ApiResponse::failure("Validation failed")
                .with_details(json!([{"field": "email", "message": "Email is required"}])),
        )
        .unwrap();

        assert_eq!(body["success"], json!(false));
        assert_eq!(body["details"][0]["field"], json!("email"));
        assert!(body.get("data").is_none());
    }
}
