//! Response envelope shared by every HTTP endpoint.

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Envelope status for a successful request
pub const STATUS_SUCCESS: &str = "success";

/// Envelope status for a failed request
pub const STATUS_ERROR: &str = "error";

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            code: None,
            message: None,
            data: Some(data),
            timestamp: Utc::now(),
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    /// Error envelope that still carries a payload (e.g. a health report)
    pub fn error_with_data(code: &'static str, message: impl Into<String>, data: T) -> Self {
        Self {
            status: STATUS_ERROR,
            code: Some(code),
            message: Some(message.into()),
            data: Some(data),
            timestamp: Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS,
            code: None,
            message: Some(message.into()),
            data: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            code: Some(code),
            message: Some(message.into()),
            data: None,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Created response helper for POST endpoints
pub struct Created<T: Serialize>(pub ApiResponse<T>);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_error_fields() {
        let json = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"], 42);
        assert!(json.get("code").is_none());
        assert!(json.get("message").is_none());
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn error_envelope_has_code_and_message() {
        let json = serde_json::to_value(ApiResponse::error("NOT_FOUND", "User not found")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "User not found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn error_envelope_can_carry_data() {
        let json =
            serde_json::to_value(ApiResponse::error_with_data("SERVICE_UNAVAILABLE", "down", 1))
                .unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
        assert_eq!(json["data"], 1);
    }
}
