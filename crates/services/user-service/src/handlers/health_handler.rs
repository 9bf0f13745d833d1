//! Health check and informational handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;

use common::ApiResponse;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage: StorageHealth,
}

/// Backing store health with optional error message.
#[derive(Debug, Serialize)]
pub struct StorageHealth {
    pub backend: &'static str,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check).fallback(method_not_allowed))
}

/// Health check endpoint - verifies database connectivity when one is wired in.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let storage = match &state.database {
        Some(db) => match db.ping().await {
            Ok(()) => StorageHealth {
                backend: "postgres",
                status: "healthy".to_string(),
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                StorageHealth {
                    backend: "postgres",
                    status: "unhealthy".to_string(),
                    error: Some("database unreachable".to_string()),
                }
            }
        },
        None => StorageHealth {
            backend: "memory",
            status: "healthy".to_string(),
            error: None,
        },
    };

    let healthy = storage.status == "healthy";
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        storage,
    };

    if healthy {
        ApiResponse::success(response).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error_with_data(
                "SERVICE_UNAVAILABLE",
                "Storage backend is unhealthy",
                response,
            )),
        )
            .into_response()
    }
}

/// API root: service name and version.
pub async fn api_root(State(state): State<AppState>) -> ApiResponse<serde_json::Value> {
    ApiResponse::with_message(
        json!({
            "service": state.config.service.service_name,
            "version": env!("CARGO_PKG_VERSION"),
        }),
        "User Service API",
    )
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("NOT_FOUND", "Endpoint not found")),
    )
        .into_response()
}

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::error(
            "METHOD_NOT_ALLOWED",
            "Method not allowed",
        )),
    )
        .into_response()
}
