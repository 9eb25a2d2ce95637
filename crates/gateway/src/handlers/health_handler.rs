//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub store: StoreHealth,
}

/// Record store health with optional error message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreHealth {
    pub backend: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint - verifies the record store can be read.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Store readable", body = HealthResponse),
        (status = 503, description = "Store unreadable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let store = match state.store.fetch().await {
        Ok(_) => StoreHealth {
            backend: state.store.backend().to_string(),
            status: "healthy".to_string(),
            error: None,
        },
        Err(e) => StoreHealth {
            backend: state.store.backend().to_string(),
            status: "unhealthy".to_string(),
            error: Some(e.to_string()),
        },
    };

    let healthy = store.status == "healthy";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        store,
    };

    if healthy {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}
