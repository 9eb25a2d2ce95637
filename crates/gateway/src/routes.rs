//! Route configuration.

use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use domain::PROGRAM_NAME;

use crate::handlers::{health_routes, registration_routes, report_routes};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/registrations", registration_routes())
        .nest("/reports", report_routes())
        .with_state(state)
}

async fn welcome() -> String {
    format!("{} registration service", PROGRAM_NAME)
}
