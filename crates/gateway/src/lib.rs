//! API Gateway Library
//!
//! This crate provides the HTTP REST API over the registration collection:
//! the public signup form posts here, and the admin dashboard reads, edits,
//! checks in and exports registrations through it.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod views;

use std::net::SocketAddr;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use registration_service_lib::RegistrationService;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Router over an already-built registration service, with request tracing.
pub fn app(service: RegistrationService) -> Router {
    let state = AppState::new(service);
    create_router(state).layer(TraceLayer::new_for_http())
}

/// Run the gateway as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env();
    config.host = host.to_string();
    config.port = port;

    run_server_with_config(config).await
}

/// Run the HTTP server with the given configuration.
pub async fn run_server_with_config(
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = RegistrationService::from_config(&config.registrations)?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app = app(service);

    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
