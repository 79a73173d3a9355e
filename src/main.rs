// ==============================================================================
// main.rs - Bearer Authentication Gateway Entry Point
// ==============================================================================
// Description: Axum web server fronting downstream services with bearer auth
// Author: Matt Barham
// Created: 2026-02-10
// Modified: 2026-03-05
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};

mod handlers;
mod middleware;
mod models;
mod state;
mod verifier;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    info!("Starting Bearer Authentication Gateway v1.0.0");

    // Load environment variables
    dotenvy::dotenv().ok();

    let server_port: u16 = std::env::var("GATEWAY_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .context("GATEWAY_PORT must be a valid port number")?;

    // Initialize application state
    let state = AppState::new().context("Failed to initialize application state")?;

    // Build router with all endpoints
    let app = build_router(state);

    // Bind server
    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    info!("Authentication gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    // Configure CORS
    // Origins are configured via CORS_ALLOWED_ORIGINS env var (comma-separated)
    let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let allowed_origins: Vec<_> = cors_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_credentials(false)
        .allow_methods([Method::GET, Method::OPTIONS])
        // Authorization must be allowed through for authenticated calls
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(handlers::root))
        // Health check under the public prefix, exempt from authentication
        .route("/public/health", get(handlers::health_check))
        .route("/api/me", get(handlers::whoami))
        .layer(
            ServiceBuilder::new()
                // Request tracing
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                // Bearer authentication for everything outside the public prefix
                .layer(axum_middleware::from_fn_with_state(
                    state.clone(),
                    middleware::auth::auth_gate,
                )),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::testing::ScriptedVerifier;

    #[test]
    fn test_router_builds() {
        // Smoke test to ensure router compiles
        let state = AppState::mock(ScriptedVerifier::allowing(1));
        let _router = build_router(state);
    }
}
