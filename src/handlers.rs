// ==============================================================================
// handlers.rs - API Request Handlers
// ==============================================================================
// Description: HTTP request handlers for gateway demo endpoints
// Author: Matt Barham
// Created: 2026-02-10
// Modified: 2026-03-05
// Version: 1.0.0
// ==============================================================================

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use thiserror::Error;
use tracing::error;

use crate::middleware::USER_ID_HEADER;
use crate::models::*;

/// Root endpoint - service information
pub async fn root() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "Bearer Authentication Gateway",
        version: "1.0.0",
        endpoints: vec![
            "/ - Service information (authenticated)",
            "/public/health - Health check (no auth)",
            "/api/me - Verified identity echo (authenticated)",
        ],
    })
}

/// Health check endpoint (public, bypasses authentication)
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: "1.0.0",
        timestamp: Utc::now(),
    })
}

/// Identity echo endpoint
///
/// Reads back the X-User-Id header the auth middleware injected. Every
/// request reaching this handler passed authentication, so a missing or
/// non-numeric header means the middleware wiring is broken, not that the
/// caller is unauthorized.
pub async fn whoami(headers: HeaderMap) -> Result<Json<WhoAmIResponse>, AppError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .ok_or_else(|| AppError::Internal("identity header missing after auth".to_string()))?;

    Ok(Json(WhoAmIResponse { user_id }))
}

/// Application error type
///
/// Unauthorized is not represented here: the auth middleware short-circuits
/// rejected requests with a bare 401 before any handler runs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

// ==============================================================================
// TESTS
// ==============================================================================
