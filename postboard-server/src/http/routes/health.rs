//! Welcome and health check endpoints
//!
//! Neither touches the store, so both answer even when it is unconfigured.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use super::common::MessageResponse;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /
async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the postboard API!"))
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
}
