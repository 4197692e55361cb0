//! Health check endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Primary storage tier: `blob` when a connection string is set.
    pub storage: &'static str,
    /// `configured`, `mock` (no credentials) or `incomplete` (partial set).
    pub sharepoint: &'static str,
}

/// Reports configured modes only; never calls Azure or Graph.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = &state.config;
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        storage: if config.storage.is_remote_configured() {
            "blob"
        } else {
            "local"
        },
        sharepoint: if config.sharepoint.is_complete() {
            "configured"
        } else if config.sharepoint.is_absent() {
            "mock"
        } else {
            "incomplete"
        },
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
