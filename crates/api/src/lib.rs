//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - The upload endpoints (direct multipart and SharePoint references)
//! - Request-level error responses
//! - The tower middleware stack (tracing, CORS, body limit, panic guard)

pub mod routes;

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::Response;
use ferry_shared::{AppConfig, AppError};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Pooled HTTP client for Azure and Microsoft Graph.
    pub http: reqwest::Client,
}

impl AppState {
    /// Create state with a fresh HTTP client.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.server.max_body_size).unwrap_or(usize::MAX);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .with_state(state)
}

#[allow(clippy::needless_pass_by_value)]
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %message, "Request handler panicked");

    routes::error_response(&AppError::internal("An unexpected error occurred"))
}
