//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ferry_core::batch::BatchResult;
use ferry_shared::AppError;
use serde::Serialize;
use serde_json::json;

use crate::AppState;

pub mod health;
pub mod sharepoint;
pub mod uploads;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(uploads::routes())
        .merge(sharepoint::routes())
}

/// Body returned by both upload endpoints.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    /// Human-readable summary.
    pub message: String,
    /// Set when results were synthesized without contacting SharePoint.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub mock: bool,
    /// One entry per input unit, in input order.
    pub results: BatchResult,
}

impl BatchResponse {
    /// Wrap a processed batch.
    #[must_use]
    pub fn new(results: BatchResult) -> Self {
        Self {
            message: results.summary(),
            mock: false,
            results,
        }
    }

    /// Wrap synthesized results for an unconfigured SharePoint source.
    #[must_use]
    pub fn mock(results: BatchResult) -> Self {
        Self {
            message: format!(
                "SharePoint is not configured; returned mock results for {} file(s)",
                results.len()
            ),
            mock: true,
            results,
        }
    }
}

impl IntoResponse for BatchResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Render a request-level error as `{ "error", "details" }`.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "details": err.details(),
        })),
    )
        .into_response()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let response = error_response(&AppError::validation("bad"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = error_response(&AppError::PayloadTooLarge("big".into()));
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_batch_response_omits_mock_flag_when_false() {
        let body = serde_json::to_value(BatchResponse::new(BatchResult::default()))
            .expect("serialize");
        assert_eq!(body["message"], "Processed 0 file(s): 0 succeeded, 0 failed");
        assert!(body.get("mock").is_none());
        assert_eq!(body["results"], json!([]));
    }
}
