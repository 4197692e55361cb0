//! SharePoint reference upload route.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::post,
};
use ferry_core::batch::{BatchResult, UploadBatch};
use ferry_core::source::{ExternalFileReference, SourceResolver};
use ferry_core::storage::StorageRouter;
use ferry_shared::AppError;
use serde_json::Value;
use tracing::{info, warn};

use super::{BatchResponse, error_response};
use crate::AppState;

/// Creates the SharePoint routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sharepoint/upload", post(upload_from_sharepoint))
}

/// POST `/sharepoint/upload`
///
/// Body: `{ "files": [{ "siteId", "driveId", "itemId", "fileName" }] }`.
/// Entries are read leniently so a malformed entry fails on its own instead
/// of rejecting the whole request.
async fn upload_from_sharepoint(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected SharePoint request");
            return error_response(&AppError::validation(rejection.body_text()));
        }
    };

    let references = match parse_references(&body) {
        Ok(references) => references,
        Err(e) => return error_response(&e),
    };

    if state.config.sharepoint.is_absent() {
        warn!(
            files = references.len(),
            "SharePoint credentials not configured, returning mock results"
        );
        return BatchResponse::mock(BatchResult::mock(&references)).into_response();
    }

    if !state.config.sharepoint.is_complete() {
        warn!("SharePoint credentials incomplete, every reference will fail");
    }
    info!(files = references.len(), "Received SharePoint upload");

    let resolver = SourceResolver::from_config(&state.config.sharepoint, state.http.clone());
    let storage = &state.config.storage;
    let batch = UploadBatch::new(
        StorageRouter::from_config(storage, state.http.clone()),
        storage.max_file_size,
    );

    BatchResponse::new(batch.store_references(&resolver, &references).await).into_response()
}

fn parse_references(body: &Value) -> Result<Vec<ExternalFileReference>, AppError> {
    let files = body
        .get("files")
        .ok_or_else(|| AppError::validation("'files' is required"))?;
    let entries = files
        .as_array()
        .ok_or_else(|| AppError::validation("'files' must be a list"))?;
    if entries.is_empty() {
        return Err(AppError::validation("'files' must not be empty"));
    }

    Ok(entries.iter().map(reference_from_json).collect())
}

fn reference_from_json(entry: &Value) -> ExternalFileReference {
    let field = |name: &str| entry.get(name).and_then(Value::as_str).map(str::to_string);

    ExternalFileReference {
        site_id: field("siteId"),
        drive_id: field("driveId"),
        item_id: field("itemId"),
        file_name: field("fileName"),
    }
}
