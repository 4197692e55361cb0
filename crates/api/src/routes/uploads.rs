//! Direct multipart upload route.

use axum::{
    Router,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use ferry_core::batch::{UploadBatch, UploadUnit};
use ferry_core::storage::StorageRouter;
use ferry_shared::AppError;
use tracing::{info, warn};

use super::{BatchResponse, error_response};
use crate::AppState;

/// Creates the direct upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_files))
}

/// POST `/upload`
///
/// Every multipart part carrying a filename is one unit. Other parts are
/// ignored.
async fn upload_files(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected upload request");
            return error_response(&AppError::validation(rejection.body_text()));
        }
    };

    let units = match collect_units(&mut multipart).await {
        Ok(units) => units,
        Err(e) => {
            warn!(error = %e, "Failed to read multipart body");
            return error_response(&e);
        }
    };

    if units.is_empty() {
        return error_response(&AppError::validation("No files uploaded"));
    }

    info!(files = units.len(), "Received direct upload");

    let storage = &state.config.storage;
    let batch = UploadBatch::new(
        StorageRouter::from_config(storage, state.http.clone()),
        storage.max_file_size,
    );

    BatchResponse::new(batch.store_units(units).await).into_response()
}

async fn collect_units(multipart: &mut Multipart) -> Result<Vec<UploadUnit>, AppError> {
    let mut units = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content = field.bytes().await.map_err(multipart_error)?;
        units.push(UploadUnit::new(file_name, content));
    }

    Ok(units)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::validation(err.body_text())
    }
}
