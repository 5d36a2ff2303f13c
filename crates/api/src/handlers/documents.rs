//! Handler for single-document uploads.
//!
//! The client uploads each verification document on its own, before the
//! submission is sent, and records the returned URL in its draft. A failed
//! upload is reported and can be retried; nothing else in the draft changes.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `POST /documents`.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: Option<String>,
}

/// POST /api/v1/documents?filename=<name>
///
/// Stores the raw request body and returns `201` with `{ url, fileName }`.
pub async fn upload_document(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let file_name = params
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("Filename is required".to_string()))?;

    if body.is_empty() {
        return Err(AppError::BadRequest("Document body is empty".to_string()));
    }

    let stored = state.uploader.upload(file_name, body.to_vec()).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: stored })))
}
