use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use figures_core::error::CoreError;
use figures_storage::StorageError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StorageError`] for document
/// uploads, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `figures_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A document storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Storage errors ---
            AppError::Storage(err) => classify_storage_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a storage error into an HTTP status, error code, and message.
///
/// - `Unavailable` maps to 503 with the configuration hint, so operators can
///   fix the deployment.
/// - `InvalidName` maps to 400.
/// - `Timeout` maps to 504.
/// - Backend failures map to 502 with a sanitized message.
fn classify_storage_error(err: &StorageError) -> (StatusCode, &'static str, String) {
    match err {
        StorageError::Unavailable(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "STORAGE_UNAVAILABLE",
            err.to_string(),
        ),
        StorageError::InvalidName(_) => {
            (StatusCode::BAD_REQUEST, "INVALID_FILE_NAME", err.to_string())
        }
        StorageError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "UPLOAD_TIMEOUT", err.to_string()),
        StorageError::Io(_) | StorageError::Request(_) | StorageError::HttpStatus(_) => {
            tracing::error!(error = %err, "Document storage error");
            (
                StatusCode::BAD_GATEWAY,
                "STORAGE_ERROR",
                "Document storage failed, please try again".to_string(),
            )
        }
    }
}
