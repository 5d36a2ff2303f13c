//! Route definitions for document uploads.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Document routes mounted at `/documents`.
///
/// ```text
/// POST   /?filename=<name>   -> upload_document
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(documents::upload_document))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
