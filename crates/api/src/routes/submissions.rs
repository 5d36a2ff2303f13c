use axum::routing::post;
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Submission routes mounted at `/submissions`.
///
/// ```text
/// POST   /   -> submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submissions::submit))
}
