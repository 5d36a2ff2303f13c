pub mod documents;
pub mod health;
pub mod onboarding;
pub mod submissions;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /onboarding/variants                 list variants (GET)
/// /onboarding/variants/{variant}       step layout of one variant (GET)
///
/// /documents?filename=<name>           upload one document (POST, raw body)
///
/// /submissions                         screen and notify (POST)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/onboarding", onboarding::router())
        .nest("/documents", documents::router(config.max_upload_bytes))
        .nest("/submissions", submissions::router())
}
