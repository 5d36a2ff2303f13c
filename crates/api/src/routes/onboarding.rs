//! Route definitions for the read-only wizard schema.

use axum::routing::get;
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Onboarding routes mounted at `/onboarding`.
///
/// ```text
/// GET    /variants             -> list_variants
/// GET    /variants/{variant}   -> get_variant_layout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/variants", get(onboarding::list_variants))
        .route("/variants/{variant}", get(onboarding::get_variant_layout))
}
