use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` when every collaborator is configured, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether a document store is configured.
    pub storage_configured: bool,
    /// Whether a reviewer notifier is configured.
    pub notifier_configured: bool,
}

/// GET /health -- returns service and collaborator status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage_configured = state.uploader.is_configured();
    let notifier_configured = state.pipeline.has_notifier();

    let status = if storage_configured && notifier_configured {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        storage_configured,
        notifier_configured,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
