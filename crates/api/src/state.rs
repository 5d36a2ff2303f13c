use std::sync::Arc;

use figures_pipeline::{DocumentUploader, SubmissionPipeline};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Screening and reviewer notification.
    pub pipeline: Arc<SubmissionPipeline>,
    /// Bounded document uploads; unconfigured when no storage backend is set.
    pub uploader: Arc<DocumentUploader>,
}
