#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use figures_api::config::{LogFormat, ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use figures_api::router::build_app_router;
use figures_api::state::AppState;
use figures_events::{Notifier, NotifyError};
use figures_pipeline::{DocumentUploader, PipelineConfig, SubmissionPipeline};
use figures_storage::DocumentStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        log_format: LogFormat::Pretty,
        document_mount: None,
    }
}

/// Pipeline settings with short time bounds.
pub fn test_pipeline_config() -> PipelineConfig {
    PipelineConfig {
        notify_recipient: "reviewer@figures.test".to_string(),
        notify_timeout: Duration::from_millis(500),
        upload_timeout: Duration::from_secs(2),
        risk_denylist: "risky".to_string(),
    }
}

/// One message captured by [`RecordingNotifier`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub recipient: String,
    pub subject: String,
    pub body_html: String,
}

/// Notifier that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentMessage>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
    ) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(SentMessage {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body_html: body_html.to_string(),
        });
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "recording"
    }
}

/// Build the full application router with the given collaborators.
///
/// Goes through [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(
    notifier: Option<Arc<dyn Notifier>>,
    store: Option<Arc<dyn DocumentStore>>,
) -> Router {
    build_test_app_with(test_config(), notifier, store)
}

pub fn build_test_app_with(
    config: ServerConfig,
    notifier: Option<Arc<dyn Notifier>>,
    store: Option<Arc<dyn DocumentStore>>,
) -> Router {
    let pipeline_config = test_pipeline_config();
    let uploader = DocumentUploader::new(store, pipeline_config.upload_timeout);

    let state = AppState {
        config: Arc::new(config.clone()),
        pipeline: Arc::new(SubmissionPipeline::with_denylist(notifier, pipeline_config)),
        uploader: Arc::new(uploader),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &serde_json::Value) -> axum::response::Response {
    post_raw(app, uri, "application/json", serde_json::to_vec(body).unwrap()).await
}

pub async fn post_raw(
    app: Router,
    uri: &str,
    content_type: &str,
    body: Vec<u8>,
) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON, asserting the status first.
pub async fn body_json(
    response: axum::response::Response,
    expected: StatusCode,
) -> serde_json::Value {
    assert_eq!(response.status(), expected);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
