//! Shared application router builder.
//!
//! [`build_app_router`] is used by both `main.rs` and the integration tests,
//! so the onboarding routes, the document mount and the middleware stack are
//! identical in production and under test.

use std::any::Any;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, StatusCode};
use axum::response::Response;
use axum::Router;
use figures_core::submission::{RejectionReason, SubmissionOutcome};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::handlers::submissions::outcome_response;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the onboarding [`Router`] with all middleware layers.
///
/// Routes:
///
/// - `/health` at the root
/// - the `/api/v1` tree from [`routes::api_routes`]
/// - the local document directory at its base-URL path, when configured,
///   so stored document locators resolve
///
/// Layers, innermost first: panic recovery, request timeout, request ID
/// propagation, tracing, request ID assignment, CORS.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes(config));

    if let Some(mount) = &config.document_mount {
        tracing::info!(route = %mount.route, dir = %mount.dir.display(), "Serving stored documents");
        router = router.nest_service(&mount.route, ServeDir::new(&mount.dir));
    }

    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// Turn a handler panic into the same rejection body a failed submission
/// gets, so the applicant form never sees a bare 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = detail, "Handler panicked");

    outcome_response(SubmissionOutcome::rejected(RejectionReason::InternalError))
}

/// CORS for the applicant form origins. The form only reads and posts JSON
/// or raw document bodies, so no credentials or auth headers are allowed.
///
/// Panics at startup if any configured origin is invalid.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn rejection_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn panic_becomes_internal_rejection() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = rejection_body(response).await;
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["reason"], "internal-error");
    }

    #[tokio::test]
    async fn formatted_and_opaque_panics_are_handled() {
        let formatted = handle_panic(Box::new(format!("index {} out of range", 3)));
        assert_eq!(formatted.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let opaque = handle_panic(Box::new(42_u8));
        assert_eq!(opaque.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rejection_body(opaque).await["code"], rejection_body(formatted).await["code"]);
    }
}
