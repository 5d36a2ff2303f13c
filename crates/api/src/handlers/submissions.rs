//! Handler for onboarding submissions.
//!
//! Submission results carry a top-level `status` instead of the `data`
//! envelope:
//!
//! ```text
//! 200 { "status": "cleared", "message": "Verification successful" }
//! 4xx/5xx { "status": "rejected", "reason", "error", "code" }
//! ```

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use figures_core::submission::{
    ErrorClass, RejectionReason, SubmissionOutcome, SubmissionPayload,
};
use serde_json::json;

use crate::state::AppState;

const CLEARED_MESSAGE: &str = "Verification successful";

/// POST /api/v1/submissions
///
/// The body is parsed here rather than with the `Json` extractor so that a
/// malformed body yields the same rejection shape as every other failure.
pub async fn submit(State(state): State<AppState>, body: Bytes) -> Response {
    let payload = match parse_payload(&body) {
        Ok(payload) => payload,
        Err(reason) => return outcome_response(SubmissionOutcome::rejected(reason)),
    };

    let outcome = state.pipeline.submit(&payload).await;
    outcome_response(outcome)
}

fn parse_payload(body: &[u8]) -> Result<SubmissionPayload, RejectionReason> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        tracing::error!(error = %e, "Malformed submission body");
        RejectionReason::InternalError
    })?;
    SubmissionPayload::from_json(value).map_err(|e| {
        tracing::error!(error = %e, "Unusable submission body");
        RejectionReason::InternalError
    })
}

pub(crate) fn outcome_response(outcome: SubmissionOutcome) -> Response {
    match outcome {
        SubmissionOutcome::Cleared => (
            StatusCode::OK,
            Json(json!({ "status": "cleared", "message": CLEARED_MESSAGE })),
        )
            .into_response(),
        SubmissionOutcome::Rejected { reason } => {
            let status = match reason.class() {
                ErrorClass::InputError => StatusCode::BAD_REQUEST,
                ErrorClass::PolicyRejection => StatusCode::FORBIDDEN,
                ErrorClass::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(json!({
                    "status": "rejected",
                    "reason": reason.as_str(),
                    "error": reason.to_string(),
                    "code": reason.code(),
                })),
            )
                .into_response()
        }
    }
}
