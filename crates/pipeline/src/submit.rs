//! Screening and notification for a single submission.
//!
//! Order of checks:
//!
//! 1. A variant must be present.
//! 2. Business submissions need a company name and registration number.
//!    Combined submissions collect the same fields but are not checked here.
//! 3. The risk predicate runs against the company name.
//! 4. The report is rendered and dispatched, bounded by the notify timeout.
//!    Dispatch problems are logged and never change the outcome.

use std::sync::Arc;
use std::time::Instant;

use figures_core::field_registry::{KEY_COMPANY_NAME, KEY_REGISTRATION_NUMBER};
use figures_core::screening::{DenylistPredicate, RiskPredicate};
use figures_core::submission::{
    FinalizedSubmission, RejectionReason, SubmissionOutcome, SubmissionPayload, SubmissionVariant,
};
use figures_events::envelope;
use figures_events::Notifier;

use crate::config::PipelineConfig;

/// What happened to the reviewer notification. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Delivered within the timeout.
    Sent,
    /// No notifier is configured.
    Skipped,
    /// The notifier returned an error.
    Failed,
    /// The notifier did not answer in time.
    TimedOut,
}

/// Screens submissions and notifies reviewers.
#[derive(Clone)]
pub struct SubmissionPipeline {
    notifier: Option<Arc<dyn Notifier>>,
    risk: Arc<dyn RiskPredicate>,
    config: PipelineConfig,
}

impl SubmissionPipeline {
    pub fn new(
        notifier: Option<Arc<dyn Notifier>>,
        risk: Arc<dyn RiskPredicate>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            notifier,
            risk,
            config,
        }
    }

    /// Pipeline using the denylist predicate built from `config`.
    pub fn with_denylist(notifier: Option<Arc<dyn Notifier>>, config: PipelineConfig) -> Self {
        let risk = Arc::new(DenylistPredicate::from_csv(&config.risk_denylist));
        Self::new(notifier, risk, config)
    }

    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Screen `payload` and, once cleared, notify the reviewer.
    pub async fn submit(&self, payload: &SubmissionPayload) -> SubmissionOutcome {
        self.submit_with_dispatch(payload).await.0
    }

    /// Hand a wizard snapshot to [`submit`](Self::submit).
    pub async fn submit_finalized(&self, submission: FinalizedSubmission) -> SubmissionOutcome {
        self.submit(&submission.into_payload()).await
    }

    /// Like [`submit`](Self::submit) but also reports the dispatch result.
    /// `Dispatch` is `None` for rejected submissions, which are never sent.
    pub async fn submit_with_dispatch(
        &self,
        payload: &SubmissionPayload,
    ) -> (SubmissionOutcome, Option<Dispatch>) {
        let start = Instant::now();

        if let Err(reason) = self.screen(payload) {
            tracing::info!(
                variant = payload.variant.map(SubmissionVariant::as_str),
                reason = reason.as_str(),
                class = ?reason.class(),
                "Submission rejected",
            );
            return (SubmissionOutcome::rejected(reason), None);
        }

        let dispatch = self.dispatch(payload).await;
        tracing::info!(
            variant = payload.variant.map(SubmissionVariant::as_str),
            dispatch = ?dispatch,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Submission cleared",
        );
        (SubmissionOutcome::Cleared, Some(dispatch))
    }

    /// Steps 1 to 3. Pure apart from the predicate.
    fn screen(&self, payload: &SubmissionPayload) -> Result<(), RejectionReason> {
        let variant = payload.variant.ok_or(RejectionReason::MissingVariant)?;

        if variant == SubmissionVariant::Business
            && !(payload.is_present(KEY_COMPANY_NAME)
                && payload.is_present(KEY_REGISTRATION_NUMBER))
        {
            return Err(RejectionReason::MissingBusinessDetails);
        }

        if let Some(company) = payload.scalar_text(KEY_COMPANY_NAME) {
            if self.risk.is_risky(&company) {
                return Err(RejectionReason::RiskFlagged);
            }
        }
        Ok(())
    }

    /// Render and send, racing the notifier against the timeout.
    async fn dispatch(&self, payload: &SubmissionPayload) -> Dispatch {
        let Some(notifier) = &self.notifier else {
            tracing::debug!("No notifier configured, skipping dispatch");
            return Dispatch::Skipped;
        };

        let message = envelope::build_message(payload);
        let timeout = self.config.notify_timeout;
        let send = notifier.send(
            &self.config.notify_recipient,
            &message.subject,
            &message.body_html,
        );

        match tokio::time::timeout(timeout, send).await {
            Ok(Ok(())) => Dispatch::Sent,
            Ok(Err(e)) => {
                tracing::warn!(
                    channel = notifier.channel(),
                    error = %e,
                    "Notification dispatch failed; submission still cleared",
                );
                Dispatch::Failed
            }
            Err(_elapsed) => {
                tracing::warn!(
                    channel = notifier.channel(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Notification dispatch timed out; submission still cleared",
                );
                Dispatch::TimedOut
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
