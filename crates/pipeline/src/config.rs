//! Pipeline configuration loaded from environment variables.

use std::time::Duration;

use figures_core::screening::DEFAULT_DENYLIST_TOKEN;

/// Default recipient for reviewer notifications.
const DEFAULT_NOTIFY_RECIPIENT: &str = "admin@figures.com";

/// Pipeline timing and routing settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Address that receives every cleared submission.
    pub notify_recipient: String,
    /// Hard ceiling on notification dispatch.
    pub notify_timeout: Duration,
    /// Hard ceiling on a single document upload.
    pub upload_timeout: Duration,
    /// Comma-separated denylist tokens for the default risk predicate.
    pub risk_denylist: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            notify_recipient: DEFAULT_NOTIFY_RECIPIENT.to_string(),
            notify_timeout: Duration::from_secs(8),
            upload_timeout: Duration::from_secs(60),
            risk_denylist: DEFAULT_DENYLIST_TOKEN.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Default             |
    /// |-----------------------|---------------------|
    /// | `NOTIFY_RECIPIENT`    | `admin@figures.com` |
    /// | `NOTIFY_TIMEOUT_SECS` | `8`                 |
    /// | `UPLOAD_TIMEOUT_SECS` | `60`                |
    /// | `RISK_DENYLIST_TOKEN` | `risky`             |
    ///
    /// # Panics
    ///
    /// Panics if a timeout is set but is not a valid `u64`.
    pub fn from_env() -> Self {
        let notify_recipient =
            std::env::var("NOTIFY_RECIPIENT").unwrap_or_else(|_| DEFAULT_NOTIFY_RECIPIENT.into());

        let notify_timeout_secs: u64 = std::env::var("NOTIFY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .expect("NOTIFY_TIMEOUT_SECS must be a valid u64");

        let upload_timeout_secs: u64 = std::env::var("UPLOAD_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("UPLOAD_TIMEOUT_SECS must be a valid u64");

        let risk_denylist =
            std::env::var("RISK_DENYLIST_TOKEN").unwrap_or_else(|_| DEFAULT_DENYLIST_TOKEN.into());

        Self {
            notify_recipient,
            notify_timeout: Duration::from_secs(notify_timeout_secs),
            upload_timeout: Duration::from_secs(upload_timeout_secs),
            risk_denylist,
        }
    }
}
