//! The notification collaborator contract.

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for notification delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The mail API request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The mail API returned a non-2xx status code.
    #[error("Mail API returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Sends one formatted message to one recipient.
///
/// Implementations do not enforce their own overall deadline; callers bound
/// the call with a timeout.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an HTML message.
    async fn send(&self, recipient: &str, subject: &str, body_html: &str)
        -> Result<(), NotifyError>;

    /// Short channel name for logs and health output.
    fn channel(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_build() {
        let err = NotifyError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn display_http_status() {
        assert_eq!(NotifyError::HttpStatus(502).to_string(), "Mail API returned HTTP 502");
    }

    #[test]
    fn display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = NotifyError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
