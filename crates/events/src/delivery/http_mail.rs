//! Notification delivery through a transactional-mail HTTP API.
//!
//! [`HttpMailDelivery`] POSTs a JSON message (`from`, `to`, `subject`,
//! `html`) with a bearer token, the shape used by Resend and compatible
//! services.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::notifier::{Notifier, NotifyError};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default API endpoint.
const DEFAULT_API_URL: &str = "https://api.resend.com/emails";

/// Default sender when `MAIL_FROM` is not set.
const DEFAULT_FROM: &str = "Figures Onboarding <onboarding@resend.dev>";

// ---------------------------------------------------------------------------
// HttpMailConfig
// ---------------------------------------------------------------------------

/// Configuration for the HTTP mail API channel.
#[derive(Clone)]
pub struct HttpMailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

impl std::fmt::Debug for HttpMailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

impl HttpMailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when no API key is set.
    ///
    /// | Variable                          | Required | Default                                       |
    /// |-----------------------------------|----------|-----------------------------------------------|
    /// | `MAIL_API_KEY` / `RESEND_API_KEY` | yes      | -                                             |
    /// | `MAIL_API_URL`                    | no       | `https://api.resend.com/emails`               |
    /// | `MAIL_FROM`                       | no       | `Figures Onboarding <onboarding@resend.dev>`  |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("MAIL_API_KEY")
            .or_else(|_| std::env::var("RESEND_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        Some(Self {
            api_url: std::env::var("MAIL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key,
            from: std::env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_FROM.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// HttpMailDelivery
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct OutboundMail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Sends HTML notification emails through an HTTP mail API.
pub struct HttpMailDelivery {
    client: reqwest::Client,
    config: HttpMailConfig,
}

impl HttpMailDelivery {
    /// Create a delivery service with a pre-configured HTTP client.
    pub fn new(config: HttpMailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }
}

#[async_trait]
impl Notifier for HttpMailDelivery {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
    ) -> Result<(), NotifyError> {
        let mail = OutboundMail {
            from: &self.config.from,
            to: [recipient],
            subject,
            html: body_html,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&mail)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(NotifyError::HttpStatus(response.status().as_u16()));
        }

        tracing::info!(to = recipient, subject, "Onboarding notification sent via mail API");
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "http-mail"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> HttpMailConfig {
        HttpMailConfig {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: "re_secret".to_string(),
            from: DEFAULT_FROM.to_string(),
        }
    }

    #[test]
    fn new_does_not_panic() {
        let delivery = HttpMailDelivery::new(config());
        assert_eq!(delivery.channel(), "http-mail");
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("re_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn outbound_mail_wire_shape() {
        let mail = OutboundMail {
            from: DEFAULT_FROM,
            to: ["admin@figures.com"],
            subject: "New Onboarding: Acme",
            html: "<p>x</p>",
        };
        assert_eq!(
            serde_json::to_value(&mail).unwrap(),
            json!({
                "from": "Figures Onboarding <onboarding@resend.dev>",
                "to": ["admin@figures.com"],
                "subject": "New Onboarding: Acme",
                "html": "<p>x</p>",
            })
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let delivery = HttpMailDelivery::new(HttpMailConfig {
            api_url: "http://127.0.0.1:1/emails".to_string(),
            ..config()
        });
        let err = delivery
            .send("admin@figures.com", "s", "<p>b</p>")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Request(_)));
    }
}
