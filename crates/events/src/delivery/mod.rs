//! Delivery channels implementing [`Notifier`](crate::Notifier).
//!
//! Exactly one channel is used per process; which one is decided at startup
//! from the environment (see [`from_env`]).

use std::sync::Arc;

use crate::notifier::Notifier;

pub mod email;
pub mod http_mail;

/// Pick the configured channel. The HTTP mail API wins when both are set.
///
/// Returns `None` when neither `MAIL_API_KEY` nor `SMTP_HOST` is present,
/// meaning submissions are screened but nobody is notified.
pub fn from_env() -> Option<Arc<dyn Notifier>> {
    if let Some(config) = http_mail::HttpMailConfig::from_env() {
        return Some(Arc::new(http_mail::HttpMailDelivery::new(config)));
    }
    email::EmailConfig::from_env()
        .map(|config| Arc::new(email::EmailDelivery::new(config)) as Arc<dyn Notifier>)
}
