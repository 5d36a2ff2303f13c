//! Outbound notification for completed onboarding submissions.
//!
//! - [`Notifier`]: the "send formatted message" collaborator the
//!   submission pipeline dispatches through.
//! - [`delivery`]: concrete channels (SMTP via `lettre`, HTTP mail API via
//!   `reqwest`).
//! - [`envelope`]: wraps rendered report rows in the reviewer-facing HTML
//!   message.

pub mod delivery;
pub mod envelope;
pub mod notifier;

pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::http_mail::{HttpMailConfig, HttpMailDelivery};
pub use envelope::{NotificationMessage, build_message};
pub use notifier::{Notifier, NotifyError};
