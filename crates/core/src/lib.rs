//! Domain core for the Figures onboarding service.
//!
//! Everything in this crate is synchronous and free of I/O:
//!
//! - [`field_registry`]: static catalogue of field keys, labels, and hints.
//! - [`value`]: the closed value model carried by submission payloads.
//! - [`report`]: value formatting and ordered, escaped report rendering.
//! - [`onboarding_wizard`]: the per-session wizard state machine.
//! - [`submission`]: variants, finalized snapshots, and pipeline outcomes.
//! - [`screening`]: the pluggable risk predicate.

pub mod error;
pub mod field_registry;
pub mod onboarding_wizard;
pub mod report;
pub mod screening;
pub mod submission;
pub mod value;
