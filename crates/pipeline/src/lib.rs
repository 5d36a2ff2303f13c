//! Submission orchestration.
//!
//! [`SubmissionPipeline`] screens a submission and dispatches the reviewer
//! notification; [`DocumentUploader`] bounds document uploads that happen
//! before a submission is finalized. Both receive their collaborators
//! explicitly at construction.

pub mod config;
pub mod submit;
pub mod upload;

pub use config::PipelineConfig;
pub use submit::{Dispatch, SubmissionPipeline};
pub use upload::{document_ref, DocumentUploader};
