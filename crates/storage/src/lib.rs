//! Document storage for onboarding uploads.
//!
//! The onboarding flow only needs "store these bytes, give me back a
//! retrievable locator". [`DocumentStore`] is that contract; two backends
//! implement it:
//!
//! - [`LocalDocumentStore`] writes under a directory and returns URLs under
//!   a configured public base.
//! - [`BlobDocumentStore`] PUTs to an HTTP blob service with a bearer token.

pub mod blob;
pub mod config;
pub mod error;
pub mod local;
pub mod store;

pub use blob::BlobDocumentStore;
pub use config::{LocalMount, StorageConfig};
pub use error::StorageError;
pub use local::LocalDocumentStore;
pub use store::{unique_name, DocumentStore, StoredDocument};
