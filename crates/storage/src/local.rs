//! Filesystem-backed document store.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::store::{unique_name, DocumentStore, StoredDocument};

/// Writes documents under `root` and serves them from `base_url`.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
    base_url: String,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn store(&self, file_name: &str, bytes: Vec<u8>) -> Result<StoredDocument, StorageError> {
        let stored_name = unique_name(file_name)?;
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!(
            file_name,
            stored_name = %stored_name,
            size = bytes.len(),
            "Document written to local store"
        );
        Ok(StoredDocument {
            url: format!("{}/{stored_name}", self.base_url),
            file_name: file_name.to_string(),
        })
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
