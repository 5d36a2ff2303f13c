//! Bounded document uploads.
//!
//! Uploads happen one document at a time, before the wizard is finalized.
//! A failed or timed-out upload leaves the caller's draft untouched so the
//! applicant can retry the one document.

use std::sync::Arc;
use std::time::{Duration, Instant};

use figures_core::submission::DocumentRef;
use figures_storage::config::UNCONFIGURED_HINT;
use figures_storage::{DocumentStore, StorageError, StoredDocument};

/// Stores documents through the configured backend under a time bound.
#[derive(Clone)]
pub struct DocumentUploader {
    store: Option<Arc<dyn DocumentStore>>,
    timeout: Duration,
}

impl DocumentUploader {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// Backend name, if one is configured.
    pub fn backend(&self) -> Option<&'static str> {
        self.store.as_ref().map(|s| s.backend())
    }

    /// Store one document.
    ///
    /// Fails with [`StorageError::Unavailable`] when no backend is configured
    /// and [`StorageError::Timeout`] when the backend does not finish in time.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredDocument, StorageError> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable(UNCONFIGURED_HINT.to_string()))?;

        let start = Instant::now();
        let size = bytes.len();
        let result = tokio::time::timeout(self.timeout, store.store(file_name, bytes)).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(stored)) => {
                tracing::info!(
                    file_name,
                    backend = store.backend(),
                    size,
                    elapsed_ms,
                    "Document stored",
                );
                Ok(stored)
            }
            Ok(Err(e)) => {
                tracing::error!(file_name, backend = store.backend(), error = %e, "Document upload failed");
                Err(e)
            }
            Err(_elapsed) => {
                tracing::warn!(file_name, backend = store.backend(), elapsed_ms, "Document upload timed out");
                Err(StorageError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}

/// Reference recorded in the draft for a stored document.
pub fn document_ref(stored: StoredDocument) -> DocumentRef {
    DocumentRef {
        file_name: stored.file_name,
        locator: stored.url,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use figures_core::onboarding_wizard::{DraftValue, OnboardingWizard};
    use figures_core::submission::{DocumentSlot, SubmissionVariant};

    struct MemoryStore;

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn store(&self, file_name: &str, _: Vec<u8>) -> Result<StoredDocument, StorageError> {
            Ok(StoredDocument {
                url: format!("https://blob.example/{file_name}"),
                file_name: file_name.to_string(),
            })
        }

        fn backend(&self) -> &'static str {
            "memory"
        }
    }

    struct HangingStore;

    #[async_trait]
    impl DocumentStore for HangingStore {
        async fn store(&self, _: &str, _: Vec<u8>) -> Result<StoredDocument, StorageError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            unreachable!("upload should have been cut off")
        }

        fn backend(&self) -> &'static str {
            "hanging"
        }
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn store(&self, _: &str, _: Vec<u8>) -> Result<StoredDocument, StorageError> {
            Err(StorageError::HttpStatus(500))
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    fn uploader(store: Option<Arc<dyn DocumentStore>>) -> DocumentUploader {
        DocumentUploader::new(store, Duration::from_millis(100))
    }

    #[tokio::test]
    async fn unconfigured_store_is_unavailable() {
        let up = uploader(None);
        assert!(!up.is_configured());
        assert_matches!(
            up.upload("id.png", vec![1]).await,
            Err(StorageError::Unavailable(msg)) if msg.contains("BLOB_READ_WRITE_TOKEN")
        );
    }

    #[tokio::test]
    async fn stored_document_converts_to_reference() {
        let stored = uploader(Some(Arc::new(MemoryStore)))
            .upload("id.png", vec![1])
            .await
            .unwrap();
        let doc = document_ref(stored);
        assert_eq!(doc.file_name, "id.png");
        assert_eq!(doc.locator, "https://blob.example/id.png");
    }

    #[tokio::test]
    async fn hanging_store_times_out() {
        assert_matches!(
            uploader(Some(Arc::new(HangingStore))).upload("id.png", vec![1]).await,
            Err(StorageError::Timeout(_))
        );
    }

    #[tokio::test]
    async fn failed_upload_can_be_retried_without_losing_draft() {
        let mut wizard = OnboardingWizard::new();
        wizard.select_variant(SubmissionVariant::SelfAssessment).unwrap();
        wizard
            .update_field("utrNumber", DraftValue::Text("1234567890".into()))
            .unwrap();

        let failed = uploader(Some(Arc::new(FailingStore)))
            .upload("id.png", vec![1])
            .await;
        assert_matches!(failed, Err(StorageError::HttpStatus(500)));
        let draft = wizard.draft().unwrap();
        assert_eq!(
            draft.field("utrNumber"),
            Some(&DraftValue::Text("1234567890".into()))
        );

        let stored = uploader(Some(Arc::new(MemoryStore)))
            .upload("id.png", vec![1])
            .await
            .unwrap();
        wizard
            .attach_document(DocumentSlot::PhotoId, document_ref(stored))
            .unwrap();
        assert_eq!(
            wizard.draft().unwrap().field("photoId"),
            Some(&DraftValue::Document(Some(DocumentRef {
                file_name: "id.png".into(),
                locator: "https://blob.example/id.png".into(),
            })))
        );
    }
}
