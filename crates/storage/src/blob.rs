//! HTTP blob-service document store.
//!
//! Each document is uploaded with `PUT {api_url}/{stored_name}` and a
//! bearer token. The service answers with JSON carrying the public `url`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::StorageError;
use crate::store::{unique_name, DocumentStore, StoredDocument};

/// Connect timeout for the blob service. The overall upload bound is
/// enforced by the caller.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct PutResponse {
    url: String,
}

/// Stores documents in a remote blob service.
pub struct BlobDocumentStore {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl BlobDocumentStore {
    /// Create a store with a pre-configured HTTP client.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn object_url(&self, stored_name: &str) -> String {
        format!("{}/{stored_name}", self.api_url)
    }
}

#[async_trait]
impl DocumentStore for BlobDocumentStore {
    async fn store(&self, file_name: &str, bytes: Vec<u8>) -> Result<StoredDocument, StorageError> {
        let stored_name = unique_name(file_name)?;
        let size = bytes.len();

        let response = self
            .client
            .put(self.object_url(&stored_name))
            .bearer_auth(&self.token)
            .header("x-access", "public")
            .body(bytes)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StorageError::HttpStatus(response.status().as_u16()));
        }
        let PutResponse { url } = response.json().await?;

        tracing::debug!(file_name, stored_name = %stored_name, size, "Document uploaded to blob store");
        Ok(StoredDocument {
            url,
            file_name: file_name.to_string(),
        })
    }

    fn backend(&self) -> &'static str {
        "blob"
    }
}
