//! The document-store contract and shared naming rules.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;

use crate::error::StorageError;

/// Runs of characters that are not safe in a stored name.
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

/// Length of the random suffix appended to stored names.
const SUFFIX_LEN: usize = 8;

/// A document that has been stored and can be retrieved by `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub url: String,
    /// Name as uploaded by the applicant.
    pub file_name: String,
}

/// Stores document bytes and returns a retrievable locator.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `bytes` under a name derived from `file_name`.
    async fn store(&self, file_name: &str, bytes: Vec<u8>) -> Result<StoredDocument, StorageError>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// Derive a collision-free storage name from an uploaded file name.
///
/// Directory components are dropped, unsafe characters collapse to `-`, and
/// a random suffix is inserted before the extension:
/// `passport scan.PNG` becomes `passport-scan-1a2b3c4d.PNG`.
pub fn unique_name(file_name: &str) -> Result<String, StorageError> {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned = UNSAFE_CHARS.replace_all(base, "-");
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '-');
    if cleaned.is_empty() {
        return Err(StorageError::InvalidName(file_name.to_string()));
    }

    let suffix = &uuid::Uuid::new_v4().simple().to_string()[..SUFFIX_LEN];
    Ok(match cleaned.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{stem}-{suffix}.{ext}")
        }
        _ => format!("{cleaned}-{suffix}"),
    })
}
