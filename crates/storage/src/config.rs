//! Storage backend selection from the environment.

use std::path::PathBuf;
use std::sync::Arc;

use crate::blob::BlobDocumentStore;
use crate::local::LocalDocumentStore;
use crate::store::DocumentStore;

/// Default blob service endpoint when only the token is set.
const DEFAULT_BLOB_API_URL: &str = "https://blob.vercel-storage.com";

/// Default public base for locally stored documents.
const DEFAULT_DOCUMENT_BASE_URL: &str = "http://localhost:3000/documents";

/// Message shown to operators when no backend is configured.
pub const UNCONFIGURED_HINT: &str = "set BLOB_READ_WRITE_TOKEN (and optionally BLOB_API_URL) \
     or DOCUMENT_DIR (and optionally DOCUMENT_BASE_URL), then restart the server";

/// Route under which locally stored documents are served, and the
/// directory behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMount {
    pub route: String,
    pub dir: PathBuf,
}

/// Which document backend to use.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Blob { api_url: String, token: String },
    Local { dir: String, base_url: String },
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob { api_url, .. } => f
                .debug_struct("Blob")
                .field("api_url", api_url)
                .field("token", &"<redacted>")
                .finish(),
            Self::Local { dir, base_url } => f
                .debug_struct("Local")
                .field("dir", dir)
                .field("base_url", base_url)
                .finish(),
        }
    }
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// The blob service wins when both are configured. Returns `None` when
    /// neither is, in which case every upload fails as unavailable.
    ///
    /// | Variable                | Required        | Default                             |
    /// |-------------------------|-----------------|-------------------------------------|
    /// | `BLOB_READ_WRITE_TOKEN` | for blob store  | -                                   |
    /// | `BLOB_API_URL`          | no              | `https://blob.vercel-storage.com`   |
    /// | `DOCUMENT_DIR`          | for local store | -                                   |
    /// | `DOCUMENT_BASE_URL`     | no              | `http://localhost:3000/documents`   |
    pub fn from_env() -> Option<Self> {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("BLOB_READ_WRITE_TOKEN") {
            return Some(Self::Blob {
                api_url: non_empty("BLOB_API_URL")
                    .unwrap_or_else(|| DEFAULT_BLOB_API_URL.to_string()),
                token,
            });
        }
        non_empty("DOCUMENT_DIR").map(|dir| Self::Local {
            dir,
            base_url: non_empty("DOCUMENT_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DOCUMENT_BASE_URL.to_string()),
        })
    }

    /// Where the server must serve local documents for their locators to
    /// resolve.
    ///
    /// `None` for the blob store, which serves its own URLs, and for a base
    /// URL without a path (`http://host/`), which cannot be mounted beside
    /// the API routes.
    pub fn local_mount(&self) -> Option<LocalMount> {
        let Self::Local { dir, base_url } = self else {
            return None;
        };
        let url = reqwest::Url::parse(base_url).ok()?;
        let route = url.path().trim_end_matches('/');
        if route.is_empty() {
            return None;
        }
        Some(LocalMount {
            route: route.to_string(),
            dir: PathBuf::from(dir),
        })
    }

    /// Construct the configured backend.
    pub fn build(self) -> Arc<dyn DocumentStore> {
        match self {
            Self::Blob { api_url, token } => Arc::new(BlobDocumentStore::new(api_url, token)),
            Self::Local { dir, base_url } => Arc::new(LocalDocumentStore::new(dir, base_url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let config = StorageConfig::Blob {
            api_url: DEFAULT_BLOB_API_URL.into(),
            token: "vercel_blob_rw_secret".into(),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn local_mount_follows_base_url_path() {
        let local = StorageConfig::Local {
            dir: "/var/figures/docs".into(),
            base_url: DEFAULT_DOCUMENT_BASE_URL.into(),
        };
        assert_eq!(
            local.local_mount(),
            Some(LocalMount {
                route: "/documents".into(),
                dir: PathBuf::from("/var/figures/docs"),
            })
        );

        let nested = StorageConfig::Local {
            dir: "docs".into(),
            base_url: "https://onboarding.example/files/kyc/".into(),
        };
        assert_eq!(nested.local_mount().unwrap().route, "/files/kyc");
    }

    #[test]
    fn local_mount_absent_for_blob_and_bare_host() {
        let blob = StorageConfig::Blob {
            api_url: DEFAULT_BLOB_API_URL.into(),
            token: "t".into(),
        };
        assert_eq!(blob.local_mount(), None);

        let bare = StorageConfig::Local {
            dir: "docs".into(),
            base_url: "http://localhost:3000".into(),
        };
        assert_eq!(bare.local_mount(), None);

        let garbage = StorageConfig::Local {
            dir: "docs".into(),
            base_url: "not a url".into(),
        };
        assert_eq!(garbage.local_mount(), None);
    }

    #[test]
    fn build_selects_backend() {
        let blob = StorageConfig::Blob {
            api_url: "https://b".into(),
            token: "t".into(),
        };
        assert_eq!(blob.build().backend(), "blob");

        let local = StorageConfig::Local {
            dir: "/tmp/docs".into(),
            base_url: "http://h".into(),
        };
        assert_eq!(local.build().backend(), "local");
    }
}
