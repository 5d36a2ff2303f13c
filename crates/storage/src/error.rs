/// Error type for document storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No backend is configured. Surfaced to the applicant, never swallowed.
    #[error("Document storage is not configured: {0}")]
    Unavailable(String),

    /// The supplied file name is empty or unusable.
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    /// Writing to the local store failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blob service request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The blob service returned a non-2xx status code.
    #[error("Blob service returned HTTP {0}")]
    HttpStatus(u16),

    /// The upload did not finish within its time bound.
    #[error("Upload timed out after {0}s")]
    Timeout(u64),
}
