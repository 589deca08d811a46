use thiserror::Error;

/// Errors that can occur during file store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested file was not found.
    #[error("file not found: {0}")]
    NotFound(String),
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The relative path is empty, absolute, or escapes the store root.
    #[error("invalid storage path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },
    /// The file exceeds the configured size limit.
    #[error("file exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
