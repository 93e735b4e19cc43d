//! Domain-level error types.
//!
//! Validation outcomes (duplicate email, bad credentials, unknown id) are
//! not errors; they come back as `Ok(None)` / `Ok(false)`.

use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded writing {key}: {needed} bytes needed, limit {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Collection not loaded yet")]
    NotLoaded,
}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Hashing error: {0}")]
    Hashing(String),
}
