//! Error types for the storage layer.

use folio_types::VersionId;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested version does not exist in that language.
    #[error("version \"{version}\" does not exist in language \"{language}\"")]
    NotFound { version: VersionId, language: String },

    /// The call violates a backend precondition (existing target,
    /// immutable backend, ...).
    #[error("{0}")]
    Logic(String),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub(crate) fn not_found(version: VersionId, language: &folio_types::Language) -> Self {
        Self::NotFound {
            version,
            language: language.code().to_string(),
        }
    }

    /// Returns true for [`StorageError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
