//! Error types for the versioning engine.

use crate::lock::Lock;
use folio_storage::StorageError;
use folio_types::VersionId;
use thiserror::Error;

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors raised by versions, rules and the engine.
///
/// Nothing in this crate retries or swallows these; they go straight back
/// to the caller.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The requested version does not exist in that language.
    #[error("the version \"{version}\" does not exist in language \"{language}\"")]
    NotFound { version: VersionId, language: String },

    /// A precondition was violated. Retrying the same call will fail again.
    #[error("{message}")]
    Logic { key: &'static str, message: String },

    /// Someone else is editing the content.
    #[error("the content is locked by {}", .lock.holder())]
    LockedContent { lock: Box<Lock> },

    /// Backend failure that is neither a missing slot nor a precondition.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// Invalid version id, language or model kind.
    #[error(transparent)]
    Types(#[from] folio_types::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ContentError {
    pub(crate) fn logic(key: &'static str, message: impl Into<String>) -> Self {
        Self::Logic {
            key,
            message: message.into(),
        }
    }

    pub(crate) fn locked(lock: Lock) -> Self {
        Self::LockedContent {
            lock: Box::new(lock),
        }
    }

    /// Stable, machine readable key of the error.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "error.version.notFound",
            Self::Logic { key, .. } => *key,
            Self::LockedContent { .. } => "error.content.lock",
            Self::Storage(_) => "error.storage",
            Self::Types(folio_types::Error::InvalidVersionId(_)) => "error.version.invalid",
            Self::Types(folio_types::Error::InvalidModelKind(_)) => "error.model.kind",
            Self::Types(_) => "error.language",
            Self::Config(_) => "error.config",
        }
    }

    /// The lock that blocked the call, for [`ContentError::LockedContent`].
    #[must_use]
    pub fn lock(&self) -> Option<&Lock> {
        match self {
            Self::LockedContent { lock } => Some(lock),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_logic(&self) -> bool {
        matches!(self, Self::Logic { .. })
    }

    /// Only a lock goes away on its own; every other error needs a
    /// different call.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockedContent { .. })
    }
}

impl From<StorageError> for ContentError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { version, language } => Self::NotFound { version, language },
            StorageError::Logic(message) => Self::Logic {
                key: "error.storage.logic",
                message,
            },
            other => Self::Storage(other),
        }
    }
}
