//! Core type definitions for Folio.
//!
//! This crate defines the small, I/O-free value types shared by the storage
//! backends and the versioning engine:
//! - Version identifiers (`latest` / `changes`)
//! - Languages, the installed language set and language selectors
//! - Field maps with case-insensitive keys
//! - Model and actor identifiers
//!
//! Everything that touches the file system or holds shared state lives in
//! `folio-storage` and `folio-content`.

mod fields;
mod ids;
mod language;
mod version_id;

pub use fields::Fields;
pub use ids::{Actor, ModelId, ModelKind};
pub use language::{Language, LanguageSelector, Languages, SINGLE_LANGUAGE_CODE};
pub use version_id::VersionId;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or resolving value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid version id: {0}")]
    InvalidVersionId(String),

    #[error("invalid model kind: {0}")]
    InvalidModelKind(String),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("the wildcard language cannot be resolved to a single language")]
    AmbiguousLanguage,

    #[error("invalid language configuration: {0}")]
    InvalidLanguages(String),
}
