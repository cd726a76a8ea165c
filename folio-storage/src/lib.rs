//! Content storage backends for Folio.
//!
//! A backend persists the field map of a single model for every
//! (version, language) pair. Backends are swappable: a model only ever talks
//! to the [`Storage`] trait, and content can be migrated between backends
//! with [`Storage::copy_all`] / [`Storage::move_all`].
//!
//! # Backends
//!
//! - [`PlainTextStorage`]: one `txt` content file per version and language,
//!   laid out next to the model on disk
//! - [`MemoryStorage`]: process memory, for tests and transient models
//! - [`ImmutableMemoryStorage`]: a frozen snapshot that rejects every
//!   mutation

mod error;
mod immutable;
mod memory;
mod plain_text;
mod storage;
pub mod txt;

pub use error::{StorageError, StorageResult};
pub use immutable::ImmutableMemoryStorage;
pub use memory::MemoryStorage;
pub use plain_text::{ContentLocation, PlainTextOptions, PlainTextStorage};
pub use storage::Storage;
