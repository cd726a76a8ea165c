//! Content versioning engine for Folio.
//!
//! Every model (page, file, site, user) keeps its content in two versions,
//! `latest` and `changes`, per installed language. This crate orchestrates
//! reads and writes of those versions on top of a [`folio_storage::Storage`]
//! backend:
//!
//! - [`Version`] reads, creates, updates, moves, publishes and diffs content
//! - [`VersionRules`] checks existence and locks before anything is written
//! - [`Lock`] derives who is editing a version from the `changes` slot
//! - [`VersionCache`] and [`VersionMemoryCache`] hold decoded field maps
//! - [`Translations`] and [`Versions`] enumerate languages and versions
//!
//! # Example
//!
//! ```
//! use folio_content::{ContentEngine, ContentConfig};
//! use folio_types::{Fields, Languages, ModelKind, VersionId};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(ContentEngine::new(ContentConfig::default())?);
//! let page = engine
//!     .model("blog/hello", ModelKind::Page)
//!     .languages(Languages::from_codes(["en", "de"])?)
//!     .build();
//!
//! let latest = page.version(VersionId::Latest);
//! latest.create(Fields::from([("title", "Hello")]), "en")?;
//!
//! let changes = page.version(VersionId::Changes);
//! changes.create(Fields::from([("title", "Hello again")]), "en")?;
//! changes.publish("en")?;
//!
//! assert_eq!(latest.read("en")?.get("title"), Some("Hello again"));
//! assert!(!changes.exists("en"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod actor;
mod cache;
mod config;
mod engine;
mod error;
mod filter;
mod lock;
mod model;
mod rules;
mod translation;
mod version;
mod versions;

pub use actor::{ActorSource, CurrentActor};
pub use cache::{CacheKey, VersionCache, VersionMemoryCache};
pub use config::{
    ContentConfig, DEFAULT_LOCK_DURATION_SECS, MAX_LOCK_DURATION_SECS, PlainTextConfig,
};
pub use engine::ContentEngine;
pub use error::{ContentError, ContentResult};
pub use filter::{FieldFilter, NoopFieldFilter, SchemaFieldFilter, WriteContext};
pub use lock::{LOCK_FIELD, Lock};
pub use model::{Model, ModelBuilder};
pub use rules::VersionRules;
pub use translation::{Translation, Translations};
pub use version::Version;
pub use versions::Versions;
