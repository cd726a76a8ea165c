//! Dirty field filtering.
//!
//! Which fields may be stored for a given version and language is decided by
//! the content schema, which lives outside the engine. The engine asks a
//! [`FieldFilter`] on every write path before the backend sees the fields.

use folio_types::{Fields, Language, VersionId};
use std::collections::BTreeSet;

/// Where a field map is about to be written.
#[derive(Debug, Clone, Copy)]
pub struct WriteContext<'a> {
    pub version: VersionId,
    pub language: &'a Language,
    /// Schema of the model the fields come from, when it is not the target.
    pub source_schema: Option<&'a str>,
    /// Schema of the model being written.
    pub target_schema: Option<&'a str>,
}

impl WriteContext<'_> {
    /// True when the fields are adopted from a model with another schema.
    #[must_use]
    pub fn changes_schema(&self) -> bool {
        matches!(self.source_schema, Some(source) if Some(source) != self.target_schema)
    }
}

/// Removes fields that must not be stored for a write.
pub trait FieldFilter: Send + Sync {
    fn filter(&self, fields: Fields, context: &WriteContext<'_>) -> Fields;
}

/// Stores every field as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFieldFilter;

impl FieldFilter for NoopFieldFilter {
    fn filter(&self, fields: Fields, _context: &WriteContext<'_>) -> Fields {
        fields
    }
}

/// Schema driven filter.
///
/// Untranslatable fields are only stored for the default language.
/// Identity markers (template, uuid, ...) are dropped when content is adopted
/// from a model with a different schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaFieldFilter {
    untranslatable: BTreeSet<String>,
    identity_markers: BTreeSet<String>,
}

impl SchemaFieldFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn untranslatable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.untranslatable
            .extend(fields.into_iter().map(|f| Fields::normalize_key(f.as_ref())));
        self
    }

    #[must_use]
    pub fn identity_markers<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.identity_markers
            .extend(fields.into_iter().map(|f| Fields::normalize_key(f.as_ref())));
        self
    }
}

impl FieldFilter for SchemaFieldFilter {
    fn filter(&self, mut fields: Fields, context: &WriteContext<'_>) -> Fields {
        if !context.language.is_default() {
            fields.retain(|key, _| !self.untranslatable.contains(key));
        }
        if context.changes_schema() {
            fields.retain(|key, _| !self.identity_markers.contains(key));
        }
        fields
    }
}
