//! Per-language views of a version.

use crate::error::{ContentError, ContentResult};
use crate::model::Model;
use crate::version::Version;
use chrono::{DateTime, Utc};
use folio_types::{Fields, Language, VersionId};
use std::sync::Arc;

/// One language of one version.
#[derive(Debug, Clone)]
pub struct Translation {
    version: Version,
    language: Language,
}

impl Translation {
    pub fn new(version: Version, language: Language) -> Self {
        Self { version, language }
    }

    pub fn code(&self) -> &str {
        self.language.code()
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn is_default(&self) -> bool {
        self.language.is_default()
    }

    pub fn exists(&self) -> bool {
        self.version.exists(&self.language)
    }

    /// The translated fields.
    pub fn content(&self) -> ContentResult<Fields> {
        self.version.read(&self.language)
    }

    pub fn modified(&self) -> ContentResult<Option<DateTime<Utc>>> {
        self.version.modified(&self.language)
    }

    /// Deletes this translation. The default language cannot be deleted;
    /// it holds the content every other language falls back to.
    pub fn delete(&self) -> ContentResult<()> {
        if self.is_default() {
            return Err(ContentError::logic(
                "error.language.delete.default",
                "The default translation cannot be deleted",
            ));
        }
        self.version.delete_language(&self.language)
    }
}

/// Every installed language of a version, in configuration order.
#[derive(Debug, Clone)]
pub struct Translations {
    list: Vec<Translation>,
}

impl Translations {
    pub fn load(model: &Arc<Model>, version: VersionId) -> Self {
        let version = model.version(version);
        let list = model
            .languages()
            .iter()
            .map(|language| Translation::new(version.clone(), language.clone()))
            .collect();
        Self { list }
    }

    pub fn find(&self, code: &str) -> Option<&Translation> {
        let code = code.to_lowercase();
        self.list.iter().find(|translation| translation.code() == code)
    }

    pub fn default_translation(&self) -> Option<&Translation> {
        self.list.iter().find(|translation| translation.is_default())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Translation> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<'a> IntoIterator for &'a Translations {
    type Item = &'a Translation;
    type IntoIter = std::slice::Iter<'a, Translation>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
