//! One named version of a model's content.

use crate::error::{ContentError, ContentResult};
use crate::filter::WriteContext;
use crate::lock::{LOCK_FIELD, Lock};
use crate::model::Model;
use crate::rules::VersionRules;
use chrono::{DateTime, Utc};
use folio_storage::Storage;
use folio_types::{Actor, Fields, Language, LanguageSelector, VersionId};
use std::sync::Arc;
use tracing::{debug, info};

/// A version (`latest` or `changes`) of a model, across all its languages.
///
/// Reads go through the model's memory cache, then the engine cache, then
/// the backend. Every write is checked by [`VersionRules`], filtered by the
/// engine's field filter and drops the cached entries it affects.
///
/// The `changes` version records the actor who last wrote or touched it in
/// the reserved `lock` field. That field is never returned by
/// [`Version::read`] and never stored in `latest`.
#[derive(Debug, Clone)]
pub struct Version {
    model: Arc<Model>,
    id: VersionId,
}

impl Version {
    pub fn new(model: Arc<Model>, id: VersionId) -> Self {
        Self { model, id }
    }

    pub fn id(&self) -> VersionId {
        self.id
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn is_latest(&self) -> bool {
        self.id.is_latest()
    }

    /// The version `id` of the same model.
    pub fn sibling(&self, id: VersionId) -> Version {
        Version::new(Arc::clone(&self.model), id)
    }

    /// Resolves a language selector for this model.
    pub fn language(&self, language: impl Into<LanguageSelector>) -> ContentResult<Language> {
        self.model.language(&language.into())
    }

    /// Returns true if the version exists in the language, or in any
    /// language for `"*"`. Unknown languages never exist.
    pub fn exists(&self, language: impl Into<LanguageSelector>) -> bool {
        let selector = language.into();
        if selector.is_any() {
            return self
                .model
                .languages()
                .iter()
                .any(|language| self.exists_in(language));
        }
        self.model
            .language(&selector)
            .is_ok_and(|language| self.exists_in(&language))
    }

    pub(crate) fn exists_in(&self, language: &Language) -> bool {
        self.model.storage().exists(self.id, language)
    }

    /// Last modification time in a language.
    pub fn modified(
        &self,
        language: impl Into<LanguageSelector>,
    ) -> ContentResult<Option<DateTime<Utc>>> {
        let language = self.language(language)?;
        Ok(self.model.storage().modified(self.id, &language))
    }

    /// Reads the fields of a language.
    pub fn read(&self, language: impl Into<LanguageSelector>) -> ContentResult<Fields> {
        let language = self.language(language)?;
        self.read_in(&language)
    }

    fn read_in(&self, language: &Language) -> ContentResult<Fields> {
        VersionRules::read(self, language)?;
        let mut fields = self.read_raw(language)?;
        fields.remove(LOCK_FIELD);
        Ok(fields)
    }

    /// Fields as stored, lock field included.
    fn read_raw(&self, language: &Language) -> ContentResult<Fields> {
        if let Some(fields) = self.model.cached(self.id, language) {
            return Ok(fields);
        }

        let fields = self.model.storage().read(self.id, language)?;
        self.model.remember(self.id, language, fields.clone());
        Ok(fields)
    }

    /// Creates the version in a language.
    pub fn create(&self, fields: Fields, language: impl Into<LanguageSelector>) -> ContentResult<()> {
        let language = self.language(language)?;
        VersionRules::create(self, &language)?;
        self.create_in(&language, fields, None)
    }

    fn create_in(
        &self,
        language: &Language,
        fields: Fields,
        source_schema: Option<&str>,
    ) -> ContentResult<()> {
        let fields = self.prepare(fields, language, source_schema)?;
        self.model.storage().create(self.id, language, &fields)?;
        // Dropped rather than seeded: backends may normalize on write, so
        // the next read goes back to storage.
        self.model.forget(self.id, language);
        debug!("Created {} of {} in {}", self.id, self.model.id(), language);
        Ok(())
    }

    /// Merges `fields` into the stored fields. Fields that are not passed
    /// keep their value.
    pub fn update(&self, fields: Fields, language: impl Into<LanguageSelector>) -> ContentResult<()> {
        let language = self.language(language)?;
        VersionRules::update(self, &language)?;
        let merged = self.read_raw(&language)?.merged(&fields);
        self.write_in(&language, merged, None)
    }

    /// Replaces the stored fields. Fields that are not passed are dropped.
    pub fn replace(&self, fields: Fields, language: impl Into<LanguageSelector>) -> ContentResult<()> {
        let language = self.language(language)?;
        VersionRules::replace(self, &language)?;
        self.write_in(&language, fields, None)
    }

    /// Creates the version if it is missing, otherwise updates it, or
    /// replaces it with `overwrite`.
    pub fn save(
        &self,
        fields: Fields,
        language: impl Into<LanguageSelector>,
        overwrite: bool,
    ) -> ContentResult<()> {
        let language = self.language(language)?;
        if !self.exists_in(&language) {
            VersionRules::create(self, &language)?;
            return self.create_in(&language, fields, None);
        }

        if overwrite {
            VersionRules::replace(self, &language)?;
            self.write_in(&language, fields, None)
        } else {
            VersionRules::update(self, &language)?;
            let merged = self.read_raw(&language)?.merged(&fields);
            self.write_in(&language, merged, None)
        }
    }

    /// Adopts the content of another model's version, e.g. after a template
    /// change. Identity markers are dropped when the schemas differ.
    pub fn copy_from(
        &self,
        source: &Version,
        from_language: impl Into<LanguageSelector>,
        to_language: impl Into<LanguageSelector>,
    ) -> ContentResult<()> {
        let from = source.language(from_language)?;
        let to = self.language(to_language)?;
        let fields = source.read_in(&from)?;
        let source_schema = source.model.schema();

        if self.exists_in(&to) {
            VersionRules::replace(self, &to)?;
            self.write_in(&to, fields, source_schema)
        } else {
            VersionRules::create(self, &to)?;
            self.create_in(&to, fields, source_schema)
        }
    }

    fn write_in(
        &self,
        language: &Language,
        fields: Fields,
        source_schema: Option<&str>,
    ) -> ContentResult<()> {
        let fields = self.prepare(fields, language, source_schema)?;
        self.model.storage().update(self.id, language, &fields)?;
        self.model.forget(self.id, language);
        debug!("Updated {} of {} in {}", self.id, self.model.id(), language);
        Ok(())
    }

    /// Runs the field filter, rejects field names no backend can store and
    /// stamps the lock field.
    fn prepare(
        &self,
        fields: Fields,
        language: &Language,
        source_schema: Option<&str>,
    ) -> ContentResult<Fields> {
        let context = WriteContext {
            version: self.id,
            language,
            source_schema,
            target_schema: self.model.schema(),
        };
        let fields = self.model.engine().filter().filter(fields, &context);
        if let Some(key) = fields.invalid_key() {
            return Err(ContentError::logic(
                "error.field.invalid",
                format!("The field name {key:?} cannot be stored"),
            ));
        }
        Ok(self.stamp(fields))
    }

    fn stamp(&self, mut fields: Fields) -> Fields {
        fields.remove(LOCK_FIELD);
        if self.id.is_changes() {
            if let Some(actor) = self.model.engine().current_actor() {
                fields.insert(LOCK_FIELD, actor.id());
            }
        }
        fields
    }

    /// Deletes the version in every language.
    pub fn delete(&self) -> ContentResult<()> {
        VersionRules::delete(self)?;
        let storage = self.model.storage();
        for language in self.model.languages() {
            storage.delete(self.id, language)?;
            self.model.forget(self.id, language);
        }
        debug!("Deleted {} of {}", self.id, self.model.id());
        Ok(())
    }

    /// Deletes the version in one language.
    pub fn delete_language(&self, language: impl Into<LanguageSelector>) -> ContentResult<()> {
        let language = self.language(language)?;
        VersionRules::delete_language(self, &language)?;
        self.model.storage().delete(self.id, &language)?;
        self.model.forget(self.id, &language);
        debug!("Deleted {} of {} in {}", self.id, self.model.id(), language);
        Ok(())
    }

    /// Moves a language of this version to another version and/or language
    /// of the same model, optionally into another backend.
    ///
    /// See [`folio_storage::Storage`] for what happens when a move between
    /// two backends fails halfway.
    pub fn move_to(
        &self,
        from_language: impl Into<LanguageSelector>,
        to_version: VersionId,
        to_language: impl Into<LanguageSelector>,
        to_storage: Option<&dyn Storage>,
    ) -> ContentResult<()> {
        let from = self.language(from_language)?;
        let to = self.language(to_language)?;
        let target = self.sibling(to_version);
        VersionRules::move_to(self, &from, &target, &to)?;
        self.move_in(&from, &target, &to, to_storage)
    }

    fn move_in(
        &self,
        from: &Language,
        target: &Version,
        to: &Language,
        to_storage: Option<&dyn Storage>,
    ) -> ContentResult<()> {
        let storage = self.model.storage();
        let destination: &dyn Storage = match to_storage {
            Some(destination) => destination,
            None => storage.as_ref(),
        };
        if storage.is_same(destination) && self.id == target.id && from == to {
            return Ok(());
        }

        storage.move_to(self.id, from, target.id, to, Some(destination))?;
        self.model.forget(self.id, from);
        self.model.forget(target.id, to);

        // The lock field belongs to whoever holds `changes`, never to `latest`.
        let moved = destination.read(target.id, to)?;
        let stamped = target.stamp(moved.clone());
        if stamped != moved {
            destination.update(target.id, to, &stamped)?;
        }

        debug!(
            "Moved {}/{} of {} to {}/{}",
            self.id,
            from,
            self.model.id(),
            target.id,
            to
        );
        Ok(())
    }

    /// Moves `changes` into `latest`.
    pub fn publish(&self, language: impl Into<LanguageSelector>) -> ContentResult<()> {
        let language = self.language(language)?;
        VersionRules::publish(self, &language)?;
        self.move_in(&language, &self.sibling(VersionId::Latest), &language, None)?;
        info!("Published {} of {} in {}", self.id, self.model.id(), language);
        Ok(())
    }

    /// Renews the modification time without changing the content, keeping
    /// the current actor's lock alive.
    pub fn touch(&self, language: impl Into<LanguageSelector>) -> ContentResult<()> {
        let language = self.language(language)?;
        VersionRules::touch(self, &language)?;

        if self.id.is_changes() {
            let stored = self.read_raw(&language)?;
            let stamped = self.stamp(stored.clone());
            if stamped != stored {
                self.model.storage().update(self.id, &language, &stamped)?;
                self.model.forget(self.id, &language);
                return Ok(());
            }
        }

        self.model.storage().touch(self.id, &language)?;
        Ok(())
    }

    /// Fields of `other` that differ from this version in a language.
    ///
    /// Keys missing from `other` are reported with an empty value. A missing
    /// version counts as empty.
    pub fn diff(&self, other: VersionId, language: impl Into<LanguageSelector>) -> ContentResult<Fields> {
        let language = self.language(language)?;
        if other == self.id {
            return Ok(Fields::new());
        }

        let mine = self.read_or_empty(&language)?;
        let theirs = self.sibling(other).read_or_empty(&language)?;
        Ok(mine.diff(&theirs))
    }

    /// True if both versions hold the same fields in a language.
    pub fn is_identical(
        &self,
        other: VersionId,
        language: impl Into<LanguageSelector>,
    ) -> ContentResult<bool> {
        Ok(self.diff(other, language)?.is_empty())
    }

    fn read_or_empty(&self, language: &Language) -> ContentResult<Fields> {
        if self.exists_in(language) {
            self.read_in(language)
        } else {
            Ok(Fields::new())
        }
    }

    /// The editing lock of a language, or the first locked language for
    /// `"*"`.
    ///
    /// Locks are always derived from the `changes` version, whichever
    /// version asks.
    pub fn lock(&self, language: impl Into<LanguageSelector>) -> ContentResult<Lock> {
        let selector = language.into();
        if selector.is_any() {
            for language in self.model.languages() {
                let lock = self.lock_in(language)?;
                if lock.is_locked() {
                    return Ok(lock);
                }
            }
            return Ok(self.model.engine().lock(None, None));
        }

        let language = self.model.language(&selector)?;
        self.lock_in(&language)
    }

    pub(crate) fn lock_in(&self, language: &Language) -> ContentResult<Lock> {
        let changes = self.sibling(VersionId::Changes);
        if !changes.exists_in(language) {
            return Ok(self.model.engine().lock(None, None));
        }

        let fields = changes.read_raw(language)?;
        let actor = fields
            .get(LOCK_FIELD)
            .filter(|id| !id.is_empty())
            .map(Actor::new);
        let modified = self.model.storage().modified(VersionId::Changes, language);
        Ok(self.model.engine().lock(actor, modified))
    }

    /// True if somebody else is editing the language (`"*"`: any language).
    pub fn is_locked(&self, language: impl Into<LanguageSelector>) -> ContentResult<bool> {
        Ok(self.lock(language)?.is_locked())
    }
}
