//! Content models and their backend slot.

use crate::cache::{CacheKey, VersionMemoryCache};
use crate::engine::ContentEngine;
use crate::error::ContentResult;
use crate::translation::Translations;
use crate::version::Version;
use crate::versions::Versions;
use folio_storage::{
    ContentLocation, ImmutableMemoryStorage, MemoryStorage, PlainTextStorage, Storage,
};
use folio_types::{Fields, Language, LanguageSelector, Languages, ModelId, ModelKind, VersionId};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

enum Backend {
    Memory,
    PlainText(ContentLocation),
    Given(Arc<dyn Storage>),
}

/// Builder returned by [`ContentEngine::model`].
pub struct ModelBuilder {
    engine: Arc<ContentEngine>,
    id: ModelId,
    kind: ModelKind,
    languages: Languages,
    is_draft: bool,
    schema: Option<String>,
    backend: Backend,
}

impl ModelBuilder {
    pub(crate) fn new(engine: Arc<ContentEngine>, id: ModelId, kind: ModelKind) -> Self {
        Self {
            engine,
            id,
            kind,
            languages: Languages::single(),
            is_draft: false,
            schema: None,
            backend: Backend::Memory,
        }
    }

    /// Installed languages. Ignored for user accounts and for backends passed
    /// in with [`ModelBuilder::storage`], which bring their own.
    #[must_use]
    pub fn languages(mut self, languages: Languages) -> Self {
        self.languages = languages;
        self
    }

    #[must_use]
    pub fn draft(mut self, is_draft: bool) -> Self {
        self.is_draft = is_draft;
        self
    }

    /// Name of the content schema (page template, file template, ...).
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Uses a ready backend.
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.backend = Backend::Given(storage);
        self
    }

    /// Stores content as plain text files at `location`, laid out as the
    /// engine config says.
    #[must_use]
    pub fn plain_text(mut self, location: ContentLocation) -> Self {
        self.backend = Backend::PlainText(location);
        self
    }

    pub fn build(self) -> Arc<Model> {
        let languages = if self.kind.is_translatable() {
            self.languages
        } else {
            Languages::single()
        };

        let storage: Arc<dyn Storage> = match self.backend {
            Backend::Memory => Arc::new(MemoryStorage::new(languages)),
            Backend::PlainText(location) => Arc::new(
                PlainTextStorage::new(location, languages)
                    .with_options(self.engine.config().to_plain_text_options()),
            ),
            Backend::Given(storage) => storage,
        };

        Arc::new(Model {
            id: self.id,
            kind: self.kind,
            languages: storage.languages().clone(),
            is_draft: self.is_draft,
            schema: self.schema,
            storage: RwLock::new(storage),
            memory_cache: VersionMemoryCache::new(),
            engine: self.engine,
        })
    }
}

/// A page, file, site or user whose content the engine versions.
#[derive(Debug)]
pub struct Model {
    id: ModelId,
    kind: ModelKind,
    languages: Languages,
    is_draft: bool,
    schema: Option<String>,
    storage: RwLock<Arc<dyn Storage>>,
    memory_cache: VersionMemoryCache,
    engine: Arc<ContentEngine>,
}

impl Model {
    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn languages(&self) -> &Languages {
        &self.languages
    }

    pub fn is_draft(&self) -> bool {
        self.is_draft
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn engine(&self) -> &Arc<ContentEngine> {
        &self.engine
    }

    /// The current backend.
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage.read())
    }

    pub fn memory_cache(&self) -> &VersionMemoryCache {
        &self.memory_cache
    }

    pub fn version(self: &Arc<Self>, id: VersionId) -> Version {
        Version::new(Arc::clone(self), id)
    }

    pub fn versions(self: &Arc<Self>) -> Versions {
        Versions::load(self)
    }

    pub fn translations(self: &Arc<Self>, version: VersionId) -> Translations {
        Translations::load(self, version)
    }

    /// Resolves a language selector with the configured strictness.
    pub fn language(&self, selector: &LanguageSelector) -> ContentResult<Language> {
        let strict = self.engine.config().strict_languages;
        Ok(self.languages.resolve(selector, strict)?)
    }

    /// Moves (or copies) all content to another backend and switches to it.
    ///
    /// Both cache tiers are flushed for this model. On failure the old
    /// backend stays in place; a failed move may leave content in both.
    pub fn change_storage(&self, backend: Arc<dyn Storage>, copy: bool) -> ContentResult<()> {
        let mut slot = self.storage.write();
        if slot.is_same(backend.as_ref()) {
            return Ok(());
        }

        if copy {
            slot.copy_all(backend.as_ref())?;
        } else {
            slot.move_all(backend.as_ref())?;
        }
        *slot = backend;
        drop(slot);

        self.flush_caches();
        info!(
            "Switched storage of {} {} ({})",
            self.kind,
            self.id,
            if copy { "copied" } else { "moved" }
        );
        Ok(())
    }

    /// A read-only twin of this model holding a frozen copy of its content.
    pub fn snapshot(&self) -> ContentResult<Arc<Model>> {
        let storage = self.storage();
        let frozen = ImmutableMemoryStorage::snapshot(storage.as_ref())?;

        Ok(Arc::new(Model {
            id: self.id.clone(),
            kind: self.kind,
            languages: self.languages.clone(),
            is_draft: self.is_draft,
            schema: self.schema.clone(),
            storage: RwLock::new(Arc::new(frozen)),
            memory_cache: VersionMemoryCache::new(),
            engine: Arc::clone(&self.engine),
        }))
    }

    /// Drops this model's entries from both cache tiers.
    pub fn flush_caches(&self) {
        self.memory_cache.reset();
        self.engine.cache().remove_model(&self.id);
    }

    // Read-only backends never touch the durable tier, which is shared with
    // live instances of the same model.

    pub(crate) fn cached(&self, version: VersionId, language: &Language) -> Option<Fields> {
        let key = CacheKey::new(&self.id, version, language);
        if let Some(fields) = self.memory_cache.get(&key) {
            return Some(fields);
        }
        if self.storage.read().is_read_only() {
            return None;
        }
        let fields = self.engine.cache().get(&key)?;
        self.memory_cache.set(key, fields.clone());
        Some(fields)
    }

    pub(crate) fn remember(&self, version: VersionId, language: &Language, fields: Fields) {
        let key = CacheKey::new(&self.id, version, language);
        if !self.storage.read().is_read_only() {
            self.engine.cache().set(key.clone(), fields.clone());
        }
        self.memory_cache.set(key, fields);
    }

    pub(crate) fn forget(&self, version: VersionId, language: &Language) {
        let key = CacheKey::new(&self.id, version, language);
        self.memory_cache.remove(&key);
        self.engine.cache().remove(&key);
    }
}
