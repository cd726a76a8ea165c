//! Read-only snapshot backend.

use crate::error::{StorageError, StorageResult};
use crate::memory::MemoryStorage;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use folio_types::{Fields, Language, Languages, VersionId};

/// A frozen copy of a model's content.
///
/// Handed out to collaborators that must only read. Every mutating call
/// fails with [`StorageError::Logic`], so stale snapshots cannot silently
/// overwrite newer content.
#[derive(Debug)]
pub struct ImmutableMemoryStorage {
    inner: MemoryStorage,
}

impl ImmutableMemoryStorage {
    /// Creates an empty snapshot.
    pub fn new(languages: Languages) -> Self {
        Self {
            inner: MemoryStorage::new(languages),
        }
    }

    /// Freezes the current content of any backend, modification times
    /// included.
    pub fn snapshot(source: &dyn Storage) -> StorageResult<Self> {
        let inner = MemoryStorage::new(source.languages().clone());
        for (version, language) in source.all() {
            let fields = source.read(version, &language)?;
            let modified = source.modified(version, &language).unwrap_or_else(Utc::now);
            inner.insert_entry(version, &language, fields, modified);
        }
        Ok(Self { inner })
    }

    /// Wraps an existing memory backend.
    pub fn from_memory(storage: MemoryStorage) -> Self {
        Self { inner: storage }
    }

    fn deny(action: &str) -> StorageError {
        StorageError::Logic(format!(
            "Storage is immutable and cannot be {action}. Make sure to use the latest alteration of the object."
        ))
    }
}

impl Storage for ImmutableMemoryStorage {
    fn languages(&self) -> &Languages {
        self.inner.languages()
    }

    fn exists(&self, version: VersionId, language: &Language) -> bool {
        self.inner.exists(version, language)
    }

    fn read(&self, version: VersionId, language: &Language) -> StorageResult<Fields> {
        self.inner.read(version, language)
    }

    fn create(&self, _version: VersionId, _language: &Language, _fields: &Fields) -> StorageResult<()> {
        Err(Self::deny("created"))
    }

    fn update(&self, _version: VersionId, _language: &Language, _fields: &Fields) -> StorageResult<()> {
        Err(Self::deny("updated"))
    }

    fn touch(&self, _version: VersionId, _language: &Language) -> StorageResult<()> {
        Err(Self::deny("touched"))
    }

    fn delete(&self, _version: VersionId, _language: &Language) -> StorageResult<()> {
        Err(Self::deny("deleted"))
    }

    fn delete_language(&self, _language: &Language) -> StorageResult<()> {
        Err(Self::deny("deleted"))
    }

    fn touch_language(&self, _language: &Language) -> StorageResult<()> {
        Err(Self::deny("touched"))
    }

    fn modified(&self, version: VersionId, language: &Language) -> Option<DateTime<Utc>> {
        self.inner.modified(version, language)
    }

    fn address(&self, version: VersionId, language: &Language) -> String {
        format!("immutable://{version}/{}", language.code())
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn ensure_writable(&self) -> StorageResult<()> {
        Err(Self::deny("changed"))
    }
}
