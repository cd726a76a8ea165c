//! In-memory storage backend.

use crate::error::{StorageError, StorageResult};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use folio_types::{Fields, Language, Languages, VersionId};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// A stored slot.
#[derive(Debug, Clone)]
struct Entry {
    fields: Fields,
    modified: DateTime<Utc>,
}

type SlotKey = (VersionId, String);

/// Keeps content in process memory.
///
/// Nothing survives the process; used for tests, previews and models that
/// are never persisted.
#[derive(Debug)]
pub struct MemoryStorage {
    languages: Languages,
    entries: RwLock<HashMap<SlotKey, Entry>>,
}

impl MemoryStorage {
    /// Creates an empty memory backend.
    pub fn new(languages: Languages) -> Self {
        Self {
            languages,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored slots.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Stores a slot with an explicit modification time, replacing any
    /// existing entry.
    pub(crate) fn insert_entry(
        &self,
        version: VersionId,
        language: &Language,
        fields: Fields,
        modified: DateTime<Utc>,
    ) {
        self.entries
            .write()
            .insert(key(version, language), Entry { fields, modified });
    }
}

fn key(version: VersionId, language: &Language) -> SlotKey {
    (version, language.code().to_string())
}

impl Storage for MemoryStorage {
    fn languages(&self) -> &Languages {
        &self.languages
    }

    fn exists(&self, version: VersionId, language: &Language) -> bool {
        self.entries.read().contains_key(&key(version, language))
    }

    fn read(&self, version: VersionId, language: &Language) -> StorageResult<Fields> {
        self.entries
            .read()
            .get(&key(version, language))
            .map(|entry| entry.fields.clone())
            .ok_or_else(|| StorageError::not_found(version, language))
    }

    fn create(&self, version: VersionId, language: &Language, fields: &Fields) -> StorageResult<()> {
        let mut entries = self.entries.write();
        let slot = key(version, language);
        if entries.contains_key(&slot) {
            return Err(StorageError::Logic(format!(
                "The version \"{version}\" already exists in language \"{language}\""
            )));
        }
        entries.insert(
            slot,
            Entry {
                fields: fields.clone(),
                modified: Utc::now(),
            },
        );
        debug!("Created {}/{} in memory", version, language);
        Ok(())
    }

    fn update(&self, version: VersionId, language: &Language, fields: &Fields) -> StorageResult<()> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(&key(version, language))
            .ok_or_else(|| StorageError::not_found(version, language))?;
        entry.fields = fields.clone();
        entry.modified = Utc::now();
        Ok(())
    }

    fn touch(&self, version: VersionId, language: &Language) -> StorageResult<()> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(&key(version, language))
            .ok_or_else(|| StorageError::not_found(version, language))?;
        entry.modified = Utc::now();
        Ok(())
    }

    fn delete(&self, version: VersionId, language: &Language) -> StorageResult<()> {
        self.entries.write().remove(&key(version, language));
        Ok(())
    }

    fn modified(&self, version: VersionId, language: &Language) -> Option<DateTime<Utc>> {
        self.entries
            .read()
            .get(&key(version, language))
            .map(|entry| entry.modified)
    }

    fn address(&self, version: VersionId, language: &Language) -> String {
        format!("memory://{version}/{}", language.code())
    }
}
