//! The storage backend contract.

use crate::error::StorageResult;
use chrono::{DateTime, Utc};
use folio_types::{Fields, Language, Languages, VersionId};
use std::fmt;
use tracing::{debug, warn};

/// Physical persistence of one model's content.
///
/// Every method addresses a single (version, language) slot. Backends never
/// merge fields: `update` stores exactly the map it is given. Merging,
/// locking and precondition checks happen one layer up.
pub trait Storage: Send + Sync + fmt::Debug {
    /// Languages this backend stores content for.
    fn languages(&self) -> &Languages;

    /// Returns true if the slot exists.
    fn exists(&self, version: VersionId, language: &Language) -> bool;

    /// Reads the field map of a slot.
    ///
    /// Fails with [`crate::StorageError::NotFound`] if the slot does not exist.
    fn read(&self, version: VersionId, language: &Language) -> StorageResult<Fields>;

    /// Creates a slot.
    ///
    /// Fails with [`crate::StorageError::Logic`] if the physical location is
    /// already taken.
    fn create(&self, version: VersionId, language: &Language, fields: &Fields) -> StorageResult<()>;

    /// Overwrites the field map of an existing slot.
    fn update(&self, version: VersionId, language: &Language, fields: &Fields) -> StorageResult<()>;

    /// Bumps the modification time of an existing slot without touching its
    /// content.
    fn touch(&self, version: VersionId, language: &Language) -> StorageResult<()>;

    /// Removes a slot. Deleting a missing slot is not an error.
    fn delete(&self, version: VersionId, language: &Language) -> StorageResult<()>;

    /// Last modification time of a slot, if it exists.
    fn modified(&self, version: VersionId, language: &Language) -> Option<DateTime<Utc>>;

    /// Backend-specific address of a slot (a file path, a memory key, ...).
    fn address(&self, version: VersionId, language: &Language) -> String;

    /// Addresses of a version's slot in every installed language, in
    /// language order.
    fn content_files(&self, version: VersionId) -> Vec<String> {
        self.languages()
            .iter()
            .map(|language| self.address(version, language))
            .collect()
    }

    /// Every existing (version, language) pair.
    fn all(&self) -> Vec<(VersionId, Language)> {
        let mut slots = Vec::new();
        for version in VersionId::ALL {
            for language in self.languages() {
                if self.exists(version, language) {
                    slots.push((version, language.clone()));
                }
            }
        }
        slots
    }

    /// Deletes both versions of a language.
    fn delete_language(&self, language: &Language) -> StorageResult<()> {
        for version in VersionId::ALL {
            self.delete(version, language)?;
        }
        Ok(())
    }

    /// Touches every existing version of a language.
    fn touch_language(&self, language: &Language) -> StorageResult<()> {
        for version in VersionId::ALL {
            if self.exists(version, language) {
                self.touch(version, language)?;
            }
        }
        Ok(())
    }

    /// True if the backend rejects every mutation.
    fn is_read_only(&self) -> bool {
        false
    }

    /// Fails with [`crate::StorageError::Logic`] if the backend cannot be written.
    fn ensure_writable(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl<'a> dyn Storage + 'a {
    /// Copies a slot, by default within this backend.
    ///
    /// An existing destination is overwritten. Copying a slot onto itself
    /// is a no-op.
    pub fn copy(
        &self,
        from_version: VersionId,
        from_language: &Language,
        to_version: VersionId,
        to_language: &Language,
        target: Option<&dyn Storage>,
    ) -> StorageResult<()> {
        let target: &dyn Storage = match target {
            Some(target) => target,
            None => self,
        };

        if self.is_same_slot(from_version, from_language, to_version, to_language, target) {
            return Ok(());
        }

        target.ensure_writable()?;

        let fields = self.read(from_version, from_language)?;
        write_slot(target, to_version, to_language, &fields)?;

        debug!(
            "Copied {}/{} to {}/{}",
            from_version, from_language, to_version, to_language
        );
        Ok(())
    }

    /// Moves a slot, by default within this backend.
    ///
    /// The move is a copy followed by a delete of the source. Across two
    /// backends this is not atomic: if deleting the source fails after the
    /// copy succeeded, both slots exist and the error is returned to the
    /// caller. Nothing is rolled back.
    pub fn move_to(
        &self,
        from_version: VersionId,
        from_language: &Language,
        to_version: VersionId,
        to_language: &Language,
        target: Option<&dyn Storage>,
    ) -> StorageResult<()> {
        let target: &dyn Storage = match target {
            Some(target) => target,
            None => self,
        };

        if self.is_same_slot(from_version, from_language, to_version, to_language, target) {
            return Ok(());
        }

        self.ensure_writable()?;
        target.ensure_writable()?;

        self.copy(from_version, from_language, to_version, to_language, Some(target))?;

        if let Err(err) = self.delete(from_version, from_language) {
            warn!(
                "Moved {}/{} to {}/{} but could not delete the source: {}",
                from_version, from_language, to_version, to_language, err
            );
            return Err(err);
        }

        Ok(())
    }

    /// Copies every existing slot into `target`.
    pub fn copy_all(&self, target: &dyn Storage) -> StorageResult<()> {
        target.ensure_writable()?;
        for (version, language) in self.all() {
            self.copy(version, &language, version, &language, Some(target))?;
        }
        Ok(())
    }

    /// Moves every existing slot into `target`.
    ///
    /// All slots are copied before any source slot is deleted, so a failed
    /// copy leaves this backend untouched.
    pub fn move_all(&self, target: &dyn Storage) -> StorageResult<()> {
        if self.is_same(target) {
            return Ok(());
        }

        self.ensure_writable()?;
        self.copy_all(target)?;

        for (version, language) in self.all() {
            if let Err(err) = self.delete(version, &language) {
                warn!(
                    "Copied all content but could not delete {}/{} from the source: {}",
                    version, language, err
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Returns true if `other` is this very backend instance.
    pub fn is_same(&self, other: &dyn Storage) -> bool {
        std::ptr::addr_eq(self, other)
    }

    fn is_same_slot(
        &self,
        from_version: VersionId,
        from_language: &Language,
        to_version: VersionId,
        to_language: &Language,
        target: &dyn Storage,
    ) -> bool {
        self.is_same(target) && from_version == to_version && from_language == to_language
    }
}

/// Creates or overwrites a slot.
fn write_slot(
    target: &dyn Storage,
    version: VersionId,
    language: &Language,
    fields: &Fields,
) -> StorageResult<()> {
    if target.exists(version, language) {
        target.update(version, language, fields)
    } else {
        target.create(version, language, fields)
    }
}
