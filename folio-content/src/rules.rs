//! Preconditions checked before a version is read or changed.

use crate::error::{ContentError, ContentResult};
use crate::version::Version;
use folio_types::{Language, VersionId};

/// Stateless checks shared by every backend.
///
/// Each check returns `Ok(())` or the error the operation must fail with.
/// Nothing here writes.
pub struct VersionRules;

impl VersionRules {
    pub fn create(version: &Version, language: &Language) -> ContentResult<()> {
        if version.exists_in(language) {
            return Err(ContentError::logic(
                "error.version.alreadyExists",
                format!(
                    "The version \"{}\" already exists in language \"{}\"",
                    version.id(),
                    language
                ),
            ));
        }

        if version.id().is_changes() && !version.sibling(VersionId::Latest).exists_in(language) {
            return Err(ContentError::logic(
                "error.version.latestNotFound",
                format!("A matching latest version does not exist in language \"{language}\""),
            ));
        }

        Ok(())
    }

    pub fn read(version: &Version, language: &Language) -> ContentResult<()> {
        Self::ensure(version, language)
    }

    pub fn update(version: &Version, language: &Language) -> ContentResult<()> {
        Self::ensure(version, language)?;
        Self::ensure_not_locked(version, language)
    }

    pub fn replace(version: &Version, language: &Language) -> ContentResult<()> {
        Self::ensure(version, language)?;
        Self::ensure_not_locked(version, language)
    }

    pub fn touch(version: &Version, language: &Language) -> ContentResult<()> {
        Self::ensure(version, language)?;
        Self::ensure_not_locked(version, language)
    }

    /// Deleting a version removes every language, so no language may be
    /// locked.
    pub fn delete(version: &Version) -> ContentResult<()> {
        for language in version.model().languages() {
            Self::ensure_not_locked(version, language)?;
        }
        Ok(())
    }

    pub fn delete_language(version: &Version, language: &Language) -> ContentResult<()> {
        Self::ensure_not_locked(version, language)
    }

    pub fn publish(version: &Version, language: &Language) -> ContentResult<()> {
        if version.is_latest() {
            return Err(ContentError::logic(
                "error.version.alreadyPublished",
                "This version is already published",
            ));
        }

        Self::ensure(version, language)?;
        Self::ensure_not_locked(version, language)
    }

    /// Both ends of a move must be free.
    pub fn move_to(
        from: &Version,
        from_language: &Language,
        to: &Version,
        to_language: &Language,
    ) -> ContentResult<()> {
        Self::ensure(from, from_language)?;
        Self::ensure_not_locked(from, from_language)?;
        Self::ensure_not_locked(to, to_language)
    }

    fn ensure(version: &Version, language: &Language) -> ContentResult<()> {
        if version.exists_in(language) {
            Ok(())
        } else {
            Err(ContentError::NotFound {
                version: version.id(),
                language: language.code().to_string(),
            })
        }
    }

    fn ensure_not_locked(version: &Version, language: &Language) -> ContentResult<()> {
        let lock = version.lock_in(language)?;
        if lock.is_locked() {
            return Err(ContentError::locked(lock));
        }
        Ok(())
    }
}
