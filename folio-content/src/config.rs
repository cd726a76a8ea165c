//! Engine configuration.
//!
//! ```toml
//! locking = true
//! lock_duration_secs = 600
//! strict_languages = true
//!
//! [plain_text]
//! extension = "txt"
//! changes_dir = "_changes"
//! ```

use crate::error::{ContentError, ContentResult};
use chrono::TimeDelta;
use folio_storage::PlainTextOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default lock window: ten minutes.
pub const DEFAULT_LOCK_DURATION_SECS: u64 = 600;

/// Longest accepted lock window: one year.
pub const MAX_LOCK_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Configuration for a [`crate::ContentEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Global switch for content locking.
    pub locking: bool,
    /// How long a write or touch keeps the content locked for others.
    pub lock_duration_secs: u64,
    /// Reject unknown language codes instead of falling back to the default.
    pub strict_languages: bool,
    /// Layout of the plain text backend.
    pub plain_text: PlainTextConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            locking: true,
            lock_duration_secs: DEFAULT_LOCK_DURATION_SECS,
            strict_languages: true,
            plain_text: PlainTextConfig::default(),
        }
    }
}

/// File layout knobs for the plain text backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlainTextConfig {
    pub extension: String,
    pub changes_dir: String,
}

impl Default for PlainTextConfig {
    fn default() -> Self {
        let options = PlainTextOptions::default();
        Self {
            extension: options.extension,
            changes_dir: options.changes_dir,
        }
    }
}

impl ContentConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(input: &str) -> ContentResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| ContentError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ContentResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .map_err(|e| ContentError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&input)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> ContentResult<String> {
        toml::to_string(self).map_err(|e| ContentError::Config(e.to_string()))
    }

    pub fn validate(&self) -> ContentResult<()> {
        if self.lock_duration_secs == 0 {
            return Err(ContentError::Config(
                "lock_duration_secs must be greater than zero".into(),
            ));
        }
        if self.lock_duration_secs > MAX_LOCK_DURATION_SECS || self.lock_window().is_none() {
            return Err(ContentError::Config(format!(
                "lock_duration_secs is out of range: {}",
                self.lock_duration_secs
            )));
        }

        let plain_text = &self.plain_text;
        if plain_text.extension.is_empty() || plain_text.extension.contains(['.', '/', '\\']) {
            return Err(ContentError::Config(format!(
                "invalid content file extension: {:?}",
                plain_text.extension
            )));
        }
        if plain_text.changes_dir.is_empty() || plain_text.changes_dir.contains(['/', '\\']) {
            return Err(ContentError::Config(format!(
                "invalid changes directory: {:?}",
                plain_text.changes_dir
            )));
        }
        Ok(())
    }

    /// The lock window.
    #[must_use]
    pub fn lock_duration(&self) -> TimeDelta {
        self.lock_window()
            .unwrap_or_else(|| TimeDelta::seconds(DEFAULT_LOCK_DURATION_SECS as i64))
    }

    /// Options for [`folio_storage::PlainTextStorage::with_options`].
    #[must_use]
    pub fn to_plain_text_options(&self) -> PlainTextOptions {
        PlainTextOptions {
            extension: self.plain_text.extension.clone(),
            changes_dir: self.plain_text.changes_dir.clone(),
        }
    }

    fn lock_window(&self) -> Option<TimeDelta> {
        i64::try_from(self.lock_duration_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
    }
}
