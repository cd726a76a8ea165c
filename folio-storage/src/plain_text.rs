//! Plain text file backend.
//!
//! Content lives in `txt` files next to the model it belongs to:
//!
//! ```text
//! content/
//! ├── site.en.txt
//! ├── _changes/site.en.txt
//! └── blog/
//!     ├── article.en.txt          page, latest
//!     ├── article.de.txt
//!     ├── cover.jpg
//!     ├── cover.jpg.en.txt        file metadata, latest
//!     └── _changes/
//!         ├── article.en.txt      page, changes
//!         └── cover.jpg.en.txt
//! ```
//!
//! On single-language sites the language segment is left out. User accounts
//! always use a single `user.txt`.

use crate::error::{StorageError, StorageResult};
use crate::storage::Storage;
use crate::txt;
use chrono::{DateTime, Utc};
use folio_types::{Fields, Language, Languages, ModelKind, VersionId};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Layout knobs for [`PlainTextStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTextOptions {
    /// Content file extension, without the dot.
    pub extension: String,
    /// Name of the sub directory holding the `changes` version.
    pub changes_dir: String,
}

impl Default for PlainTextOptions {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
            changes_dir: "_changes".to_string(),
        }
    }
}

/// Where a model lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLocation {
    /// A page directory and the template that names its content file.
    Page { dir: PathBuf, template: String },
    /// A media file; its content file sits next to it.
    File { parent: PathBuf, filename: String },
    /// The content root.
    Site { root: PathBuf },
    /// A user account directory.
    User { root: PathBuf },
}

impl ContentLocation {
    /// A page below `parent`. Drafts live in the parent's `_drafts` folder.
    pub fn page(parent: impl AsRef<Path>, slug: &str, template: &str, is_draft: bool) -> Self {
        let parent = parent.as_ref();
        let dir = if is_draft {
            parent.join("_drafts").join(slug)
        } else {
            parent.join(slug)
        };
        Self::Page {
            dir,
            template: template.to_string(),
        }
    }

    /// A media file inside `parent`.
    pub fn file(parent: impl Into<PathBuf>, filename: &str) -> Self {
        Self::File {
            parent: parent.into(),
            filename: filename.to_string(),
        }
    }

    pub fn site(root: impl Into<PathBuf>) -> Self {
        Self::Site { root: root.into() }
    }

    pub fn user(root: impl Into<PathBuf>) -> Self {
        Self::User { root: root.into() }
    }

    /// The kind of model stored at this location.
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Page { .. } => ModelKind::Page,
            Self::File { .. } => ModelKind::File,
            Self::Site { .. } => ModelKind::Site,
            Self::User { .. } => ModelKind::User,
        }
    }

    /// Directory that holds the `latest` content files.
    #[must_use]
    pub fn content_dir(&self) -> &Path {
        match self {
            Self::Page { dir, .. } => dir,
            Self::File { parent, .. } => parent,
            Self::Site { root } | Self::User { root } => root,
        }
    }

    /// The resource whose existence stands in for a content file that was
    /// never written.
    #[must_use]
    pub fn resource(&self) -> PathBuf {
        match self {
            Self::Page { dir, .. } => dir.clone(),
            Self::File { parent, filename } => parent.join(filename),
            Self::Site { root } | Self::User { root } => root.clone(),
        }
    }

    fn base_name(&self) -> &str {
        match self {
            Self::Page { template, .. } => template,
            Self::File { filename, .. } => filename,
            Self::Site { .. } => "site",
            Self::User { .. } => "user",
        }
    }
}

/// Stores content as `txt` files on disk.
#[derive(Debug)]
pub struct PlainTextStorage {
    location: ContentLocation,
    languages: Languages,
    options: PlainTextOptions,
}

impl PlainTextStorage {
    /// Creates a file backend for the model at `location`.
    ///
    /// User content is never translated, so user locations always get the
    /// single-language set.
    pub fn new(location: ContentLocation, languages: Languages) -> Self {
        let languages = if location.kind().is_translatable() {
            languages
        } else {
            Languages::single()
        };

        Self {
            location,
            languages,
            options: PlainTextOptions::default(),
        }
    }

    /// Overrides the default layout options.
    #[must_use]
    pub fn with_options(mut self, options: PlainTextOptions) -> Self {
        self.options = options;
        self
    }

    pub fn location(&self) -> &ContentLocation {
        &self.location
    }

    /// Path of the content file for a slot.
    #[must_use]
    pub fn content_file(&self, version: VersionId, language: &Language) -> PathBuf {
        let dir = match version {
            VersionId::Latest => self.location.content_dir().to_path_buf(),
            VersionId::Changes => self.changes_dir(),
        };

        let mut name = self.location.base_name().to_string();
        if self.location.kind().is_translatable() {
            if let Some(segment) = language.file_segment() {
                name.push('.');
                name.push_str(segment);
            }
        }
        name.push('.');
        name.push_str(&self.options.extension);

        dir.join(name)
    }

    fn changes_dir(&self) -> PathBuf {
        self.location.content_dir().join(&self.options.changes_dir)
    }

    /// The published default-language content exists as soon as the model
    /// itself does, even without a content file.
    fn exists_without_file(&self, version: VersionId, language: &Language) -> bool {
        version.is_latest() && language.is_default() && self.location.resource().exists()
    }

    /// Metadata-less files keep no content file for their published version.
    fn skips_empty_file(&self, version: VersionId, fields: &Fields) -> bool {
        fields.is_empty() && version.is_latest() && self.location.kind() == ModelKind::File
    }

    fn write(&self, version: VersionId, language: &Language, fields: &Fields) -> StorageResult<()> {
        let path = self.content_file(version, language);

        if let Some(key) = fields.invalid_key() {
            return Err(StorageError::Logic(format!(
                "The field name {key:?} cannot be written to {}",
                path.display()
            )));
        }

        if self.skips_empty_file(version, fields) {
            if !self.location.resource().exists() {
                return Err(StorageError::not_found(version, language));
            }
            remove_if_exists(&path)?;
            return Ok(());
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, txt::encode(fields))?;
        debug!("Wrote content file {}", path.display());
        Ok(())
    }
}

impl Storage for PlainTextStorage {
    fn languages(&self) -> &Languages {
        &self.languages
    }

    fn exists(&self, version: VersionId, language: &Language) -> bool {
        self.content_file(version, language).is_file() || self.exists_without_file(version, language)
    }

    fn read(&self, version: VersionId, language: &Language) -> StorageResult<Fields> {
        let path = self.content_file(version, language);
        match fs::read_to_string(&path) {
            Ok(input) => Ok(txt::decode(&input)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if self.exists_without_file(version, language) {
                    Ok(Fields::new())
                } else {
                    Err(StorageError::not_found(version, language))
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    fn create(&self, version: VersionId, language: &Language, fields: &Fields) -> StorageResult<()> {
        let path = self.content_file(version, language);
        if path.is_file() {
            return Err(StorageError::Logic(format!(
                "The content file {} already exists",
                path.display()
            )));
        }
        self.write(version, language, fields)
    }

    fn update(&self, version: VersionId, language: &Language, fields: &Fields) -> StorageResult<()> {
        if !self.exists(version, language) {
            return Err(StorageError::not_found(version, language));
        }
        self.write(version, language, fields)
    }

    fn touch(&self, version: VersionId, language: &Language) -> StorageResult<()> {
        let path = self.content_file(version, language);
        if path.is_file() {
            let file = fs::File::options().write(true).open(&path)?;
            file.set_modified(SystemTime::now())?;
            return Ok(());
        }
        if self.exists_without_file(version, language) {
            // Nothing on disk to touch; the resource's own timestamp counts.
            return Ok(());
        }
        Err(StorageError::not_found(version, language))
    }

    fn delete(&self, version: VersionId, language: &Language) -> StorageResult<()> {
        let path = self.content_file(version, language);
        remove_if_exists(&path)?;

        if version.is_changes() {
            remove_dir_if_empty(&self.changes_dir())?;
        }
        Ok(())
    }

    fn modified(&self, version: VersionId, language: &Language) -> Option<DateTime<Utc>> {
        let path = self.content_file(version, language);
        let path = if path.is_file() {
            path
        } else if self.exists_without_file(version, language) {
            self.location.resource()
        } else {
            return None;
        };

        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }

    fn address(&self, version: VersionId, language: &Language) -> String {
        self.content_file(version, language).display().to_string()
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

fn remove_dir_if_empty(dir: &Path) -> io::Result<()> {
    let mut entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    if entries.next().is_none() {
        fs::remove_dir(dir)?;
    }
    Ok(())
}
