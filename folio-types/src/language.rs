//! Languages and language resolution.
//!
//! A site is either single-language, in which case every piece of content
//! lives under one sentinel language, or multi-language with a fixed list of
//! installed languages, one of them the default.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Code of the sentinel language used on single-language sites.
pub const SINGLE_LANGUAGE_CODE: &str = "default";

/// An installed language, or the single-language sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    code: String,
    name: String,
    #[serde(default)]
    is_default: bool,
    #[serde(default)]
    is_single: bool,
}

impl Language {
    /// Creates a (non-default) language.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into().to_lowercase(),
            name: name.into(),
            is_default: false,
            is_single: false,
        }
    }

    /// The sentinel language of a single-language site.
    #[must_use]
    pub fn single() -> Self {
        Self {
            code: SINGLE_LANGUAGE_CODE.to_string(),
            name: SINGLE_LANGUAGE_CODE.to_string(),
            is_default: true,
            is_single: true,
        }
    }

    /// Marks this language as the site default.
    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Language code (`en`, `de`, ... or `default` for the sentinel).
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// True for the single-language sentinel.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.is_single
    }

    /// The segment a file backend appends to content file names, if any.
    #[must_use]
    pub fn file_segment(&self) -> Option<&str> {
        if self.is_single { None } else { Some(&self.code) }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// How a caller addresses a language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LanguageSelector {
    /// The site's default language.
    Default,
    /// The currently active language.
    Current,
    /// A concrete code; unknown codes follow the configured strictness.
    Code(String),
    /// A concrete code that silently falls back to the default when unknown.
    OrDefault(String),
    /// Every installed language (`*`).
    Any,
}

impl LanguageSelector {
    /// Selects `code`, falling back to the default language when it is unknown.
    pub fn or_default(code: impl Into<String>) -> Self {
        Self::OrDefault(code.into())
    }

    /// Returns true for the `*` wildcard.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<&str> for LanguageSelector {
    fn from(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "current" => Self::Current,
            "*" => Self::Any,
            code => Self::Code(code.to_lowercase()),
        }
    }
}

impl From<String> for LanguageSelector {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Option<&str>> for LanguageSelector {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Default, Self::from)
    }
}

impl From<&Language> for LanguageSelector {
    fn from(language: &Language) -> Self {
        if language.is_single() {
            Self::Default
        } else {
            Self::Code(language.code().to_string())
        }
    }
}

impl From<Language> for LanguageSelector {
    fn from(language: Language) -> Self {
        Self::from(&language)
    }
}

/// The installed language set of a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Languages {
    list: Vec<Language>,
    current: Option<String>,
}

impl Languages {
    /// Language set of a single-language site.
    #[must_use]
    pub fn single() -> Self {
        Self {
            list: vec![Language::single()],
            current: None,
        }
    }

    /// Builds a multi-language set.
    ///
    /// If no language is flagged as default, the first one becomes the
    /// default.
    pub fn new(mut list: Vec<Language>) -> Result<Self> {
        if list.is_empty() {
            return Err(Error::InvalidLanguages("at least one language is required".into()));
        }

        let mut seen = HashSet::new();
        for language in &list {
            if language.is_single() {
                return Err(Error::InvalidLanguages(
                    "the single-language sentinel cannot be installed".into(),
                ));
            }
            if !seen.insert(language.code().to_string()) {
                return Err(Error::InvalidLanguages(format!(
                    "duplicate language code: {}",
                    language.code()
                )));
            }
        }

        match list.iter().filter(|l| l.is_default()).count() {
            0 => list[0].is_default = true,
            1 => {}
            _ => {
                return Err(Error::InvalidLanguages(
                    "only one language can be the default".into(),
                ));
            }
        }

        Ok(Self { list, current: None })
    }

    /// Builds a multi-language set from codes; the first code is the default.
    pub fn from_codes<I, S>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = codes
            .into_iter()
            .map(|code| Language::new(code.as_ref(), code.as_ref()))
            .collect();
        Self::new(list)
    }

    /// Sets the currently active language.
    pub fn with_current(mut self, code: &str) -> Result<Self> {
        if !self.is_multi() {
            return Ok(self);
        }
        let code = code.to_lowercase();
        if self.find(&code).is_none() {
            return Err(Error::UnknownLanguage(code));
        }
        self.current = Some(code);
        Ok(self)
    }

    /// True when the site has real installed languages.
    #[must_use]
    pub fn is_multi(&self) -> bool {
        !self.list[0].is_single()
    }

    /// The default language (the sentinel on single-language sites).
    #[must_use]
    pub fn default_language(&self) -> &Language {
        self.list
            .iter()
            .find(|l| l.is_default())
            .unwrap_or(&self.list[0])
    }

    /// The currently active language, or the default when none is set.
    #[must_use]
    pub fn current(&self) -> &Language {
        self.current
            .as_deref()
            .and_then(|code| self.find(code))
            .unwrap_or_else(|| self.default_language())
    }

    /// Looks up an installed language by code.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&Language> {
        self.list.iter().find(|l| l.code() == code)
    }

    /// Iterates languages in configuration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Language> {
        self.list.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Installed language codes in configuration order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.list.iter().map(Language::code)
    }

    /// Resolves a selector to exactly one language.
    ///
    /// On a single-language site every concrete selector collapses to the
    /// sentinel. With `strict`, unknown codes are rejected; otherwise they
    /// fall back to the default language. `OrDefault` is always lenient.
    pub fn resolve(&self, selector: &LanguageSelector, strict: bool) -> Result<Language> {
        if selector.is_any() {
            return Err(Error::AmbiguousLanguage);
        }

        if !self.is_multi() {
            return Ok(self.list[0].clone());
        }

        let language = match selector {
            LanguageSelector::Default => self.default_language(),
            LanguageSelector::Current => self.current(),
            LanguageSelector::Code(code) => match self.find(&code.to_lowercase()) {
                Some(language) => language,
                None if strict => return Err(Error::UnknownLanguage(code.clone())),
                None => self.default_language(),
            },
            LanguageSelector::OrDefault(code) => self
                .find(&code.to_lowercase())
                .unwrap_or_else(|| self.default_language()),
            LanguageSelector::Any => return Err(Error::AmbiguousLanguage),
        };

        Ok(language.clone())
    }
}

impl Default for Languages {
    fn default() -> Self {
        Self::single()
    }
}

impl<'a> IntoIterator for &'a Languages {
    type Item = &'a Language;
    type IntoIter = std::slice::Iter<'a, Language>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
