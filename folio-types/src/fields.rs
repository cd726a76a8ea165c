//! Field maps.
//!
//! A field map is the raw content payload of one (version, language) slot:
//! string keys mapped to the marshaled string value of each field. Keys are
//! lower-cased on every way in, so lookups never depend on how a backend or a
//! caller spelled them.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Case-insensitive, string-valued field map.
///
/// Iteration order is the sorted key order, which keeps encoded content
/// files stable between writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, String>);

impl Fields {
    /// Creates an empty field map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes a field name the way every field map stores it.
    #[must_use]
    pub fn normalize_key(key: &str) -> String {
        key.trim().to_lowercase()
    }

    /// Returns true if `key` can be stored by every backend.
    ///
    /// Field names must not be empty and must not contain `:` or a line
    /// break, since content files use them to delimit a field.
    #[must_use]
    pub fn is_valid_key(key: &str) -> bool {
        !key.is_empty() && !key.contains([':', '\n', '\r'])
    }

    /// Returns the first field name that fails [`Fields::is_valid_key`].
    #[must_use]
    pub fn invalid_key(&self) -> Option<&str> {
        self.keys().find(|key| !Self::is_valid_key(key))
    }

    /// Inserts a field, returning the previous value for the same key.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.0.insert(Self::normalize_key(key.as_ref()), value.into())
    }

    /// Returns the value of a field, ignoring key case.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&Self::normalize_key(key)).map(String::as_str)
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&Self::normalize_key(key))
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(&Self::normalize_key(key))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Iterates field names in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Overlays `other` on top of this map. Fields missing from `other` are
    /// left untouched.
    pub fn merge(&mut self, other: &Fields) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Returns a copy of this map overlaid with `other`.
    #[must_use]
    pub fn merged(&self, other: &Fields) -> Fields {
        let mut merged = self.clone();
        merged.merge(other);
        merged
    }

    /// Keeps only the fields for which the predicate returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.0.retain(|key, value| keep(key, value));
    }

    /// Returns the fields whose value in `other` differs from this map.
    ///
    /// The result carries `other`'s value for every changed or added key.
    /// A key present here but missing from `other` is reported with an empty
    /// value. Two maps have an empty diff exactly when they are equal.
    #[must_use]
    pub fn diff(&self, other: &Fields) -> Fields {
        let mut diff = Fields::new();

        for (key, value) in &other.0 {
            if self.0.get(key) != Some(value) {
                diff.0.insert(key.clone(), value.clone());
            }
        }

        for key in self.0.keys() {
            if !other.0.contains_key(key) {
                diff.0.insert(key.clone(), String::new());
            }
        }

        diff
    }

    /// Consumes the map, returning the inner `BTreeMap`.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl<K: AsRef<str>, V: Into<String>, const N: usize> From<[(K, V); N]> for Fields {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Fields {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl IntoIterator for Fields {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(raw.into())
    }
}
