//! Decoded field map caches.
//!
//! Two tiers with the same key shape. [`VersionCache`] is owned by the
//! engine and shared by every model instance that points at the same
//! content. [`VersionMemoryCache`] belongs to a single model and is asked
//! first. Neither tier expires entries on its own: every mutation removes
//! the keys it touched.

use folio_types::{Fields, Language, ModelId, VersionId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Identifies one cached field map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub model: ModelId,
    pub version: VersionId,
    pub language: String,
}

impl CacheKey {
    pub fn new(model: &ModelId, version: VersionId, language: &Language) -> Self {
        Self {
            model: model.clone(),
            version,
            language: language.code().to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct Tier {
    entries: RwLock<HashMap<CacheKey, Fields>>,
}

impl Tier {
    fn get(&self, key: &CacheKey) -> Option<Fields> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: CacheKey, fields: Fields) {
        self.entries.write().insert(key, fields);
    }

    fn remove(&self, key: &CacheKey) -> bool {
        self.entries.write().remove(key).is_some()
    }

    fn remove_model(&self, model: &ModelId) {
        self.entries.write().retain(|key, _| &key.model != model);
    }

    fn reset(&self) {
        self.entries.write().clear();
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

macro_rules! cache_tier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        pub struct $name {
            tier: Tier,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Returns the cached field map for `key`.
            pub fn get(&self, key: &CacheKey) -> Option<Fields> {
                self.tier.get(key)
            }

            pub fn set(&self, key: CacheKey, fields: Fields) {
                self.tier.set(key, fields);
            }

            /// Removes one entry, returning true if it was cached.
            pub fn remove(&self, key: &CacheKey) -> bool {
                self.tier.remove(key)
            }

            /// Removes every entry of a model.
            pub fn remove_model(&self, model: &ModelId) {
                self.tier.remove_model(model);
            }

            /// Drops everything.
            pub fn reset(&self) {
                self.tier.reset();
            }

            pub fn len(&self) -> usize {
                self.tier.len()
            }

            pub fn is_empty(&self) -> bool {
                self.tier.len() == 0
            }
        }
    };
}

cache_tier!(
    /// Process-wide cache, shared across model instances.
    VersionCache
);

cache_tier!(
    /// Per-model cache, consulted before [`VersionCache`].
    VersionMemoryCache
);

#[cfg(test)]
mod tests {
    use super::*;

    fn key(model: &str, version: VersionId, code: &str) -> CacheKey {
        CacheKey::new(&ModelId::new(model), version, &Language::new(code, code))
    }

    #[test]
    fn remove_model_keeps_other_models() {
        let cache = VersionCache::new();
        cache.set(key("a", VersionId::Latest, "en"), Fields::new());
        cache.set(key("a", VersionId::Changes, "de"), Fields::new());
        cache.set(key("b", VersionId::Latest, "en"), Fields::new());

        cache.remove_model(&ModelId::new("a"));

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("b", VersionId::Latest, "en")).is_some());
    }

    #[test]
    fn tiers_are_independent() {
        let durable = VersionCache::new();
        let memory = VersionMemoryCache::new();
        durable.set(key("a", VersionId::Latest, "en"), Fields::from([("title", "x")]));

        assert!(memory.get(&key("a", VersionId::Latest, "en")).is_none());
        assert!(!memory.remove(&key("a", VersionId::Latest, "en")));
        assert!(durable.remove(&key("a", VersionId::Latest, "en")));
        assert!(durable.is_empty());
    }
}
