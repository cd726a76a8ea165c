//! The engine context shared by every model.

use crate::actor::{ActorSource, CurrentActor};
use crate::cache::VersionCache;
use crate::config::ContentConfig;
use crate::error::ContentResult;
use crate::filter::{FieldFilter, NoopFieldFilter};
use crate::lock::Lock;
use crate::model::ModelBuilder;
use chrono::{DateTime, Utc};
use folio_types::{Actor, ModelId, ModelKind};
use std::fmt;
use std::sync::Arc;

/// Process-wide state of the versioning engine: configuration, the durable
/// cache tier, the current actor and the dirty field filter.
pub struct ContentEngine {
    config: ContentConfig,
    cache: VersionCache,
    actor: Arc<dyn ActorSource>,
    filter: Arc<dyn FieldFilter>,
}

impl ContentEngine {
    /// Creates an engine with an anonymous actor and no field filtering.
    pub fn new(config: ContentConfig) -> ContentResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: VersionCache::new(),
            actor: Arc::new(CurrentActor::new()),
            filter: Arc::new(NoopFieldFilter),
        })
    }

    /// Sets where the current actor comes from.
    #[must_use]
    pub fn with_actor(mut self, actor: Arc<dyn ActorSource>) -> Self {
        self.actor = actor;
        self
    }

    /// Sets the dirty field filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn FieldFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    /// The durable cache tier.
    pub fn cache(&self) -> &VersionCache {
        &self.cache
    }

    pub fn filter(&self) -> &dyn FieldFilter {
        self.filter.as_ref()
    }

    /// The actor locks are checked against right now.
    pub fn current_actor(&self) -> Option<Actor> {
        self.actor.current()
    }

    /// Starts building a model that uses this engine.
    pub fn model(self: &Arc<Self>, id: impl Into<ModelId>, kind: ModelKind) -> ModelBuilder {
        ModelBuilder::new(Arc::clone(self), id.into(), kind)
    }

    /// A lock with the configured window, checked against the current actor.
    pub fn lock(&self, actor: Option<Actor>, modified: Option<DateTime<Utc>>) -> Lock {
        let lock = Lock::new(actor, modified)
            .with_duration(self.config.lock_duration())
            .viewed_by(self.current_actor());
        if self.config.locking { lock } else { lock.disabled() }
    }
}

impl Default for ContentEngine {
    fn default() -> Self {
        Self {
            config: ContentConfig::default(),
            cache: VersionCache::new(),
            actor: Arc::new(CurrentActor::new()),
            filter: Arc::new(NoopFieldFilter),
        }
    }
}

impl fmt::Debug for ContentEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentEngine")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .field("actor", &self.current_actor())
            .finish_non_exhaustive()
    }
}
