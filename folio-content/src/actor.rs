//! The current actor.

use folio_types::Actor;
use parking_lot::RwLock;

/// Supplies the identity locks are checked against.
///
/// Authentication lives outside the engine; implementations only report who
/// is acting right now.
pub trait ActorSource: Send + Sync {
    /// The acting user, or `None` for anonymous calls.
    fn current(&self) -> Option<Actor>;
}

/// A switchable actor slot.
#[derive(Debug, Default)]
pub struct CurrentActor {
    slot: RwLock<Option<Actor>>,
}

impl CurrentActor {
    /// Creates an empty (anonymous) slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot that starts with `actor`.
    pub fn with(actor: impl Into<Actor>) -> Self {
        Self {
            slot: RwLock::new(Some(actor.into())),
        }
    }

    /// Switches the acting user, returning the previous one.
    pub fn set(&self, actor: Option<Actor>) -> Option<Actor> {
        std::mem::replace(&mut *self.slot.write(), actor)
    }

    pub fn clear(&self) -> Option<Actor> {
        self.set(None)
    }
}

impl ActorSource for CurrentActor {
    fn current(&self) -> Option<Actor> {
        self.slot.read().clone()
    }
}
