//! Time-windowed content locks.
//!
//! A lock is never stored. It is derived on demand from the modification
//! time of a `changes` slot and the actor recorded in its reserved `lock`
//! field. The content counts as locked while that write is younger than the
//! lock window and was made by somebody other than the caller.

use crate::config::DEFAULT_LOCK_DURATION_SECS;
use chrono::{DateTime, TimeDelta, Utc};
use folio_types::Actor;
use serde::Serialize;

/// Name of the reserved field that records who last edited `changes`.
pub const LOCK_FIELD: &str = "lock";

/// The editing claim on one version and language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lock {
    actor: Option<Actor>,
    modified: Option<DateTime<Utc>>,
    #[serde(skip)]
    viewer: Option<Actor>,
    #[serde(skip)]
    duration: TimeDelta,
    #[serde(skip)]
    enabled: bool,
}

impl Default for Lock {
    fn default() -> Self {
        Self {
            actor: None,
            modified: None,
            viewer: None,
            duration: TimeDelta::seconds(DEFAULT_LOCK_DURATION_SECS as i64),
            enabled: true,
        }
    }
}

impl Lock {
    /// A claim by `actor`, last renewed at `modified`.
    pub fn new(actor: Option<Actor>, modified: Option<DateTime<Utc>>) -> Self {
        Self {
            actor,
            modified,
            ..Self::default()
        }
    }

    /// A lock nobody holds.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the lock window.
    #[must_use]
    pub fn with_duration(mut self, duration: TimeDelta) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the actor the lock is checked against.
    #[must_use]
    pub fn viewed_by(mut self, viewer: Option<Actor>) -> Self {
        self.viewer = viewer;
        self
    }

    /// Turns locking off: [`Lock::is_locked`] always returns false.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The actor holding the claim.
    #[must_use]
    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    /// Display name for error messages.
    #[must_use]
    pub fn holder(&self) -> &str {
        self.actor.as_ref().map_or("an unknown user", Actor::id)
    }

    #[must_use]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.duration
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// When the claim runs out. `None` if there is no claim, or if the
    /// window reaches past the last representable instant.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.actor.as_ref()?;
        self.modified?.checked_add_signed(self.duration)
    }

    /// True while somebody's last edit is inside the lock window.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if self.actor.is_none() {
            return false;
        }
        match self.modified {
            Some(modified) => modified
                .checked_add_signed(self.duration)
                .is_none_or(|expires| expires > now),
            None => false,
        }
    }

    /// True if the claim is active and held by somebody other than the
    /// viewer.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.is_locked_at(Utc::now())
    }

    #[must_use]
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.is_active_at(now) && self.actor != self.viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_without_actor_is_inactive() {
        let lock = Lock::new(None, Some(Utc::now()));
        assert!(!lock.is_active());
        assert!(lock.expires_at().is_none());
        assert_eq!(lock.holder(), "an unknown user");
    }

    #[test]
    fn own_lock_is_active_but_not_locked() {
        let lock = Lock::new(Some(Actor::new("ada")), Some(Utc::now()))
            .viewed_by(Some(Actor::new("ada")));
        assert!(lock.is_active());
        assert!(!lock.is_locked());
    }

    #[test]
    fn anonymous_viewer_is_locked_out() {
        let lock = Lock::new(Some(Actor::new("ada")), Some(Utc::now()));
        assert!(lock.is_locked());
        assert!(!lock.clone().disabled().is_locked());
    }
}
