mod common;

use chrono::{TimeDelta, Utc};
use common::{engine_with_actor, page, title};
use folio_content::{ContentConfig, ContentError, CurrentActor, LOCK_FIELD, Lock, Model};
use folio_storage::Storage;
use folio_types::{Actor, Fields, VersionId};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

fn locked_setup() -> (Arc<Model>, Arc<CurrentActor>) {
    let (engine, actor) = engine_with_actor(ContentConfig::default());
    let page = page(&engine);

    actor.set(Some(Actor::new("ada")));
    page.version(VersionId::Latest).create(title("Live"), "en").unwrap();
    page.version(VersionId::Changes).create(title("Ada's draft"), "en").unwrap();

    actor.set(Some(Actor::new("bob")));
    (page, actor)
}

// ── Lock derivation ─────────────────────────────────────────────

#[test]
fn writing_changes_records_the_actor() {
    let (page, _actor) = locked_setup();
    let changes = page.version(VersionId::Changes);

    let en = page.language(&"en".into()).unwrap();
    let raw = page.storage().read(VersionId::Changes, &en).unwrap();
    assert_eq!(raw.get(LOCK_FIELD), Some("ada"));
    assert_eq!(changes.read("en").unwrap(), title("Ada's draft"));

    let lock = changes.lock("en").unwrap();
    assert_eq!(lock.actor(), Some(&Actor::new("ada")));
    assert!(lock.is_active());
    assert!(lock.is_locked());
}

#[test]
fn the_holder_is_not_locked_out() {
    let (page, actor) = locked_setup();
    actor.set(Some(Actor::new("ada")));

    let changes = page.version(VersionId::Changes);
    assert!(!changes.is_locked("en").unwrap());
    changes.update(title("Ada again"), "en").unwrap();
    assert_eq!(changes.read("en").unwrap(), title("Ada again"));
}

#[test]
fn latest_reports_the_lock_of_changes() {
    let (page, _actor) = locked_setup();
    assert!(page.version(VersionId::Latest).is_locked("en").unwrap());
    assert!(!page.version(VersionId::Latest).is_locked("de").unwrap());
}

#[test]
fn wildcard_finds_a_lock_in_any_language() {
    let (page, _actor) = locked_setup();
    let lock = page.version(VersionId::Changes).lock("*").unwrap();
    assert!(lock.is_locked());
    assert_eq!(lock.holder(), "ada");
}

// ── Locked mutations ────────────────────────────────────────────

#[test]
fn locked_content_rejects_writes() {
    let (page, _actor) = locked_setup();
    let changes = page.version(VersionId::Changes);
    let latest = page.version(VersionId::Latest);

    let errors = [
        changes.update(title("Bob"), "en").unwrap_err(),
        changes.replace(title("Bob"), "en").unwrap_err(),
        changes.touch("en").unwrap_err(),
        changes.delete().unwrap_err(),
        changes.delete_language("en").unwrap_err(),
        changes.publish("en").unwrap_err(),
        latest.update(title("Bob"), "en").unwrap_err(),
    ];

    for err in errors {
        assert_eq!(err.key(), "error.content.lock");
        assert!(err.is_retryable());
        assert_eq!(err.lock().and_then(Lock::actor), Some(&Actor::new("ada")));
    }

    assert_eq!(changes.read("en").unwrap(), title("Ada's draft"));
}

#[test]
fn move_checks_the_destination() {
    let (page, _actor) = locked_setup();
    let latest = page.version(VersionId::Latest);
    latest.create(title("German"), "de").unwrap();

    // Moving de onto en would overwrite what Ada is editing.
    let err = latest
        .move_to("de", VersionId::Latest, "en", None)
        .unwrap_err();
    assert!(matches!(err, ContentError::LockedContent { .. }));
    assert!(latest.exists("de"));
}

#[test]
fn reads_are_never_locked() {
    let (page, _actor) = locked_setup();
    assert_eq!(page.version(VersionId::Latest).read("en").unwrap(), title("Live"));
    assert!(page.version(VersionId::Changes).exists("en"));
}

#[test]
fn touch_claims_an_unowned_draft() {
    let (engine, actor) = engine_with_actor(ContentConfig::default());
    let page = page(&engine);
    page.version(VersionId::Latest).create(title("Live"), "en").unwrap();
    page.version(VersionId::Changes).create(title("Draft"), "en").unwrap();
    let changes = page.version(VersionId::Changes);
    assert!(changes.lock("en").unwrap().actor().is_none());

    actor.set(Some(Actor::new("ada")));
    changes.touch("en").unwrap();
    actor.set(Some(Actor::new("bob")));

    assert_eq!(changes.lock("en").unwrap().holder(), "ada");
    assert!(changes.is_locked("en").unwrap());
    assert_eq!(changes.read("en").unwrap(), title("Draft"));
}

#[test]
fn publishing_strips_the_lock_field() {
    let (page, actor) = locked_setup();
    actor.set(Some(Actor::new("ada")));

    page.version(VersionId::Changes).publish("en").unwrap();

    let en = page.language(&"en".into()).unwrap();
    let raw = page.storage().read(VersionId::Latest, &en).unwrap();
    assert_eq!(raw, title("Ada's draft"));
    assert!(!page.version(VersionId::Latest).is_locked("en").unwrap());
}

#[test]
fn caller_supplied_lock_fields_are_ignored() {
    let (page, actor) = locked_setup();
    actor.set(Some(Actor::new("ada")));

    page.version(VersionId::Changes)
        .update(Fields::from([(LOCK_FIELD, "mallory")]), "en")
        .unwrap();

    let lock = page.version(VersionId::Changes).lock("en").unwrap();
    assert_eq!(lock.holder(), "ada");
}

#[test]
fn disabled_locking_never_locks() {
    let config = ContentConfig {
        locking: false,
        ..ContentConfig::default()
    };
    let (engine, actor) = engine_with_actor(config);
    let page = page(&engine);

    actor.set(Some(Actor::new("ada")));
    page.version(VersionId::Latest).create(title("Live"), "en").unwrap();
    page.version(VersionId::Changes).create(title("Draft"), "en").unwrap();
    actor.set(Some(Actor::new("bob")));

    let changes = page.version(VersionId::Changes);
    assert!(changes.lock("en").unwrap().is_active());
    assert!(!changes.is_locked("en").unwrap());
    changes.update(title("Bob"), "en").unwrap();
}

// ── Lock window ─────────────────────────────────────────────────

#[test]
fn lock_expires_after_the_window() {
    let now = Utc::now();
    let lock = Lock::new(Some(Actor::new("ada")), Some(now))
        .with_duration(TimeDelta::minutes(10))
        .viewed_by(Some(Actor::new("bob")));

    assert!(lock.is_locked_at(now + TimeDelta::minutes(9)));
    assert!(!lock.is_locked_at(now + TimeDelta::minutes(10)));
    assert_eq!(lock.expires_at(), Some(now + TimeDelta::minutes(10)));
}

#[test]
fn window_past_the_last_instant_never_expires() {
    let now = Utc::now();
    let lock = Lock::new(Some(Actor::new("ada")), Some(now))
        .with_duration(TimeDelta::MAX)
        .viewed_by(Some(Actor::new("bob")));

    assert_eq!(lock.expires_at(), None);
    assert!(lock.is_active_at(now + TimeDelta::days(365 * 100)));
    assert!(lock.is_locked());
}

#[test]
fn year_long_window_still_guards_changes() {
    let config = ContentConfig {
        lock_duration_secs: folio_content::MAX_LOCK_DURATION_SECS,
        ..ContentConfig::default()
    };
    let (engine, actor) = engine_with_actor(config);
    let page = page(&engine);
    actor.set(Some(Actor::new("ada")));
    page.version(VersionId::Latest).create(title("Live"), "en").unwrap();
    page.version(VersionId::Changes).create(title("Draft"), "en").unwrap();

    actor.set(Some(Actor::new("bob")));
    let err = page
        .version(VersionId::Changes)
        .update(title("Mine"), "en")
        .unwrap_err();

    assert!(matches!(err, ContentError::LockedContent { .. }));
}

proptest! {
    #[test]
    fn lock_holds_exactly_inside_the_window(
        window in 1i64..86_400,
        age in 0i64..172_800,
        holder in "[a-z]{1,8}",
        viewer in "[A-Z]{1,8}",
    ) {
        let now = Utc::now();
        let lock = Lock::new(Some(Actor::new(holder)), Some(now - TimeDelta::seconds(age)))
            .with_duration(TimeDelta::seconds(window))
            .viewed_by(Some(Actor::new(viewer)));

        prop_assert_eq!(lock.is_locked_at(now), age < window);
    }

    #[test]
    fn own_lock_never_blocks(age in 0i64..3_600, holder in "[a-z]{1,8}") {
        let now = Utc::now();
        let lock = Lock::new(Some(Actor::new(holder.clone())), Some(now - TimeDelta::seconds(age)))
            .viewed_by(Some(Actor::new(holder)));

        prop_assert!(!lock.is_locked_at(now));
    }
}

#[test]
fn lock_details_serialize_for_callers() {
    let (page, _actor) = locked_setup();
    let err = page
        .version(VersionId::Changes)
        .update(title("Bob"), "en")
        .unwrap_err();

    let details = serde_json::to_value(err.lock().unwrap()).unwrap();
    assert_eq!(details["actor"], "ada");
    assert!(details["modified"].is_string());
    assert!(details.get("viewer").is_none());
}
