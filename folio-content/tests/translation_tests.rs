mod common;

use common::{engine, page, title};
use folio_types::VersionId;
use pretty_assertions::assert_eq;

#[test]
fn translations_follow_language_order() {
    let page = page(&engine());
    let translations = page.translations(VersionId::Latest);

    let codes: Vec<_> = translations.iter().map(|t| t.code().to_string()).collect();
    assert_eq!(codes, vec!["en", "de"]);
    assert_eq!(translations.len(), 2);
    assert_eq!(translations.default_translation().unwrap().code(), "en");
    assert!(translations.find("DE").is_some());
    assert!(translations.find("fr").is_none());
}

#[test]
fn translation_reads_its_language() {
    let page = page(&engine());
    let latest = page.version(VersionId::Latest);
    latest.create(title("Hallo"), "de").unwrap();

    let translations = page.translations(VersionId::Latest);
    let de = translations.find("de").unwrap();
    let en = translations.find("en").unwrap();

    assert!(de.exists());
    assert!(!en.exists());
    assert_eq!(de.content().unwrap(), title("Hallo"));
    assert!(de.modified().unwrap().is_some());
    assert!(en.content().unwrap_err().is_not_found());
}

#[test]
fn only_secondary_translations_can_be_deleted() {
    let page = page(&engine());
    let latest = page.version(VersionId::Latest);
    latest.create(title("Hello"), "en").unwrap();
    latest.create(title("Hallo"), "de").unwrap();

    let translations = page.translations(VersionId::Latest);
    let err = translations.find("en").unwrap().delete().unwrap_err();
    assert_eq!(err.key(), "error.language.delete.default");

    translations.find("de").unwrap().delete().unwrap();
    assert!(!latest.exists("de"));
    assert!(latest.exists("en"));
}

#[test]
fn single_language_model_has_one_translation() {
    let engine = engine();
    let site = engine
        .model("site", folio_types::ModelKind::Site)
        .build();
    let translations = site.translations(VersionId::Changes);

    assert_eq!(translations.len(), 1);
    let only = translations.iter().next().unwrap();
    assert!(only.language().is_single());
    assert!(only.is_default());
}

#[test]
fn versions_are_changes_then_latest() {
    let page = page(&engine());
    let versions = page.versions();

    let ids: Vec<_> = versions.iter().map(|v| v.id()).collect();
    assert_eq!(ids, vec![VersionId::Changes, VersionId::Latest]);
    assert!(versions.latest().unwrap().is_latest());
    assert_eq!(versions.changes().unwrap().id(), VersionId::Changes);
    assert_eq!(
        versions.get(VersionId::Latest).unwrap().sibling(VersionId::Changes).id(),
        VersionId::Changes
    );
}
