use folio_types::{Error, Language, LanguageSelector, Languages, SINGLE_LANGUAGE_CODE};

fn multi() -> Languages {
    Languages::new(vec![
        Language::new("en", "English").as_default(),
        Language::new("de", "Deutsch"),
    ])
    .unwrap()
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn single_site_has_sentinel_language() {
    let langs = Languages::single();
    assert!(!langs.is_multi());
    assert_eq!(langs.len(), 1);
    assert_eq!(langs.default_language().code(), SINGLE_LANGUAGE_CODE);
    assert!(langs.default_language().is_single());
    assert_eq!(langs.default_language().file_segment(), None);
}

#[test]
fn first_language_becomes_default_when_none_flagged() {
    let langs = Languages::from_codes(["fr", "it"]).unwrap();
    assert_eq!(langs.default_language().code(), "fr");
    assert!(langs.is_multi());
    assert_eq!(langs.codes().collect::<Vec<_>>(), vec!["fr", "it"]);
}

#[test]
fn empty_language_list_is_rejected() {
    assert!(matches!(Languages::new(vec![]), Err(Error::InvalidLanguages(_))));
}

#[test]
fn duplicate_codes_are_rejected() {
    let result = Languages::from_codes(["en", "EN"]);
    assert!(matches!(result, Err(Error::InvalidLanguages(_))));
}

#[test]
fn two_defaults_are_rejected() {
    let result = Languages::new(vec![
        Language::new("en", "English").as_default(),
        Language::new("de", "Deutsch").as_default(),
    ]);
    assert!(result.is_err());
}

// ── Selectors ────────────────────────────────────────────────────

#[test]
fn selector_from_str_maps_keywords() {
    assert_eq!(LanguageSelector::from("default"), LanguageSelector::Default);
    assert_eq!(LanguageSelector::from("current"), LanguageSelector::Current);
    assert_eq!(LanguageSelector::from("*"), LanguageSelector::Any);
    assert_eq!(LanguageSelector::from("DE"), LanguageSelector::Code("de".into()));
    assert_eq!(LanguageSelector::from(None::<&str>), LanguageSelector::Default);
}

// ── Resolution ───────────────────────────────────────────────────

#[test]
fn resolve_default_and_current() {
    let langs = multi().with_current("de").unwrap();
    assert_eq!(langs.resolve(&LanguageSelector::Default, true).unwrap().code(), "en");
    assert_eq!(langs.resolve(&LanguageSelector::Current, true).unwrap().code(), "de");
}

#[test]
fn current_falls_back_to_default() {
    let langs = multi();
    assert_eq!(langs.current().code(), "en");
}

#[test]
fn strict_resolution_rejects_unknown_code() {
    let err = multi().resolve(&"fr".into(), true).unwrap_err();
    assert_eq!(err, Error::UnknownLanguage("fr".into()));
}

#[test]
fn code_selector_ignores_case_in_strict_mode() {
    let langs = multi();
    let upper = LanguageSelector::Code("DE".into());
    assert_eq!(langs.resolve(&upper, true).unwrap().code(), "de");
    assert_eq!(langs.resolve(&upper, true), langs.resolve(&"DE".into(), true));
}

#[test]
fn lenient_resolution_coerces_unknown_code() {
    let langs = multi();
    assert_eq!(langs.resolve(&"fr".into(), false).unwrap().code(), "en");
    assert_eq!(
        langs.resolve(&LanguageSelector::or_default("fr"), true).unwrap().code(),
        "en"
    );
}

#[test]
fn wildcard_never_resolves() {
    assert_eq!(multi().resolve(&LanguageSelector::Any, false), Err(Error::AmbiguousLanguage));
    assert_eq!(
        Languages::single().resolve(&LanguageSelector::Any, false),
        Err(Error::AmbiguousLanguage)
    );
}

#[test]
fn single_site_collapses_every_code() {
    let langs = Languages::single();
    let resolved = langs.resolve(&"en".into(), true).unwrap();
    assert!(resolved.is_single());
}

#[test]
fn with_current_rejects_unknown() {
    assert!(multi().with_current("fr").is_err());
}
