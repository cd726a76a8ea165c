use folio_types::Fields;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn keys_are_lowercased_on_insert() {
    let mut fields = Fields::new();
    fields.insert("Title", "Hello");
    assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["title"]);
    assert_eq!(fields.get("TITLE"), Some("Hello"));
    assert!(fields.contains_key("title"));
}

#[test]
fn from_pairs_normalizes() {
    let fields = Fields::from([("Text", "a"), ("TEXT", "b")]);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields.get("text"), Some("b"));
}

#[test]
fn merge_leaves_missing_fields_untouched() {
    let mut base = Fields::from([("title", "A"), ("text", "B")]);
    base.merge(&Fields::from([("Title", "C")]));
    assert_eq!(base, Fields::from([("title", "C"), ("text", "B")]));
}

#[test]
fn diff_reports_changed_added_and_removed() {
    let a = Fields::from([("title", "A"), ("text", "same"), ("old", "x")]);
    let b = Fields::from([("title", "B"), ("text", "same"), ("new", "y")]);
    let diff = a.diff(&b);
    assert_eq!(
        diff,
        Fields::from([("title", "B"), ("new", "y"), ("old", "")])
    );
}

#[test]
fn diff_of_equal_maps_is_empty() {
    let a = Fields::from([("title", "A")]);
    assert!(a.diff(&a.clone()).is_empty());
    assert!(Fields::new().diff(&Fields::new()).is_empty());
}

#[test]
fn deserialize_lowercases_keys() {
    let fields: Fields = serde_json::from_str(r#"{"Title":"x","Text":"y"}"#).unwrap();
    assert_eq!(fields.get("title"), Some("x"));
    assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["text", "title"]);
}

#[test]
fn retain_filters_fields() {
    let mut fields = Fields::from([("a", "1"), ("b", "2")]);
    fields.retain(|key, _| key != "a");
    assert_eq!(fields, Fields::from([("b", "2")]));
}

#[test]
fn field_names_with_delimiters_are_invalid() {
    assert!(Fields::is_valid_key("title"));
    assert!(Fields::is_valid_key("seo title"));
    assert!(!Fields::is_valid_key(""));
    assert!(!Fields::is_valid_key("seo:title"));
    assert!(!Fields::is_valid_key("two\nlines"));

    let fields = Fields::from([("title", "Hello"), ("seo:title", "Hi")]);
    assert_eq!(fields.invalid_key(), Some("seo:title"));
    assert_eq!(Fields::from([("title", "Hello")]).invalid_key(), None);
}

fn fields_strategy() -> impl Strategy<Value = Fields> {
    prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9 ]{0,8}", 0..8).prop_map(Fields::from)
}

proptest! {
    #[test]
    fn diff_is_empty_iff_equal(a in fields_strategy(), b in fields_strategy()) {
        prop_assert_eq!(a.diff(&b).is_empty(), a == b);
        prop_assert_eq!(b.diff(&a).is_empty(), a == b);
    }

    #[test]
    fn merging_the_diff_yields_other_keys(a in fields_strategy(), b in fields_strategy()) {
        let merged = a.merged(&a.diff(&b));
        for (key, value) in &b {
            prop_assert_eq!(merged.get(key), Some(value.as_str()));
        }
    }
}
