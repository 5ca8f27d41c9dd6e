//! Integration tests for post URL resolution through the public API.

use leadgate_core::resolver::{KeySource, legacy, resolve_with_source};
use leadgate_core::{ActivityKey, ResolveError, resolve, resolve_pair};

const SHAPES_OF_ONE_POST: &[&str] = &[
    "https://www.linkedin.com/feed/update/urn:li:activity:7051234567890123456/",
    "https://www.linkedin.com/feed/update/urn:li:activity:7051234567890123456",
    "http://linkedin.com/feed/update/urn:li:activity:7051234567890123456/?utm_source=share&utm_medium=member_desktop",
    "https://www.linkedin.com/posts/jane-doe_rust-tips-activity-7051234567890123456-AbCd",
    "https://www.linkedin.com/posts/jane-doe_rust-tips-activity-7051234567890123456-AbCd?trk=public_profile",
    "https://de.linkedin.com/posts/jane-doe_rust-tips-activity-7051234567890123456-AbCd/#comments",
];

#[test]
fn test_every_shape_of_a_post_resolves_to_one_key() {
    for url in SHAPES_OF_ONE_POST {
        let key = resolve(Some(url)).unwrap_or_else(|e| panic!("{url}: {e}"));
        assert_eq!(key.as_str(), "7051234567890123456", "url: {url}");
    }
}

#[test]
fn test_legacy_normalization_does_not_unify_shapes() {
    let distinct: std::collections::HashSet<_> = SHAPES_OF_ONE_POST
        .iter()
        .filter_map(|url| legacy::normalize_post_url(url))
        .collect();
    assert!(distinct.len() > 1);
}

#[test]
fn test_resolved_keys_are_canonical() {
    for url in SHAPES_OF_ONE_POST {
        let key = resolve(Some(url)).unwrap();
        assert!(ActivityKey::is_canonical(key.as_str()));
    }
}

#[test]
fn test_urn_wins_when_both_forms_present() {
    let url = "https://www.linkedin.com/posts/a_b-activity-1111-x?shareUrn=urn:li:activity:2222";
    let (key, source) = resolve_with_source(Some(url)).unwrap();
    assert_eq!(key.as_str(), "2222");
    assert_eq!(source, KeySource::Urn);
}

#[test]
fn test_slug_source_reported() {
    let (_, source) =
        resolve_with_source(Some("https://www.linkedin.com/posts/a_b-activity-3-x")).unwrap();
    assert_eq!(source, KeySource::Slug);
}

#[test]
fn test_non_post_urls_do_not_resolve() {
    for url in [
        "https://www.linkedin.com/in/someone/",
        "https://www.linkedin.com/company/acme/",
        "https://example.com/not-a-linkedin-url",
        "not a url at all",
        "",
    ] {
        assert!(
            matches!(resolve(Some(url)), Err(ResolveError::NoActivityId { .. })),
            "url: {url}"
        );
    }
}

#[test]
fn test_unicode_digits_are_not_activity_ids() {
    for url in [
        "https://www.linkedin.com/feed/update/urn:li:activity:\u{661}\u{662}\u{663}/",
        "https://www.linkedin.com/posts/jane_title-activity-\u{966}\u{967}-AbCd",
    ] {
        assert!(
            matches!(resolve(Some(url)), Err(ResolveError::NoActivityId { .. })),
            "url: {url}"
        );
    }
}

#[test]
fn test_absent_url_is_distinct_from_unresolvable() {
    assert_eq!(resolve(None), Err(ResolveError::Absent));
    assert_eq!(resolve_pair(None), (String::new(), false));
}

#[test]
fn test_pair_form_agrees_with_result_form() {
    for url in SHAPES_OF_ONE_POST {
        let (key, found) = resolve_pair(Some(url));
        assert!(found);
        assert_eq!(key, resolve(Some(url)).unwrap().into_string());
    }
}
