//! LinkedIn post URL resolution.
//!
//! A post can be linked in many shapes (`/feed/update/urn:li:activity:N/`,
//! `/posts/author_title-activity-N-xyz`, with or without tracking parameters),
//! but every shape embeds the same numeric activity ID. [`resolve`] extracts
//! that ID and uses it as the canonical lookup key for registered resources.
//!
//! Resolution is pure: no normalization of scheme, host, path or query is
//! performed, and the same input always produces the same result.
//!
//! # Example
//!
//! ```
//! use leadgate_core::resolver::resolve;
//!
//! let key = resolve(Some("https://www.linkedin.com/feed/update/urn:li:activity:705123/")).unwrap();
//! assert_eq!(key.as_str(), "705123");
//! assert!(resolve(Some("https://www.linkedin.com/in/someone/")).is_err());
//! ```

mod error;
pub mod legacy;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

pub use error::ResolveError;

/// Activity URN embedded in feed links, e.g. `urn:li:activity:7051234567890123456`.
#[allow(clippy::expect_used)]
static ACTIVITY_URN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"urn:li:activity:([0-9]+)").expect("activity URN regex is valid") // Static pattern, safe to panic
});

/// Slug suffix used by `/posts/` links, e.g. `jane-doe_title-activity-67890-AbCd`.
#[allow(clippy::expect_used)]
static ACTIVITY_SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"activity-([0-9]+)").expect("activity slug regex is valid") // Static pattern, safe to panic
});

/// Canonical lookup key for a LinkedIn post: its numeric activity ID.
///
/// Only [`resolve`] constructs keys, so a key always holds a non-empty
/// string of ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ActivityKey(String);

impl ActivityKey {
    /// Returns the key as stored in the resource table.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the digit string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns true when `value` already has the shape of an activity key.
    #[must_use]
    pub fn is_canonical(value: &str) -> bool {
        !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which embedded pattern produced a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// `urn:li:activity:<digits>`
    Urn,
    /// `activity-<digits>`
    Slug,
}

/// Resolves a post URL to its canonical [`ActivityKey`].
///
/// The activity URN takes precedence over the slug form when an input
/// contains both.
///
/// # Errors
///
/// Returns [`ResolveError::Absent`] for `None` and
/// [`ResolveError::NoActivityId`] when neither pattern occurs in the input.
pub fn resolve(url: Option<&str>) -> Result<ActivityKey, ResolveError> {
    resolve_with_source(url).map(|(key, _)| key)
}

/// Like [`resolve`], but also reports which pattern matched.
///
/// # Errors
///
/// Same as [`resolve`].
pub fn resolve_with_source(url: Option<&str>) -> Result<(ActivityKey, KeySource), ResolveError> {
    let Some(input) = url else {
        debug!("no post URL supplied");
        return Err(ResolveError::Absent);
    };

    if let Some(digits) = capture_digits(&ACTIVITY_URN_PATTERN, input) {
        trace!(key = digits, "resolved from activity URN");
        return Ok((ActivityKey(digits.to_string()), KeySource::Urn));
    }

    if let Some(digits) = capture_digits(&ACTIVITY_SLUG_PATTERN, input) {
        trace!(key = digits, "resolved from activity slug");
        return Ok((ActivityKey(digits.to_string()), KeySource::Slug));
    }

    debug!(input_len = input.len(), "no activity ID in post URL");
    Err(ResolveError::no_activity_id(input))
}

/// Pair form of [`resolve`]: `(key, true)` on success, `(String::new(), false)` otherwise.
#[must_use]
pub fn resolve_pair(url: Option<&str>) -> (String, bool) {
    match resolve(url) {
        Ok(key) => (key.into_string(), true),
        Err(_) => (String::new(), false),
    }
}

fn capture_digits<'a>(pattern: &Regex, input: &'a str) -> Option<&'a str> {
    pattern
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_feed_update_urn() {
        let key = resolve(Some(
            "https://www.linkedin.com/feed/update/urn:li:activity:7051234567890123456/",
        ))
        .unwrap();
        assert_eq!(key.as_str(), "7051234567890123456");
    }

    #[test]
    fn test_resolve_posts_slug() {
        let key = resolve(Some(
            "https://linkedin.com/posts/jane-doe_title-activity-67890-AbCd",
        ))
        .unwrap();
        assert_eq!(key.as_str(), "67890");
    }

    #[test]
    fn test_resolve_urn_anywhere_in_text() {
        let key = resolve(Some("shared urn:li:activity:12345 yesterday")).unwrap();
        assert_eq!(key.as_str(), "12345");
    }

    #[test]
    fn test_resolve_none_is_absent() {
        assert_eq!(resolve(None), Err(ResolveError::Absent));
    }

    #[test]
    fn test_resolve_empty_string_has_no_activity_id() {
        assert!(matches!(
            resolve(Some("")),
            Err(ResolveError::NoActivityId { .. })
        ));
    }

    #[test]
    fn test_resolve_non_linkedin_url_fails() {
        assert!(resolve(Some("https://example.com/not-a-linkedin-url")).is_err());
    }

    #[test]
    fn test_resolve_profile_url_fails() {
        assert!(resolve(Some("https://www.linkedin.com/in/someone/")).is_err());
    }

    #[test]
    fn test_resolve_urn_takes_priority_over_slug() {
        let (key, source) = resolve_with_source(Some(
            "https://www.linkedin.com/posts/a_b-activity-111-xY?ref=urn:li:activity:222",
        ))
        .unwrap();
        assert_eq!(key.as_str(), "222");
        assert_eq!(source, KeySource::Urn);
    }

    #[test]
    fn test_resolve_is_case_sensitive_on_markers() {
        assert!(resolve(Some("URN:LI:ACTIVITY:123")).is_err());
        assert!(resolve(Some("ACTIVITY-123")).is_err());
    }

    #[test]
    fn test_resolve_requires_digits_after_marker() {
        assert!(resolve(Some("urn:li:activity:abc")).is_err());
        assert!(resolve(Some("posts/x-activity-")).is_err());
    }

    #[test]
    fn test_resolve_ignores_query_and_fragment_noise() {
        let key = resolve(Some(
            "http://LinkedIn.com/feed/update/urn:li:activity:42/?utm_source=share#comments",
        ))
        .unwrap();
        assert_eq!(key.as_str(), "42");
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let url = "https://www.linkedin.com/posts/x_y-activity-9988-Zz";
        assert_eq!(resolve(Some(url)), resolve(Some(url)));
    }

    #[test]
    fn test_resolve_pair_reports_found_flag() {
        assert_eq!(
            resolve_pair(Some("urn:li:activity:5")),
            ("5".to_string(), true)
        );
        assert_eq!(resolve_pair(None), (String::new(), false));
        assert_eq!(resolve_pair(Some("nope")), (String::new(), false));
    }

    #[test]
    fn test_resolve_rejects_non_ascii_digits() {
        assert!(
            resolve(Some(
                "https://www.linkedin.com/feed/update/urn:li:activity:\u{661}\u{662}\u{663}/"
            ))
            .is_err()
        );
        assert!(resolve(Some("https://www.linkedin.com/posts/x-activity-\u{ff11}\u{ff12}-y")).is_err());
    }

    #[test]
    fn test_resolve_stops_at_first_non_ascii_digit() {
        let key = resolve(Some("urn:li:activity:12\u{663}4")).unwrap();
        assert_eq!(key.as_str(), "12");
        assert!(ActivityKey::is_canonical(key.as_str()));
    }

    #[test]
    fn test_activity_key_is_canonical() {
        assert!(ActivityKey::is_canonical("7051234567890123456"));
        assert!(!ActivityKey::is_canonical(""));
        assert!(!ActivityKey::is_canonical("https://www.linkedin.com/posts/x"));
    }
}
