//! Whole-URL normalization used by earlier revisions of the resource table.
//!
//! Before activity-ID extraction, resources were keyed by a normalized copy of
//! the post URL. Two links to the same post could still normalize differently
//! (`/feed/update/...` vs `/posts/...-activity-N`), so this form is no longer a
//! lookup key. It survives for diagnostics: the `resolve` command prints it
//! next to the activity key, which helps when matching old rows by hand.

use url::Url;
use url::form_urlencoded;

/// Host every LinkedIn link was rewritten to.
pub const CANONICAL_HOST: &str = "www.linkedin.com";

/// Query parameters that carry tracking state rather than post identity.
/// Compared after lowercasing.
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "trk",
    "trackingid",
    "lipi",
    "midtoken",
    "midsig",
    "trkemail",
    "eid",
    "otptoken",
    "rcm",
];

/// Normalizes a post URL the way the superseded keying scheme did.
///
/// Lowercases the input, forces the `https` scheme, rewrites any
/// `linkedin.com` host to [`CANONICAL_HOST`], drops the fragment and tracking
/// parameters, and strips trailing slashes from the path. Returns `None` when
/// the input cannot be parsed as a URL with a host.
#[must_use]
pub fn normalize_post_url(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    let with_scheme = if lowered.contains("://") {
        lowered
    } else {
        format!("https://{lowered}")
    };

    let parsed = Url::parse(&with_scheme).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;
    let host = if host == "linkedin.com" || host.ends_with(".linkedin.com") {
        CANONICAL_HOST
    } else {
        host
    };

    let path = parsed.path().trim_end_matches('/');

    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut kept = 0usize;
    for (name, value) in parsed.query_pairs() {
        if TRACKING_PARAMS.contains(&name.as_ref()) {
            continue;
        }
        query.append_pair(&name, &value);
        kept += 1;
    }

    let mut normalized = format!("https://{host}{path}");
    if kept > 0 {
        normalized.push('?');
        normalized.push_str(&query.finish());
    }
    Some(normalized)
}
