use leadgate_core::resolver::{KeySource, legacy, resolve_with_source};
use tracing::debug;

/// Prints one line per URL; returns false if any URL did not resolve.
pub fn run_resolve(urls: &[String]) -> bool {
    let mut all_resolved = true;
    for url in urls {
        let legacy_form = legacy::normalize_post_url(url);
        debug!(%url, legacy = ?legacy_form, "legacy normalization");

        match resolve_with_source(Some(url.as_str())) {
            Ok((key, source)) => {
                let via = match source {
                    KeySource::Urn => "urn",
                    KeySource::Slug => "slug",
                };
                println!("{key}\t{via}\t{url}");
            }
            Err(e) => {
                all_resolved = false;
                println!("-\tunresolved\t{url}");
                eprintln!("{e}");
            }
        }
        if let Some(legacy_form) = legacy_form {
            println!("  legacy key: {legacy_form}");
        }
    }
    all_resolved
}
