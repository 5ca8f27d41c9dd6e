//! Error types for post URL resolution.

use thiserror::Error;

/// Reasons a post URL cannot be turned into a lookup key.
///
/// Both variants are terminal: resolution is a pure function of its input,
/// so retrying with the same string always yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No URL was supplied.
    #[error("no post URL supplied\n  Suggestion: Paste the full link of the LinkedIn post")]
    Absent,

    /// The input contains neither an activity URN nor an `activity-<digits>` slug.
    #[error(
        "no LinkedIn activity ID found in '{input_preview}'\n  Suggestion: Use the post's own link (it contains 'activity' followed by digits)"
    )]
    NoActivityId {
        /// Truncated input for display
        input_preview: String,
    },
}

impl ResolveError {
    /// Creates a `NoActivityId` error, truncating long input for display.
    #[must_use]
    pub fn no_activity_id(input: &str) -> Self {
        Self::NoActivityId {
            input_preview: input.chars().take(80).collect(),
        }
    }
}
