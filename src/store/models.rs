//! Row and input types for resources and submissions.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default page size for submission listings.
pub const DEFAULT_SUBMISSION_PAGE: i64 = 100;

/// Largest page size a caller may request.
pub const MAX_SUBMISSION_PAGE: i64 = 500;

/// A downloadable resource registered against one LinkedIn post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Resource {
    pub id: i64,
    /// Activity ID of the post (see [`crate::resolver::ActivityKey`]).
    pub post_key: String,
    pub resource_name: String,
    pub resource_link: String,
}

/// Admin input for creating or replacing a resource.
///
/// `post_url` may be any link to the post; only its activity ID is stored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceInput {
    pub post_url: String,
    pub resource_name: String,
    pub resource_link: String,
}

/// One logged request for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Submission {
    pub id: i64,
    /// UTC timestamp, `YYYY-MM-DDTHH:MM:SSZ`.
    pub created_at: String,
    pub name: String,
    pub email: String,
    pub position: Option<String>,
    pub company_college: Option<String>,
    pub requested_resource_name: Option<String>,
}

/// Fields for a new submission row.
#[derive(Debug, Clone, Copy)]
pub struct NewSubmission<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub position: Option<&'a str>,
    pub company_college: Option<&'a str>,
    pub requested_resource_name: Option<&'a str>,
}

/// Paging for submission listings, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubmissionQuery {
    pub limit: i64,
    pub offset: i64,
}

impl Default for SubmissionQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUBMISSION_PAGE,
            offset: 0,
        }
    }
}

impl SubmissionQuery {
    /// Clamps limit to `1..=MAX_SUBMISSION_PAGE` and offset to non-negative.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_SUBMISSION_PAGE),
            offset: self.offset.max(0),
        }
    }
}
