//! Input checks run before any write reaches the database.

use url::Url;

use super::error::StoreError;
use super::models::{NewSubmission, ResourceInput};
use crate::resolver::{ActivityKey, resolve};

pub const MAX_RESOURCE_NAME_CHARS: usize = 200;
pub const MAX_RESOURCE_LINK_CHARS: usize = 500;
pub const MAX_PERSON_NAME_CHARS: usize = 100;
pub const MAX_EMAIL_CHARS: usize = 120;
pub const MAX_POSITION_CHARS: usize = 100;
pub const MAX_AFFILIATION_CHARS: usize = 100;

/// A [`ResourceInput`] that passed validation, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidResource {
    pub post_key: ActivityKey,
    pub resource_name: String,
    pub resource_link: String,
}

/// Validates admin resource input.
///
/// The post URL must contain a LinkedIn activity ID, which becomes the stored
/// key. Name and link are trimmed; the link must be an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] naming the first offending field.
pub fn validate_resource_input(input: &ResourceInput) -> Result<ValidResource, StoreError> {
    let post_key = resolve(Some(input.post_url.trim()))
        .map_err(|e| StoreError::invalid("post_url", e.to_string()))?;

    let resource_name = required("resource_name", &input.resource_name, MAX_RESOURCE_NAME_CHARS)?;

    let resource_link = required("resource_link", &input.resource_link, MAX_RESOURCE_LINK_CHARS)?;
    let parsed = Url::parse(&resource_link)
        .map_err(|e| StoreError::invalid("resource_link", e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
        return Err(StoreError::invalid(
            "resource_link",
            "must be an http:// or https:// URL with a host",
        ));
    }

    Ok(ValidResource {
        post_key,
        resource_name,
        resource_link,
    })
}

/// Validates requester details for a submission.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] naming the first offending field.
pub fn validate_submission(submission: &NewSubmission<'_>) -> Result<(), StoreError> {
    required("name", submission.name, MAX_PERSON_NAME_CHARS)?;
    let email = required("email", submission.email, MAX_EMAIL_CHARS)?;
    if !looks_like_email(&email) {
        return Err(StoreError::invalid("email", "not an email address"));
    }
    optional("position", submission.position, MAX_POSITION_CHARS)?;
    optional(
        "company_college",
        submission.company_college,
        MAX_AFFILIATION_CHARS,
    )?;
    optional(
        "requested_resource_name",
        submission.requested_resource_name,
        MAX_RESOURCE_NAME_CHARS,
    )?;
    Ok(())
}

fn required(field: &'static str, value: &str, max_chars: usize) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::invalid(field, "must not be empty"));
    }
    check_length(field, trimmed, max_chars)?;
    Ok(trimmed.to_string())
}

fn optional(field: &'static str, value: Option<&str>, max_chars: usize) -> Result<(), StoreError> {
    match value {
        Some(v) => check_length(field, v, max_chars),
        None => Ok(()),
    }
}

fn check_length(field: &'static str, value: &str, max_chars: usize) -> Result<(), StoreError> {
    let count = value.chars().count();
    if count > max_chars {
        return Err(StoreError::invalid(
            field,
            format!("{count} characters, max {max_chars}"),
        ));
    }
    Ok(())
}

// Deliverability is the SMTP relay's call; this only catches obvious typos.
fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
}
