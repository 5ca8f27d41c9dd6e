//! Public endpoint: request a resource by LinkedIn post URL.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::AppState;
use super::error::{ApiError, StatusBody};
use crate::mailer::ResourceEmail;
use crate::resolver::resolve;
use crate::store::{NewSubmission, StoreError, validate_submission};

pub const MSG_BAD_BODY: &str = "Request body must be a JSON object.";
pub const MSG_INVALID_URL: &str = "Invalid or unrecognized LinkedIn post URL.";
pub const MSG_MISSING_CONTACT: &str = "Name and email are required.";
pub const MSG_NOT_ASSOCIATED: &str = "Sorry, this LinkedIn post is not associated with a resource.";
pub const MSG_EMAIL_FAILED: &str = "An error occurred while sending the email.";
pub const MSG_SENT: &str = "Success! The resource has been sent.";

/// JSON body of `POST /api/request-resource`.
///
/// The post URL is kept as raw JSON so a non-string value is reported as an
/// unrecognized URL rather than a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceRequest {
    pub linkedin_post_url: Option<Value>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub company_college: Option<String>,
}

/// Resolves the post, logs the submission and emails the resource link.
///
/// The submission is written before the email is attempted, so a failed
/// send still leaves a record of the request.
#[instrument(skip(state, payload))]
pub async fn request_resource(
    State(state): State<AppState>,
    payload: Result<Json<ResourceRequest>, JsonRejection>,
) -> Result<Json<StatusBody>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "rejected request body");
        ApiError::BadRequest(MSG_BAD_BODY.to_string())
    })?;

    let key = resolve(request.linkedin_post_url.as_ref().and_then(Value::as_str)).map_err(|e| {
        debug!(error = %e, "post URL did not resolve");
        ApiError::BadRequest(MSG_INVALID_URL.to_string())
    })?;

    let (Some(name), Some(email)) = (
        non_blank(request.name.as_deref()),
        non_blank(request.email.as_deref()),
    ) else {
        return Err(ApiError::BadRequest(MSG_MISSING_CONTACT.to_string()));
    };
    let mut submission = NewSubmission {
        name,
        email,
        position: non_blank(request.position.as_deref()),
        company_college: non_blank(request.company_college.as_deref()),
        requested_resource_name: None,
    };
    validate_submission(&submission).map_err(public_validation_error)?;

    let Some(resource) = state.store.find_resource_by_key(&key).await? else {
        info!(key = %key, "no resource registered for post");
        return Err(ApiError::NotFound(MSG_NOT_ASSOCIATED.to_string()));
    };

    submission.requested_resource_name = Some(&resource.resource_name);
    let submission_id = state
        .store
        .record_submission(&submission)
        .await
        .map_err(public_validation_error)?;
    info!(submission_id, key = %key, resource = %resource.resource_name, "submission recorded");

    let email = ResourceEmail::compose(name, email, &resource, &state.sender_name);
    if let Err(e) = state.mailer.send(&email).await {
        warn!(submission_id, error = %e, "resource email not sent");
        return Err(ApiError::internal(MSG_EMAIL_FAILED, e));
    }

    Ok(Json(StatusBody::success(MSG_SENT)))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// The public form reports bad input as 400 rather than the admin API's 422.
fn public_validation_error(err: StoreError) -> ApiError {
    match err {
        StoreError::Validation { .. } => ApiError::BadRequest(err.to_string()),
        other => ApiError::from(other),
    }
}
