//! HTTP error responses.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::store::{DbErrorKind, StoreError};

/// `{ "status": ..., "message": ... }` body shared by every JSON response.
#[derive(Debug, Clone, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub message: String,
}

impl StatusBody {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// Errors surfaced to HTTP clients.
///
/// `Internal` carries detail for the log only; clients see a generic message.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    /// Transient storage contention; the client should retry.
    Unavailable { detail: String },
    Internal { public: String, detail: String },
}

/// Seconds a client is asked to wait after a 503.
pub const RETRY_AFTER_SECS: u32 = 1;

pub const MSG_BUSY: &str = "The service is busy. Please try again shortly.";

impl ApiError {
    pub fn internal(public: impl Into<String>, detail: impl ToString) -> Self {
        Self::Internal {
            public: public.into(),
            detail: detail.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation { .. } => Self::Unprocessable(err.to_string()),
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::DuplicateKey { .. } => Self::Conflict(err.to_string()),
            StoreError::Database { kind, .. } if kind.is_transient() => Self::Unavailable {
                detail: err.to_string(),
            },
            StoreError::Database {
                kind: DbErrorKind::Constraint,
                ..
            } => Self::Unprocessable(err.to_string()),
            StoreError::Database { .. } => Self::internal("A database error occurred.", err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, r#"Basic realm="Login Required""#)],
                    "Authentication Required",
                )
                    .into_response();
            }
            Self::Unavailable { detail } => {
                warn!(error = %detail, "storage busy");
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    [(header::RETRY_AFTER, RETRY_AFTER_SECS.to_string())],
                    Json(StatusBody::error(MSG_BUSY)),
                )
                    .into_response();
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Conflict(message) => (StatusCode::CONFLICT, message),
            Self::Unprocessable(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            Self::Internal { public, detail } => {
                error!(error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, public)
            }
        };
        (status, Json(StatusBody::error(message))).into_response()
    }
}
