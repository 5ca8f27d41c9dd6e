//! HTTP Basic authentication for the admin routes.

use std::fmt;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::AppState;
use super::error::ApiError;

/// Username and password accepted by the admin API.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminCredentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Checks a `username:password` pair.
    ///
    /// Both sides are hashed before comparison so the check does not stop
    /// at the first differing byte of the secret.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = Sha256::digest(username.as_bytes()) == Sha256::digest(self.username.as_bytes());
        let pass_ok = Sha256::digest(password.as_bytes()) == Sha256::digest(self.password.as_bytes());
        user_ok & pass_ok
    }
}

/// Extracts `(username, password)` from a `Basic` authorization header.
#[must_use]
pub fn parse_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Middleware guarding the admin route group.
///
/// With no credentials configured, every request is refused.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(expected) = state.admin.as_ref() else {
        warn!("admin request refused: ADMIN_USER/ADMIN_PASS not configured");
        return ApiError::Unauthorized.into_response();
    };

    match parse_basic_auth(request.headers()) {
        Some((username, password)) if expected.matches(&username, &password) => {
            next.run(request).await
        }
        Some((username, _)) => {
            warn!(%username, "admin login rejected");
            ApiError::Unauthorized.into_response()
        }
        None => {
            debug!("admin request without basic credentials");
            ApiError::Unauthorized.into_response()
        }
    }
}
