//! HTTP service: the public request endpoint and the admin API.
//!
//! Dependencies are built by the caller and handed over in [`AppState`]; the
//! router holds no other state.

pub mod admin;
pub mod auth;
pub mod error;
pub mod request;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use auth::AdminCredentials;
pub use error::{ApiError, StatusBody};
pub use request::ResourceRequest;

use crate::mailer::Mailer;
use crate::store::ResourceRepository;

/// Default signature when no sender name is configured.
pub const DEFAULT_SENDER_NAME: &str = "The Resource Desk";

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResourceRepository>,
    pub mailer: Arc<dyn Mailer>,
    /// `None` locks the admin API entirely.
    pub admin: Option<AdminCredentials>,
    /// Name used to sign resource emails.
    pub sender_name: String,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ResourceRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            store,
            mailer,
            admin: None,
            sender_name: DEFAULT_SENDER_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn with_admin(mut self, admin: Option<AdminCredentials>) -> Self {
        self.admin = admin;
        self
    }

    #[must_use]
    pub fn with_sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = sender_name.into();
        self
    }
}

/// Builds the full router.
pub fn router(state: AppState) -> Router {
    let admin = admin::routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_admin,
    ));

    Router::new()
        .route("/api/request-resource", post(request::request_resource))
        .route("/healthz", get(healthz))
        .nest("/admin", admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Serves `router(state)` on `addr` until Ctrl-C.
///
/// # Errors
///
/// Returns an IO error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
