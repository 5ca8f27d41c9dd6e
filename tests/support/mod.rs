//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use leadgate_core::{
    AdminCredentials, AppState, Database, MailError, Mailer, ResourceEmail, ResourceInput, Store,
    router,
};
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "correct horse";

/// Mailer that records messages instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<ResourceEmail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn fail_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<ResourceEmail> {
        self.sent.lock().expect("mailer lock").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &ResourceEmail) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::NotConfigured);
        }
        self.sent.lock().expect("mailer lock").push(email.clone());
        Ok(())
    }
}

/// Router plus handles for inspecting what it did.
pub struct TestApp {
    pub router: Router,
    pub store: Store,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");
        let store = Store::new(db);
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(Arc::new(store.clone()), mailer.clone())
            .with_admin(Some(AdminCredentials::new(ADMIN_USER, ADMIN_PASS)))
            .with_sender_name("Jane Doe");
        Self {
            router: router(state),
            store,
            mailer,
        }
    }

    /// Registers a resource for `post_url` directly through the store.
    pub async fn register(&self, post_url: &str, name: &str, link: &str) {
        self.store
            .create_resource(&ResourceInput {
                post_url: post_url.to_string(),
                resource_name: name.to_string(),
                resource_link: link.to_string(),
            })
            .await
            .expect("Failed to register resource");
    }

    pub async fn submission_count(&self) -> usize {
        self.store
            .list_submissions(&leadgate_core::SubmissionQuery::default())
            .await
            .expect("Failed to list submissions")
            .len()
    }

    /// Sends a request and returns the status with the body parsed as JSON (or `Null`).
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.call_raw(request).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn call_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, bytes.to_vec())
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn basic_auth(user: &str, pass: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:{pass}")))
}

/// Admin request with the correct credentials.
pub fn admin_request(method: &str, uri: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth(ADMIN_USER, ADMIN_PASS));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request")
}
