//! Leadgate Core Library
//!
//! Backend for gated resource delivery: a requester submits the link of a
//! LinkedIn post, the post is resolved to a registered resource, the request
//! is logged, and the resource link is emailed back.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`resolver`] - Post URL to activity-ID resolution
//! - [`db`] - Database connection and schema management
//! - [`store`] - Resource and submission persistence
//! - [`mailer`] - Resource email composition and SMTP delivery
//! - [`http`] - Public request endpoint and admin API
//! - [`config`] - Config file, environment and CLI override resolution

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod db;
pub mod http;
pub mod mailer;
pub mod resolver;
pub mod store;

// Re-export commonly used types
pub use config::{FileConfig, ServiceConfig};
pub use db::{Database, DatabaseOptions, DbError};
pub use http::{AdminCredentials, AppState, router};
pub use mailer::{MailError, Mailer, ResourceEmail, SmtpMailer, SmtpSettings, UnconfiguredMailer};
pub use resolver::{ActivityKey, ResolveError, resolve, resolve_pair};
pub use store::{
    NewSubmission, RekeyReport, Resource, ResourceInput, ResourceRepository, Store, StoreError,
    Submission, SubmissionQuery,
};
