//! Resource delivery by email.
//!
//! [`ResourceEmail::compose`] builds the message; a [`Mailer`] sends it. The
//! request handler holds an `Arc<dyn Mailer>`, so tests substitute a recording
//! implementation and production uses [`SmtpMailer`].

mod smtp;

pub use smtp::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, DEFAULT_SMTP_TIMEOUT_SECS, SmtpMailer, SmtpSettings};

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::store::Resource;

/// Errors raised while building or sending a resource email.
#[derive(Debug, Error)]
pub enum MailError {
    /// A sender or recipient address could not be parsed.
    #[error("invalid email address '{address}': {reason}")]
    Address { address: String, reason: String },

    /// The message could not be assembled.
    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    /// The SMTP relay refused or dropped the message.
    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// No SMTP credentials were configured.
    #[error(
        "email delivery is not configured\n  Suggestion: Set EMAIL_ADDRESS and EMAIL_PASSWORD before starting the server"
    )]
    NotConfigured,
}

/// A composed resource email, independent of any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEmail {
    pub to_name: String,
    pub to_address: String,
    pub subject: String,
    pub body: String,
}

impl ResourceEmail {
    /// Builds the delivery email for `resource`, signed with `signature`.
    #[must_use]
    pub fn compose(
        requester_name: &str,
        requester_email: &str,
        resource: &Resource,
        signature: &str,
    ) -> Self {
        let subject = format!(
            "Here is your requested resource: {}",
            resource.resource_name
        );
        let body = format!(
            "Hi {requester_name},\n\n\
             Here is the resource you requested:\n\
             Resource: {}\n\
             Download Link: {}\n\n\
             Best,\n\
             {signature}",
            resource.resource_name, resource.resource_link
        );
        Self {
            to_name: requester_name.to_string(),
            to_address: requester_email.to_string(),
            subject,
            body,
        }
    }
}

/// Outbound email transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one message.
    async fn send(&self, email: &ResourceEmail) -> Result<(), MailError>;
}

/// Stand-in used when SMTP credentials are missing; every send fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send(&self, email: &ResourceEmail) -> Result<(), MailError> {
        warn!(subject = %email.subject, "dropping email: SMTP is not configured");
        Err(MailError::NotConfigured)
    }
}
