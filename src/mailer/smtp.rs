//! SMTP transport over implicit TLS.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, instrument};

use super::{MailError, Mailer, ResourceEmail};

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;

/// Relay settings and login for the sending account.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Login and `From` address.
    pub address: String,
    pub password: String,
    /// Display name in `From` and the email signature.
    pub sender_name: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("address", &self.address)
            .field("password", &"<redacted>")
            .field("sender_name", &self.sender_name)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// [`Mailer`] backed by an async lettre SMTP transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Builds the transport. No connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Address`] for an unparseable sender address, or
    /// [`MailError::Transport`] if the relay TLS parameters cannot be built.
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let from = Mailbox::new(
            Some(settings.sender_name.clone()),
            parse_address(&settings.address)?,
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.address.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(settings.timeout_secs)))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(subject = %email.subject))]
    async fn send(&self, email: &ResourceEmail) -> Result<(), MailError> {
        let to = Mailbox::new(
            Some(email.to_name.clone()),
            parse_address(&email.to_address)?,
        );
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        self.transport.send(message).await?;
        info!("resource email sent");
        Ok(())
    }
}

fn parse_address(raw: &str) -> Result<Address, MailError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| MailError::Address {
            address: raw.to_string(),
            reason: e.to_string(),
        })
}
