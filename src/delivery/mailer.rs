//! Outbound email for finished engagement letters.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use thiserror::Error;

pub const MAIL_SUBJECT: &str = "Your Appraisal Agreement - The Hammonds Group";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address {address:?}: {reason}")]
    Address { address: String, reason: String },
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// Relay connection settings; all five values are required.
#[derive(Clone)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

/// A plain-text message with one attachment.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Build the engagement-letter email for a client.
pub fn compose_engagement_mail(
    to: &str,
    client_name: Option<&str>,
    address: Option<&str>,
    attachment_name: &str,
    attachment: Vec<u8>,
) -> OutgoingMail {
    let client_name = client_name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("Client");
    let address = address.unwrap_or_default().trim();

    let body = format!(
        "Dear {client_name},\n\n\
         Attached is your appraisal agreement for the property located at {address}.\n\
         Please review the agreement, initial the acknowledgement lines, sign the final page,\n\
         and return the completed document.\n\n\
         Thank you,\n\
         The Hammonds Group\n"
    );

    OutgoingMail {
        to: to.trim().to_string(),
        subject: MAIL_SUBJECT.to_string(),
        body,
        attachment_name: attachment_name.to_string(),
        attachment,
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// STARTTLS relay with username/password authentication.
pub struct SmtpMailer {
    from: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            from: settings.from.clone(),
            transport,
        })
    }

    fn build_message(&self, mail: OutgoingMail) -> Result<Message, MailError> {
        let pdf = ContentType::parse("application/pdf").map_err(|e| MailError::Build(e.to_string()))?;

        Message::builder()
            .from(mailbox(&self.from)?)
            .to(mailbox(&mail.to)?)
            .subject(mail.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(mail.body))
                    .singlepart(Attachment::new(mail.attachment_name).body(mail.attachment, pdf)),
            )
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let recipient = mail.to.clone();
        let message = self.build_message(mail)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        log::info!("Engagement letter emailed to {}", recipient);
        Ok(())
    }
}
