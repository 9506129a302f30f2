//! Delivery of generated letters: archival copy and email.

pub mod archive;
pub mod handlers;
pub mod mailer;
pub mod model;

pub use archive::{ArchiveError, Archiver};
pub use handlers::config;
pub use mailer::{compose_engagement_mail, MailError, MailSettings, Mailer, OutgoingMail, SmtpMailer};
pub use model::{SendEmailRequest, SendEmailResponse};
