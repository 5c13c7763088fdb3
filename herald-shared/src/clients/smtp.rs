//! SMTP mail transport.
//!
//! [`SmtpClient`] wraps the `lettre` async SMTP transport. The transport is
//! built once and reused; lettre pools connections internally.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::email::{EmailError, MailTransport};

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_email: String,
    pub from_name: String,
    pub timeout: Duration,
}

pub struct SmtpClient {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpClient {
    pub fn new(settings: &SmtpSettings) -> Result<Self, EmailError> {
        let from = Mailbox::new(
            Some(settings.from_name.clone()),
            settings.from_email.parse()?,
        );

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .timeout(Some(settings.timeout));

        if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        tracing::info!(host = %settings.host, port = settings.port, "SMTP transport configured");

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }
}

/// Assemble a plain-text message.
fn build_message(from: &Mailbox, to: &str, subject: &str, body: &str) -> Result<Message, EmailError> {
    Message::builder()
        .from(from.clone())
        .to(to.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| EmailError::Build(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpClient {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let message = build_message(&self.from, to, subject, body)?;
        self.mailer.send(message).await?;

        tracing::debug!(to = %to, subject = %subject, "email sent via SMTP");
        Ok(())
    }
}
