use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

const DEFAULT_RESEND_URL: &str = "https://api.resend.com/emails";

/// Error type for outbound mail delivery.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("email request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("email API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("email delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("email build error: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Something that can deliver a plain-text message to one recipient.
///
/// A returned `Ok(())` means the transport accepted the message; it says nothing
/// about final delivery to the mailbox.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

/// Mail transport backed by a Resend-compatible HTTP API.
#[derive(Clone)]
pub struct EmailClient {
    client: Client,
    api_url: String,
    api_key: String,
    from_email: String,
    from_name: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ResendRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    text: String,
}

impl EmailClient {
    pub fn new(
        api_key: &str,
        from_email: &str,
        from_name: &str,
        timeout: Duration,
    ) -> Result<Self, EmailError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: DEFAULT_RESEND_URL.to_string(),
            api_key: api_key.to_string(),
            from_email: from_email.to_string(),
            from_name: from_name.to_string(),
            timeout,
        })
    }

    /// Point the client at a different endpoint (self-hosted relay, test double).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

#[async_trait]
impl MailTransport for EmailClient {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let request = ResendRequest {
            from: self.sender(),
            to: vec![to.to_string()],
            subject: subject.to_string(),
            text: body.to_string(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmailError::Timeout(self.timeout)
                } else {
                    EmailError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}

/// Transport that only logs what it would have sent.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        tracing::info!(to = %to, subject = %subject, body_len = body.len(), "email not sent, log transport active");
        Ok(())
    }
}
