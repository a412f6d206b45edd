//! Mail delivery

use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

use crate::core::Config;

/// Relay request timeout
const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Plain-text email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mail relay rejected message: HTTP {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

/// POSTs `{from, to, subject, text}` as JSON to a relay endpoint
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: String,
    from: String,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    pub fn new(relay_url: impl Into<String>, from: impl Into<String>) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(RELAY_TIMEOUT).build()?;
        Ok(Self {
            client,
            relay_url: relay_url.into(),
            from: from.into(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.relay_url)
            .json(&RelayPayload {
                from: &self.from,
                to: &message.to,
                subject: &message.subject,
                text: &message.body,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected(status.as_u16()));
        }
        tracing::info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

/// Logs instead of sending
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Mail relay not configured, email logged only"
        );
        Ok(())
    }
}

/// Keeps sent messages in memory. Used by tests and local demos.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        Ok(())
    }
}

/// `HttpMailer` when a relay is configured, `LogMailer` otherwise
pub fn mailer_from_config(config: &Config) -> Arc<dyn Mailer> {
    match &config.mail_relay_url {
        Some(url) => match HttpMailer::new(url.clone(), config.mail_from.clone()) {
            Ok(mailer) => {
                tracing::info!(relay = %url, "Mail relay enabled");
                Arc::new(mailer)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build mail client, falling back to log-only mail");
                Arc::new(LogMailer)
            }
        },
        None => Arc::new(LogMailer),
    }
}

/// Send in the background. Failures are logged and swallowed.
pub fn spawn_send(mailer: Arc<dyn Mailer>, message: EmailMessage) {
    tokio::spawn(async move {
        let to = message.to.clone();
        if let Err(e) = mailer.send(message).await {
            tracing::warn!(to = %to, error = %e, "Failed to send email");
        }
    });
}
