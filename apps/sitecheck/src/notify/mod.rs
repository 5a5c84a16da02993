use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::Credentials;
use crate::report::Report;

pub mod resend;

pub use resend::ResendNotifier;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Email provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Unexpected response from email provider: {0}")]
    InvalidResponse(String),
}

/// One outgoing email, serialized as the provider's request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl EmailMessage {
    pub fn from_report(credentials: &Credentials, report: Report) -> Self {
        Self {
            from: credentials.sender.clone(),
            to: vec![credentials.recipient.clone()],
            subject: report.subject,
            html: report.html,
        }
    }
}

/// Delivers alert emails.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message` and returns the provider's message id.
    async fn send(&self, message: &EmailMessage) -> Result<String, NotifyError>;
}
