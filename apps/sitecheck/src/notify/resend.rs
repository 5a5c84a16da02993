use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{EmailMessage, NotifyError, Notifier};

pub const DEFAULT_BASE_URL: &str = "https://api.resend.com";
pub const BASE_URL_VAR: &str = "RESEND_BASE_URL";
/// Upper bound for one send so a stalled provider cannot hang the run
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// A sender for alert emails via the Resend HTTP API.
pub struct ResendNotifier {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

impl ResendNotifier {
    pub fn new(api_key: impl Into<String>) -> reqwest::Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> reqwest::Result<Self> {
        Self::with_timeout(api_key, base_url, DEFAULT_SEND_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let base_url: String = base_url.into();
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Honors `RESEND_BASE_URL` when set
    pub fn from_env(api_key: impl Into<String>) -> reqwest::Result<Self> {
        match std::env::var(BASE_URL_VAR) {
            Ok(base_url) if !base_url.trim().is_empty() => Self::with_base_url(api_key, base_url),
            _ => Self::new(api_key),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<String, NotifyError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(NotifyError::Rejected { status: status.as_u16(), body });
        }

        let body = response.text().await?;
        let parsed: SendResponse = serde_json::from_str(&body)
            .map_err(|e| NotifyError::InvalidResponse(format!("{e}: {body}")))?;

        Ok(parsed.id)
    }
}
