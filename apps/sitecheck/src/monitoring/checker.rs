use std::time::Duration;

use reqwest::redirect::Policy;

use super::types::ProbeError;

const MAX_REDIRECTS: usize = 10;

/// Checker trait for a single availability probe
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Probe `target` once and return the final HTTP status code
    async fn check(&self, target: &str) -> Result<u16, ProbeError>;
}

/// HTTP/HTTPS checker
pub struct HttpChecker {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpChecker {
    pub fn new(timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client, timeout })
    }

    fn classify(&self, error: reqwest::Error) -> ProbeError {
        if error.is_timeout() {
            ProbeError::Timeout(self.timeout)
        } else {
            // reqwest keeps the useful part (dns, refused, tls) in the source chain
            ProbeError::Connection(format!("{:#}", anyhow::Error::from(error)))
        }
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn check(&self, target: &str) -> Result<u16, ProbeError> {
        let response = self.client.get(target).send().await.map_err(|e| self.classify(e))?;

        Ok(response.status().as_u16())
    }
}
