use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::checker::{Checker, HttpChecker};
use super::types::{CheckResult, DownList, ProbeError, Target};
use crate::config::Profile;

/// Runs bounded, sequential retries of a [`Checker`] against each target
pub struct Prober {
    checker: Arc<dyn Checker>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Prober {
    pub fn new(checker: Arc<dyn Checker>, max_attempts: u32, retry_delay: Duration) -> Self {
        Self { checker, max_attempts: max_attempts.max(1), retry_delay }
    }

    /// Prober backed by an [`HttpChecker`] configured from `profile`
    pub fn http(profile: &Profile) -> reqwest::Result<Self> {
        let checker = HttpChecker::new(profile.timeout(), &profile.user_agent)?;
        Ok(Self::new(Arc::new(checker), profile.max_attempts, profile.retry_delay()))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Check one target, retrying until it is up or attempts run out
    pub async fn probe(&self, target: &Target) -> CheckResult {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            info!(url = %target.url, attempt, "Checking target");

            let error = match self.checker.check(&target.url).await {
                Ok(status) if target.is_acceptable(status) => {
                    let result = CheckResult::up(target, status, attempt);
                    info!(url = %target.url, attempt, "Check succeeded: {}", result.detail);
                    return result;
                }
                Ok(status) => ProbeError::BadStatus(status),
                Err(error) => error,
            };

            warn!(url = %target.url, attempt, "Check failed: {error}");
            last_error = Some(error);

            if attempt < self.max_attempts {
                info!(url = %target.url, "Retrying in {}s", self.retry_delay.as_secs());
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        // max_attempts >= 1, so at least one error was recorded
        let error = last_error.unwrap_or(ProbeError::Connection("no attempt made".into()));
        CheckResult::down(target, &error, self.max_attempts)
    }

    /// Check every target in order and collect the ones that stayed down
    pub async fn probe_all(&self, targets: &[Target]) -> (Vec<CheckResult>, DownList) {
        let mut results = Vec::with_capacity(targets.len());
        let mut down = DownList::new();

        for target in targets {
            let result = self.probe(target).await;
            down.record(&result);
            results.push(result);
        }

        (results, down)
    }
}
