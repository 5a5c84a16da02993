use std::path::Path;

use chrono::Utc;
use tracing::{error, info};

use crate::config::{ConfigError, Credentials, Profile, ProfileName};
use crate::error::AppError;
use crate::monitoring::{CheckResult, DownList, Prober};
use crate::notify::{EmailMessage, Notifier};
use crate::report::Report;

/// What one run observed
#[derive(Debug)]
pub struct RunSummary {
    pub results: Vec<CheckResult>,
    pub down: DownList,
    /// Provider id of the alert email, if one was sent
    pub message_id: Option<String>,
}

impl RunSummary {
    pub fn all_up(&self) -> bool {
        self.down.is_empty()
    }
}

/// Everything that has to be in place before the first network call.
/// `load_credentials` is normally [`Credentials::from_env`].
pub fn preflight(
    load_credentials: impl FnOnce() -> Result<Credentials, ConfigError>,
    config_path: Option<&Path>,
    profile: ProfileName,
) -> Result<(Credentials, Profile), AppError> {
    let credentials = load_credentials()?;
    let profile = Profile::resolve(config_path, profile)?;
    Ok((credentials, profile))
}

/// Check every target of `profile`, then send one alert if any stayed down
pub async fn run(
    credentials: &Credentials,
    profile: &Profile,
    prober: &Prober,
    notifier: &dyn Notifier,
) -> Result<RunSummary, AppError> {
    info!(
        "Checking {} targets (timeout: {}s, attempts: {})",
        profile.targets.len(),
        profile.timeout_seconds,
        prober.max_attempts()
    );

    let (results, down) = prober.probe_all(&profile.targets).await;

    for result in &results {
        info!(
            url = %result.target,
            attempts = result.attempts,
            "{}: {}",
            result.status,
            result.detail
        );
    }

    let Some(report) = Report::build(&down, Utc::now())? else {
        info!("All {} targets are up, no notification needed", results.len());
        return Ok(RunSummary { results, down, message_id: None });
    };

    info!("{} of {} targets are down, sending notification", down.len(), results.len());

    let message = EmailMessage::from_report(credentials, report);
    match notifier.send(&message).await {
        Ok(message_id) => {
            info!(%message_id, "Alert sent to {}", credentials.recipient);
            Ok(RunSummary { results, down, message_id: Some(message_id) })
        }
        Err(source) => {
            error!("Failed to send alert: {source}");
            Err(AppError::Notify { down: down.len(), source })
        }
    }
}
