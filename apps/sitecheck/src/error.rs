use thiserror::Error;

use crate::config::ConfigError;
use crate::notify::NotifyError;

/// Errors that fail a run. Probe failures never end up here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("failed to render alert email")]
    Report(#[from] tera::Error),
    #[error("failed to send alert for {down} down site(s)")]
    Notify {
        down: usize,
        #[source]
        source: NotifyError,
    },
}
