use std::{env::var, str::FromStr};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format selected through `RUST_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format `{other}`")),
        }
    }
}

pub fn init() {
    initialize_tracing(LevelFilter::INFO);
}

pub fn init_verbose() {
    initialize_tracing(LevelFilter::DEBUG);
}

/// Initialize tracing subscriber. `RUST_LOG` overrides `level`.
fn initialize_tracing(level: LevelFilter) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let (log_format, format_error) = match var("RUST_LOG_FORMAT") {
        Ok(raw) => match raw.parse::<LogFormat>() {
            Ok(format) => (format, None),
            Err(error) => (LogFormat::default(), Some(error)),
        },
        Err(_) => (LogFormat::default(), None),
    };

    let log_layer = match log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().with_filter(env_filter).boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    // A second call (tests, embedded use) keeps the first subscriber.
    if tracing_subscriber::registry().with(log_layer).try_init().is_err() {
        return;
    }

    if let Some(error) = format_error {
        tracing::warn!("Ignoring RUST_LOG_FORMAT, falling back to compact: {error}");
    }
}
