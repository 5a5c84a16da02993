use std::{env, fmt, fs, path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitoring::{Target, validation};

pub const API_KEY_VAR: &str = "RESEND_API_KEY";
pub const SENDER_VAR: &str = "SENDER_EMAIL";
pub const RECIPIENT_VAR: &str = "RECEIVER_EMAIL";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";
const HEALTHCHECK_USER_AGENT: &str = "GitHubActions-HealthCheck/1.0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("failed to read config file {path}")]
    Read {
        path: path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write config file {path}")]
    Write {
        path: path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration")]
    Invalid(#[source] anyhow::Error),
    #[error("no config directory available (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,
}

/// Email provider credentials and addresses, read once at startup
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub sender: String,
    pub recipient: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Empty values count as missing
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            api_key: require(API_KEY_VAR)?,
            sender: require(SENDER_VAR)?,
            recipient: require(RECIPIENT_VAR)?,
        })
    }
}

/// Built-in profiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ProfileName {
    /// 30s timeout, two attempts five seconds apart
    #[default]
    Retrying,
    /// 15s timeout, one attempt
    SingleShot,
}

/// Targets and probe settings for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub timeout_seconds: u64,
    /// Probes per target, including the first one
    pub max_attempts: u32,
    #[serde(default)]
    pub retry_delay_seconds: u64,
    pub user_agent: String,
    pub targets: Vec<Target>,
}

impl Profile {
    pub fn builtin(name: ProfileName) -> Self {
        match name {
            ProfileName::Retrying => Self::retrying(),
            ProfileName::SingleShot => Self::single_shot(),
        }
    }

    pub fn retrying() -> Self {
        Self {
            timeout_seconds: 30,
            max_attempts: 2,
            retry_delay_seconds: 5,
            user_agent: BROWSER_USER_AGENT.into(),
            targets: vec![
                Target::new("https://wx.dishu.de").accepting(403),
                Target::new("https://tb.dishu.de"),
                Target::new("https://nps.dishu.de"),
                Target::new("https://md.dishu.de"),
                Target::new("https://tv.dishu.de"),
                Target::new("https://llm.dishu.de"),
            ],
        }
    }

    pub fn single_shot() -> Self {
        Self {
            timeout_seconds: 15,
            max_attempts: 1,
            retry_delay_seconds: 0,
            user_agent: HEALTHCHECK_USER_AGENT.into(),
            targets: vec![
                Target::new("https://wx.dishu.de"),
                Target::new("https://tb.dishu.de"),
                Target::new("https://nps.dishu.de"),
                Target::new("https://alist.dishu.de"),
            ],
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check().map_err(ConfigError::Invalid)
    }

    fn check(&self) -> anyhow::Result<()> {
        validation::validate_timeout(self.timeout_seconds)?;
        validation::validate_attempts(self.max_attempts)?;
        validation::validate_retry_delay(self.retry_delay_seconds)?;

        if self.user_agent.trim().is_empty() {
            anyhow::bail!("User agent must not be empty");
        }
        if self.targets.is_empty() {
            anyhow::bail!("No targets configured");
        }
        for target in &self.targets {
            validation::validate_target(target)?;
        }

        Ok(())
    }

    /// Load a profile from a TOML file and validate it
    ///
    /// ```no_run
    /// let profile = sitecheck::config::Profile::from_file("sites.toml")?;
    /// println!("{}", profile);
    /// # Ok::<(), sitecheck::config::ConfigError>(())
    /// ```
    pub fn from_file(path: impl AsRef<path::Path>) -> Result<Self, ConfigError> {
        let path = normalize_toml_path(path.as_ref());

        let raw_string = fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        let profile: Self = toml::from_str(&raw_string)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

        profile.validate()?;
        Ok(profile)
    }

    /// Explicit file, else the default config file if present, else the built-in profile
    pub fn resolve(
        explicit_path: Option<&path::Path>,
        fallback: ProfileName,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        match default_config_path() {
            Ok(path) if path.exists() => {
                tracing::debug!("Using config file {}", path.display());
                Self::from_file(path)
            }
            _ => {
                let profile = Self::builtin(fallback);
                profile.validate()?;
                Ok(profile)
            }
        }
    }

    /// Serialize and write the profile to a file
    pub fn write_config(&self, path: &path::Path) -> Result<path::PathBuf, ConfigError> {
        let path = normalize_toml_path(path);
        let config_str = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Write { path: path.clone(), source })?;
        }

        fs::write(&path, config_str)
            .map_err(|source| ConfigError::Write { path: path.clone(), source })?;
        Ok(path)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);
        let write_2 = write_indented(2);

        writeln!(f, "Current Check Profile:")?;
        write_title_1(f, "Probing")?;
        write_1(f, "Timeout (s)", &self.timeout_seconds)?;
        write_1(f, "Attempts", &self.max_attempts)?;
        write_1(f, "Retry Delay (s)", &self.retry_delay_seconds)?;
        write_1(f, "User-Agent", &self.user_agent)?;
        write_title_1(f, "Targets")?;
        for target in &self.targets {
            if target.accept_status.is_empty() {
                write_2(f, "URL", &target.url)?;
            } else {
                let accepted: Vec<String> =
                    target.accept_status.iter().map(u16::to_string).collect();
                let value = format!("{} (also up on {})", target.url, accepted.join(", "));
                write_2(f, "URL", &value)?;
            }
        }

        Ok(())
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/sitecheck/config.toml or
/// $HOME/.config/...)
pub fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("sitecheck/config.toml"))
}
