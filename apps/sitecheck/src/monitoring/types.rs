use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single URL under availability monitoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub url: String,

    /// Status codes >= 400 that still count as up for this target
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accept_status: Vec<u16>,
}

impl Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), accept_status: Vec::new() }
    }

    pub fn accepting(mut self, status: u16) -> Self {
        self.accept_status.push(status);
        self
    }

    /// Whether `status` marks this target as up
    pub fn is_acceptable(&self, status: u16) -> bool {
        status < 400 || self.is_override(status)
    }

    /// Whether `status` is only acceptable because of a per-target override
    pub fn is_override(&self, status: u16) -> bool {
        status >= 400 && self.accept_status.contains(&status)
    }
}

/// Why a single probe failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("timeout ({}s)", .0.as_secs())]
    Timeout(Duration),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("status {0}")]
    BadStatus(u16),
}

/// Status of a monitoring check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    Up,
    Down,
}

impl std::fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorStatus::Up => write!(f, "up"),
            MonitorStatus::Down => write!(f, "down"),
        }
    }
}

/// Outcome of all attempts against one target
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// URL that was checked
    pub target: String,

    /// Up or down after all attempts
    pub status: MonitorStatus,

    /// Last HTTP status code received, if any
    pub status_code: Option<u16>,

    /// Status description when up, last failure description when down
    pub detail: String,

    /// Number of probes performed
    pub attempts: u32,
}

impl CheckResult {
    pub fn up(target: &Target, status_code: u16, attempts: u32) -> Self {
        let detail = if target.is_override(status_code) {
            format!("status {status_code} (accepted)")
        } else {
            format!("status {status_code}")
        };

        Self {
            target: target.url.clone(),
            status: MonitorStatus::Up,
            status_code: Some(status_code),
            detail,
            attempts,
        }
    }

    pub fn down(target: &Target, error: &ProbeError, attempts: u32) -> Self {
        let status_code = match error {
            ProbeError::BadStatus(code) => Some(*code),
            _ => None,
        };

        Self {
            target: target.url.clone(),
            status: MonitorStatus::Down,
            status_code,
            detail: error.to_string(),
            attempts,
        }
    }

    pub fn success(&self) -> bool {
        self.status == MonitorStatus::Up
    }
}

/// Targets that failed every attempt during a run, in check order
#[derive(Debug, Clone, Default)]
pub struct DownList {
    entries: Vec<CheckResult>,
}

impl DownList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `result` if it is down. Returns whether it was recorded.
    pub fn record(&mut self, result: &CheckResult) -> bool {
        if result.success() {
            return false;
        }
        self.entries.push(result.clone());
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckResult> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a DownList {
    type Item = &'a CheckResult;
    type IntoIter = std::slice::Iter<'a, CheckResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
