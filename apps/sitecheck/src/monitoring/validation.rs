//! Validation of targets and probe settings.
//!
//! Everything here runs before the first probe so a bad profile fails the
//! run up front instead of being reported as a down site.

use anyhow::{Result, anyhow};
use url::Url;

use super::types::Target;

/// Validate an HTTP/HTTPS target URL
pub fn validate_http_target(target: &str) -> Result<()> {
    let url = Url::parse(target).map_err(|e| anyhow!("Invalid URL {}: {}", target, e))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(anyhow!("Invalid scheme for HTTP target {}: {}", target, other)),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(anyhow!("HTTP target has no host: {}", target));
    }

    if let Some(port) = url.port() {
        validate_port(port)?;
    }

    Ok(())
}

/// Validate a target including its accepted status overrides
pub fn validate_target(target: &Target) -> Result<()> {
    validate_http_target(&target.url)?;

    for &status in &target.accept_status {
        if !(100..=599).contains(&status) {
            return Err(anyhow!(
                "Accepted status {} for {} is not an HTTP status code",
                status,
                target.url
            ));
        }
        if status < 400 {
            tracing::warn!(
                "Accepted status {} for {} is already treated as up",
                status,
                target.url
            );
        }
    }

    Ok(())
}

/// Validate port is in valid range
fn validate_port(port: u16) -> Result<()> {
    if port == 0 {
        return Err(anyhow!("Port 0 is not valid"));
    }
    Ok(())
}

/// Validate timeout is reasonable
pub fn validate_timeout(timeout_seconds: u64) -> Result<()> {
    const MIN_TIMEOUT: u64 = 1;
    const MAX_TIMEOUT: u64 = 300; // 5 minutes

    if timeout_seconds < MIN_TIMEOUT {
        return Err(anyhow!(
            "Timeout too short: {} seconds (minimum: {})",
            timeout_seconds,
            MIN_TIMEOUT
        ));
    }

    if timeout_seconds > MAX_TIMEOUT {
        return Err(anyhow!(
            "Timeout too long: {} seconds (maximum: {})",
            timeout_seconds,
            MAX_TIMEOUT
        ));
    }

    Ok(())
}

/// Validate the number of probes per target
pub fn validate_attempts(max_attempts: u32) -> Result<()> {
    const MAX_ATTEMPTS: u32 = 10;

    if max_attempts == 0 {
        return Err(anyhow!("At least one attempt per target is required"));
    }

    if max_attempts > MAX_ATTEMPTS {
        return Err(anyhow!(
            "Too many attempts: {} (maximum: {})",
            max_attempts,
            MAX_ATTEMPTS
        ));
    }

    Ok(())
}

/// Validate the pause between attempts
pub fn validate_retry_delay(retry_delay_seconds: u64) -> Result<()> {
    const MAX_DELAY: u64 = 300;

    if retry_delay_seconds > MAX_DELAY {
        return Err(anyhow!(
            "Retry delay too long: {} seconds (maximum: {})",
            retry_delay_seconds,
            MAX_DELAY
        ));
    }

    Ok(())
}
