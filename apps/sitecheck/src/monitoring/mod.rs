pub mod checker;
/// Availability probing
///
/// This module is responsible for:
/// - Executing single HTTP/HTTPS probes
/// - Retrying failed probes with a fixed delay
/// - Validating targets and probe settings
pub mod prober;
pub mod types;
pub mod validation;

pub use checker::{Checker, HttpChecker};
pub use prober::Prober;
pub use types::{CheckResult, DownList, MonitorStatus, ProbeError, Target};
