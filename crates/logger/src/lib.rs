//! Shared logging setup for the workspace binaries.

mod tracing;

pub use crate::tracing::{LogFormat, init as init_tracing, init_verbose as init_tracing_verbose};
