//! One-shot HTTP availability check with email alerting.
//!
//! A run probes every configured target with bounded retries and, when any
//! of them stays down, sends a single summary email through Resend.

pub mod config;
pub mod error;
pub mod monitoring;
pub mod notify;
pub mod report;
pub mod runner;

pub use error::AppError;
