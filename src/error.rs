//! Error types for the reclassifier.
//!
//! Three layers of failure are kept apart:
//!
//! - [`ClassifierError`]: what the external classification service can report.
//! - [`RateLimitError`]: a permit could not be obtained within the deadline.
//! - [`ReclassifierError`]: crate-level errors surfaced by setup, I/O and the
//!   orchestrator itself.
//!
//! Per-record failures never become a `ReclassifierError` during a batch run;
//! they are recorded on the run's statistics instead.

use crate::config::ConfigurationError;
use std::time::Duration;
use thiserror::Error;

/// Failure classes reported by a classification client.
///
/// The first two are transient and retried by the retry policy; anything else
/// is reported as `Other` and treated as fatal for the record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    /// The service is temporarily unreachable or refused the call.
    #[error("Classification service unavailable: {0}")]
    Unavailable(String),

    /// The service quota is exhausted for now.
    #[error("Classification service resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Any other failure; never retried.
    #[error("Classification failed: {0}")]
    Other(String),
}

impl ClassifierError {
    /// Stable identifier used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierError::Unavailable(_) => "unavailable",
            ClassifierError::ResourceExhausted(_) => "resource_exhausted",
            ClassifierError::Other(_) => "other",
        }
    }
}

impl From<reqwest::Error> for ClassifierError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            ClassifierError::Unavailable(error.to_string())
        } else {
            ClassifierError::Other(error.to_string())
        }
    }
}

/// A rate limiter refused to grant a permit in time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    #[error(
        "Rate limiter '{limiter}' would need {required_wait:?} for a permit, exceeding timeout {timeout:?}"
    )]
    Timeout {
        limiter: String,
        required_wait: Duration,
        timeout: Duration,
    },
}

#[derive(Debug, Error)]
pub enum ReclassifierError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error(transparent)]
    Classification(#[from] ClassifierError),

    #[error(transparent)]
    RateLimitTimeout(#[from] RateLimitError),

    #[error("Orchestration error: {0}")]
    Orchestration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for ReclassifierError {
    fn from(error: csv::Error) -> Self {
        ReclassifierError::Input(format!("CSV error: {error}"))
    }
}

pub type Result<T> = std::result::Result<T, ReclassifierError>;
