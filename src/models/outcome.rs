use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a classification attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeDisposition {
    /// The client answered with a code
    Succeeded,
    /// Transient failures exhausted every attempt; the fallback code was substituted
    RecoveredAfterRetries,
}

impl std::fmt::Display for OutcomeDisposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeDisposition::Succeeded => write!(f, "succeeded"),
            OutcomeDisposition::RecoveredAfterRetries => write!(f, "recovered_after_retries"),
        }
    }
}

/// Result of one retry-wrapped classification.
///
/// Never carries a transient error: the retry policy resolves every
/// transient failure path into either a success or the fallback code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    pub code: String,
    pub disposition: OutcomeDisposition,
    /// Calls made to the client, including the first
    pub attempts: u32,
    /// Backoff sleeps taken between attempts, in order
    pub backoff_delays: Vec<Duration>,
}

impl ClassificationOutcome {
    pub fn succeeded(code: impl Into<String>, attempts: u32, backoff_delays: Vec<Duration>) -> Self {
        Self {
            code: code.into(),
            disposition: OutcomeDisposition::Succeeded,
            attempts,
            backoff_delays,
        }
    }

    pub fn recovered(code: impl Into<String>, attempts: u32, backoff_delays: Vec<Duration>) -> Self {
        Self {
            code: code.into(),
            disposition: OutcomeDisposition::RecoveredAfterRetries,
            attempts,
            backoff_delays,
        }
    }

    pub fn is_recovered(&self) -> bool {
        self.disposition == OutcomeDisposition::RecoveredAfterRetries
    }

    pub fn total_backoff(&self) -> Duration {
        self.backoff_delays.iter().sum()
    }
}
