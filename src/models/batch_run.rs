//! One reclassification invocation: records, per-record resolutions and timing.

use super::outcome::ClassificationOutcome;
use super::record::Record;
use crate::error::{ClassifierError, RateLimitError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// How a record's unit of work ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordResolution {
    /// The retry policy produced a code (real or fallback)
    Classified(ClassificationOutcome),
    /// No rate limiter permit within the acquire timeout
    RateLimited(RateLimitError),
    /// A fatal classification error; never retried
    Failed(ClassifierError),
    /// The unit panicked before producing a result
    Panicked(String),
}

impl RecordResolution {
    pub fn outcome(&self) -> Option<&ClassificationOutcome> {
        match self {
            RecordResolution::Classified(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.outcome().map(|outcome| outcome.code.as_str())
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordResolution::Classified(outcome) if outcome.is_recovered() => "recovered",
            RecordResolution::Classified(_) => "succeeded",
            RecordResolution::RateLimited(_) => "rate_limited",
            RecordResolution::Failed(_) => "failed",
            RecordResolution::Panicked(_) => "panicked",
        }
    }
}

/// Counters over a batch's resolutions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total: usize,
    pub succeeded: usize,
    pub recovered: usize,
    pub rate_limited: usize,
    pub failed: usize,
    pub panicked: usize,
    /// Backoff sleeps taken across every record
    pub backoff_sleeps: usize,
}

impl BatchStats {
    pub fn from_resolutions(resolutions: &[RecordResolution]) -> Self {
        let mut stats = BatchStats {
            total: resolutions.len(),
            ..Default::default()
        };

        for resolution in resolutions {
            match resolution {
                RecordResolution::Classified(outcome) => {
                    stats.backoff_sleeps += outcome.backoff_delays.len();
                    if outcome.is_recovered() {
                        stats.recovered += 1;
                    } else {
                        stats.succeeded += 1;
                    }
                }
                RecordResolution::RateLimited(_) => stats.rate_limited += 1,
                RecordResolution::Failed(_) => stats.failed += 1,
                RecordResolution::Panicked(_) => stats.panicked += 1,
            }
        }

        stats
    }

    /// Records left without an auto taxonomy code
    pub fn unclassified(&self) -> usize {
        self.rate_limited + self.failed + self.panicked
    }
}

/// The ordered records of one invocation. Not persisted.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Input order; each record carries its assigned auto code if any
    pub records: Vec<Record>,
    /// Parallel to `records`
    pub resolutions: Vec<RecordResolution>,
    pub stats: BatchStats,
}

impl BatchRun {
    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}
