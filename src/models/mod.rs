//! # Data Model
//!
//! - [`Record`]: one product row; its auto taxonomy code is the only mutable field
//! - [`ClassificationOutcome`]: what the retry policy resolved an attempt to
//! - [`BatchRun`]: the records of one invocation plus timing and statistics
//! - [`OutputRow`]: the aggregated, order-preserving projection written out

pub mod batch_run;
pub mod outcome;
pub mod output_row;
pub mod record;

pub use batch_run::{BatchRun, BatchStats, RecordResolution};
pub use outcome::{ClassificationOutcome, OutcomeDisposition};
pub use output_row::{MatchFlag, MatchSummary, OutputRow};
pub use record::{Record, RecordKey};
