#![allow(clippy::doc_markdown)] // Allow technical terms like CSV, HTTP in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Taxonomy Reclassifier
//!
//! Batch reclassification of product records into a four-level taxonomy.
//!
//! ## Overview
//!
//! Each record in a batch is sent to an external classification service that
//! returns a taxonomy code. Calls run concurrently, share a single
//! fixed-window rate limiter, and retry transient failures with exponential
//! backoff. Records whose retries run out receive a fallback code so the
//! batch always completes. Afterwards every automatic code is compared with
//! the record's manually assigned code.
//!
//! ## Module Organization
//!
//! - [`models`] - Records, classification outcomes, output rows and batch runs
//! - [`resilience`] - Fixed-window rate limiter and retry with exponential backoff
//! - [`classifier`] - Classification client boundary, error classification, HTTP client
//! - [`orchestration`] - Concurrent batch execution and result aggregation
//! - [`io`] - CSV input and augmented CSV output
//! - [`config`] - Layered configuration (TOML files plus environment overrides)
//! - [`logging`] - Structured logging setup and console lines
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reclassifier::classifier::HttpClassificationClient;
//! use reclassifier::config::ConfigManager;
//! use reclassifier::orchestration::{aggregate, BatchOrchestrator};
//! use std::sync::Arc;
//!
//! # async fn example() -> reclassifier::Result<()> {
//! let manager = ConfigManager::load()?;
//! let config = manager.config();
//!
//! let table = reclassifier::io::read_records("products.csv")?;
//! let client = Arc::new(HttpClassificationClient::new(&config.classifier)?);
//! let orchestrator = BatchOrchestrator::from_config(client, config);
//!
//! let run = orchestrator.run(table.records).await;
//! let rows = aggregate(&run.records);
//! reclassifier::io::write_output("products.out.csv", &table.header, &run.records, &rows)?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod resilience;

pub use classifier::{ClassificationClient, ClassificationRequest, ErrorClass};
pub use config::{ConfigManager, ReclassifierConfig};
pub use constants::FALLBACK_TAXONOMY_CODE;
pub use error::{ClassifierError, RateLimitError, ReclassifierError, Result};
pub use models::{
    BatchRun, BatchStats, ClassificationOutcome, MatchFlag, MatchSummary, OutputRow, Record,
    RecordKey,
};
pub use orchestration::{aggregate, BatchOrchestrator};
pub use resilience::{RateLimiter, RetryPolicy};
