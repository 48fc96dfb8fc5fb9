//! # Orchestration Engine
//!
//! Fans out one classification unit per record and reassembles the results.
//!
//! ## Core Components
//!
//! - **BatchOrchestrator**: spawns one task per record, gates each through the
//!   shared rate limiter and the retry policy, waits for every task, then
//!   writes each result back into the record at the task's own index
//! - **aggregate**: walks the records in input order and projects them into
//!   output rows with the match flag
//!
//! ## Failure isolation
//!
//! A rate-limit timeout, a fatal classification error or a panic ends only
//! its own record's unit. The record keeps no auto code, the failure is
//! logged and counted, and every sibling unit runs to completion.

pub mod aggregator;
pub mod orchestrator;

pub use aggregator::aggregate;
pub use orchestrator::BatchOrchestrator;
