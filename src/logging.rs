//! # Structured Logging Module
//!
//! Environment-aware structured logging for batch runs, plus the helpers that
//! emit the per-record and per-batch console lines.

use crate::config::{LogFormat, LoggingConfig};
use crate::models::{BatchRun, MatchFlag, MatchSummary, OutcomeDisposition, RecordKey};
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process
pub fn init_structured_logging(config: &LoggingConfig, environment: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                config
                    .filter
                    .clone()
                    .unwrap_or_else(|| get_log_level(environment).to_string()),
            )
        });

        let registry = tracing_subscriber::registry().with(filter);
        let result = match config.format {
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true),
                )
                .try_init(),
        };

        // A subscriber may already be installed (tests, embedding applications)
        if result.is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            format = ?config.format,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// One line per completed classification
pub fn log_classification(
    key: &RecordKey,
    manual_taxonomy: &str,
    auto_taxonomy: &str,
    matched: MatchFlag,
    disposition: OutcomeDisposition,
    attempts: u32,
) {
    tracing::info!(
        record = %key,
        manual = %manual_taxonomy,
        auto = %auto_taxonomy,
        matched = %matched,
        disposition = %disposition,
        attempts = attempts,
        "📋 {:<20} {:<30} {:<30} {:<5}",
        key.to_string(),
        manual_taxonomy,
        auto_taxonomy,
        matched.as_str()
    );
}

/// Summary line for a finished batch
pub fn log_batch_summary(run: &BatchRun) {
    let stats = &run.stats;
    tracing::info!(
        run_id = %run.run_id,
        elapsed_seconds = run.elapsed().as_secs(),
        total = stats.total,
        succeeded = stats.succeeded,
        recovered = stats.recovered,
        rate_limited = stats.rate_limited,
        failed = stats.failed,
        panicked = stats.panicked,
        backoff_sleeps = stats.backoff_sleeps,
        "🏁 Reclassification completed in {} seconds",
        run.elapsed().as_secs()
    );
}

/// Match totals after aggregation
pub fn log_match_summary(summary: &MatchSummary) {
    tracing::info!(
        total = summary.total,
        matched = summary.matched,
        unmatched = summary.unmatched,
        unclassified = summary.unclassified,
        match_rate = summary.match_rate(),
        "📊 MATCH_SUMMARY"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        "❌ ERROR"
    );
}
