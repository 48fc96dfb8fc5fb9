#![allow(dead_code)]

pub mod scripted_client;
pub mod strategies;

pub use scripted_client::*;

use reclassifier::resilience::{RateLimiter, RateLimiterConfig, RetryConfig, RetryPolicy};
use reclassifier::Record;
use std::sync::Arc;
use std::time::Duration;

/// Record whose part number doubles as the scripted client's lookup key
pub fn record(part_number: &str, manual_taxonomy: &str) -> Record {
    Record::new(
        "ACME",
        part_number,
        "OLD-CODE",
        Some("Old description".to_string()),
        None,
        format!("Short description for {part_number}"),
        manual_taxonomy,
    )
}

pub fn limiter(limit_for_period: u32, period: Duration, timeout: Duration) -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(
        "test_limiter".to_string(),
        RateLimiterConfig {
            limit_for_period,
            limit_refresh_period: period,
            timeout_duration: timeout,
        },
    ))
}

/// Limiter that never gets in the way of small batches
pub fn generous_limiter() -> Arc<RateLimiter> {
    limiter(10_000, Duration::from_secs(60), Duration::from_secs(70))
}

/// 3 attempts, 15s initial delay, doubling
pub fn default_retry() -> RetryPolicy {
    RetryPolicy::new(RetryConfig::default())
}
