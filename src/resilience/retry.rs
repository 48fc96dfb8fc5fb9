//! # Retry Policy
//!
//! Wraps one classification attempt with bounded retries and exponential
//! backoff. The caller supplies three plain functions:
//!
//! - `attempt`: performs one call
//! - `classify`: sorts a failure into [`ErrorClass::Retryable`] or [`ErrorClass::Fatal`]
//! - `recover`: produces the fallback code once retryable failures exhaust
//!   `max_attempts`
//!
//! Retryable failures never reach the caller: they either end in a success
//! or in a recovered outcome. Fatal failures propagate on first sight, with
//! no retry.

use crate::classifier::ErrorClass;
use crate::constants::retry_defaults;
use crate::models::ClassificationOutcome;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total calls including the first; at least 1
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry_defaults::MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(retry_defaults::INITIAL_DELAY_MS),
            multiplier: retry_defaults::MULTIPLIER,
            max_delay: None,
        }
    }
}

impl RetryConfig {
    /// Sleep before retry number `retry_index` (0-based): `initial * multiplier^i`, capped.
    pub fn delay_for_retry(&self, retry_index: u32) -> Duration {
        let exponent = i32::try_from(retry_index).unwrap_or(i32::MAX);
        let nanos = (self.initial_delay.as_nanos() as f64 * self.multiplier.powi(exponent)).round();
        let delay = if nanos < u64::MAX as f64 {
            Duration::from_nanos(nanos as u64)
        } else {
            Duration::MAX
        };
        match self.max_delay {
            Some(max_delay) => delay.min(max_delay),
            None => delay,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub async fn execute<F, Fut, E, C, R>(
        &self,
        attempt: F,
        classify: C,
        recover: R,
    ) -> Result<ClassificationOutcome, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, E>>,
        E: Display,
        C: Fn(&E) -> ErrorClass,
        R: FnOnce(&E) -> String,
    {
        execute_with_retry(&self.config, attempt, classify, recover).await
    }
}

/// Run `attempt` under `config`; see the module docs for the contract.
pub async fn execute_with_retry<F, Fut, E, C, R>(
    config: &RetryConfig,
    mut attempt: F,
    classify: C,
    recover: R,
) -> Result<ClassificationOutcome, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: Display,
    C: Fn(&E) -> ErrorClass,
    R: FnOnce(&E) -> String,
{
    let max_attempts = config.max_attempts.max(1);
    let mut backoff_delays = Vec::new();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;

        let error = match attempt().await {
            Ok(code) => {
                return Ok(ClassificationOutcome::succeeded(code, attempts, backoff_delays));
            }
            Err(error) => error,
        };

        if classify(&error) == ErrorClass::Fatal {
            debug!(attempt = attempts, error = %error, "Fatal error, not retrying");
            return Err(error);
        }

        if attempts >= max_attempts {
            warn!(
                attempts = attempts,
                error = %error,
                "🔴 Retries exhausted, recovering with fallback"
            );
            let fallback = recover(&error);
            return Ok(ClassificationOutcome::recovered(
                fallback,
                attempts,
                backoff_delays,
            ));
        }

        let delay = config.delay_for_retry(attempts - 1);
        warn!(
            attempt = attempts,
            max_attempts = max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "🟡 Transient failure, backing off"
        );
        tokio::time::sleep(delay).await;
        backoff_delays.push(delay);
    }
}
