//! # Fixed-Window Rate Limiter
//!
//! Grants at most `limit_for_period` permits per window of
//! `limit_refresh_period`. Windows are counted from the limiter's creation.
//!
//! A caller that finds the current window exhausted reserves a permit in the
//! earliest window that still has room and sleeps until that window opens.
//! When the required wait exceeds `timeout_duration` the caller fails at
//! once with [`RateLimitError::Timeout`] and nothing is reserved. Callers are
//! therefore served in reservation order and never busy-spin.

use crate::error::RateLimitError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    pub limit_for_period: u32,
    pub limit_refresh_period: Duration,
    pub timeout_duration: Duration,
}

/// Evidence that a permit was granted. Fixed-window permits are consumed, not released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permit {
    /// How long the caller slept before its window opened
    pub waited: Duration,
}

/// Snapshot of limiter counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterMetrics {
    pub granted: u64,
    /// Grants that required sleeping into a later window
    pub granted_after_wait: u64,
    pub rejected: u64,
    pub total_wait: Duration,
    /// Permits left in the current window; negative means reserved into later windows
    pub available_permits: i64,
    pub active_cycle: u64,
}

#[derive(Debug)]
struct WindowState {
    active_cycle: u64,
    available_permits: i64,
    metrics: RateLimiterMetrics,
}

#[derive(Debug)]
pub struct RateLimiter {
    name: String,
    config: RateLimiterConfig,
    origin: Instant,
    state: Mutex<WindowState>,
}

impl RateLimiter {
    pub fn new(name: String, config: RateLimiterConfig) -> Self {
        info!(
            limiter = %name,
            limit_for_period = config.limit_for_period,
            limit_refresh_period_ms = config.limit_refresh_period.as_millis() as u64,
            timeout_ms = config.timeout_duration.as_millis() as u64,
            "🚦 Rate limiter initialized"
        );

        Self {
            name,
            config,
            origin: Instant::now(),
            state: Mutex::new(WindowState {
                active_cycle: 0,
                available_permits: i64::from(config.limit_for_period),
                metrics: RateLimiterMetrics::default(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Obtain a permit, sleeping until its window opens if necessary.
    pub async fn acquire(&self) -> Result<Permit, RateLimitError> {
        let wait = self.reserve()?;

        if !wait.is_zero() {
            debug!(
                limiter = %self.name,
                wait_ms = wait.as_millis() as u64,
                "⏳ Waiting for rate limit window"
            );
            tokio::time::sleep(wait).await;
        }

        Ok(Permit { waited: wait })
    }

    /// Obtain a permit only if one is available in the current window.
    pub fn try_acquire(&self) -> Option<Permit> {
        let mut state = self.state.lock();
        self.refresh(&mut state, Instant::now());
        if state.available_permits > 0 {
            state.available_permits -= 1;
            state.metrics.granted += 1;
            Some(Permit {
                waited: Duration::ZERO,
            })
        } else {
            None
        }
    }

    pub fn metrics(&self) -> RateLimiterMetrics {
        let mut state = self.state.lock();
        self.refresh(&mut state, Instant::now());
        let mut snapshot = state.metrics.clone();
        snapshot.available_permits = state.available_permits;
        snapshot.active_cycle = state.active_cycle;
        snapshot
    }

    /// Reserve a permit and return how long the caller must wait for it.
    fn reserve(&self) -> Result<Duration, RateLimitError> {
        let now = Instant::now();
        let mut state = self.state.lock();
        self.refresh(&mut state, now);

        let wait = if state.available_permits > 0 {
            Duration::ZERO
        } else {
            self.wait_for_reservation(&state, now)
        };

        if wait > self.config.timeout_duration {
            state.metrics.rejected += 1;
            drop(state);
            warn!(
                limiter = %self.name,
                required_wait_ms = wait.as_millis() as u64,
                timeout_ms = self.config.timeout_duration.as_millis() as u64,
                "🔴 Rate limit permit not available within timeout"
            );
            return Err(RateLimitError::Timeout {
                limiter: self.name.clone(),
                required_wait: wait,
                timeout: self.config.timeout_duration,
            });
        }

        state.available_permits -= 1;
        state.metrics.granted += 1;
        if !wait.is_zero() {
            state.metrics.granted_after_wait += 1;
            state.metrics.total_wait += wait;
        }
        Ok(wait)
    }

    fn current_cycle(&self, now: Instant) -> u64 {
        let elapsed = now.duration_since(self.origin).as_nanos();
        let period = self.config.limit_refresh_period.as_nanos().max(1);
        u64::try_from(elapsed / period).unwrap_or(u64::MAX)
    }

    /// Roll the window forward, refilling up to capacity. Reservations made
    /// into future windows are paid out of the refill.
    fn refresh(&self, state: &mut WindowState, now: Instant) {
        let current_cycle = self.current_cycle(now);
        if current_cycle > state.active_cycle {
            let elapsed_cycles = i64::try_from(current_cycle - state.active_cycle).unwrap_or(i64::MAX);
            let limit = i64::from(self.config.limit_for_period);
            state.available_permits = state
                .available_permits
                .saturating_add(elapsed_cycles.saturating_mul(limit))
                .min(limit);
            state.active_cycle = current_cycle;
        }
    }

    fn wait_for_reservation(&self, state: &WindowState, now: Instant) -> Duration {
        let period = self.config.limit_refresh_period.as_nanos().max(1);
        let elapsed = now.duration_since(self.origin).as_nanos();
        let next_window_start = (u128::from(state.active_cycle) + 1) * period;
        let until_next_window = next_window_start.saturating_sub(elapsed);

        // Position of this caller in the queue beyond the current window.
        let deficit = (1 - state.available_permits).max(1) as u128;
        let limit = u128::from(self.config.limit_for_period.max(1));
        let windows_ahead = deficit.div_ceil(limit);

        let nanos = until_next_window + (windows_ahead - 1) * period;
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
