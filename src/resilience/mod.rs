//! # Resilience Module
//!
//! Admission control and fault tolerance around the classification service.
//!
//! ## Architecture
//!
//! - **Rate Limiter**: one shared fixed-window limiter bounds the aggregate
//!   call rate regardless of how many records are in flight
//! - **Retry Policy**: bounded retries with exponential backoff for transient
//!   failures, resolving exhaustion to a fallback instead of an error
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reclassifier::classifier::classify_error;
//! use reclassifier::error::ClassifierError;
//! use reclassifier::resilience::{RateLimiter, RateLimiterConfig, RetryConfig, RetryPolicy};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let limiter = RateLimiter::new(
//!     "classification_client".to_string(),
//!     RateLimiterConfig {
//!         limit_for_period: 280,
//!         limit_refresh_period: Duration::from_secs(60),
//!         timeout_duration: Duration::from_secs(70),
//!     },
//! );
//! let retry = RetryPolicy::new(RetryConfig::default());
//!
//! let _permit = limiter.acquire().await?;
//! let outcome = retry
//!     .execute(
//!         || async { Ok::<_, ClassifierError>("10:20:30:40".to_string()) },
//!         classify_error,
//!         |_err| "A:B:C:D".to_string(),
//!     )
//!     .await?;
//! println!("{} after {} attempts", outcome.code, outcome.attempts);
//! # Ok(())
//! # }
//! ```

pub mod rate_limiter;
pub mod retry;

pub use rate_limiter::{Permit, RateLimiter, RateLimiterConfig, RateLimiterMetrics};
pub use retry::{execute_with_retry, RetryConfig, RetryPolicy};
