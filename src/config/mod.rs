//! # Reclassifier Configuration System
//!
//! Layered configuration: built-in defaults, then `reclassifier.toml`, then an
//! environment-specific `reclassifier.<env>.toml`, then `RECLASSIFIER__*`
//! environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reclassifier::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//!
//! let limiter = manager.config().rate_limiter.to_resilience_config();
//! let retry = manager.config().retry.to_resilience_config();
//! println!("{} permits per {:?}, {} attempts", limiter.limit_for_period,
//!     limiter.limit_refresh_period, retry.max_attempts);
//! # Ok(())
//! # }
//! ```
//!
//! The TOML-facing structs here carry plain numbers (`*_ms` fields). The
//! resilience module works with `Duration`-based configs obtained through
//! `to_resilience_config()`.

pub mod error;
pub mod loader;

use crate::classifier::TaxonomyCode;
use crate::constants::{classifier_defaults, rate_limit_defaults, retry_defaults};
use crate::constants::FALLBACK_TAXONOMY_CODE;
use crate::resilience;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring `config/reclassifier.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReclassifierConfig {
    /// Shared rate limiter in front of the classification service
    pub rate_limiter: RateLimiterComponentConfig,

    /// Retry and backoff for transient classification failures
    pub retry: RetryComponentConfig,

    /// Classification service connection and model options
    pub classifier: ClassifierConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

impl ReclassifierConfig {
    /// Validate values that would make a run meaningless or hang
    pub fn validate(&self) -> ConfigResult<()> {
        self.rate_limiter.validate()?;
        self.retry.validate()?;
        self.classifier.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimiterComponentConfig {
    pub name: String,
    /// Permits granted per refresh period
    pub limit_for_period: u32,
    pub limit_refresh_period_ms: u64,
    /// How long a caller may wait for a permit before failing
    pub timeout_duration_ms: u64,
}

impl Default for RateLimiterComponentConfig {
    fn default() -> Self {
        Self {
            name: rate_limit_defaults::LIMITER_NAME.to_string(),
            limit_for_period: rate_limit_defaults::LIMIT_FOR_PERIOD,
            limit_refresh_period_ms: rate_limit_defaults::LIMIT_REFRESH_PERIOD_MS,
            timeout_duration_ms: rate_limit_defaults::TIMEOUT_DURATION_MS,
        }
    }
}

impl RateLimiterComponentConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.limit_for_period == 0 {
            return Err(ConfigurationError::invalid_value(
                "rate_limiter.limit_for_period",
                self.limit_for_period,
                "must grant at least one permit per period",
            ));
        }
        if self.limit_refresh_period_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "rate_limiter.limit_refresh_period_ms",
                self.limit_refresh_period_ms,
                "refresh period must be positive",
            ));
        }
        Ok(())
    }

    /// Convert to the resilience module's format
    pub fn to_resilience_config(&self) -> resilience::RateLimiterConfig {
        resilience::RateLimiterConfig {
            limit_for_period: self.limit_for_period,
            limit_refresh_period: Duration::from_millis(self.limit_refresh_period_ms),
            timeout_duration: Duration::from_millis(self.timeout_duration_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryComponentConfig {
    /// Total calls including the first one
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub multiplier: f64,
    /// Upper bound for a single backoff sleep; unset means uncapped
    pub max_delay_ms: Option<u64>,
    /// Code substituted once transient failures exhaust all attempts
    pub fallback_code: String,
}

impl Default for RetryComponentConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry_defaults::MAX_ATTEMPTS,
            initial_delay_ms: retry_defaults::INITIAL_DELAY_MS,
            multiplier: retry_defaults::MULTIPLIER,
            max_delay_ms: None,
            fallback_code: FALLBACK_TAXONOMY_CODE.to_string(),
        }
    }
}

impl RetryComponentConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_attempts == 0 {
            return Err(ConfigurationError::invalid_value(
                "retry.max_attempts",
                self.max_attempts,
                "at least one attempt is required",
            ));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(ConfigurationError::invalid_value(
                "retry.multiplier",
                self.multiplier,
                "backoff multiplier must be a finite number >= 1.0",
            ));
        }
        if let Some(max_delay_ms) = self.max_delay_ms {
            if max_delay_ms < self.initial_delay_ms {
                return Err(ConfigurationError::invalid_value(
                    "retry.max_delay_ms",
                    max_delay_ms,
                    format!(
                        "must not be smaller than initial_delay_ms ({})",
                        self.initial_delay_ms
                    ),
                ));
            }
        }
        if !TaxonomyCode::is_well_formed(&self.fallback_code) {
            return Err(ConfigurationError::invalid_value(
                "retry.fallback_code",
                &self.fallback_code,
                "fallback must be a four-level taxonomy code",
            ));
        }
        Ok(())
    }

    /// Convert to the resilience module's format
    pub fn to_resilience_config(&self) -> resilience::RetryConfig {
        resilience::RetryConfig {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            multiplier: self.multiplier,
            max_delay: self.max_delay_ms.map(Duration::from_millis),
        }
    }
}

/// Classification service connection and retrieval/generation options
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Per-call deadline; a call exceeding it counts as the service being unavailable
    pub request_timeout_ms: u64,
    pub similarity_threshold: f64,
    pub top_k: usize,
    /// Only reference categories at this depth are retrieved
    pub taxonomy_level: u8,
    pub temperature: f32,
    pub generation_top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: classifier_defaults::ENDPOINT.to_string(),
            api_key: None,
            request_timeout_ms: classifier_defaults::REQUEST_TIMEOUT_MS,
            similarity_threshold: classifier_defaults::SIMILARITY_THRESHOLD,
            top_k: classifier_defaults::TOP_K,
            taxonomy_level: classifier_defaults::TAXONOMY_LEVEL,
            temperature: classifier_defaults::TEMPERATURE,
            generation_top_k: classifier_defaults::GENERATION_TOP_K,
            max_output_tokens: classifier_defaults::MAX_OUTPUT_TOKENS,
        }
    }
}

impl ClassifierConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "classifier.endpoint",
                &self.endpoint,
                "endpoint must not be empty",
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigurationError::invalid_value(
                "classifier.similarity_threshold",
                self.similarity_threshold,
                "similarity threshold must be within [0.0, 1.0]",
            ));
        }
        if self.top_k == 0 {
            return Err(ConfigurationError::invalid_value(
                "classifier.top_k",
                self.top_k,
                "retrieval must return at least one document",
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive; `RUST_LOG` wins when set
    pub filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_quota() {
        let config = ReclassifierConfig::default();
        let limiter = config.rate_limiter.to_resilience_config();
        assert_eq!(limiter.limit_for_period, 280);
        assert_eq!(limiter.limit_refresh_period, Duration::from_secs(60));
        assert_eq!(limiter.timeout_duration, Duration::from_secs(70));

        let retry = config.retry.to_resilience_config();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.initial_delay, Duration::from_secs(15));
        assert_eq!(retry.multiplier, 2.0);
        assert_eq!(retry.max_delay, None);
        assert_eq!(config.retry.fallback_code, "A:B:C:D");

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut config = ReclassifierConfig::default();
        config.rate_limiter.limit_for_period = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rate_limiter.limit_for_period"));
    }

    #[test]
    fn test_retry_validation() {
        let mut config = ReclassifierConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = ReclassifierConfig::default();
        config.retry.multiplier = 0.5;
        assert!(config.validate().is_err());

        let mut config = ReclassifierConfig::default();
        config.retry.max_delay_ms = Some(1_000);
        assert!(config.validate().is_err());

        let mut config = ReclassifierConfig::default();
        config.retry.fallback_code = "UNKNOWN".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_request_timeout_zero_disables_deadline() {
        let mut classifier = ClassifierConfig::default();
        assert_eq!(classifier.request_timeout(), Some(Duration::from_secs(30)));
        classifier.request_timeout_ms = 0;
        assert_eq!(classifier.request_timeout(), None);
    }
}
