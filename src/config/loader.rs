//! Configuration Loader
//!
//! Environment-aware configuration loading. Sources are layered with the
//! `config` crate, later sources overriding earlier ones:
//!
//! 1. `ReclassifierConfig::default()`
//! 2. `<config_dir>/reclassifier.toml` (optional)
//! 3. `<config_dir>/reclassifier.<environment>.toml` (optional)
//! 4. `RECLASSIFIER__SECTION__FIELD` environment variables

use super::error::{ConfigResult, ConfigurationError};
use super::ReclassifierConfig;
use crate::constants::env_vars;
use ::config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const BASE_CONFIG_STEM: &str = "reclassifier";

/// Loaded, validated configuration plus where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: ReclassifierConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let explicit = config_dir.is_some();
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));

        if explicit && !config_directory.is_dir() {
            return Err(ConfigurationError::DirectoryNotFound {
                path: config_directory,
            });
        }

        debug!(
            environment = %environment,
            config_directory = %config_directory.display(),
            "Loading configuration"
        );

        let config = Self::load_layered(&config_directory, environment)?;
        config.validate()?;

        debug!(
            config = %Self::sanitize_config_for_logging(&config)?,
            "Configuration loaded"
        );
        info!(
            environment = %environment,
            limit_for_period = config.rate_limiter.limit_for_period,
            limit_refresh_period_ms = config.rate_limiter.limit_refresh_period_ms,
            max_attempts = config.retry.max_attempts,
            endpoint = %config.classifier.endpoint,
            "⚙️ Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Build a manager around an already constructed configuration
    pub fn from_config(config: ReclassifierConfig, environment: &str) -> ConfigResult<Self> {
        config.validate()?;
        Ok(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: PathBuf::from("config"),
        })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ReclassifierConfig {
        &self.config
    }

    /// Get the current environment
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Get the configuration directory
    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Sanitized configuration for debugging; secrets are masked
    pub fn debug_config(&self) -> ConfigResult<serde_json::Value> {
        Self::sanitize_config_for_logging(&self.config)
    }

    fn load_layered(config_directory: &Path, environment: &str) -> ConfigResult<ReclassifierConfig> {
        let base_file = config_directory.join(format!("{BASE_CONFIG_STEM}.toml"));
        let env_file = config_directory.join(format!("{BASE_CONFIG_STEM}.{environment}.toml"));

        let settings = Config::builder()
            .add_source(Config::try_from(&ReclassifierConfig::default())?)
            .add_source(File::from(base_file).required(false))
            .add_source(File::from(env_file).required(false))
            .add_source(
                Environment::with_prefix(env_vars::CONFIG_PREFIX)
                    .separator(env_vars::CONFIG_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize::<ReclassifierConfig>()?)
    }

    /// Environment name: RECLASSIFIER_ENV || APP_ENV || 'development'
    pub fn detect_environment() -> String {
        env::var(env_vars::ENVIRONMENT)
            .or_else(|_| env::var(env_vars::APP_ENVIRONMENT))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }

    fn sanitize_config_for_logging(config: &ReclassifierConfig) -> ConfigResult<serde_json::Value> {
        let mut config_json = serde_json::to_value(config).map_err(|e| {
            ConfigurationError::JsonSerializationError {
                context: "configuration dump".to_string(),
                error: e.to_string(),
            }
        })?;

        let sensitive_patterns = ["password", "secret", "key", "token", "credential"];
        Self::sanitize_json_recursive(&mut config_json, &sensitive_patterns);
        Ok(config_json)
    }

    fn sanitize_json_recursive(value: &mut serde_json::Value, sensitive_patterns: &[&str]) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let key_lower = key.to_lowercase();
                    let is_sensitive = sensitive_patterns
                        .iter()
                        .any(|pattern| key_lower.contains(pattern));

                    if is_sensitive {
                        if !val.is_null() {
                            *val = serde_json::Value::String("[MASKED]".to_string());
                        }
                    } else {
                        Self::sanitize_json_recursive(val, sensitive_patterns);
                    }
                }
            }
            serde_json::Value::Array(arr) => {
                for item in arr.iter_mut() {
                    Self::sanitize_json_recursive(item, sensitive_patterns);
                }
            }
            _ => {}
        }
    }
}
