//! Configuration Loading Tests
//!
//! Layered TOML loading against the shipped `config/` directory and
//! temporary directories.

use reclassifier::config::{ConfigManager, ConfigurationError, LogFormat};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

fn shipped_config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config")
}

#[test]
fn shipped_base_config_matches_defaults() {
    let manager =
        ConfigManager::load_from_directory_with_env(Some(shipped_config_dir()), "development")
            .expect("shipped configuration should load");
    let config = manager.config();

    assert_eq!(config.rate_limiter.limit_for_period, 280);
    assert_eq!(config.rate_limiter.limit_refresh_period_ms, 60_000);
    assert_eq!(config.rate_limiter.timeout_duration_ms, 70_000);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.fallback_code, "A:B:C:D");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(manager.environment(), "development");
}

#[test]
fn shipped_test_environment_shortens_windows() {
    let manager = ConfigManager::load_from_directory_with_env(Some(shipped_config_dir()), "test")
        .expect("test configuration should load");
    let config = manager.config();

    let retry = config.retry.to_resilience_config();
    assert_eq!(retry.initial_delay, Duration::from_millis(10));
    assert_eq!(retry.max_attempts, 3);
    assert_eq!(config.rate_limiter.limit_refresh_period_ms, 1000);
    assert_eq!(config.logging.filter.as_deref(), Some("warn"));
}

#[test]
fn shipped_production_environment_logs_json() {
    let manager =
        ConfigManager::load_from_directory_with_env(Some(shipped_config_dir()), "production")
            .expect("production configuration should load");
    assert_eq!(manager.config().logging.format, LogFormat::Json);
}

#[test]
fn invalid_override_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("reclassifier.toml"),
        "[retry]\nfallback_code = \"not-a-code\"\n",
    )
    .unwrap();

    let err = ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test")
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
}

#[test]
fn unknown_environment_uses_base_file_only() {
    let manager = ConfigManager::load_from_directory_with_env(Some(shipped_config_dir()), "staging")
        .expect("base configuration should load without an environment file");
    let config = manager.config();

    assert_eq!(config.retry.initial_delay_ms, 15_000);
    assert_eq!(config.logging.filter, None);
    assert_eq!(manager.config_directory(), shipped_config_dir().as_path());
}
