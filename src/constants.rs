//! # System Constants
//!
//! Literals and defaults that define the operational boundaries of a
//! reclassification run. Configuration defaults are taken from here so that
//! the TOML files, the `Default` impls and the tests agree.

/// Sentinel taxonomy code written when transient failures exhaust all retries.
pub const FALLBACK_TAXONOMY_CODE: &str = "A:B:C:D";

/// Number of colon-separated levels in a taxonomy code.
pub const TAXONOMY_LEVELS: usize = 4;

/// Separator between taxonomy levels.
pub const TAXONOMY_SEPARATOR: char = ':';

/// Match flag literals in the output table.
pub mod match_flag {
    pub const YES: &str = "Yes";
    pub const NO: &str = "No";
}

/// Columns appended to the input header in the output table.
pub mod output_columns {
    pub const AUTO_TAXONOMY: &str = "auto_new_taxonomy";
    pub const MATCH: &str = "match";
}

/// Number of positional columns a data row must carry.
pub const INPUT_COLUMN_COUNT: usize = 7;

/// Rate limiter defaults: the classification service quota.
pub mod rate_limit_defaults {
    pub const LIMITER_NAME: &str = "classification_client";
    pub const LIMIT_FOR_PERIOD: u32 = 280;
    pub const LIMIT_REFRESH_PERIOD_MS: u64 = 60_000;
    pub const TIMEOUT_DURATION_MS: u64 = 70_000;
}

/// Retry defaults for transient classification failures.
pub mod retry_defaults {
    pub const MAX_ATTEMPTS: u32 = 3;
    pub const INITIAL_DELAY_MS: u64 = 15_000;
    pub const MULTIPLIER: f64 = 2.0;
}

/// Retrieval and generation defaults for the classification client.
pub mod classifier_defaults {
    pub const ENDPOINT: &str = "http://localhost:8080/v1/classify";
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;
    pub const SIMILARITY_THRESHOLD: f64 = 0.4;
    pub const TOP_K: usize = 10;
    pub const TAXONOMY_LEVEL: u8 = 4;
    pub const TEMPERATURE: f32 = 0.0;
    pub const GENERATION_TOP_K: u32 = 1;
    pub const MAX_OUTPUT_TOKENS: u32 = 50;
}

/// Environment variables consulted during startup.
pub mod env_vars {
    pub const ENVIRONMENT: &str = "RECLASSIFIER_ENV";
    pub const APP_ENVIRONMENT: &str = "APP_ENV";
    pub const CONFIG_PREFIX: &str = "RECLASSIFIER";
    pub const CONFIG_SEPARATOR: &str = "__";
}
