//! # Classification Error Classification
//!
//! Decides whether a failed classification attempt is worth retrying.
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ ClassifierError │────▶│ classify_error  │────▶│   ErrorClass    │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! Only the two transient service conditions are retryable. Everything else
//! is fatal for the record and propagates out of the retry policy untouched.

use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Transient - may succeed on retry after backoff
    Retryable,
    /// Permanent - propagate immediately
    Fatal,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::Retryable => write!(f, "Retryable"),
            ErrorClass::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Classify a classification client failure.
pub fn classify_error(error: &ClassifierError) -> ErrorClass {
    match error {
        ClassifierError::Unavailable(_) | ClassifierError::ResourceExhausted(_) => {
            ErrorClass::Retryable
        }
        ClassifierError::Other(_) => ErrorClass::Fatal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_service_errors_are_retryable() {
        assert_eq!(
            classify_error(&ClassifierError::Unavailable("503".into())),
            ErrorClass::Retryable
        );
        assert_eq!(
            classify_error(&ClassifierError::ResourceExhausted("quota".into())),
            ErrorClass::Retryable
        );
    }

    #[test]
    fn test_other_errors_are_fatal() {
        assert_eq!(
            classify_error(&ClassifierError::Other("bad request".into())),
            ErrorClass::Fatal
        );
    }
}
