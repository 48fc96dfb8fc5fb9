//! # Classification Client Boundary
//!
//! The external classification service is opaque to the orchestrator. It
//! only needs three things from it:
//!
//! - a call is a function of one request and safe to repeat,
//! - failures fall into the [`ClassifierError`] classes so the retry policy
//!   can tell transient from fatal ([`error_classifier`]),
//! - latency is bounded only by the shared rate limiter and an optional
//!   per-call timeout.
//!
//! Two implementations ship with the crate: [`HttpClassificationClient`] for a
//! remote classification service and [`RetrievalAugmentedClassifier`], which
//! composes a similarity search with a constrained generation call.

pub mod error_classifier;
pub mod http;
pub mod prompt;
pub mod retrieval;

use crate::constants::{TAXONOMY_LEVELS, TAXONOMY_SEPARATOR};
use crate::error::ClassifierError;
use crate::models::{Record, RecordKey};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use error_classifier::{classify_error, ErrorClass};
pub use http::HttpClassificationClient;
pub use retrieval::{
    CategoryDocument, GenerationModel, GenerationOptions, RetrievalAugmentedClassifier, Retriever,
    SearchRequest,
};

/// The fields of a record the classification service sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    #[serde(skip)]
    pub key: RecordKey,
    pub current_classification: String,
    pub current_classification_desc: Option<String>,
    pub short_description: String,
    pub long_description: Option<String>,
}

impl From<&Record> for ClassificationRequest {
    fn from(record: &Record) -> Self {
        Self {
            key: record.key(),
            current_classification: record.current_classification.clone(),
            current_classification_desc: record.current_classification_desc.clone(),
            short_description: record.short_description.clone(),
            long_description: record.long_description.clone(),
        }
    }
}

/// One classification attempt against the external service.
///
/// Implementations return the raw taxonomy code answer. They must not retry
/// internally; retries are owned by the orchestrator's retry policy.
#[async_trait]
pub trait ClassificationClient: Send + Sync {
    async fn classify(&self, request: &ClassificationRequest) -> Result<String, ClassifierError>;

    /// Name used in log fields
    fn client_name(&self) -> &'static str {
        "classification_client"
    }
}

#[async_trait]
impl<T> ClassificationClient for Arc<T>
where
    T: ClassificationClient + ?Sized,
{
    async fn classify(&self, request: &ClassificationRequest) -> Result<String, ClassifierError> {
        (**self).classify(request).await
    }

    fn client_name(&self) -> &'static str {
        (**self).client_name()
    }
}

/// Helpers for four-level `A:B:C:D` taxonomy codes.
pub struct TaxonomyCode;

impl TaxonomyCode {
    /// Flatten line breaks to spaces and trim, the way model answers are cleaned.
    pub fn normalize(raw: &str) -> String {
        raw.replace(['\r', '\n'], " ").trim().to_string()
    }

    /// True when `code` has exactly four non-empty, colon-separated levels.
    pub fn is_well_formed(code: &str) -> bool {
        let levels: Vec<&str> = code.split(TAXONOMY_SEPARATOR).collect();
        levels.len() == TAXONOMY_LEVELS
            && levels
                .iter()
                .all(|level| !level.is_empty() && level.trim() == *level)
    }
}
