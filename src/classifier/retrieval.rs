//! # Retrieval-Augmented Classification
//!
//! Composes a similarity search over reference category embeddings with a
//! single constrained generation call:
//!
//! ```text
//! request ──▶ build_prompt ──▶ Retriever::similar_categories ──▶ augment
//!                                                                  │
//!            TaxonomyCode::normalize ◀── GenerationModel::generate ◀┘
//! ```
//!
//! The vector store and the chat model stay behind the [`Retriever`] and
//! [`GenerationModel`] traits. Their errors pass through unchanged so the
//! retry policy still sees the original failure class.

use super::prompt::{augment_with_context, build_prompt};
use super::{ClassificationClient, ClassificationRequest, TaxonomyCode};
use crate::config::ClassifierConfig;
use crate::constants::TAXONOMY_SEPARATOR;
use crate::error::ClassifierError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A reference category returned by the similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDocument {
    pub code: String,
    pub description: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub top_k: usize,
    pub similarity_threshold: f64,
    /// Only categories at this taxonomy depth are candidates
    pub taxonomy_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl From<&ClassifierConfig> for SearchRequest {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            top_k: config.top_k,
            similarity_threshold: config.similarity_threshold,
            taxonomy_level: config.taxonomy_level,
        }
    }
}

impl From<&ClassifierConfig> for GenerationOptions {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_k: config.generation_top_k,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Similarity search over the reference category index
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn similar_categories(
        &self,
        query: &str,
        search: &SearchRequest,
    ) -> Result<Vec<CategoryDocument>, ClassifierError>;
}

/// Text generation backend
#[async_trait]
pub trait GenerationModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ClassifierError>;
}

pub struct RetrievalAugmentedClassifier<R, G> {
    retriever: R,
    model: G,
    search: SearchRequest,
    options: GenerationOptions,
}

impl<R, G> RetrievalAugmentedClassifier<R, G>
where
    R: Retriever,
    G: GenerationModel,
{
    pub fn new(retriever: R, model: G, config: &ClassifierConfig) -> Self {
        Self {
            retriever,
            model,
            search: SearchRequest::from(config),
            options: GenerationOptions::from(config),
        }
    }

    /// Keep only candidates the search contract allows; backends may over-return.
    fn admissible(&self, mut documents: Vec<CategoryDocument>) -> Vec<CategoryDocument> {
        let level = usize::from(self.search.taxonomy_level);
        documents.retain(|doc| {
            doc.score >= self.search.similarity_threshold
                && doc.code.split(TAXONOMY_SEPARATOR).count() == level
        });
        documents.sort_by(|a, b| b.score.total_cmp(&a.score));
        documents.truncate(self.search.top_k);
        documents
    }
}

#[async_trait]
impl<R, G> ClassificationClient for RetrievalAugmentedClassifier<R, G>
where
    R: Retriever,
    G: GenerationModel,
{
    async fn classify(&self, request: &ClassificationRequest) -> Result<String, ClassifierError> {
        let prompt = build_prompt(request);

        let documents = self
            .retriever
            .similar_categories(&prompt, &self.search)
            .await?;
        let documents = self.admissible(documents);

        debug!(
            record = %request.key,
            candidates = documents.len(),
            "Retrieved reference categories"
        );

        let augmented = augment_with_context(&prompt, &documents);
        let answer = self.model.generate(&augmented, &self.options).await?;
        let code = TaxonomyCode::normalize(&answer);

        if !TaxonomyCode::is_well_formed(&code) {
            warn!(
                record = %request.key,
                answer = %code,
                "Model answer is not a four-level taxonomy code"
            );
        }

        Ok(code)
    }

    fn client_name(&self) -> &'static str {
        "retrieval_augmented"
    }
}
