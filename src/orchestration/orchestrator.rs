//! # Batch Orchestrator
//!
//! One spawned task per record; no in-flight bound besides the shared rate
//! limiter. Tasks receive an owned [`ClassificationRequest`] and hand their
//! [`RecordResolution`] back through the join handle. The orchestrator alone
//! owns the records and writes each resolution into the record at the same
//! index, so no record is ever touched by two tasks.

use crate::classifier::{classify_error, ClassificationClient, ClassificationRequest};
use crate::config::ReclassifierConfig;
use crate::constants::FALLBACK_TAXONOMY_CODE;
use crate::error::ClassifierError;
use crate::logging::{log_batch_summary, log_classification, log_error};
use crate::models::{BatchRun, BatchStats, MatchFlag, Record, RecordResolution};
use crate::resilience::{RateLimiter, RetryPolicy};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

pub struct BatchOrchestrator<C> {
    client: Arc<C>,
    rate_limiter: Arc<RateLimiter>,
    retry_policy: RetryPolicy,
    fallback_code: String,
    call_timeout: Option<Duration>,
}

impl<C> BatchOrchestrator<C>
where
    C: ClassificationClient + 'static,
{
    pub fn new(client: Arc<C>, rate_limiter: Arc<RateLimiter>, retry_policy: RetryPolicy) -> Self {
        Self {
            client,
            rate_limiter,
            retry_policy,
            fallback_code: FALLBACK_TAXONOMY_CODE.to_string(),
            call_timeout: None,
        }
    }

    /// Build the limiter, retry policy, fallback and call timeout from configuration.
    pub fn from_config(client: Arc<C>, config: &ReclassifierConfig) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limiter.name.clone(),
            config.rate_limiter.to_resilience_config(),
        ));
        let retry_policy = RetryPolicy::new(config.retry.to_resilience_config());

        Self::new(client, rate_limiter, retry_policy)
            .with_fallback_code(config.retry.fallback_code.clone())
            .with_call_timeout(config.classifier.request_timeout())
    }

    pub fn with_fallback_code(mut self, fallback_code: impl Into<String>) -> Self {
        self.fallback_code = fallback_code.into();
        self
    }

    /// Deadline for a single classification call; exceeding it counts as a transient failure.
    pub fn with_call_timeout(mut self, call_timeout: Option<Duration>) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    /// Classify every record and return them, in input order, with their auto codes.
    ///
    /// Always completes; per-record failures are recorded in the run's
    /// resolutions and statistics.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub async fn run(&self, mut records: Vec<Record>) -> BatchRun {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!(
            run_id = %run_id,
            record_count = records.len(),
            client = self.client.client_name(),
            limiter = %self.rate_limiter.name(),
            "🚀 Starting reclassification of records"
        );

        let handles: Vec<_> = records
            .iter()
            .map(|record| {
                let unit = ClassificationUnit {
                    client: Arc::clone(&self.client),
                    rate_limiter: Arc::clone(&self.rate_limiter),
                    retry_policy: self.retry_policy,
                    fallback_code: self.fallback_code.clone(),
                    call_timeout: self.call_timeout,
                    manual_taxonomy: record.manual_taxonomy.clone(),
                };
                tokio::spawn(unit.run(ClassificationRequest::from(record)))
            })
            .collect();

        // Wait for all units; join_all keeps spawn order.
        let joined = join_all(handles).await;

        let mut resolutions = Vec::with_capacity(records.len());
        for (record, result) in records.iter_mut().zip(joined) {
            let resolution = match result {
                Ok(resolution) => resolution,
                Err(join_error) => {
                    error!(
                        record = %record.key(),
                        error = %join_error,
                        "Classification task panicked"
                    );
                    RecordResolution::Panicked(join_error.to_string())
                }
            };

            if let Some(code) = resolution.code() {
                if let Err(e) = record.assign_auto_taxonomy(code) {
                    log_error("orchestrator", "assign_auto_taxonomy", &e.to_string(), None);
                }
            }
            resolutions.push(resolution);
        }

        let stats = BatchStats::from_resolutions(&resolutions);
        let run = BatchRun {
            run_id,
            started_at,
            finished_at: Utc::now(),
            records,
            resolutions,
            stats,
        };
        log_batch_summary(&run);
        run
    }
}

/// Everything one record's task needs, owned so the task is `'static`.
struct ClassificationUnit<C> {
    client: Arc<C>,
    rate_limiter: Arc<RateLimiter>,
    retry_policy: RetryPolicy,
    fallback_code: String,
    call_timeout: Option<Duration>,
    manual_taxonomy: String,
}

impl<C> ClassificationUnit<C>
where
    C: ClassificationClient,
{
    async fn run(self, request: ClassificationRequest) -> RecordResolution {
        let permit = match self.rate_limiter.acquire().await {
            Ok(permit) => permit,
            Err(err) => {
                log_error(
                    "rate_limiter",
                    "acquire",
                    &err.to_string(),
                    Some(&request.key.to_string()),
                );
                return RecordResolution::RateLimited(err);
            }
        };
        debug!(
            record = %request.key,
            waited_ms = permit.waited.as_millis() as u64,
            "Rate limit permit granted"
        );

        let fallback_code = &self.fallback_code;
        let result = self
            .retry_policy
            .execute(
                || self.attempt(&request),
                classify_error,
                |err| {
                    error!(
                        record = %request.key,
                        error = %err,
                        "Failed to reclassify record after retries"
                    );
                    fallback_code.clone()
                },
            )
            .await;

        match result {
            Ok(outcome) => {
                let flag = MatchFlag::compare(&self.manual_taxonomy, Some(&outcome.code));
                log_classification(
                    &request.key,
                    &self.manual_taxonomy,
                    &outcome.code,
                    flag,
                    outcome.disposition,
                    outcome.attempts,
                );
                RecordResolution::Classified(outcome)
            }
            Err(err) => {
                log_error(
                    "classifier",
                    "classify",
                    &err.to_string(),
                    Some(&request.key.to_string()),
                );
                RecordResolution::Failed(err)
            }
        }
    }

    async fn attempt(&self, request: &ClassificationRequest) -> Result<String, ClassifierError> {
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, self.client.classify(request))
                .await
                .map_err(|_| {
                    ClassifierError::Unavailable(format!("classification call exceeded {limit:?}"))
                })?,
            None => self.client.classify(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::{RateLimiterConfig, RetryConfig};
    use async_trait::async_trait;

    struct EchoManual;

    #[async_trait]
    impl ClassificationClient for EchoManual {
        async fn classify(
            &self,
            request: &ClassificationRequest,
        ) -> Result<String, ClassifierError> {
            Ok(format!("{}:X:Y:Z", request.current_classification))
        }
    }

    struct Hangs;

    #[async_trait]
    impl ClassificationClient for Hangs {
        async fn classify(
            &self,
            _request: &ClassificationRequest,
        ) -> Result<String, ClassifierError> {
            futures::future::pending().await
        }
    }

    fn limiter() -> Arc<RateLimiter> {
        Arc::new(RateLimiter::new(
            "test".to_string(),
            RateLimiterConfig {
                limit_for_period: 100,
                limit_refresh_period: Duration::from_secs(60),
                timeout_duration: Duration::from_secs(1),
            },
        ))
    }

    fn retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(RetryConfig {
            max_attempts,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: None,
        })
    }

    fn record(n: usize) -> Record {
        Record::new("B", format!("P{n}"), format!("C{n}"), None, None, "short", "M")
    }

    #[tokio::test]
    async fn test_empty_batch_completes() {
        let orchestrator = BatchOrchestrator::new(Arc::new(EchoManual), limiter(), retry(3));
        let run = orchestrator.run(Vec::new()).await;
        assert!(run.records.is_empty());
        assert_eq!(run.stats, BatchStats::default());
        assert!(run.finished_at >= run.started_at);
    }

    #[tokio::test]
    async fn test_results_land_on_their_own_records() {
        let orchestrator = BatchOrchestrator::new(Arc::new(EchoManual), limiter(), retry(3));
        let records: Vec<Record> = (0..20).map(record).collect();

        let run = orchestrator.run(records).await;

        assert_eq!(run.records.len(), 20);
        for (n, record) in run.records.iter().enumerate() {
            assert_eq!(record.part_number, format!("P{n}"));
            assert_eq!(record.auto_taxonomy(), Some(format!("C{n}:X:Y:Z").as_str()));
        }
        assert_eq!(run.stats.succeeded, 20);
        assert_eq!(orchestrator.rate_limiter().metrics().granted, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_timeout_is_retried_then_recovered() {
        let orchestrator = BatchOrchestrator::new(Arc::new(Hangs), limiter(), retry(2))
            .with_fallback_code("Z:Z:Z:Z")
            .with_call_timeout(Some(Duration::from_secs(5)));

        let run = orchestrator.run(vec![record(0)]).await;

        assert_eq!(run.records[0].auto_taxonomy(), Some("Z:Z:Z:Z"));
        let outcome = run.resolutions[0].outcome().unwrap();
        assert!(outcome.is_recovered());
        assert_eq!(outcome.attempts, 2);
        assert_eq!(run.stats.recovered, 1);
        assert_eq!(run.stats.backoff_sleeps, 1);
    }

    #[tokio::test]
    async fn test_from_config_applies_settings() {
        let mut config = ReclassifierConfig::default();
        config.rate_limiter.name = "configured".to_string();
        config.rate_limiter.limit_for_period = 7;
        config.retry.fallback_code = "F:F:F:F".to_string();

        let orchestrator = BatchOrchestrator::from_config(Arc::new(EchoManual), &config);
        assert_eq!(orchestrator.rate_limiter().name(), "configured");
        assert_eq!(orchestrator.rate_limiter().config().limit_for_period, 7);
        assert_eq!(orchestrator.fallback_code, "F:F:F:F");
        assert_eq!(orchestrator.call_timeout, Some(Duration::from_secs(30)));
    }
}
