//! HTTP client for a remote classification service.
//!
//! `POST <endpoint>` with a JSON [`ClassificationRequest`]; the service answers
//! `{ "taxonomy_code": "A:B:C:D" }`. Status codes map onto the failure
//! classes the retry policy understands.

use super::{ClassificationClient, ClassificationRequest, TaxonomyCode};
use crate::config::ClassifierConfig;
use crate::error::ClassifierError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct ClassificationResponse {
    taxonomy_code: String,
}

#[derive(Debug, Clone)]
pub struct HttpClassificationClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpClassificationClient {
    /// Build a client for `config.endpoint`.
    ///
    /// No request timeout is set here: the orchestrator enforces
    /// `request_timeout_ms` around every call, whatever the client.
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClassifierError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Map a non-success HTTP status onto a failure class.
pub fn error_for_status(status: StatusCode, body: &str) -> ClassifierError {
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    };

    match status {
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => {
            ClassifierError::Unavailable(detail)
        }
        StatusCode::TOO_MANY_REQUESTS => ClassifierError::ResourceExhausted(detail),
        _ => ClassifierError::Other(detail),
    }
}

#[async_trait]
impl ClassificationClient for HttpClassificationClient {
    async fn classify(&self, request: &ClassificationRequest) -> Result<String, ClassifierError> {
        let mut call = self.client.post(&self.endpoint).json(request);
        if let Some(api_key) = &self.api_key {
            call = call.bearer_auth(api_key);
        }

        let response = call.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = error_for_status(status, &body);
            debug!(
                record = %request.key,
                status = status.as_u16(),
                error_kind = error.kind(),
                "Classification service rejected call"
            );
            return Err(error);
        }

        let payload: ClassificationResponse = response.json().await.map_err(|e| {
            ClassifierError::Other(format!("malformed classification response: {e}"))
        })?;
        let code = TaxonomyCode::normalize(&payload.taxonomy_code);

        if !TaxonomyCode::is_well_formed(&code) {
            warn!(
                record = %request.key,
                answer = %code,
                "Service answer is not a four-level taxonomy code"
            );
        }

        Ok(code)
    }

    fn client_name(&self) -> &'static str {
        "http"
    }
}
