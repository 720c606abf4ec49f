//! Embedding providers.
//!
//! A provider turns one piece of text into one vector. It makes a single
//! logical request per call and never retries a failure on its own; whether
//! to try again is up to the caller.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EmbeddingError, Result};
use crate::{DEFAULT_DIMENSION, Embedding};

/// Shortest pause between readiness polls while a model is loading.
const MIN_COLD_START_POLL: Duration = Duration::from_millis(50);

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Identity of the model behind this provider.
    fn model(&self) -> &str;

    /// Length of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Generate an embedding for non-empty text.
    async fn embed(&self, text: &str) -> Result<Embedding>;
}

/// Settings for the Hugging Face inference endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HuggingFaceConfig {
    /// API base URL. The model path is appended to it.
    pub base_url: String,

    /// Model repository id.
    pub model: String,

    /// Bearer token, if the endpoint needs one.
    pub api_token: Option<String>,

    /// Expected vector length.
    pub dimension: usize,

    /// Timeout for a single HTTP request.
    pub request_timeout_secs: u64,

    /// Total time to wait for a cold model to come up.
    pub cold_start_timeout_secs: u64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co".to_string(),
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            api_token: None,
            dimension: DEFAULT_DIMENSION,
            request_timeout_secs: 30,
            cold_start_timeout_secs: 120,
        }
    }
}

/// Embedding provider backed by the Hugging Face feature-extraction API.
pub struct HuggingFaceProvider {
    config: HuggingFaceConfig,

    /// HTTP client.
    client: reqwest::Client,
}

impl HuggingFaceProvider {
    /// Create a new provider.
    pub fn new(config: HuggingFaceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn cold_start_budget(&self) -> Duration {
        Duration::from_secs(self.config.cold_start_timeout_secs)
    }

    async fn post(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        let mut request = self.client.post(self.endpoint()).json(body);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        debug!("Generating embedding with model: {}", self.config.model);

        let body = serde_json::json!({
            "inputs": text,
            "options": { "wait_for_model": true }
        });

        let started = Instant::now();
        let response = loop {
            let response = self.post(&body).await?;
            if response.status() != StatusCode::SERVICE_UNAVAILABLE {
                break response;
            }

            // A loading model answers 503 with an estimate of how long it needs.
            let error_text = response.text().await.unwrap_or_default();
            let Some(estimate) = loading_estimate(&error_text) else {
                return Err(EmbeddingError::ApiRequest {
                    status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                    body: error_text,
                });
            };

            let waited = started.elapsed();
            let budget = self.cold_start_budget();
            if waited >= budget {
                return Err(EmbeddingError::ModelNotReady {
                    waited_secs: waited.as_secs_f32(),
                });
            }

            let pause = estimate.max(MIN_COLD_START_POLL).min(budget - waited);
            info!(
                "Model {} is loading, waiting {:.1}s",
                self.config.model,
                pause.as_secs_f32()
            );
            tokio::time::sleep(pause).await;
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Embedding request failed with status {status}");
            return Err(EmbeddingError::ApiRequest {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let payload = response.text().await?;
        let embedding = parse_embedding(&payload)?;

        if embedding.len() != self.config.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimension,
                actual: embedding.len(),
            });
        }

        debug!("Generated embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }
}

/// Feature-extraction output: a single vector, or one row per input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}

#[derive(Debug, Deserialize)]
struct LoadingResponse {
    estimated_time: f32,
}

fn parse_embedding(payload: &str) -> Result<Embedding> {
    let parsed: FeatureExtractionResponse = serde_json::from_str(payload)
        .map_err(|e| EmbeddingError::InvalidResponse(format!("unexpected payload: {e}")))?;

    let embedding = match parsed {
        FeatureExtractionResponse::Flat(v) => v,
        FeatureExtractionResponse::Nested(rows) => rows.into_iter().next().unwrap_or_default(),
    };

    if embedding.is_empty() {
        return Err(EmbeddingError::InvalidResponse(
            "No embedding in response".to_string(),
        ));
    }
    if embedding.iter().any(|x| !x.is_finite()) {
        return Err(EmbeddingError::InvalidResponse(
            "embedding contains non-finite values".to_string(),
        ));
    }
    Ok(embedding)
}

fn loading_estimate(body: &str) -> Option<Duration> {
    let loading: LoadingResponse = serde_json::from_str(body).ok()?;
    Duration::try_from_secs_f32(loading.estimated_time).ok()
}
