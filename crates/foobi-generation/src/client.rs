//! Generation service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use foobi_models::{Concept, CreativeBrief};
use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::backend::{ConceptGenerator, VideoRenderer};
use crate::error::{GenerationError, GenerationResult};
use crate::types::{GenerateConceptsResponse, HealthResponse, RenderRequest, RenderedVideo};

/// Upper bound on the wait between retries.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Configuration for the generation client.
#[derive(Debug, Clone)]
pub struct GenerationClientConfig {
    /// Base URL of the generation service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
}

impl Default for GenerationClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
        }
    }
}

impl GenerationClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GENERATION_SERVICE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("GENERATION_SERVICE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: std::env::var("GENERATION_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
        }
    }
}

/// Client for a remote generation service.
pub struct GenerationClient {
    http: Client,
    config: GenerationClientConfig,
}

impl GenerationClient {
    pub fn new(config: GenerationClientConfig) -> GenerationResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenerationError::Network)?;

        Ok(Self { http, config })
    }

    pub fn from_env() -> GenerationResult<Self> {
        Self::new(GenerationClientConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Check if the generation service is healthy.
    pub async fn health_check(&self) -> GenerationResult<bool> {
        match self.http.get(self.url("/health")).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!(status = %response.status(), "Generation service health check failed");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Generation service health check error");
                Ok(false)
            }
        }
    }

    async fn post<B: serde::Serialize + Sync>(&self, path: &str, body: &B) -> GenerationResult<Response> {
        let url = self.url(path);
        debug!(url = %url, "Sending generation request");

        self.with_retry(|| async {
            let response = self
                .http
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        GenerationError::Timeout(self.config.timeout.as_secs())
                    } else {
                        GenerationError::Network(e)
                    }
                })?;
            check_status(response).await
        })
        .await
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> GenerationResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = GenerationResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = retry_delay(attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Generation request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(GenerationError::RequestFailed("Unknown error".to_string())))
    }
}

/// Exponential backoff from 500ms, capped at [`MAX_RETRY_DELAY`].
fn retry_delay(attempt: u32) -> Duration {
    let millis = 500u64.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(millis).min(MAX_RETRY_DELAY)
}

/// Map non-success statuses. 5xx is retryable, anything else is final.
async fn check_status(response: Response) -> GenerationResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = format!("Generation service returned {}: {}", status, body);
    if status.is_server_error() {
        Err(GenerationError::ServiceUnavailable(message))
    } else {
        Err(GenerationError::RequestFailed(message))
    }
}

#[async_trait]
impl ConceptGenerator for GenerationClient {
    async fn generate_concepts(&self, brief: &CreativeBrief) -> GenerationResult<Vec<Concept>> {
        let response = self.post("/v1/concepts", brief).await?;
        let body: GenerateConceptsResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        if body.concepts.is_empty() {
            return Err(GenerationError::InvalidResponse(
                "service returned no concepts".to_string(),
            ));
        }
        for concept in &body.concepts {
            concept
                .validate_timeline()
                .map_err(|source| GenerationError::InvalidTimeline {
                    concept_id: concept.id,
                    source,
                })?;
        }

        Ok(body.concepts)
    }
}

#[async_trait]
impl VideoRenderer for GenerationClient {
    async fn render_video(
        &self,
        brief: &CreativeBrief,
        concept: &Concept,
    ) -> GenerationResult<RenderedVideo> {
        let request = RenderRequest {
            brief: brief.clone(),
            concept: concept.clone(),
        };
        let response = self.post("/v1/renders", &request).await?;
        response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))
    }
}
