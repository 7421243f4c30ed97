use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::config::HttpEmbeddingConfig;
use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::constants::validate_embedding_dim;

/// OpenAI-compatible HTTP embedding client.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    config: HttpEmbeddingConfig,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

impl HttpEmbeddingProvider {
    /// Creates a provider for the configured endpoint.
    pub fn new(config: HttpEmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::ProviderFailed {
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpEmbeddingConfig {
        &self.config
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "input": text,
        });

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbeddingError::ProviderFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ProviderFailed {
                message: format!("HTTP {status}: {detail}"),
            });
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    message: e.to_string(),
                })?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse {
                message: "response contained no embedding data".to_string(),
            })?;

        validate_embedding_dim(vector.len(), self.config.dimension).map_err(|_| {
            EmbeddingError::Dimension {
                expected: self.config.dimension,
                actual: vector.len(),
            }
        })?;

        if vector.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::InvalidResponse {
                message: "embedding contained non-finite components".to_string(),
            });
        }

        debug!(
            input_chars = text.len(),
            dimension = vector.len(),
            model = %self.config.model,
            "Generated embedding"
        );

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}
