use std::time::Duration;

use crate::constants::DEFAULT_EMBEDDING_DIM;

/// Configuration for the HTTP embedding provider.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingConfig {
    /// OpenAI-compatible embeddings endpoint URL.
    pub endpoint: String,
    /// Bearer token, if the endpoint requires one.
    pub api_key: Option<String>,
    /// Model name sent in the request body.
    pub model: String,
    /// Expected vector dimension; responses with any other length fail.
    pub dimension: usize,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpEmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: crate::config::DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            api_key: None,
            model: "text-embedding-3-small".to_string(),
            dimension: DEFAULT_EMBEDDING_DIM,
            timeout: Duration::from_secs(15),
        }
    }
}

impl HttpEmbeddingConfig {
    /// Builds a config from the crate [`Config`](crate::config::Config).
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            endpoint: config.embedding_endpoint.clone(),
            api_key: config.embedding_api_key.clone(),
            model: config.embedding_model.clone(),
            dimension: config.embedding_dim,
            timeout: Duration::from_secs(15),
        }
    }
}
