//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `TALENTRANK_*` environment
//! variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_FILTER_PASS_FLOOR, DEFAULT_RERANK_BATCH_SIZE,
    DEFAULT_RERANK_PARALLELISM, DEFAULT_SIMILARITY_THRESHOLD,
};

/// Default Qdrant URL used when `TALENTRANK_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default collection holding profile embeddings.
pub const DEFAULT_COLLECTION_NAME: &str = "talent_profiles";

/// Default OpenAI-compatible embeddings endpoint.
pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `TALENTRANK_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Vector collection name. Default: `talent_profiles`.
    pub collection_name: String,

    /// OpenAI-compatible embeddings endpoint.
    pub embedding_endpoint: String,

    /// Bearer token for the embeddings endpoint, if required.
    pub embedding_api_key: Option<String>,

    /// Embedding model name sent to the provider.
    pub embedding_model: String,

    /// Embedding dimension. Default: `768`.
    pub embedding_dim: usize,

    /// Model name for the reranking LLM (genai naming, e.g. `gpt-4o-mini`).
    pub llm_model: String,

    /// Minimum cosine similarity for retrieval hits. Default: `0.5`.
    pub similarity_threshold: f32,

    /// Candidates per rank batch. Default: `10`.
    pub rerank_batch_size: usize,

    /// Concurrent rank batches in flight. Default: `4`.
    pub rerank_parallelism: usize,

    /// Minimum survivors of the filter pass. Default: `10`.
    pub filter_pass_floor: usize,

    /// Skip the filter pass entirely (low-rejection domains).
    pub skip_filter_pass: bool,

    /// Wall-clock budget for the whole rerank stage.
    pub rerank_budget: Duration,

    /// Per-LLM-call timeout.
    pub llm_call_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            embedding_endpoint: DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            embedding_api_key: None,
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            llm_model: "gpt-4o-mini".to_string(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            rerank_batch_size: DEFAULT_RERANK_BATCH_SIZE,
            rerank_parallelism: DEFAULT_RERANK_PARALLELISM,
            filter_pass_floor: DEFAULT_FILTER_PASS_FLOOR,
            skip_filter_pass: false,
            rerank_budget: Duration::from_secs(45),
            llm_call_timeout: Duration::from_secs(20),
        }
    }
}

impl Config {
    const ENV_QDRANT_URL: &'static str = "TALENTRANK_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "TALENTRANK_COLLECTION";
    const ENV_EMBEDDING_ENDPOINT: &'static str = "TALENTRANK_EMBEDDING_ENDPOINT";
    const ENV_EMBEDDING_API_KEY: &'static str = "TALENTRANK_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_MODEL: &'static str = "TALENTRANK_EMBEDDING_MODEL";
    const ENV_EMBEDDING_DIM: &'static str = "TALENTRANK_EMBEDDING_DIM";
    const ENV_LLM_MODEL: &'static str = "TALENTRANK_LLM_MODEL";
    const ENV_SIMILARITY_THRESHOLD: &'static str = "TALENTRANK_SIMILARITY_THRESHOLD";
    const ENV_RERANK_BATCH_SIZE: &'static str = "TALENTRANK_RERANK_BATCH_SIZE";
    const ENV_RERANK_PARALLELISM: &'static str = "TALENTRANK_RERANK_PARALLELISM";
    const ENV_FILTER_PASS_FLOOR: &'static str = "TALENTRANK_FILTER_PASS_FLOOR";
    const ENV_SKIP_FILTER_PASS: &'static str = "TALENTRANK_SKIP_FILTER_PASS";
    const ENV_RERANK_BUDGET_SECS: &'static str = "TALENTRANK_RERANK_BUDGET_SECS";
    const ENV_LLM_CALL_TIMEOUT_SECS: &'static str = "TALENTRANK_LLM_CALL_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            qdrant_url: Self::parse_string(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection_name: Self::parse_string(Self::ENV_COLLECTION, defaults.collection_name),
            embedding_endpoint: Self::parse_string(
                Self::ENV_EMBEDDING_ENDPOINT,
                defaults.embedding_endpoint,
            ),
            embedding_api_key: Self::parse_optional(Self::ENV_EMBEDDING_API_KEY),
            embedding_model: Self::parse_string(
                Self::ENV_EMBEDDING_MODEL,
                defaults.embedding_model,
            ),
            embedding_dim: Self::parse_usize(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?,
            llm_model: Self::parse_string(Self::ENV_LLM_MODEL, defaults.llm_model),
            similarity_threshold: Self::parse_f32(
                Self::ENV_SIMILARITY_THRESHOLD,
                defaults.similarity_threshold,
            )?,
            rerank_batch_size: Self::parse_usize(
                Self::ENV_RERANK_BATCH_SIZE,
                defaults.rerank_batch_size,
            )?,
            rerank_parallelism: Self::parse_usize(
                Self::ENV_RERANK_PARALLELISM,
                defaults.rerank_parallelism,
            )?,
            filter_pass_floor: Self::parse_usize(
                Self::ENV_FILTER_PASS_FLOOR,
                defaults.filter_pass_floor,
            )?,
            skip_filter_pass: Self::parse_bool(
                Self::ENV_SKIP_FILTER_PASS,
                defaults.skip_filter_pass,
            ),
            rerank_budget: Duration::from_secs(Self::parse_u64(
                Self::ENV_RERANK_BUDGET_SECS,
                defaults.rerank_budget.as_secs(),
            )?),
            llm_call_timeout: Duration::from_secs(Self::parse_u64(
                Self::ENV_LLM_CALL_TIMEOUT_SECS,
                defaults.llm_call_timeout.as_secs(),
            )?),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                var: Self::ENV_QDRANT_URL,
            });
        }
        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroValue {
                var: Self::ENV_EMBEDDING_DIM,
            });
        }
        if self.rerank_batch_size == 0 {
            return Err(ConfigError::ZeroValue {
                var: Self::ENV_RERANK_BATCH_SIZE,
            });
        }
        if self.rerank_parallelism == 0 {
            return Err(ConfigError::ZeroValue {
                var: Self::ENV_RERANK_PARALLELISM,
            });
        }
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.similarity_threshold,
            });
        }
        Ok(())
    }

    fn parse_string(var: &'static str, default: String) -> String {
        env::var(var).ok().filter(|v| !v.trim().is_empty()).unwrap_or(default)
    }

    fn parse_optional(var: &'static str) -> Option<String> {
        env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize(var: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_f32(var: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool(var: &'static str, default: bool) -> bool {
        env::var(var)
            .ok()
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(default)
    }
}
