//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is treated as an invariant across the embedding,
//! vectordb, and retrieval modules. Every vector entering or leaving a module
//! boundary must have exactly `embedding_dim` finite components; use
//! [`validate_embedding_dim`] to catch mismatches early instead of letting a
//! short or padded vector corrupt similarity scores downstream.

/// Default embedding dimension (number of f32 components per vector).
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Default model-version tag stored alongside each embedding record.
pub const DEFAULT_MODEL_VERSION: &str = "profile-embed-v1";

/// Minimum cosine similarity for a vector hit to be considered at all.
///
/// Deliberately low: over-pruning before scoring and reranking loses
/// recoverable candidates, while a weak hit is cheap to demote later.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;

/// Candidates per LLM rank batch. Keeps prompts inside the token budget and
/// responses short enough that truncation is rare.
pub const DEFAULT_RERANK_BATCH_SIZE: usize = 10;

/// Minimum survivors of the filter pass; fewer than this triggers backfill.
pub const DEFAULT_FILTER_PASS_FLOOR: usize = 10;

/// Concurrent rank-batch calls in flight at once.
pub const DEFAULT_RERANK_PARALLELISM: usize = 4;

/// Runtime dimension configuration for modules that support dynamic
/// embedding sizes.
///
/// Modules that exchange vectors should agree on one `DimConfig` at
/// initialization; [`validate`](DimConfig::validate) checks internal
/// consistency and [`validate_embedding_dim`] checks per-vector conformance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Validates that this configuration is usable.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match the configured dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected one.
///
/// Use at module boundaries; a mismatched vector is always a hard error and
/// is never truncated or padded to fit.
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dim_config_default() {
        let config = DimConfig::default();
        assert_eq!(config.embedding_dim, DEFAULT_EMBEDDING_DIM);
    }

    #[test]
    fn test_dim_config_validate_zero() {
        let config = DimConfig::new(0);
        assert_eq!(config.validate(), Err(DimValidationError::ZeroDimension));
    }

    #[test]
    fn test_validate_embedding_dim_match() {
        assert!(validate_embedding_dim(768, 768).is_ok());
    }

    #[test]
    fn test_validate_embedding_dim_mismatch() {
        assert_eq!(
            validate_embedding_dim(384, 768),
            Err(DimValidationError::DimensionMismatch {
                expected: 768,
                actual: 384
            })
        );
    }

    #[test]
    fn test_error_display() {
        let err = DimValidationError::DimensionMismatch {
            expected: 768,
            actual: 384,
        };
        assert!(err.to_string().contains("768"));
        assert!(err.to_string().contains("384"));
    }
}
