use thiserror::Error;

use crate::candidate::CandidateStoreError;
use crate::embedding::EmbeddingError;
use crate::vectordb::VectorStoreError;

#[derive(Debug, Error)]
/// Errors returned by the retrieval engine.
pub enum RetrievalError {
    /// Malformed query: surfaced immediately, never retried.
    #[error("invalid retrieval query: {message}")]
    InvalidQuery {
        /// What was wrong.
        message: String,
    },

    /// Query vector dimension mismatch.
    #[error("invalid query vector dimension: expected {expected}, got {actual}")]
    Dimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Embedding generation failed.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Vector store failure.
    #[error(transparent)]
    Store(#[from] VectorStoreError),

    /// Candidate store failure during the direct-match or org post-filter
    /// step.
    #[error(transparent)]
    Candidates(#[from] CandidateStoreError),
}

impl RetrievalError {
    /// Connection-class failures that are safe to retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Embedding(e) => e.is_retryable(),
            Self::Store(e) => e.is_retryable(),
            Self::Candidates(e) => e.is_retryable(),
            Self::InvalidQuery { .. } | Self::Dimension { .. } => false,
        }
    }
}
