use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned while generating embeddings.
pub enum EmbeddingError {
    /// The provider call itself failed (network, auth, 5xx).
    #[error("embedding provider failed: {message}")]
    ProviderFailed {
        /// Error message.
        message: String,
    },

    /// The provider answered but the body was not usable.
    #[error("invalid embedding response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },

    /// The returned vector had the wrong dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Dimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },
}

impl EmbeddingError {
    /// Provider-level failures are transient and safe to retry; dimension
    /// and response-shape errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderFailed { .. })
    }
}
