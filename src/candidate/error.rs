use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by candidate store operations.
pub enum CandidateStoreError {
    /// No candidate with the given id.
    #[error("candidate not found: {id}")]
    NotFound {
        /// Candidate id.
        id: String,
    },

    /// The store is unreachable.
    #[error("candidate store unreachable: {message}")]
    ConnectionFailed {
        /// Error message.
        message: String,
    },
}

impl CandidateStoreError {
    /// Connection-class failures are safe to retry for idempotent reads.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. })
    }
}
