use thiserror::Error;

use crate::retrieval::RetrievalError;

#[derive(Debug, Error)]
/// Hard pipeline failures. Everything else degrades into a successful
/// response with `degraded: true` in the diagnostics.
pub enum PipelineError {
    /// Malformed request; surfaced immediately, never retried.
    #[error("invalid search request: {message}")]
    Validation {
        /// What was wrong.
        message: String,
    },

    /// The mandatory retrieval stage failed.
    #[error("retrieval failed in {stage} stage: {source}")]
    Retrieval {
        /// Originating stage (`embedding`, `vector_query`, `org_filter`).
        stage: &'static str,
        /// Underlying error.
        #[source]
        source: RetrievalError,
    },

    /// Collaborator construction failed at startup.
    #[error("pipeline initialization failed: {message}")]
    Init {
        /// What failed to come up.
        message: String,
    },
}

impl PipelineError {
    pub(crate) fn from_retrieval(err: RetrievalError) -> Self {
        match err {
            RetrievalError::InvalidQuery { message } => Self::Validation { message },
            RetrievalError::Dimension { expected, actual } => Self::Validation {
                message: format!("query vector dimension {actual} does not match index dimension {expected}"),
            },
            err @ RetrievalError::Embedding(_) => Self::Retrieval {
                stage: "embedding",
                source: err,
            },
            err @ RetrievalError::Store(_) => Self::Retrieval {
                stage: "vector_query",
                source: err,
            },
            err @ RetrievalError::Candidates(_) => Self::Retrieval {
                stage: "org_filter",
                source: err,
            },
        }
    }
}
