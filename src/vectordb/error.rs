use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by vector store operations.
pub enum VectorStoreError {
    /// Could not connect to the Qdrant endpoint.
    #[error("failed to connect to vector store at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Collection creation failed.
    #[error("failed to create collection '{collection}': {message}")]
    CreateCollectionFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Collection does not exist.
    #[error("collection not found: {collection}")]
    CollectionNotFound {
        /// Collection name.
        collection: String,
    },

    /// Upsert failed.
    #[error("failed to upsert records to '{collection}': {message}")]
    UpsertFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Search failed.
    #[error("failed to search in '{collection}': {message}")]
    SearchFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Delete failed.
    #[error("failed to delete records from '{collection}': {message}")]
    DeleteFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Vector dimension mismatch. Vectors are never truncated or padded.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Vector contained NaN or infinite components.
    #[error("vector for '{entity_id}' contains non-finite components")]
    NonFiniteComponent {
        /// Entity whose vector was rejected.
        entity_id: String,
    },
}

impl VectorStoreError {
    /// Connection-class failures are safe to retry for idempotent reads;
    /// validation failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::SearchFailed { .. }
        )
    }
}
