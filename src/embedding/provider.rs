use async_trait::async_trait;

use super::error::EmbeddingError;

/// Turns free text into a fixed-dimension vector.
///
/// Implementations must return exactly [`dimension`](Self::dimension) finite
/// components or fail; callers never truncate or pad.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generates an embedding for `text`.
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Dimension of every vector this provider produces.
    fn dimension(&self) -> usize;
}
