//! Text → vector cache.
//!
//! Keyed by the full BLAKE3 digest of the input text. The cache is an
//! opportunistic performance layer with last-writer-wins semantics; a miss
//! or a racing double-write is always correct, never wrong.

use async_trait::async_trait;
use moka::sync::Cache;
use std::sync::Arc;
use tracing::debug;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::hashing::hash_text;

const DEFAULT_CAPACITY: u64 = 10_000;

/// Wraps any [`EmbeddingProvider`] with an in-memory LRU cache.
pub struct CachedEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    entries: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl CachedEmbedder {
    /// Wraps `inner` with the default capacity.
    pub fn new(inner: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    /// Wraps `inner` with a max entry capacity (LRU eviction).
    pub fn with_capacity(inner: Arc<dyn EmbeddingProvider>, capacity: u64) -> Self {
        Self {
            inner,
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    /// Runs any pending maintenance tasks in the underlying cache.
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbedder {
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = hash_text(text);

        if let Some(hit) = self.entries.get(&key) {
            debug!(input_chars = text.len(), "Embedding cache hit");
            return Ok(hit.as_ref().clone());
        }

        let vector = self.inner.generate(text).await?;
        self.entries.insert(key, Arc::new(vector.clone()));
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
