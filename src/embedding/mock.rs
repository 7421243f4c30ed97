use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::hashing::hash_text;

/// Deterministic embedding provider for tests.
///
/// Vectors are derived from the BLAKE3 digest of the text, so equal inputs
/// always produce equal vectors. Fixed vectors can be pinned per text to
/// steer similarity in tests.
pub struct MockEmbeddingProvider {
    dimension: usize,
    fixed: RwLock<HashMap<String, Vec<f32>>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fixed: RwLock::new(HashMap::new()),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Pins an exact vector for a given text.
    pub fn pin(&self, text: &str, vector: Vec<f32>) {
        self.fixed.write().insert(text.to_string(), vector);
    }

    /// Forces every subsequent call to fail.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of `generate` calls observed (cache-hit tests rely on this).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn derive(&self, text: &str) -> Vec<f32> {
        let digest = hash_text(text);
        (0..self.dimension)
            .map(|i| {
                let byte = digest[i % 32];
                let mixed = byte.wrapping_add((i / 32) as u8);
                (mixed as f32 / 255.0) * 2.0 - 1.0
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::ProviderFailed {
                message: "mock provider marked failing".to_string(),
            });
        }

        if let Some(pinned) = self.fixed.read().get(text) {
            return Ok(pinned.clone());
        }

        Ok(self.derive(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
