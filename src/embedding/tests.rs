use std::sync::Arc;

use super::cache::CachedEmbedder;
use super::error::EmbeddingError;
use super::mock::MockEmbeddingProvider;
use super::provider::EmbeddingProvider;

#[tokio::test]
async fn test_mock_is_deterministic() {
    let provider = MockEmbeddingProvider::new(768);

    let a = provider.generate("senior backend engineer").await.unwrap();
    let b = provider.generate("senior backend engineer").await.unwrap();
    let c = provider.generate("junior designer").await.unwrap();

    assert_eq!(a.len(), 768);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.iter().all(|v| v.is_finite()));
}

#[tokio::test]
async fn test_pinned_vector_wins() {
    let provider = MockEmbeddingProvider::new(4);
    provider.pin("query", vec![1.0, 0.0, 0.0, 0.0]);

    let v = provider.generate("query").await.unwrap();
    assert_eq!(v, vec![1.0, 0.0, 0.0, 0.0]);
}

#[tokio::test]
async fn test_failing_provider_errors() {
    let provider = MockEmbeddingProvider::new(4);
    provider.set_failing(true);

    let err = provider.generate("query").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::ProviderFailed { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_cache_avoids_second_provider_call() {
    let inner = Arc::new(MockEmbeddingProvider::new(8));
    let cached = CachedEmbedder::new(inner.clone());

    let a = cached.generate("hello").await.unwrap();
    let b = cached.generate("hello").await.unwrap();

    assert_eq!(a, b);
    assert_eq!(inner.call_count(), 1);
    cached.run_pending_tasks();
    assert_eq!(cached.len(), 1);
}

#[tokio::test]
async fn test_cache_misses_are_per_text() {
    let inner = Arc::new(MockEmbeddingProvider::new(8));
    let cached = CachedEmbedder::new(inner.clone());

    cached.generate("one").await.unwrap();
    cached.generate("two").await.unwrap();

    assert_eq!(inner.call_count(), 2);
}

#[tokio::test]
async fn test_cache_propagates_errors_without_storing() {
    let inner = Arc::new(MockEmbeddingProvider::new(8));
    let cached = CachedEmbedder::new(inner.clone());

    inner.set_failing(true);
    assert!(cached.generate("query").await.is_err());

    inner.set_failing(false);
    let v = cached.generate("query").await.unwrap();
    assert_eq!(v.len(), 8);
    // One failed call plus one successful call.
    assert_eq!(inner.call_count(), 2);
}

#[test]
fn test_dimension_passthrough() {
    let inner = Arc::new(MockEmbeddingProvider::new(32));
    let cached = CachedEmbedder::new(inner);
    assert_eq!(cached.dimension(), 32);
}
