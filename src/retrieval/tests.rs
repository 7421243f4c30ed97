use std::sync::Arc;

use super::engine::*;
use super::error::RetrievalError;
use super::retry::RetryConfig;
use crate::candidate::{
    CandidateRecord, CandidateStore, CompanyTier, InMemoryCandidateStore, ProfileFormat,
    SeniorityLevel, Specialty,
};
use crate::constants::DEFAULT_MODEL_VERSION;
use crate::embedding::MockEmbeddingProvider;
use crate::vectordb::{
    ChunkType, EmbeddingRecord, MockVectorStore, RecordMetadata, SearchFilters, VectorStore,
};

const TEST_DIM: usize = 8;

fn unit_vector(hot: usize) -> Vec<f32> {
    let mut v = vec![0.0; TEST_DIM];
    v[hot % TEST_DIM] = 1.0;
    v
}

/// A vector at `angle` between axis 0 and axis 1; cosine with axis 0 is
/// `cos(angle)`.
fn angled_vector(cos: f32) -> Vec<f32> {
    let sin = (1.0 - cos * cos).max(0.0).sqrt();
    let mut v = vec![0.0; TEST_DIM];
    v[0] = cos;
    v[1] = sin;
    v
}

fn candidate(id: &str, name: &str, email: &str) -> CandidateRecord {
    CandidateRecord {
        id: id.to_string(),
        full_name: name.to_string(),
        email: Some(email.to_string()),
        title: Some("Backend Engineer".to_string()),
        years_experience: Some(7.0),
        current_level: Some(SeniorityLevel::Senior),
        company_tier: Some(CompanyTier::Tier1),
        specialties: vec![Specialty::Backend],
        country: Some("US".to_string()),
        overall_score: Some(85.0),
        analysis_confidence: Some(0.9),
        profile: ProfileFormat::empty(),
    }
}

struct Harness {
    engine: RetrievalEngine<MockVectorStore>,
    vector_store: Arc<MockVectorStore>,
    candidate_store: Arc<InMemoryCandidateStore>,
    embedder: Arc<MockEmbeddingProvider>,
}

fn harness() -> Harness {
    let vector_store = Arc::new(MockVectorStore::new(TEST_DIM));
    let candidate_store = Arc::new(InMemoryCandidateStore::new());
    let embedder = Arc::new(MockEmbeddingProvider::new(TEST_DIM));

    let config = RetrievalConfig {
        similarity_threshold: 0.5,
        dim: TEST_DIM,
        model_version: DEFAULT_MODEL_VERSION.to_string(),
        chunk_type: ChunkType::FullProfile,
        retry: RetryConfig::none(),
    };

    let engine = RetrievalEngine::new(
        vector_store.clone(),
        candidate_store.clone() as Arc<dyn CandidateStore>,
        embedder.clone(),
        config,
    );

    Harness {
        engine,
        vector_store,
        candidate_store,
        embedder,
    }
}

async fn seed_embedding(h: &Harness, id: &str, vector: Vec<f32>, metadata: RecordMetadata) {
    h.vector_store
        .upsert(vec![EmbeddingRecord::new(
            id,
            vector,
            DEFAULT_MODEL_VERSION,
            ChunkType::FullProfile,
            metadata,
        )])
        .await
        .unwrap();
}

fn request(query: RetrievalQuery, limit: usize) -> RetrievalRequest {
    RetrievalRequest {
        query,
        filters: SearchFilters::default(),
        org_id: None,
        limit,
        offset: 0,
    }
}

#[tokio::test]
async fn test_rejects_query_with_both_inputs() {
    let h = harness();
    let req = request(
        RetrievalQuery {
            text: Some("backend".to_string()),
            vector: Some(unit_vector(0)),
        },
        10,
    );

    let err = h.engine.search(&req).await.unwrap_err();
    assert!(matches!(err, RetrievalError::InvalidQuery { .. }));
}

#[tokio::test]
async fn test_rejects_query_with_no_inputs() {
    let h = harness();
    let err = h
        .engine
        .search(&request(RetrievalQuery::default(), 10))
        .await
        .unwrap_err();
    assert!(matches!(err, RetrievalError::InvalidQuery { .. }));
}

#[tokio::test]
async fn test_rejects_wrong_dimension_vector() {
    let h = harness();
    let err = h
        .engine
        .search(&request(RetrievalQuery::from_vector(vec![1.0; 3]), 10))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RetrievalError::Dimension {
            expected: TEST_DIM,
            actual: 3
        }
    ));
}

#[tokio::test]
async fn test_text_query_orders_by_similarity() {
    let h = harness();
    h.embedder.pin("backend engineer", unit_vector(0));

    seed_embedding(&h, "close", angled_vector(0.95), RecordMetadata::default()).await;
    seed_embedding(&h, "closer", angled_vector(0.99), RecordMetadata::default()).await;
    seed_embedding(&h, "below-threshold", angled_vector(0.2), RecordMetadata::default()).await;

    let results = h
        .engine
        .search(&request(RetrievalQuery::from_text("backend engineer"), 10))
        .await
        .unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.entity_id.as_str()).collect();
    assert_eq!(ids, vec!["closer", "close"]);
    assert!(results[0].similarity > results[1].similarity);
}

#[tokio::test]
async fn test_empty_result_is_not_an_error() {
    let h = harness();
    let results = h
        .engine
        .search(&request(RetrievalQuery::from_vector(unit_vector(0)), 10))
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_direct_name_match_merges_ahead() {
    let h = harness();
    h.embedder.pin("Grace Hopper", unit_vector(0));

    h.candidate_store
        .insert(candidate("c-grace", "Grace Hopper", "grace@example.com"));

    // Grace also appears as a weak vector hit; the merged result must keep
    // one entry at synthetic similarity 1.0.
    seed_embedding(&h, "c-grace", angled_vector(0.7), RecordMetadata::default()).await;
    seed_embedding(&h, "c-other", angled_vector(0.9), RecordMetadata::default()).await;

    let results = h
        .engine
        .search(&request(RetrievalQuery::from_text("Grace Hopper"), 10))
        .await
        .unwrap();

    assert_eq!(results[0].entity_id, "c-grace");
    assert_eq!(results[0].similarity, 1.0);
    assert!(results[0].direct_match);
    assert_eq!(results.iter().filter(|r| r.entity_id == "c-grace").count(), 1);
}

#[tokio::test]
async fn test_direct_email_match() {
    let h = harness();
    h.embedder.pin("grace@example.com", unit_vector(3));
    h.candidate_store
        .insert(candidate("c-grace", "Grace Hopper", "grace@example.com"));

    let results = h
        .engine
        .search(&request(RetrievalQuery::from_text("grace@example.com"), 10))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].entity_id, "c-grace");
    assert!(results[0].direct_match);
}

#[tokio::test]
async fn test_direct_match_respects_hard_filters() {
    let h = harness();
    h.embedder.pin("Grace Hopper", unit_vector(3));
    h.candidate_store
        .insert(candidate("c-grace", "Grace Hopper", "grace@example.com"));

    let mut req = request(RetrievalQuery::from_text("Grace Hopper"), 10);
    req.filters.min_years_experience = Some(10.0);

    let results = h.engine.search(&req).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_org_post_filter() {
    let h = harness();

    seed_embedding(&h, "c-in", unit_vector(0), RecordMetadata::default()).await;
    seed_embedding(&h, "c-out", unit_vector(0), RecordMetadata::default()).await;
    h.candidate_store.assign_org("c-in", "org-a");

    let mut req = request(RetrievalQuery::from_vector(unit_vector(0)), 10);
    req.org_id = Some("org-a".to_string());

    let results = h.engine.search(&req).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].entity_id, "c-in");
}

#[tokio::test]
async fn test_pagination_after_filtering() {
    let h = harness();

    for (i, cos) in [0.99f32, 0.95, 0.9, 0.85].into_iter().enumerate() {
        seed_embedding(&h, &format!("c{i}"), angled_vector(cos), RecordMetadata::default()).await;
    }

    let mut req = request(RetrievalQuery::from_vector(unit_vector(0)), 2);
    req.offset = 1;

    let results = h.engine.search(&req).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.entity_id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2"]);
}

#[tokio::test]
async fn test_candidate_store_outage_degrades_direct_path() {
    let h = harness();
    h.embedder.pin("backend engineer", unit_vector(0));
    seed_embedding(&h, "c-vector", angled_vector(0.9), RecordMetadata::default()).await;
    h.candidate_store.set_unreachable(true);

    // Vector results still flow even though the direct path is down.
    let results = h
        .engine
        .search(&request(RetrievalQuery::from_text("backend engineer"), 10))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].entity_id, "c-vector");
}

#[tokio::test]
async fn test_embedding_failure_propagates() {
    let h = harness();
    h.embedder.set_failing(true);

    let err = h
        .engine
        .search(&request(RetrievalQuery::from_text("backend"), 10))
        .await
        .unwrap_err();
    assert!(matches!(err, RetrievalError::Embedding(_)));
}

#[tokio::test]
async fn test_store_failure_propagates_as_connection_class() {
    let h = harness();
    h.vector_store.set_unreachable(true);

    let err = h
        .engine
        .search(&request(RetrievalQuery::from_vector(unit_vector(0)), 10))
        .await
        .unwrap_err();
    assert!(matches!(err, RetrievalError::Store(_)));
    assert!(err.is_retryable());
}
