use std::sync::Arc;
use std::time::Duration;

use super::engine::{PipelineConfig, SearchPipeline};
use super::error::PipelineError;
use super::request::SearchRequest;
use crate::candidate::{
    CandidateRecord, CandidateStore, CompanyTier, InMemoryCandidateStore, ProfileFormat,
    SeniorityLevel, SkillAssertion, Specialty,
};
use crate::constants::DEFAULT_MODEL_VERSION;
use crate::embedding::MockEmbeddingProvider;
use crate::llm::MockCompletionProvider;
use crate::rerank::{RerankConfig, RerankEngine};
use crate::retrieval::{RetrievalConfig, RetrievalEngine, RetryConfig};
use crate::vectordb::{
    ChunkType, EmbeddingRecord, MockVectorStore, RecordMetadata, VectorStore,
};

const TEST_DIM: usize = 8;

fn angled_vector(cos: f32) -> Vec<f32> {
    let sin = (1.0 - cos * cos).max(0.0).sqrt();
    let mut v = vec![0.0; TEST_DIM];
    v[0] = cos;
    v[1] = sin;
    v
}

struct Harness {
    pipeline: SearchPipeline<MockVectorStore>,
    vector_store: Arc<MockVectorStore>,
    candidate_store: Arc<InMemoryCandidateStore>,
    embedder: Arc<MockEmbeddingProvider>,
    provider: Arc<MockCompletionProvider>,
}

fn harness() -> Harness {
    harness_with(PipelineConfig::default())
}

fn harness_with(config: PipelineConfig) -> Harness {
    let vector_store = Arc::new(MockVectorStore::new(TEST_DIM));
    let candidate_store = Arc::new(InMemoryCandidateStore::new());
    let embedder = Arc::new(MockEmbeddingProvider::new(TEST_DIM));
    let provider = Arc::new(MockCompletionProvider::new());

    let retrieval = RetrievalEngine::new(
        vector_store.clone(),
        candidate_store.clone() as Arc<dyn CandidateStore>,
        embedder.clone(),
        RetrievalConfig {
            dim: TEST_DIM,
            retry: RetryConfig::none(),
            ..Default::default()
        },
    );

    let rerank = RerankEngine::new(
        provider.clone(),
        RerankConfig {
            parallelism: 1,
            ..Default::default()
        },
    );

    let pipeline = SearchPipeline::new(
        retrieval,
        candidate_store.clone() as Arc<dyn CandidateStore>,
        crate::scoring::SkillScorer::default(),
        rerank,
        config,
    );

    Harness {
        pipeline,
        vector_store,
        candidate_store,
        embedder,
        provider,
    }
}

#[allow(clippy::too_many_arguments)]
fn make_candidate(
    id: &str,
    name: &str,
    title: &str,
    years: f32,
    level: SeniorityLevel,
    specialty: Specialty,
    skills: &[(&str, f32)],
) -> CandidateRecord {
    CandidateRecord {
        id: id.to_string(),
        full_name: name.to_string(),
        email: Some(format!("{id}@example.com")),
        title: Some(title.to_string()),
        years_experience: Some(years),
        current_level: Some(level),
        company_tier: Some(CompanyTier::Tier2),
        specialties: vec![specialty],
        country: Some("US".to_string()),
        overall_score: Some(80.0),
        analysis_confidence: None,
        profile: ProfileFormat::Analyzed {
            assertions: skills
                .iter()
                .map(|(s, c)| SkillAssertion::technical(s, *c))
                .collect(),
            summary: None,
        },
    }
}

async fn seed(h: &Harness, candidate: CandidateRecord, vector: Vec<f32>) {
    let metadata = RecordMetadata::from_candidate(&candidate);
    h.vector_store
        .upsert(vec![EmbeddingRecord::new(
            candidate.id.clone(),
            vector,
            DEFAULT_MODEL_VERSION,
            ChunkType::FullProfile,
            metadata,
        )])
        .await
        .unwrap();
    h.candidate_store.insert(candidate);
}

const QUERY: &str = "Senior Backend Engineer";

async fn seed_three_way_scenario(h: &Harness) {
    h.embedder.pin(QUERY, angled_vector(1.0));

    // A: senior backend with both required skills.
    seed(
        h,
        make_candidate(
            "cand-a",
            "Avery Adams",
            "Senior Backend Engineer",
            7.0,
            SeniorityLevel::Senior,
            Specialty::Backend,
            &[("node.js", 90.0), ("typescript", 90.0)],
        ),
        angled_vector(0.9),
    )
    .await;

    // B: frontend with neither skill.
    seed(
        h,
        make_candidate(
            "cand-b",
            "Blake Brown",
            "Frontend Engineer",
            6.0,
            SeniorityLevel::Mid,
            Specialty::Frontend,
            &[("react", 90.0), ("css", 80.0)],
        ),
        angled_vector(0.85),
    )
    .await;

    // C: director with both skills; seniority mismatch but strong skills.
    seed(
        h,
        make_candidate(
            "cand-c",
            "Casey Clark",
            "Director of Engineering",
            15.0,
            SeniorityLevel::Executive,
            Specialty::Backend,
            &[("node.js", 90.0), ("typescript", 90.0)],
        ),
        angled_vector(0.88),
    )
    .await;
}

fn three_way_request() -> SearchRequest {
    SearchRequest::from_text(QUERY, 10)
        .with_required_skills(&["Node.js", "TypeScript"])
        .with_experience_level(SeniorityLevel::Senior)
}

#[tokio::test]
async fn test_end_to_end_ordering_skill_and_level_fit_wins() {
    let h = harness();
    seed_three_way_scenario(&h).await;

    let response = h.pipeline.search(three_way_request()).await.unwrap();

    let ids: Vec<&str> = response.results.iter().map(|r| r.entity_id()).collect();
    assert_eq!(ids, vec!["cand-a", "cand-c", "cand-b"]);

    assert_eq!(response.diagnostics.total_evaluated, 3);
    assert!(!response.diagnostics.degraded);
    assert!(!response.diagnostics.reranked);

    // Reproducible across repeated runs with unchanged inputs.
    let again = h.pipeline.search(three_way_request()).await.unwrap();
    let again_ids: Vec<&str> = again.results.iter().map(|r| r.entity_id()).collect();
    assert_eq!(ids, again_ids);
    assert_eq!(
        response.results[0].final_score,
        again.results[0].final_score
    );
}

#[tokio::test]
async fn test_rerank_scores_supersede_composites() {
    let h = harness();
    seed_three_way_scenario(&h).await;

    // The LLM disagrees with the composite order: cand-b on top.
    h.provider.push_text(
        r#"[{"id": "cand-b", "score": 95, "reason": "hidden gem"},
            {"id": "cand-a", "score": 80, "reason": "solid"},
            {"id": "cand-c", "score": 40, "reason": "level mismatch"}]"#,
    );

    let response = h
        .pipeline
        .search(three_way_request().with_rerank())
        .await
        .unwrap();

    let ids: Vec<&str> = response.results.iter().map(|r| r.entity_id()).collect();
    assert_eq!(ids, vec!["cand-b", "cand-a", "cand-c"]);

    assert!(response.diagnostics.reranked);
    assert!(!response.diagnostics.degraded);
    assert_eq!(response.results[0].llm_score, Some(95.0));
    assert_eq!(response.results[0].rationale.as_deref(), Some("hidden gem"));
    assert_eq!(response.results[0].final_score, 95.0);
}

#[tokio::test]
async fn test_rerank_provider_failure_degrades_not_fails() {
    let h = harness();
    seed_three_way_scenario(&h).await;
    h.provider.set_fail_all(true);

    let response = h
        .pipeline
        .search(three_way_request().with_rerank())
        .await
        .unwrap();

    // Fully populated, strictly ordered, no missing entries.
    assert_eq!(response.results.len(), 3);
    for pair in response.results.windows(2) {
        assert!(pair[0].final_score >= pair[1].final_score);
    }
    assert!(response.diagnostics.degraded);
    assert!(!response.diagnostics.reranked);
    assert!(response.diagnostics.degraded_reason.is_some());
}

struct SlowProvider;

#[async_trait::async_trait]
impl crate::llm::CompletionProvider for SlowProvider {
    async fn complete(
        &self,
        _prompt: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<crate::llm::Completion, crate::llm::LlmError> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok(crate::llm::Completion::new("too late"))
    }
}

#[tokio::test(start_paused = true)]
async fn test_rerank_budget_exceeded_returns_composite_order() {
    let h = harness_with(PipelineConfig {
        rerank_budget: Duration::from_millis(50),
        ..Default::default()
    });
    seed_three_way_scenario(&h).await;

    // Swap in a provider that outlives both the per-call timeout and the
    // stage budget; the budget fires first.
    let retrieval = RetrievalEngine::new(
        h.vector_store.clone(),
        h.candidate_store.clone() as Arc<dyn CandidateStore>,
        h.embedder.clone(),
        RetrievalConfig {
            dim: TEST_DIM,
            retry: RetryConfig::none(),
            ..Default::default()
        },
    );
    let pipeline = SearchPipeline::new(
        retrieval,
        h.candidate_store.clone() as Arc<dyn CandidateStore>,
        crate::scoring::SkillScorer::default(),
        RerankEngine::new(Arc::new(SlowProvider), RerankConfig::default()),
        PipelineConfig {
            rerank_budget: Duration::from_millis(50),
            ..Default::default()
        },
    );

    let response = pipeline
        .search(three_way_request().with_rerank())
        .await
        .unwrap();

    // Composite ordering survives; the budget overrun is flagged.
    let ids: Vec<&str> = response.results.iter().map(|r| r.entity_id()).collect();
    assert_eq!(ids, vec!["cand-a", "cand-c", "cand-b"]);
    assert!(response.diagnostics.degraded);
    assert!(
        response
            .diagnostics
            .degraded_reason
            .as_deref()
            .unwrap()
            .contains("budget")
    );
    assert!(!response.diagnostics.reranked);
    assert!(response.results.iter().all(|r| r.llm_score.is_none()));
}

#[tokio::test]
async fn test_limit_zero_is_validation_error() {
    let h = harness();
    let err = h
        .pipeline
        .search(SearchRequest::from_text("x", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation { .. }));
}

#[tokio::test]
async fn test_ambiguous_query_is_validation_error() {
    let h = harness();
    let request = SearchRequest {
        query_text: Some("backend".to_string()),
        query_vector: Some(vec![0.0; TEST_DIM]),
        limit: 5,
        ..Default::default()
    };
    let err = h.pipeline.search(request).await.unwrap_err();
    assert!(matches!(err, PipelineError::Validation { .. }));
}

#[tokio::test]
async fn test_vector_store_outage_is_hard_failure_with_stage() {
    let h = harness();
    h.embedder.pin(QUERY, angled_vector(1.0));
    h.vector_store.set_unreachable(true);

    let err = h
        .pipeline
        .search(SearchRequest::from_text(QUERY, 5))
        .await
        .unwrap_err();

    match err {
        PipelineError::Retrieval { stage, .. } => assert_eq!(stage, "vector_query"),
        other => panic!("expected retrieval error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_candidate_store_outage_degrades_to_vector_only() {
    let h = harness();
    seed_three_way_scenario(&h).await;

    // Store dies between retrieval seed and the scoring fetch. Use a
    // vector query so the direct-match path is not involved.
    h.embedder.pin(QUERY, angled_vector(1.0));
    let query_vector = angled_vector(1.0);
    h.candidate_store.set_unreachable(true);

    let request = SearchRequest {
        query_vector: Some(query_vector),
        required_skills: vec!["node.js".to_string()],
        limit: 10,
        ..Default::default()
    };

    let response = h.pipeline.search(request).await.unwrap();

    assert_eq!(response.results.len(), 3);
    assert!(response.diagnostics.degraded);
    assert!(
        response
            .diagnostics
            .degraded_reason
            .as_deref()
            .unwrap()
            .contains("candidate store")
    );
    // Without skill data every skill component is zero; ordering falls to
    // vector similarity.
    let ids: Vec<&str> = response.results.iter().map(|r| r.entity_id()).collect();
    assert_eq!(ids, vec!["cand-a", "cand-c", "cand-b"]);
    assert!(response.results.iter().all(|r| r.scored.skill_match_score == 0.0));
}

#[tokio::test]
async fn test_truncates_to_requested_limit() {
    let h = harness();
    seed_three_way_scenario(&h).await;

    let mut request = three_way_request();
    request.limit = 2;

    let response = h.pipeline.search(request).await.unwrap();
    assert_eq!(response.results.len(), 2);
    assert_eq!(response.diagnostics.total_evaluated, 3);
}

#[tokio::test]
async fn test_missing_candidate_record_scores_vector_only() {
    let h = harness();
    h.embedder.pin(QUERY, angled_vector(1.0));

    // Embedding exists but the candidate record was deleted upstream.
    h.vector_store
        .upsert(vec![EmbeddingRecord::new(
            "ghost",
            angled_vector(0.9),
            DEFAULT_MODEL_VERSION,
            ChunkType::FullProfile,
            RecordMetadata::default(),
        )])
        .await
        .unwrap();

    let response = h
        .pipeline
        .search(SearchRequest::from_text(QUERY, 5).with_required_skills(&["node.js"]))
        .await
        .unwrap();

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].entity_id(), "ghost");
    assert_eq!(response.results[0].scored.skill_match_score, 0.0);
    // A single missing record is expected churn, not a degraded stage.
    assert!(!response.diagnostics.degraded);
}
