use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::error::PipelineError;
use super::request::SearchRequest;
use super::response::{PipelineDiagnostics, RankedCandidate, SearchResponse};
use crate::candidate::{CandidateRecord, CandidateStore, CandidateStoreError, canonical_skills};
use crate::rerank::{CandidateDigest, RerankEngine, RerankResult, RoleContext};
use crate::retrieval::{
    RetrievalEngine, RetrievalQuery, RetrievalRequest, RetrievalResult,
};
use crate::scoring::{ScoredCandidate, SkillRequirement, SkillScorer};
use crate::vectordb::VectorStore;

/// Skills carried into a rerank digest.
const DIGEST_SKILL_LIMIT: usize = 8;

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Candidate pool handed to the rerank stage (the response is still
    /// truncated to the requested limit afterwards).
    pub rerank_pool: usize,
    /// Wall-clock budget for the rerank stage; on expiry the pipeline
    /// returns composite-scored results instead of failing.
    pub rerank_budget: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rerank_pool: 30,
            rerank_budget: Duration::from_secs(45),
        }
    }
}

impl PipelineConfig {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            rerank_budget: config.rerank_budget,
            ..Default::default()
        }
    }
}

/// The hybrid retrieve → score → rerank pipeline.
///
/// Holds no mutable state across requests; all collaborators are injected
/// once at construction.
pub struct SearchPipeline<V: VectorStore> {
    retrieval: RetrievalEngine<V>,
    candidate_store: Arc<dyn CandidateStore>,
    scorer: SkillScorer,
    rerank: RerankEngine,
    config: PipelineConfig,
}

impl<V: VectorStore> SearchPipeline<V> {
    pub fn new(
        retrieval: RetrievalEngine<V>,
        candidate_store: Arc<dyn CandidateStore>,
        scorer: SkillScorer,
        rerank: RerankEngine,
        config: PipelineConfig,
    ) -> Self {
        Self {
            retrieval,
            candidate_store,
            scorer,
            rerank,
            config,
        }
    }

    /// Runs one search request end to end.
    ///
    /// Hard failures are limited to request validation and the mandatory
    /// retrieval stage; everything later degrades into a flagged but
    /// successful response.
    #[instrument(skip(self, request), fields(limit = request.limit, rerank = request.rerank))]
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse, PipelineError> {
        if request.limit == 0 {
            return Err(PipelineError::Validation {
                message: "limit must be greater than zero".to_string(),
            });
        }

        let started = Instant::now();
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut degraded_reasons: Vec<String> = Vec::new();

        // Stage 1: retrieval (vector query + direct match, concurrent).
        let pool_limit = if request.rerank {
            request.limit.max(self.config.rerank_pool)
        } else {
            request.limit
        };

        let retrieval_request = RetrievalRequest {
            query: RetrievalQuery {
                text: request.query_text.clone(),
                vector: request.query_vector.clone(),
            },
            filters: request.filters.clone(),
            org_id: request.org_id.clone(),
            limit: pool_limit,
            offset: request.offset,
        };

        let retrieved = self
            .retrieval
            .search(&retrieval_request)
            .await
            .map_err(PipelineError::from_retrieval)?;
        let retrieval_ms = started.elapsed().as_millis() as u64;

        debug!(retrieved = retrieved.len(), "Retrieval stage complete");

        // Stage 2: candidate fetch + composite scoring.
        let scoring_started = Instant::now();
        let records = self.fetch_records(&retrieved, &mut degraded_reasons).await;

        let required: Vec<SkillRequirement> = request
            .required_skills
            .iter()
            .map(SkillRequirement::required)
            .collect();
        let preferred: Vec<SkillRequirement> = request
            .preferred_skills
            .iter()
            .map(SkillRequirement::preferred)
            .collect();
        let weights = request.weights.unwrap_or(*self.scorer.weights());

        let scored: Vec<ScoredCandidate> = retrieved
            .iter()
            .enumerate()
            .map(|(rank, result)| {
                self.scorer.score_with_weights(
                    result,
                    rank,
                    records.get(rank).and_then(|r| r.as_ref()),
                    &required,
                    &preferred,
                    request.experience_level,
                    &weights,
                )
            })
            .collect();
        let scoring_ms = scoring_started.elapsed().as_millis() as u64;

        // Stage 3: optional LLM rerank under the wall-clock budget.
        let rerank_started = Instant::now();
        let mut rerank_scores: HashMap<String, RerankResult> = HashMap::new();
        let mut reranked = false;

        if request.rerank && !scored.is_empty() {
            let digests = build_digests(&retrieved, &records);
            let role = RoleContext {
                title: request
                    .role_title
                    .clone()
                    .or_else(|| request.query_text.clone())
                    .unwrap_or_default(),
                level: request.experience_level,
                specialty: request
                    .filters
                    .specialties
                    .as_ref()
                    .and_then(|s| s.first().copied()),
                required_skills: request.required_skills.clone(),
            };

            match tokio::time::timeout(
                self.config.rerank_budget,
                self.rerank.rerank(&role, digests),
            )
            .await
            {
                Ok(outcome) => {
                    reranked = outcome.llm_batches > 0;
                    if outcome.degraded
                        && let Some(reason) = outcome.degraded_reason
                    {
                        degraded_reasons.push(reason);
                    }
                    for result in outcome.results {
                        rerank_scores.insert(result.entity_id.clone(), result);
                    }
                }
                Err(_) => {
                    // Cancellation propagates into the dropped future's
                    // in-flight batch calls.
                    warn!(
                        budget_ms = self.config.rerank_budget.as_millis() as u64,
                        "Rerank stage exceeded budget; returning composite scores"
                    );
                    degraded_reasons.push("rerank stage exceeded wall-clock budget".to_string());
                }
            }
        }
        let rerank_ms = rerank_started.elapsed().as_millis() as u64;

        // Stage 4: merge and final total order. Reranked scores supersede
        // composites; ties break on original retrieval rank, so identical
        // requests over unchanged data return identical orderings.
        let total_evaluated = scored.len();
        let mut results: Vec<RankedCandidate> = scored
            .into_iter()
            .map(|scored| {
                let llm = rerank_scores.get(&scored.entity_id);
                RankedCandidate {
                    final_score: llm.map_or(scored.overall_score, |r| r.score),
                    llm_score: llm.map(|r| r.score),
                    rationale: llm
                        .map(|r| r.rationale.clone())
                        .filter(|r| !r.is_empty()),
                    scored,
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.scored.retrieval_rank.cmp(&b.scored.retrieval_rank))
        });
        results.truncate(request.limit);

        let degraded = !degraded_reasons.is_empty();
        let diagnostics = PipelineDiagnostics {
            request_id,
            total_evaluated,
            reranked,
            degraded,
            degraded_reason: degraded.then(|| degraded_reasons.join("; ")),
            retrieval_ms,
            scoring_ms,
            rerank_ms,
            total_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            results = results.len(),
            total_evaluated,
            reranked,
            degraded,
            "Search complete"
        );

        Ok(SearchResponse {
            results,
            diagnostics,
        })
    }

    /// Fetches candidate records for scoring. A missing record degrades
    /// that candidate to vector-only scoring; a dead store degrades the
    /// whole stage without failing the request.
    async fn fetch_records(
        &self,
        retrieved: &[RetrievalResult],
        degraded_reasons: &mut Vec<String>,
    ) -> Vec<Option<CandidateRecord>> {
        let mut records: Vec<Option<CandidateRecord>> = Vec::with_capacity(retrieved.len());
        let mut store_down = false;

        for result in retrieved {
            if store_down {
                records.push(None);
                continue;
            }

            match self.candidate_store.get_by_id(&result.entity_id).await {
                Ok(record) => records.push(Some(record)),
                Err(CandidateStoreError::NotFound { id }) => {
                    debug!(entity_id = %id, "No candidate record; vector-only scoring");
                    records.push(None);
                }
                Err(e @ CandidateStoreError::ConnectionFailed { .. }) => {
                    warn!(error = %e, "Candidate store unavailable; vector-only scoring for remaining candidates");
                    degraded_reasons
                        .push("candidate store unavailable; skill data missing".to_string());
                    store_down = true;
                    records.push(None);
                }
            }
        }

        records
    }
}

impl SearchPipeline<crate::vectordb::QdrantStore> {
    /// Builds a production pipeline from configuration: Qdrant vector
    /// store, cached HTTP embedder, genai-backed reranker.
    ///
    /// The candidate store stays injected; its lifecycle belongs to the
    /// upstream owner.
    pub async fn connect(
        config: &crate::config::Config,
        candidate_store: Arc<dyn CandidateStore>,
    ) -> Result<Self, PipelineError> {
        let init = |e: String| PipelineError::Init { message: e };

        let store = crate::vectordb::QdrantStore::new(
            &config.qdrant_url,
            &config.collection_name,
            config.embedding_dim,
        )
        .await
        .map_err(|e| init(e.to_string()))?;
        store
            .ensure_collection()
            .await
            .map_err(|e| init(e.to_string()))?;

        let embedder = crate::embedding::HttpEmbeddingProvider::new(
            crate::embedding::HttpEmbeddingConfig::from_config(config),
        )
        .map_err(|e| init(e.to_string()))?;
        let embedder: Arc<dyn crate::embedding::EmbeddingProvider> =
            Arc::new(crate::embedding::CachedEmbedder::new(Arc::new(embedder)));

        let retrieval = RetrievalEngine::new(
            Arc::new(store),
            candidate_store.clone(),
            embedder,
            crate::retrieval::RetrievalConfig {
                similarity_threshold: config.similarity_threshold,
                dim: config.embedding_dim,
                ..Default::default()
            },
        );

        let rerank = RerankEngine::new(
            Arc::new(crate::llm::GenaiProvider::new(&config.llm_model)),
            crate::rerank::RerankConfig::from_config(config),
        );

        Ok(Self::new(
            retrieval,
            candidate_store,
            SkillScorer::default(),
            rerank,
            PipelineConfig::from_config(config),
        ))
    }
}

fn build_digests(
    retrieved: &[RetrievalResult],
    records: &[Option<CandidateRecord>],
) -> Vec<CandidateDigest> {
    retrieved
        .iter()
        .enumerate()
        .map(|(i, result)| match records.get(i).and_then(|r| r.as_ref()) {
            Some(record) => {
                let mut assertions = canonical_skills(record);
                assertions.sort_by(|a, b| {
                    b.confidence
                        .partial_cmp(&a.confidence)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                CandidateDigest {
                    entity_id: record.id.clone(),
                    name: record.full_name.clone(),
                    title: record.title.clone(),
                    years_experience: record.years_experience,
                    level: record.current_level,
                    skills: assertions
                        .into_iter()
                        .take(DIGEST_SKILL_LIMIT)
                        .map(|a| a.skill)
                        .collect(),
                }
            }
            None => CandidateDigest {
                entity_id: result.entity_id.clone(),
                name: result.entity_id.clone(),
                title: None,
                years_experience: result.metadata.years_experience,
                level: result.metadata.current_level,
                skills: Vec::new(),
            },
        })
        .collect()
}
