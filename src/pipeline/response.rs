use serde::{Deserialize, Serialize};

use crate::scoring::ScoredCandidate;

/// One ranked candidate in the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Score used for the final ordering: the LLM score when the rerank
    /// pass produced one, the composite otherwise.
    pub final_score: f32,
    /// LLM rerank score, when the candidate was reranked.
    pub llm_score: Option<f32>,
    /// LLM rationale, when available.
    pub rationale: Option<String>,
    /// Component scores and reasons from the scoring engine.
    #[serde(flatten)]
    pub scored: ScoredCandidate,
}

impl RankedCandidate {
    pub fn entity_id(&self) -> &str {
        &self.scored.entity_id
    }
}

/// Pipeline diagnostics returned with every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Unique id of this pipeline run (for log correlation).
    pub request_id: String,
    /// Candidates evaluated before truncation to `limit`.
    pub total_evaluated: usize,
    /// Whether LLM rerank scores participated in the ordering.
    pub reranked: bool,
    /// `true` when any stage returned less than the ideal path.
    pub degraded: bool,
    /// Why, when `degraded` is set.
    pub degraded_reason: Option<String>,
    pub retrieval_ms: u64,
    pub scoring_ms: u64,
    pub rerank_ms: u64,
    pub total_ms: u64,
}

/// Ordered results plus diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<RankedCandidate>,
    pub diagnostics: PipelineDiagnostics,
}
