//! Two-pass LLM reranking: a cheap filter pass, a batched rank pass,
//! defensive response parsing, and a heuristic fallback that guarantees a
//! total order even when the provider is down.

pub mod config;
pub mod engine;
pub mod fallback;
pub mod parse;
pub mod prompt;
pub mod recover;


use serde::{Deserialize, Serialize};

pub use config::RerankConfig;
pub use engine::RerankEngine;
pub use fallback::heuristic_rank;
pub use parse::{
    FilterDecision, ParseError, RawRanking, normalize_score, parse_filter_response,
    parse_rerank_response,
};
pub use recover::IdentityResolver;

use crate::candidate::{SeniorityLevel, Specialty};

/// One reranked candidate. When present, `score` supersedes the
/// vector-derived composite for final ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResult {
    pub entity_id: String,
    /// Normalized to `[0, 100]`.
    pub score: f32,
    pub rationale: String,
}

/// Rerank request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerankPhase {
    Idle,
    Filtering,
    Ranking,
    Merged,
    Done,
    /// Terminal state reached when no batch could be ranked by the
    /// provider; results come entirely from the heuristic.
    Degraded,
}

impl std::fmt::Display for RerankPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Filtering => "filtering",
            Self::Ranking => "ranking",
            Self::Merged => "merged",
            Self::Done => "done",
            Self::Degraded => "degraded",
        };
        f.write_str(s)
    }
}

/// Outcome of a rerank run. Never an error: the engine always produces a
/// total order over its input.
#[derive(Debug, Clone)]
pub struct RerankOutcome {
    pub results: Vec<RerankResult>,
    pub phase: RerankPhase,
    /// Set when any batch used heuristic scores instead of LLM scores.
    pub degraded: bool,
    pub degraded_reason: Option<String>,
    pub llm_batches: usize,
    pub fallback_batches: usize,
}

impl RerankOutcome {
    fn empty() -> Self {
        Self {
            results: Vec::new(),
            phase: RerankPhase::Done,
            degraded: false,
            degraded_reason: None,
            llm_batches: 0,
            fallback_batches: 0,
        }
    }
}

/// Compact candidate representation sent to the provider.
///
/// Deliberately small: index, identity, title, years, top skills. Full
/// profiles would blow the token budget at batch size.
#[derive(Debug, Clone)]
pub struct CandidateDigest {
    pub entity_id: String,
    pub name: String,
    pub title: Option<String>,
    pub years_experience: Option<f32>,
    pub level: Option<SeniorityLevel>,
    /// Canonical skill names, highest-confidence first, truncated upstream.
    pub skills: Vec<String>,
}

/// What the role being filled looks like; keys the scoring rubric.
#[derive(Debug, Clone, Default)]
pub struct RoleContext {
    pub title: String,
    pub level: Option<SeniorityLevel>,
    pub specialty: Option<Specialty>,
    pub required_skills: Vec<String>,
}

impl RoleContext {
    /// Explicit specialty, or one inferred from the role title.
    pub fn effective_specialty(&self) -> Option<Specialty> {
        self.specialty
            .or_else(|| Specialty::infer_from_title(&self.title))
    }
}
