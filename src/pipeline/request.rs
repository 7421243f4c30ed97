use serde::{Deserialize, Serialize};

use crate::candidate::SeniorityLevel;
use crate::scoring::ScoringWeights;
use crate::vectordb::SearchFilters;

/// One search request into the pipeline.
///
/// Exactly one of `query_text` / `query_vector` must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query_text: Option<String>,
    pub query_vector: Option<Vec<f32>>,
    /// Required skill names; thresholds use the crate defaults.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Preferred skill names.
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    pub experience_level: Option<SeniorityLevel>,
    #[serde(default)]
    pub filters: SearchFilters,
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    /// Run the LLM rerank stage.
    #[serde(default)]
    pub rerank: bool,
    /// Tenant scope, applied as a candidate-store post-filter.
    pub org_id: Option<String>,
    /// Role title for the rerank rubric; defaults to the query text.
    pub role_title: Option<String>,
    /// Composite-score weight overrides.
    pub weights: Option<ScoringWeights>,
}

impl SearchRequest {
    /// Minimal text query.
    pub fn from_text(text: impl Into<String>, limit: usize) -> Self {
        Self {
            query_text: Some(text.into()),
            limit,
            ..Default::default()
        }
    }

    pub fn with_required_skills(mut self, skills: &[&str]) -> Self {
        self.required_skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_preferred_skills(mut self, skills: &[&str]) -> Self {
        self.preferred_skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_experience_level(mut self, level: SeniorityLevel) -> Self {
        self.experience_level = Some(level);
        self
    }

    pub fn with_rerank(mut self) -> Self {
        self.rerank = true;
        self
    }
}
