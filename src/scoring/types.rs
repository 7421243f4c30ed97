use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default minimum confidence for required skills.
pub const REQUIRED_MIN_CONFIDENCE: f32 = 70.0;
/// Default minimum confidence for preferred skills.
pub const PREFERRED_MIN_CONFIDENCE: f32 = 60.0;
/// Default weight for required skills.
pub const REQUIRED_WEIGHT: f32 = 1.0;
/// Default weight for preferred skills.
pub const PREFERRED_WEIGHT: f32 = 0.5;
/// Credit multiplier for a required-skill match below its minimum
/// confidence. Half credit: a weak match is still signal.
pub const REQUIRED_PARTIAL_CREDIT: f32 = 0.5;
/// Credit multiplier for a preferred-skill match below its minimum.
pub const PREFERRED_PARTIAL_CREDIT: f32 = 0.3;

/// A target skill with matching thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRequirement {
    /// Skill name (matched case-insensitively).
    pub skill: String,
    /// Confidence below this earns only partial credit.
    pub min_confidence: f32,
    /// Relative weight in the composite.
    pub weight: f32,
}

impl SkillRequirement {
    /// A required skill with default thresholds.
    pub fn required(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            min_confidence: REQUIRED_MIN_CONFIDENCE,
            weight: REQUIRED_WEIGHT,
        }
    }

    /// A preferred skill with default thresholds.
    pub fn preferred(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            min_confidence: PREFERRED_MIN_CONFIDENCE,
            weight: PREFERRED_WEIGHT,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

/// Weights of the composite score.
///
/// One canonical set; treat as configuration, not law. Overridable per
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skill_match: f32,
    pub confidence: f32,
    pub experience: f32,
    pub vector_similarity: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill_match: 0.4,
            confidence: 0.25,
            experience: 0.1,
            vector_similarity: 0.25,
        }
    }
}

/// A candidate with component scores and the weighted composite.
///
/// Created per request by the scoring engine; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub entity_id: String,
    /// Cosine similarity from retrieval (synthetic 1.0 for direct matches).
    pub similarity: f32,
    /// Position in the retrieval ordering; the stable tie-break key.
    pub retrieval_rank: usize,
    pub direct_match: bool,
    /// Required/preferred skill coverage in `[0, 100]`.
    pub skill_match_score: f32,
    /// Mean assertion confidence across the whole profile, `[0, 100]`.
    pub confidence_score: f32,
    /// Level fit from years and title keywords, `[0, 100]`.
    pub experience_match_score: f32,
    /// Similarity rescaled to `[0, 100]`.
    pub vector_similarity_score: f32,
    /// Weighted composite in `[0, 100]`.
    pub overall_score: f32,
    /// Per-requirement effective confidence, keyed by requirement name.
    pub skill_breakdown: BTreeMap<String, f32>,
    /// Deterministic, reproducible explanations.
    pub match_reasons: Vec<String>,
}
