use std::collections::BTreeMap;
use tracing::debug;

use super::experience::{NEUTRAL_SCORE, experience_match_score};
use super::skills::{MatchKind, resolve};
use super::types::{
    PREFERRED_PARTIAL_CREDIT, REQUIRED_PARTIAL_CREDIT, ScoredCandidate, ScoringWeights,
    SkillRequirement,
};
use crate::candidate::{CandidateRecord, SeniorityLevel, canonical_skills};
use crate::retrieval::RetrievalResult;

/// Demotion floor for zero-confidence profiles: the composite is scaled by
/// `0.6 + 0.4 × analysis_confidence`.
const DEMOTION_BASE: f32 = 0.6;
const DEMOTION_SPAN: f32 = 0.4;

/// Skill-aware composite scorer.
///
/// Pure and deterministic: the same candidate and query always produce the
/// same [`ScoredCandidate`]. Missing candidate data degrades to
/// zero/neutral components, never to an error.
#[derive(Debug, Clone, Default)]
pub struct SkillScorer {
    weights: ScoringWeights,
}

impl SkillScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Scores one retrieved candidate.
    ///
    /// `candidate` is `None` when the candidate store had no record for the
    /// retrieved id; scoring then falls back to retrieval metadata alone.
    pub fn score(
        &self,
        retrieval: &RetrievalResult,
        retrieval_rank: usize,
        candidate: Option<&CandidateRecord>,
        required: &[SkillRequirement],
        preferred: &[SkillRequirement],
        target_level: Option<SeniorityLevel>,
    ) -> ScoredCandidate {
        self.score_with_weights(
            retrieval,
            retrieval_rank,
            candidate,
            required,
            preferred,
            target_level,
            &self.weights,
        )
    }

    /// Same as [`score`](Self::score) with caller-supplied weights.
    #[allow(clippy::too_many_arguments)]
    pub fn score_with_weights(
        &self,
        retrieval: &RetrievalResult,
        retrieval_rank: usize,
        candidate: Option<&CandidateRecord>,
        required: &[SkillRequirement],
        preferred: &[SkillRequirement],
        target_level: Option<SeniorityLevel>,
        weights: &ScoringWeights,
    ) -> ScoredCandidate {
        let assertions = candidate.map(canonical_skills).unwrap_or_default();

        let mut breakdown: BTreeMap<String, f32> = BTreeMap::new();
        let mut weighted_sum = 0.0f32;
        let mut weight_sum = 0.0f32;

        for requirement in required {
            let contribution =
                Self::requirement_credit(requirement, &assertions, REQUIRED_PARTIAL_CREDIT, &mut breakdown);
            weighted_sum += contribution;
            weight_sum += requirement.weight;
        }
        for requirement in preferred {
            let contribution =
                Self::requirement_credit(requirement, &assertions, PREFERRED_PARTIAL_CREDIT, &mut breakdown);
            weighted_sum += contribution;
            weight_sum += requirement.weight;
        }

        let skill_match_score = if weight_sum > 0.0 {
            weighted_sum / weight_sum
        } else {
            0.0
        };

        let confidence_score = if assertions.is_empty() {
            0.0
        } else {
            assertions.iter().map(|a| a.confidence).sum::<f32>() / assertions.len() as f32
        };

        let years = candidate
            .and_then(|c| c.years_experience)
            .or(retrieval.metadata.years_experience);
        let title = candidate.and_then(|c| c.title.as_deref());

        let experience_score = match target_level {
            Some(level) => experience_match_score(years, title, level),
            None => NEUTRAL_SCORE,
        };

        let vector_similarity_score = retrieval.similarity.clamp(0.0, 1.0) * 100.0;

        let mut overall_score = weights.skill_match * skill_match_score
            + weights.confidence * confidence_score
            + weights.experience * experience_score
            + weights.vector_similarity * vector_similarity_score;

        // Low-signal profiles are demoted rather than excluded.
        if let Some(analysis_confidence) = candidate.and_then(|c| c.analysis_confidence) {
            let factor = DEMOTION_BASE + DEMOTION_SPAN * analysis_confidence.clamp(0.0, 1.0);
            overall_score *= factor;
        }
        let overall_score = overall_score.clamp(0.0, 100.0);

        let match_reasons = Self::match_reasons(
            retrieval,
            skill_match_score,
            confidence_score,
            experience_score,
            target_level,
            assertions.is_empty(),
        );

        if candidate.is_none() {
            debug!(
                entity_id = %retrieval.entity_id,
                "Scoring without candidate record; components degraded to neutral"
            );
        }

        ScoredCandidate {
            entity_id: retrieval.entity_id.clone(),
            similarity: retrieval.similarity,
            retrieval_rank,
            direct_match: retrieval.direct_match,
            skill_match_score,
            confidence_score,
            experience_match_score: experience_score,
            vector_similarity_score,
            overall_score,
            skill_breakdown: breakdown,
            match_reasons,
        }
    }

    fn requirement_credit(
        requirement: &SkillRequirement,
        assertions: &[crate::candidate::SkillAssertion],
        partial_credit: f32,
        breakdown: &mut BTreeMap<String, f32>,
    ) -> f32 {
        let key = super::skills::canonical(&requirement.skill);

        match resolve(&requirement.skill, assertions) {
            Some(matched) => {
                breakdown.insert(key, matched.effective_confidence);

                let credit = if matched.effective_confidence >= requirement.min_confidence {
                    matched.effective_confidence
                } else {
                    matched.effective_confidence * partial_credit
                };

                if matched.kind != MatchKind::Exact {
                    debug!(
                        requirement = %requirement.skill,
                        matched = %matched.matched_skill,
                        kind = ?matched.kind,
                        "Fuzzy skill resolution"
                    );
                }

                credit * requirement.weight
            }
            None => {
                breakdown.insert(key, 0.0);
                0.0
            }
        }
    }

    fn match_reasons(
        retrieval: &RetrievalResult,
        skill_match_score: f32,
        confidence_score: f32,
        experience_score: f32,
        target_level: Option<SeniorityLevel>,
        no_skill_data: bool,
    ) -> Vec<String> {
        let mut reasons = Vec::new();

        if retrieval.direct_match {
            reasons.push("Direct name or email match".to_string());
        }
        if skill_match_score >= 75.0 {
            reasons.push("Strong required-skill coverage".to_string());
        } else if skill_match_score >= 40.0 {
            reasons.push("Partial skill coverage".to_string());
        }
        if confidence_score >= 75.0 {
            reasons.push("High-confidence skill profile".to_string());
        }
        if let Some(level) = target_level
            && experience_score >= 75.0
        {
            reasons.push(format!("Experience aligned with {level} level"));
        }
        if retrieval.similarity >= 0.8 && !retrieval.direct_match {
            reasons.push("Strong semantic match to role description".to_string());
        }
        if no_skill_data {
            reasons.push("No skill data on profile".to_string());
        }

        reasons
    }
}
