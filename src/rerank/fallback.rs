//! Heuristic fallback ranking.
//!
//! Used when the provider is unreachable, times out, or every parsing
//! strategy fails. Deterministic by construction so a degraded pipeline
//! still returns a stable total order.

use super::{CandidateDigest, RerankResult, RoleContext};
use crate::scoring::level_profile;

/// Base score for the first retrieval position.
const BASE_TOP: f32 = 80.0;
/// Base-score span from the first to the last position.
const BASE_DECAY_SPAN: f32 = 40.0;
/// Bonus per specialty-relevant skill, and its cap.
const SKILL_BONUS_STEP: f32 = 4.0;
const SKILL_BONUS_CAP: f32 = 12.0;
/// Bonus when the candidate's title matches the target level keywords.
const TITLE_BONUS: f32 = 8.0;
/// Bonus when years of experience sit inside the target band.
const YEARS_BONUS: f32 = 5.0;

/// Ranks candidates without an LLM: retrieval-position-decayed base score
/// plus bonuses for specialty skill overlap, title-level alignment, and
/// years-in-band.
pub fn heuristic_rank(digests: &[CandidateDigest], role: &RoleContext) -> Vec<RerankResult> {
    let total = digests.len().max(1) as f32;
    let specialty_keywords: &[&str] = role
        .effective_specialty()
        .map(|s| s.keywords())
        .unwrap_or(&[]);

    let mut results: Vec<RerankResult> = digests
        .iter()
        .enumerate()
        .map(|(position, digest)| {
            let base = BASE_TOP - (position as f32 / total) * BASE_DECAY_SPAN;

            let skill_overlap = digest
                .skills
                .iter()
                .filter(|skill| {
                    specialty_keywords.iter().any(|kw| skill.contains(kw))
                        || role
                            .required_skills
                            .iter()
                            .any(|r| skill.eq_ignore_ascii_case(r))
                })
                .count();
            let skill_bonus = (skill_overlap as f32 * SKILL_BONUS_STEP).min(SKILL_BONUS_CAP);

            let title_bonus = match (role.level, digest.title.as_deref()) {
                (Some(level), Some(title)) => {
                    let lower = title.to_lowercase();
                    if level_profile(level).keywords.iter().any(|kw| lower.contains(kw)) {
                        TITLE_BONUS
                    } else {
                        0.0
                    }
                }
                _ => 0.0,
            };

            let years_bonus = match (role.level, digest.years_experience) {
                (Some(level), Some(years)) => {
                    let profile = level_profile(level);
                    if years >= profile.min_years && years <= profile.max_years {
                        YEARS_BONUS
                    } else {
                        0.0
                    }
                }
                _ => 0.0,
            };

            let score = (base + skill_bonus + title_bonus + years_bonus).clamp(0.0, 100.0);

            RerankResult {
                entity_id: digest.entity_id.clone(),
                score,
                rationale: format!(
                    "Heuristic: retrieval position {} with {} relevant skills{}{}",
                    position + 1,
                    skill_overlap,
                    if title_bonus > 0.0 { ", title-level fit" } else { "" },
                    if years_bonus > 0.0 { ", years in range" } else { "" },
                ),
            }
        })
        .collect();

    // Stable sort: equal scores keep retrieval order.
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{SeniorityLevel, Specialty};

    fn digest(id: &str, title: Option<&str>, years: Option<f32>, skills: &[&str]) -> CandidateDigest {
        CandidateDigest {
            entity_id: id.to_string(),
            name: format!("name-{id}"),
            title: title.map(str::to_string),
            years_experience: years,
            level: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn role() -> RoleContext {
        RoleContext {
            title: "Senior Backend Engineer".to_string(),
            level: Some(SeniorityLevel::Senior),
            specialty: Some(Specialty::Backend),
            required_skills: vec!["node.js".to_string(), "typescript".to_string()],
        }
    }

    #[test]
    fn test_returns_total_order_over_input() {
        let digests = vec![
            digest("c1", None, None, &[]),
            digest("c2", None, None, &[]),
            digest("c3", None, None, &[]),
        ];
        let results = heuristic_rank(&digests, &role());

        assert_eq!(results.len(), 3);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_relevant_candidate_overtakes_position() {
        let digests = vec![
            digest("generic", Some("Accountant"), None, &[]),
            digest(
                "fit",
                Some("Senior Backend Engineer"),
                Some(7.0),
                &["backend api design", "node.js", "typescript"],
            ),
        ];
        let results = heuristic_rank(&digests, &role());

        assert_eq!(results[0].entity_id, "fit");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_deterministic() {
        let digests = vec![
            digest("c1", Some("Senior Engineer"), Some(6.0), &["api server"]),
            digest("c2", None, None, &[]),
        ];
        let a = heuristic_rank(&digests, &role());
        let b = heuristic_rank(&digests, &role());
        assert_eq!(a, b);
    }

    #[test]
    fn test_specialty_inferred_from_title_when_absent() {
        let mut r = role();
        r.specialty = None;
        // Title still says "Backend", so backend keywords apply.
        let digests = vec![digest("c1", None, None, &["api gateway work"])];
        let results = heuristic_rank(&digests, &r);
        assert!(results[0].score > BASE_TOP - 1.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(heuristic_rank(&[], &role()).is_empty());
    }
}
