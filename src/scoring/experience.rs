//! Experience-level fit: years band blended with title keywords.

use crate::candidate::SeniorityLevel;

/// Score given when the title carries no level keyword. Moderate, not
/// severe: titles are noisy, vector similarity carries the nuance.
pub const KEYWORD_MISS_SCORE: f32 = 50.0;

/// Neutral score when the target level or the candidate data is absent.
pub const NEUTRAL_SCORE: f32 = 50.0;

/// Per-level expectations.
#[derive(Debug, Clone, Copy)]
pub struct LevelProfile {
    /// Years band `[min, max]`.
    pub min_years: f32,
    pub max_years: f32,
    /// Title keywords signalling the level.
    pub keywords: &'static [&'static str],
    /// Blend weight of the title component. Higher for senior/executive:
    /// years alone are unreliable signals for leadership fit.
    pub title_weight: f32,
}

/// Level table. The `match` is exhaustive, so a new level without a table
/// entry fails to compile.
pub fn level_profile(level: SeniorityLevel) -> LevelProfile {
    match level {
        SeniorityLevel::Entry => LevelProfile {
            min_years: 0.0,
            max_years: 3.0,
            keywords: &["junior", "intern", "graduate", "associate", "entry"],
            title_weight: 0.2,
        },
        SeniorityLevel::Mid => LevelProfile {
            min_years: 2.0,
            max_years: 6.0,
            keywords: &["engineer", "developer", "analyst", "consultant"],
            title_weight: 0.2,
        },
        SeniorityLevel::Senior => LevelProfile {
            min_years: 5.0,
            max_years: 12.0,
            keywords: &["senior", "staff", "principal", "lead"],
            title_weight: 0.35,
        },
        SeniorityLevel::Executive => LevelProfile {
            min_years: 8.0,
            max_years: 40.0,
            keywords: &["cto", "vp", "director", "founder", "chief", "head of"],
            title_weight: 0.5,
        },
    }
}

/// Blended years/title fit in `[0, 100]`.
///
/// Missing years or title degrade to the neutral score for that component;
/// this function never fails.
pub fn experience_match_score(
    years: Option<f32>,
    title: Option<&str>,
    target: SeniorityLevel,
) -> f32 {
    let profile = level_profile(target);

    let years_component = match years {
        None => NEUTRAL_SCORE,
        Some(y) => years_fit(y, &profile),
    };

    let title_component = match title {
        None => KEYWORD_MISS_SCORE,
        Some(t) => {
            let lower = t.to_lowercase();
            if profile.keywords.iter().any(|kw| lower.contains(kw)) {
                100.0
            } else {
                KEYWORD_MISS_SCORE
            }
        }
    };

    (1.0 - profile.title_weight) * years_component + profile.title_weight * title_component
}

fn years_fit(years: f32, profile: &LevelProfile) -> f32 {
    if years < profile.min_years {
        // Scale up toward the band floor.
        if profile.min_years > 0.0 {
            (years / profile.min_years * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        }
    } else if years <= profile.max_years {
        100.0
    } else {
        // Overqualification tapers gently, floored well above zero.
        (100.0 - (years - profile.max_years) * 5.0).clamp(50.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_in_band_scores_full() {
        let score = experience_match_score(Some(7.0), Some("Senior Backend Engineer"), SeniorityLevel::Senior);
        assert!((score - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_keyword_miss_is_moderate_not_severe() {
        let with_kw = experience_match_score(Some(7.0), Some("Senior Engineer"), SeniorityLevel::Senior);
        let without_kw = experience_match_score(Some(7.0), Some("Software Engineer"), SeniorityLevel::Senior);

        assert!(with_kw > without_kw);
        // 0.65 * 100 + 0.35 * 50 = 82.5
        assert!((without_kw - 82.5).abs() < 1e-4);
    }

    #[test]
    fn test_executive_title_weight_dominates() {
        let cto = experience_match_score(Some(10.0), Some("CTO"), SeniorityLevel::Executive);
        let ic = experience_match_score(Some(10.0), Some("Software Engineer"), SeniorityLevel::Executive);

        assert!((cto - 100.0).abs() < 1e-4);
        // 0.5 * 100 + 0.5 * 50 = 75
        assert!((ic - 75.0).abs() < 1e-4);
    }

    #[test]
    fn test_under_years_scales_toward_floor() {
        let score = experience_match_score(Some(2.5), Some("Senior Engineer"), SeniorityLevel::Senior);
        // years: 2.5 / 5.0 * 100 = 50; title hit: 100
        let expected = 0.65 * 50.0 + 0.35 * 100.0;
        assert!((score - expected).abs() < 1e-4);
    }

    #[test]
    fn test_overqualified_tapers_with_floor() {
        let score = experience_match_score(Some(30.0), None, SeniorityLevel::Mid);
        // years component floored at 50, title miss 50
        assert!((score - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_data_is_neutral() {
        let score = experience_match_score(None, None, SeniorityLevel::Senior);
        assert!((score - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_every_level_has_a_profile() {
        for level in [
            SeniorityLevel::Entry,
            SeniorityLevel::Mid,
            SeniorityLevel::Senior,
            SeniorityLevel::Executive,
        ] {
            let p = level_profile(level);
            assert!(p.max_years > p.min_years);
            assert!(!p.keywords.is_empty());
            assert!((0.0..=1.0).contains(&p.title_weight));
        }
    }
}
