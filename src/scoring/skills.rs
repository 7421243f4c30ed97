//! Skill resolution: exact, substring, and synonym matching.

use crate::candidate::SkillAssertion;

/// Confidence multiplier for substring (non-exact) matches.
pub const SUBSTRING_PENALTY: f32 = 0.8;

/// Substring matching below this length is noise ("go" would hit
/// "django"); synonyms cover the short aliases instead.
const MIN_SUBSTRING_LEN: usize = 3;

/// Known alias groups. Matching within a group is bidirectional and exact.
static SYNONYM_GROUPS: &[&[&str]] = &[
    &["javascript", "js", "node.js", "nodejs", "node"],
    &["typescript", "ts"],
    &["python", "py"],
    &["golang", "go"],
    &["kubernetes", "k8s"],
    &["postgresql", "postgres"],
    &["c#", "csharp", ".net", "dotnet"],
    &["aws", "amazon web services"],
    &["gcp", "google cloud", "google cloud platform"],
    &["react", "reactjs", "react.js"],
    &["vue", "vuejs", "vue.js"],
    &["machine learning", "ml"],
    &["continuous integration", "ci/cd", "cicd"],
];

/// How a skill requirement was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    Synonym,
}

/// A resolved requirement → assertion pairing.
#[derive(Debug, Clone)]
pub struct SkillMatch {
    /// The assertion's canonical skill name.
    pub matched_skill: String,
    /// Assertion confidence with any match penalty already applied.
    pub effective_confidence: f32,
    pub kind: MatchKind,
}

/// Lower-cased, trimmed form used for all comparisons.
pub fn canonical(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Resolves a target skill against a candidate's assertions.
///
/// Order: exact match, substring containment either direction (with a
/// confidence penalty), synonym table. Returns `None` when nothing matches;
/// the requirement then contributes zero.
pub fn resolve(target: &str, assertions: &[SkillAssertion]) -> Option<SkillMatch> {
    let target = canonical(target);
    if target.is_empty() {
        return None;
    }

    if let Some(assertion) = assertions.iter().find(|a| a.skill == target) {
        return Some(SkillMatch {
            matched_skill: assertion.skill.clone(),
            effective_confidence: assertion.confidence,
            kind: MatchKind::Exact,
        });
    }

    if target.len() >= MIN_SUBSTRING_LEN {
        let substring_hit = assertions.iter().find(|a| {
            a.skill.len() >= MIN_SUBSTRING_LEN
                && (a.skill.contains(&target) || target.contains(&a.skill))
        });
        if let Some(assertion) = substring_hit {
            return Some(SkillMatch {
                matched_skill: assertion.skill.clone(),
                effective_confidence: assertion.confidence * SUBSTRING_PENALTY,
                kind: MatchKind::Substring,
            });
        }
    }

    if let Some(group) = SYNONYM_GROUPS.iter().find(|g| g.contains(&target.as_str())) {
        if let Some(assertion) = assertions
            .iter()
            .find(|a| group.contains(&a.skill.as_str()))
        {
            return Some(SkillMatch {
                matched_skill: assertion.skill.clone(),
                effective_confidence: assertion.confidence,
                kind: MatchKind::Synonym,
            });
        }
    }

    None
}
