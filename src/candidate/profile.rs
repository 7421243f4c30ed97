//! Profile-format adapter.
//!
//! Upstream analysis has shipped two payload shapes over time: a legacy flat
//! skill list and the newer assertion format. Downstream code never branches
//! on which shape is present; it calls [`canonical_skills`] and gets one
//! canonical assertion set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::model::{CandidateRecord, SkillAssertion, SkillCategory, SkillSource};

/// Confidence assigned to legacy skills that carried none of their own.
pub const LEGACY_DEFAULT_CONFIDENCE: f32 = 50.0;

/// The two profile payload shapes in circulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum ProfileFormat {
    /// Flat skill-name list from the pre-analysis importer.
    Legacy {
        /// Raw skill names, any casing.
        skills: Vec<String>,
    },
    /// Structured assertions from the analysis pipeline.
    Analyzed {
        /// Skill assertions, possibly with duplicates.
        assertions: Vec<SkillAssertion>,
        /// Free-text profile summary.
        summary: Option<String>,
    },
}

impl ProfileFormat {
    /// Empty analyzed profile; used when a candidate has no skill data.
    pub fn empty() -> Self {
        Self::Analyzed {
            assertions: Vec::new(),
            summary: None,
        }
    }
}

/// Adapts either profile shape into a canonical assertion set.
///
/// Names are lower-cased; duplicates by canonical name are resolved by
/// keeping the highest confidence. Output order is deterministic
/// (alphabetical by skill name).
pub fn canonical_skills(record: &CandidateRecord) -> Vec<SkillAssertion> {
    let raw: Vec<SkillAssertion> = match &record.profile {
        ProfileFormat::Legacy { skills } => skills
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                SkillAssertion::new(
                    s,
                    LEGACY_DEFAULT_CONFIDENCE,
                    SkillSource::Inferred,
                    SkillCategory::Technical,
                )
            })
            .collect(),
        ProfileFormat::Analyzed { assertions, .. } => assertions
            .iter()
            .filter(|a| !a.skill.trim().is_empty())
            .map(|a| SkillAssertion::new(&a.skill, a.confidence, a.source, a.category))
            .collect(),
    };

    let mut by_name: HashMap<String, SkillAssertion> = HashMap::with_capacity(raw.len());
    for assertion in raw {
        let keep_new = by_name
            .get(&assertion.skill)
            .is_none_or(|existing| existing.confidence < assertion.confidence);
        if keep_new {
            by_name.insert(assertion.skill.clone(), assertion);
        }
    }

    let mut out: Vec<SkillAssertion> = by_name.into_values().collect();
    out.sort_by(|a, b| a.skill.cmp(&b.skill));
    out
}
