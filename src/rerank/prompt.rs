//! Prompt construction for both rerank passes.
//!
//! Prompts pin the output contract (bare JSON, known keys) because parsing
//! budget is cheaper spent on the occasional deviation than on free-form
//! output.

use std::fmt::Write;

use super::{CandidateDigest, RoleContext};

/// Skills listed per candidate in the rank prompt.
const MAX_PROMPT_SKILLS: usize = 8;

/// Compact filter-pass prompt: index, title, years only.
pub fn build_filter_prompt(role: &RoleContext, digests: &[CandidateDigest]) -> String {
    let mut prompt = String::with_capacity(256 + digests.len() * 48);

    let _ = writeln!(
        prompt,
        "You screen candidates for a {} role.{}",
        role.title,
        role.level
            .map(|l| format!(" Target level: {l}."))
            .unwrap_or_default()
    );
    prompt.push_str(
        "Remove only candidates with an obvious function or level mismatch. \
         When in doubt, keep.\n\nCandidates:\n",
    );

    for (i, digest) in digests.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. {} - {} yrs",
            i + 1,
            digest.title.as_deref().unwrap_or("(no title)"),
            digest
                .years_experience
                .map(|y| format!("{y:.0}"))
                .unwrap_or_else(|| "?".to_string()),
        );
    }

    prompt.push_str(
        "\nReply with JSON only, no prose: {\"keep\": [indices], \"remove\": [indices]}",
    );
    prompt
}

/// Rank-pass prompt for one batch, rubric keyed by role function, level,
/// and specialty.
pub fn build_rank_prompt(role: &RoleContext, batch: &[CandidateDigest]) -> String {
    let mut prompt = String::with_capacity(512 + batch.len() * 160);

    let _ = writeln!(prompt, "You rank candidates for a {} role.", role.title);
    if let Some(level) = role.level {
        let _ = writeln!(prompt, "Target level: {level}.");
    }
    if let Some(specialty) = role.effective_specialty() {
        let _ = writeln!(prompt, "Specialty: {specialty}.");
    }
    if !role.required_skills.is_empty() {
        let _ = writeln!(prompt, "Required skills: {}.", role.required_skills.join(", "));
    }

    prompt.push_str(
        "\nScore each candidate 0-100 on fit: required-skill coverage first, \
         then level and specialty alignment, then overall trajectory.\n\nCandidates:\n",
    );

    for (i, digest) in batch.iter().enumerate() {
        let skills = if digest.skills.is_empty() {
            "(none listed)".to_string()
        } else {
            digest
                .skills
                .iter()
                .take(MAX_PROMPT_SKILLS)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };

        let _ = writeln!(
            prompt,
            "{}. id={} name={} title={} years={} skills={}",
            i + 1,
            digest.entity_id,
            digest.name,
            digest.title.as_deref().unwrap_or("-"),
            digest
                .years_experience
                .map(|y| format!("{y:.0}"))
                .unwrap_or_else(|| "-".to_string()),
            skills,
        );
    }

    prompt.push_str(
        "\nReply with a JSON array only, no prose, one entry per candidate: \
         [{\"id\": \"<id>\", \"score\": <0-100>, \"reason\": \"<short>\"}]",
    );
    prompt
}
