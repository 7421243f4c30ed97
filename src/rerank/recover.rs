//! Identifier recovery.
//!
//! Providers are asked to echo candidate ids but routinely return the
//! 1-based prompt index, a truncated id prefix, or the candidate's name.
//! Recovery tries each interpretation in order of reliability; an entry
//! that stays ambiguous is dropped rather than pinned to a wrong candidate.

use std::collections::HashMap;
use tracing::debug;

use super::CandidateDigest;

/// Minimum raw length before prefix / fuzzy-name matching is attempted.
const MIN_PARTIAL_LEN: usize = 3;

/// Maps raw provider identifiers back to real candidate ids.
pub struct IdentityResolver {
    ids_in_order: Vec<String>,
    by_id: HashMap<String, String>,
    by_name: HashMap<String, String>,
    names_in_order: Vec<(String, String)>,
}

impl IdentityResolver {
    /// Builds a resolver over the digests in prompt order.
    pub fn new(digests: &[CandidateDigest]) -> Self {
        let ids_in_order: Vec<String> = digests.iter().map(|d| d.entity_id.clone()).collect();

        let by_id = digests
            .iter()
            .map(|d| (d.entity_id.clone(), d.entity_id.clone()))
            .collect();

        let mut by_name = HashMap::new();
        let mut names_in_order = Vec::new();
        for digest in digests {
            let name = digest.name.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            // First occurrence wins; a duplicated name cannot be resolved
            // unambiguously and falls through to the fuzzy step's
            // uniqueness check.
            by_name.entry(name.clone()).or_insert(digest.entity_id.clone());
            names_in_order.push((name, digest.entity_id.clone()));
        }

        Self {
            ids_in_order,
            by_id,
            by_name,
            names_in_order,
        }
    }

    /// Resolves a raw identifier to a real candidate id.
    ///
    /// Order: exact id, 1-based prompt index, unique id prefix, exact name,
    /// unique fuzzy name containment. `None` means unrecoverable.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let raw = raw.trim().trim_matches('"').trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(id) = self.by_id.get(raw) {
            return Some(id.clone());
        }

        if let Ok(index) = raw.parse::<usize>() {
            if index >= 1 && index <= self.ids_in_order.len() {
                return Some(self.ids_in_order[index - 1].clone());
            }
            // A number that is not a valid prompt index is unrecoverable.
            return None;
        }

        if raw.len() >= MIN_PARTIAL_LEN {
            let mut prefix_hits = self.ids_in_order.iter().filter(|id| id.starts_with(raw));
            if let Some(first) = prefix_hits.next() {
                if prefix_hits.next().is_none() {
                    return Some(first.clone());
                }
                debug!(raw, "Ambiguous id prefix dropped");
                return None;
            }
        }

        let lower = raw.to_lowercase();
        if let Some(id) = self.by_name.get(&lower) {
            return Some(id.clone());
        }

        if lower.len() >= MIN_PARTIAL_LEN {
            let mut fuzzy_hits = self
                .names_in_order
                .iter()
                .filter(|(name, _)| name.contains(&lower) || lower.contains(name.as_str()));
            if let Some((_, id)) = fuzzy_hits.next() {
                if fuzzy_hits.next().is_none() {
                    return Some(id.clone());
                }
                debug!(raw, "Ambiguous fuzzy name dropped");
                return None;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(id: &str, name: &str) -> CandidateDigest {
        CandidateDigest {
            entity_id: id.to_string(),
            name: name.to_string(),
            title: None,
            years_experience: None,
            level: None,
            skills: Vec::new(),
        }
    }

    fn resolver() -> IdentityResolver {
        IdentityResolver::new(&[
            digest("cand-aaa-111", "Grace Hopper"),
            digest("cand-bbb-222", "Alan Turing"),
            digest("cand-bbb-333", "Ada Lovelace"),
        ])
    }

    #[test]
    fn test_exact_id() {
        assert_eq!(resolver().resolve("cand-bbb-222").as_deref(), Some("cand-bbb-222"));
    }

    #[test]
    fn test_numeric_index_is_one_based() {
        let r = resolver();
        assert_eq!(r.resolve("1").as_deref(), Some("cand-aaa-111"));
        assert_eq!(r.resolve("3").as_deref(), Some("cand-bbb-333"));
        assert_eq!(r.resolve("0"), None);
        assert_eq!(r.resolve("4"), None);
    }

    #[test]
    fn test_unique_prefix() {
        assert_eq!(resolver().resolve("cand-aaa").as_deref(), Some("cand-aaa-111"));
    }

    #[test]
    fn test_ambiguous_prefix_dropped() {
        assert_eq!(resolver().resolve("cand-bbb"), None);
    }

    #[test]
    fn test_exact_name_case_insensitive() {
        assert_eq!(resolver().resolve("grace hopper").as_deref(), Some("cand-aaa-111"));
        assert_eq!(resolver().resolve("\"Alan Turing\"").as_deref(), Some("cand-bbb-222"));
    }

    #[test]
    fn test_fuzzy_name_containment() {
        assert_eq!(resolver().resolve("Turing").as_deref(), Some("cand-bbb-222"));
        assert_eq!(resolver().resolve("Ada").as_deref(), Some("cand-bbb-333"));
    }

    #[test]
    fn test_ambiguous_fuzzy_dropped() {
        let r = IdentityResolver::new(&[
            digest("c1", "Anna Graceman"),
            digest("c2", "Grace Hopper"),
        ]);
        // "Grace" appears in both names.
        assert_eq!(r.resolve("Grace"), None);
    }

    #[test]
    fn test_unrecoverable_is_none() {
        assert_eq!(resolver().resolve("completely unknown"), None);
        assert_eq!(resolver().resolve(""), None);
    }
}
