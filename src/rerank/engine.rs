use futures_util::StreamExt;
use futures_util::stream;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::config::RerankConfig;
use super::fallback::heuristic_rank;
use super::parse::{normalize_score, parse_filter_response, parse_rerank_response};
use super::prompt::{build_filter_prompt, build_rank_prompt};
use super::recover::IdentityResolver;
use super::{CandidateDigest, RerankOutcome, RerankPhase, RerankResult, RoleContext};
use crate::llm::{Completion, CompletionProvider, LlmError};

/// Two-pass LLM reranker.
///
/// State machine per request: `Idle → Filtering → Ranking → Merged → Done`,
/// with `Degraded` reachable from any step on provider failure. The engine
/// never errors: partial batch failure falls back to heuristic scores and a
/// dead provider degrades the whole run to the heuristic.
pub struct RerankEngine {
    provider: Arc<dyn CompletionProvider>,
    config: RerankConfig,
}

impl RerankEngine {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: RerankConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &RerankConfig {
        &self.config
    }

    /// Reranks `digests` (in retrieval order) for `role`.
    pub async fn rerank(&self, role: &RoleContext, digests: Vec<CandidateDigest>) -> RerankOutcome {
        if digests.is_empty() {
            return RerankOutcome::empty();
        }

        debug!(candidates = digests.len(), phase = %RerankPhase::Idle, "Rerank starting");

        let survivors = self.filter_pass(role, &digests).await;

        debug!(
            survivors = survivors.len(),
            phase = %RerankPhase::Ranking,
            "Rank pass starting"
        );

        let batches: Vec<Vec<CandidateDigest>> = survivors
            .chunks(self.config.batch_size)
            .map(|c| c.to_vec())
            .collect();
        let batch_count = batches.len();

        // Batches are independent, stateless provider calls; run them
        // concurrently up to the parallelism cap. Dropping the stream (on
        // parent cancellation) drops in-flight calls with it.
        let batch_outcomes: Vec<(usize, Vec<RerankResult>, bool)> = stream::iter(
            batches.into_iter().enumerate(),
        )
        .map(|(index, batch)| async move {
            let (results, used_llm) = self.rank_batch(role, &batch).await;
            (index, results, used_llm)
        })
        .buffer_unordered(self.config.parallelism.max(1))
        .collect()
        .await;

        let llm_batches = batch_outcomes.iter().filter(|(_, _, llm)| *llm).count();
        let fallback_batches = batch_count - llm_batches;

        debug!(phase = %RerankPhase::Merged, llm_batches, fallback_batches, "Merging batches");

        // Merge and globally re-sort by normalized score; ties keep
        // retrieval order via the rank map.
        let rank_of: HashMap<&str, usize> = digests
            .iter()
            .enumerate()
            .map(|(i, d)| (d.entity_id.as_str(), i))
            .collect();

        let mut merged: Vec<RerankResult> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut ordered = batch_outcomes;
        ordered.sort_by_key(|(index, _, _)| *index);
        for (_, results, _) in ordered {
            for result in results {
                if seen.insert(result.entity_id.clone()) {
                    merged.push(result);
                }
            }
        }

        merged.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    rank_of
                        .get(a.entity_id.as_str())
                        .cmp(&rank_of.get(b.entity_id.as_str()))
                })
        });

        let degraded = fallback_batches > 0;
        let phase = if degraded && llm_batches == 0 {
            RerankPhase::Degraded
        } else {
            RerankPhase::Done
        };

        info!(
            results = merged.len(),
            phase = %phase,
            llm_batches,
            fallback_batches,
            "Rerank complete"
        );

        RerankOutcome {
            results: merged,
            phase,
            degraded,
            degraded_reason: degraded.then(|| {
                format!("{fallback_batches} of {batch_count} batches used heuristic scoring")
            }),
            llm_batches,
            fallback_batches,
        }
    }

    /// Pass 1: cheap keep/remove partition by obvious mismatch.
    ///
    /// Failures are soft: a dead or incoherent filter pass keeps everyone.
    /// If fewer than the floor survive, the removed set backfills in
    /// retrieval order so the rank pass always has material.
    async fn filter_pass(
        &self,
        role: &RoleContext,
        digests: &[CandidateDigest],
    ) -> Vec<CandidateDigest> {
        if self.config.skip_filter_pass || digests.len() <= self.config.filter_floor {
            debug!(
                skip_flag = self.config.skip_filter_pass,
                candidates = digests.len(),
                "Filter pass skipped"
            );
            return digests.to_vec();
        }

        debug!(phase = %RerankPhase::Filtering, "Filter pass starting");

        let prompt = build_filter_prompt(role, digests);
        let completion = match self
            .call_provider(&prompt, self.config.filter_max_tokens, "filter")
            .await
        {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Filter pass provider failure; keeping all candidates");
                return digests.to_vec();
            }
        };

        let decision = match parse_filter_response(&completion.text) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "Filter pass unparseable; keeping all candidates");
                return digests.to_vec();
            }
        };

        let keep_set: HashSet<usize> = decision.keep.iter().copied().collect();
        let mut survivors: Vec<CandidateDigest> = Vec::new();
        let mut removed: Vec<CandidateDigest> = Vec::new();
        for (i, digest) in digests.iter().enumerate() {
            if keep_set.contains(&(i + 1)) {
                survivors.push(digest.clone());
            } else {
                removed.push(digest.clone());
            }
        }

        if survivors.len() < self.config.filter_floor {
            let needed = self.config.filter_floor - survivors.len();
            debug!(
                survivors = survivors.len(),
                backfill = needed.min(removed.len()),
                "Backfilling filter pass to floor"
            );
            survivors.extend(removed.into_iter().take(needed));
        }

        survivors
    }

    /// Pass 2 for one batch: rank, parse, recover identifiers, normalize.
    /// Returns the results and whether the LLM produced them.
    async fn rank_batch(
        &self,
        role: &RoleContext,
        batch: &[CandidateDigest],
    ) -> (Vec<RerankResult>, bool) {
        let prompt = build_rank_prompt(role, batch);

        let completion = match self
            .call_provider(&prompt, self.config.rank_max_tokens, "rank")
            .await
        {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, batch_size = batch.len(), "Rank batch provider failure; using heuristic");
                return (heuristic_rank(batch, role), false);
            }
        };

        let raw_rankings = match parse_rerank_response(&completion.text) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    error = %e,
                    finish_reason = completion.finish_reason.as_deref().unwrap_or("unknown"),
                    "Rank batch unparseable; using heuristic"
                );
                return (heuristic_rank(batch, role), false);
            }
        };

        let resolver = IdentityResolver::new(batch);
        let mut results: Vec<RerankResult> = Vec::new();
        let mut dropped = 0usize;
        for raw in raw_rankings {
            match resolver.resolve(&raw.id) {
                Some(entity_id) => results.push(RerankResult {
                    entity_id,
                    score: normalize_score(raw.score),
                    rationale: raw.reason.unwrap_or_default(),
                }),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(dropped, "Dropped unrecoverable ranking entries");
        }

        if results.is_empty() {
            warn!("No recoverable entries in rank batch; using heuristic");
            return (heuristic_rank(batch, role), false);
        }

        (results, true)
    }

    /// One provider call under the per-call timeout, with the sizes and
    /// finish reason logged so truncation is diagnosable without replay.
    async fn call_provider(
        &self,
        prompt: &str,
        max_tokens: u32,
        pass: &str,
    ) -> Result<Completion, LlmError> {
        let completion = tokio::time::timeout(
            self.config.call_timeout,
            self.provider
                .complete(prompt, self.config.temperature, max_tokens),
        )
        .await
        .map_err(|_| LlmError::Timeout {
            seconds: self.config.call_timeout.as_secs(),
        })??;

        info!(
            pass,
            input_chars = prompt.len(),
            output_chars = completion.text.len(),
            finish_reason = completion.finish_reason.as_deref().unwrap_or("unknown"),
            "LLM pass call finished"
        );

        Ok(completion)
    }
}
