use std::time::Duration;

use crate::constants::{
    DEFAULT_FILTER_PASS_FLOOR, DEFAULT_RERANK_BATCH_SIZE, DEFAULT_RERANK_PARALLELISM,
};

/// Rerank engine configuration.
#[derive(Debug, Clone)]
pub struct RerankConfig {
    /// Candidates per rank batch.
    pub batch_size: usize,
    /// Minimum survivors of the filter pass; fewer triggers backfill from
    /// the removed set.
    pub filter_floor: usize,
    /// Concurrent rank batches in flight.
    pub parallelism: usize,
    /// Skip the filter pass entirely. Set for domains with low rejection
    /// rates where the extra call is wasted.
    pub skip_filter_pass: bool,
    /// Sampling temperature for both passes.
    pub temperature: f32,
    /// Token cap for the filter pass.
    pub filter_max_tokens: u32,
    /// Token cap per rank batch.
    pub rank_max_tokens: u32,
    /// Per-call timeout; cancellation propagates to in-flight calls.
    pub call_timeout: Duration,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_RERANK_BATCH_SIZE,
            filter_floor: DEFAULT_FILTER_PASS_FLOOR,
            parallelism: DEFAULT_RERANK_PARALLELISM,
            skip_filter_pass: false,
            temperature: 0.2,
            filter_max_tokens: 512,
            rank_max_tokens: 1024,
            call_timeout: Duration::from_secs(20),
        }
    }
}

impl RerankConfig {
    /// Builds a rerank config from the crate [`Config`](crate::config::Config).
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            batch_size: config.rerank_batch_size,
            filter_floor: config.filter_pass_floor,
            parallelism: config.rerank_parallelism,
            skip_filter_pass: config.skip_filter_pass,
            call_timeout: config.llm_call_timeout,
            ..Default::default()
        }
    }
}
