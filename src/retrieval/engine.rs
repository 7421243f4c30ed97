use std::sync::Arc;
use tracing::{debug, warn};

use super::error::RetrievalError;
use super::retry::{RetryConfig, with_retry};
use crate::candidate::{CandidateRecord, CandidateStore};
use crate::constants::{DEFAULT_MODEL_VERSION, DEFAULT_SIMILARITY_THRESHOLD};
use crate::embedding::EmbeddingProvider;
use crate::vectordb::{
    ChunkType, RecordMetadata, SearchFilters, SearchHit, VectorQuery, VectorStore,
};

/// How many candidate-store rows the direct-match path may return.
const DIRECT_MATCH_LIMIT: usize = 5;

/// Retrieval engine configuration.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Minimum cosine similarity for vector hits.
    pub similarity_threshold: f32,
    /// Expected query-vector dimension.
    pub dim: usize,
    /// Model version to query against.
    pub model_version: String,
    /// Chunk type to query against.
    pub chunk_type: ChunkType,
    /// Retry policy for idempotent reads.
    pub retry: RetryConfig,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            dim: crate::constants::DEFAULT_EMBEDDING_DIM,
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            chunk_type: ChunkType::FullProfile,
            retry: RetryConfig::default(),
        }
    }
}

/// Query input: exactly one of `text` / `vector` must be set.
#[derive(Debug, Clone, Default)]
pub struct RetrievalQuery {
    pub text: Option<String>,
    pub vector: Option<Vec<f32>>,
}

impl RetrievalQuery {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            vector: None,
        }
    }

    pub fn from_vector(vector: Vec<f32>) -> Self {
        Self {
            text: None,
            vector: Some(vector),
        }
    }
}

/// A retrieval request.
#[derive(Debug, Clone, Default)]
pub struct RetrievalRequest {
    pub query: RetrievalQuery,
    pub filters: SearchFilters,
    /// Organization scope, applied as a post-filter.
    pub org_id: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

/// One retrieved candidate. Immutable once returned.
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    pub entity_id: String,
    /// Cosine similarity; `1.0` (synthetic) for direct matches.
    pub similarity: f32,
    pub metadata: RecordMetadata,
    /// Set when the candidate came from the email/name direct path.
    pub direct_match: bool,
}

impl RetrievalResult {
    fn from_hit(hit: SearchHit) -> Self {
        Self {
            entity_id: hit.entity_id,
            similarity: hit.similarity,
            metadata: hit.metadata,
            direct_match: false,
        }
    }

    fn from_candidate(candidate: &CandidateRecord) -> Self {
        Self {
            entity_id: candidate.id.clone(),
            // A literal name token does not embed distinctively, so the
            // direct path pins similarity to the top of the range.
            similarity: 1.0,
            metadata: RecordMetadata::from_candidate(candidate),
            direct_match: true,
        }
    }
}

/// Vector retrieval with metadata filtering and a direct email/name path.
pub struct RetrievalEngine<V: VectorStore> {
    vector_store: Arc<V>,
    candidate_store: Arc<dyn CandidateStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: RetrievalConfig,
}

impl<V: VectorStore> RetrievalEngine<V> {
    pub fn new(
        vector_store: Arc<V>,
        candidate_store: Arc<dyn CandidateStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            vector_store,
            candidate_store,
            embedder,
            config,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Runs the retrieval stage.
    ///
    /// Vector query and direct-match lookup execute concurrently; results
    /// are merged (direct first), org-scoped, ordered by similarity
    /// descending, and only then paginated.
    pub async fn search(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<RetrievalResult>, RetrievalError> {
        let query_vector = self.resolve_query_vector(&request.query).await?;

        // Overfetch so the org post-filter cannot starve the page.
        let fetch_limit = (request.offset + request.limit) * 2 + 8;

        let vector_query = VectorQuery {
            vector: query_vector,
            threshold: self.config.similarity_threshold,
            limit: fetch_limit,
            model_version: Some(self.config.model_version.clone()),
            chunk_type: Some(self.config.chunk_type),
            filters: request.filters.clone(),
        };

        let vector_fut = with_retry(
            &self.config.retry,
            "vector_query",
            |e: &crate::vectordb::VectorStoreError| e.is_retryable(),
            || self.vector_store.query(vector_query.clone()),
        );
        let direct_fut = self.direct_matches(&request.query, &request.filters);

        let (vector_hits, direct_hits) = tokio::join!(vector_fut, direct_fut);
        let vector_hits = vector_hits?;
        let direct_hits = direct_hits?;

        let mut merged: Vec<RetrievalResult> = Vec::with_capacity(
            direct_hits.len() + vector_hits.len(),
        );
        merged.extend(direct_hits);
        for hit in vector_hits {
            if !merged.iter().any(|r| r.entity_id == hit.entity_id) {
                merged.push(RetrievalResult::from_hit(hit));
            }
        }

        if let Some(org_id) = &request.org_id {
            merged = self.apply_org_filter(merged, org_id).await?;
        }

        // Stable sort: ties keep store-native order, direct matches stay in
        // front of equal-similarity vector hits.
        merged.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            total = merged.len(),
            offset = request.offset,
            limit = request.limit,
            "Retrieval merged"
        );

        // Pagination after filtering: an offset applied before the filters
        // would skip eligible candidates.
        Ok(merged
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .collect())
    }

    async fn resolve_query_vector(
        &self,
        query: &RetrievalQuery,
    ) -> Result<Vec<f32>, RetrievalError> {
        match (&query.text, &query.vector) {
            (Some(_), Some(_)) => Err(RetrievalError::InvalidQuery {
                message: "supply either query text or a query vector, not both".to_string(),
            }),
            (None, None) => Err(RetrievalError::InvalidQuery {
                message: "either query text or a query vector is required".to_string(),
            }),
            (None, Some(vector)) => {
                if vector.len() != self.config.dim {
                    return Err(RetrievalError::Dimension {
                        expected: self.config.dim,
                        actual: vector.len(),
                    });
                }
                Ok(vector.clone())
            }
            (Some(text), None) => {
                let vector = with_retry(
                    &self.config.retry,
                    "generate_embedding",
                    |e: &crate::embedding::EmbeddingError| e.is_retryable(),
                    || self.embedder.generate(text),
                )
                .await?;

                if vector.len() != self.config.dim {
                    return Err(RetrievalError::Dimension {
                        expected: self.config.dim,
                        actual: vector.len(),
                    });
                }
                Ok(vector)
            }
        }
    }

    /// Email/name lookups against the candidate store.
    ///
    /// Hard metadata filters still apply; the direct path only bypasses the
    /// similarity threshold, not the recruiter's constraints.
    async fn direct_matches(
        &self,
        query: &RetrievalQuery,
        filters: &SearchFilters,
    ) -> Result<Vec<RetrievalResult>, RetrievalError> {
        let Some(text) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(Vec::new());
        };

        // The direct path is auxiliary: a dead candidate store degrades it
        // to empty instead of failing retrieval.
        let lookup = if looks_like_email(text) {
            with_retry(
                &self.config.retry,
                "find_by_email",
                |e: &crate::candidate::CandidateStoreError| e.is_retryable(),
                || self.candidate_store.find_by_email(text),
            )
            .await
            .map(|hit| hit.into_iter().collect())
        } else {
            with_retry(
                &self.config.retry,
                "search_by_name",
                |e: &crate::candidate::CandidateStoreError| e.is_retryable(),
                || self.candidate_store.search_by_name(text, DIRECT_MATCH_LIMIT),
            )
            .await
        };

        let candidates: Vec<CandidateRecord> = match lookup {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Direct-match lookup failed; continuing with vector results only");
                Vec::new()
            }
        };

        let mut results = Vec::new();
        for candidate in &candidates {
            let result = RetrievalResult::from_candidate(candidate);
            if !filters.matches(&result.metadata) {
                debug!(entity_id = %candidate.id, "Direct match excluded by filters");
                continue;
            }
            if results
                .iter()
                .any(|r: &RetrievalResult| r.entity_id == result.entity_id)
            {
                continue;
            }
            results.push(result);
        }

        Ok(results)
    }

    async fn apply_org_filter(
        &self,
        results: Vec<RetrievalResult>,
        org_id: &str,
    ) -> Result<Vec<RetrievalResult>, RetrievalError> {
        if results.is_empty() {
            return Ok(results);
        }

        let ids: Vec<String> = results.iter().map(|r| r.entity_id.clone()).collect();
        let kept = with_retry(
            &self.config.retry,
            "org_filter",
            |e: &crate::candidate::CandidateStoreError| e.is_retryable(),
            || self.candidate_store.filter_by_org(&ids, org_id),
        )
        .await?;

        let before = results.len();
        let kept_set: std::collections::HashSet<&String> = kept.iter().collect();
        let filtered: Vec<RetrievalResult> = results
            .into_iter()
            .filter(|r| kept_set.contains(&r.entity_id))
            .collect();

        if filtered.len() < before {
            warn!(
                dropped = before - filtered.len(),
                org_id, "Organization scope removed candidates"
            );
        }

        Ok(filtered)
    }
}

fn looks_like_email(text: &str) -> bool {
    text.contains('@') && !text.contains(char::is_whitespace)
}
