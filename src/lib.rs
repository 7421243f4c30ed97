//! Talentrank library crate.
//!
//! Ranks candidate profiles against a job description by combining dense
//! vector retrieval, skill-aware composite scoring, and two-pass LLM
//! reranking, with graceful degradation at every optional stage.
//!
//! # Public API Surface
//!
//! ## Core Pipeline
//! - [`SearchPipeline`], [`SearchRequest`], [`SearchResponse`] - The single
//!   entry point composing every stage
//! - [`PipelineDiagnostics`] - Timing, degradation flags
//!
//! ## Retrieval
//! - [`RetrievalEngine`], [`RetrievalRequest`], [`RetrievalResult`] -
//!   Vector search with metadata filters and the direct email/name path
//! - [`QdrantStore`], [`VectorStore`] - Vector store adapter and trait
//! - [`EmbeddingRecord`], [`SearchFilters`], [`VectorQuery`]
//!
//! ## Scoring
//! - [`SkillScorer`], [`ScoredCandidate`], [`ScoringWeights`],
//!   [`SkillRequirement`]
//!
//! ## Reranking
//! - [`RerankEngine`], [`RerankResult`] - Two-pass filter/rank protocol
//! - [`parse_rerank_response`] - Defensive LLM-JSON salvage chain
//! - [`GenaiProvider`], [`CompletionProvider`] - LLM collaborator
//!
//! ## Collaborator Interfaces
//! - [`CandidateStore`], [`EmbeddingProvider`] - Externally-owned stores
//! - [`CachedEmbedder`] - moka-backed text→vector cache
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature =
//! "mock"))]`.

pub mod candidate;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod llm;
pub mod pipeline;
pub mod rerank;
pub mod retrieval;
pub mod scoring;
pub mod vectordb;

pub use candidate::{
    CandidateRecord, CandidateStore, CandidateStoreError, CompanyTier, ProfileFormat,
    SeniorityLevel, SkillAssertion, SkillCategory, SkillSource, Specialty, canonical_skills,
};
#[cfg(any(test, feature = "mock"))]
pub use candidate::InMemoryCandidateStore;

pub use config::{Config, ConfigError};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};

pub use embedding::{
    CachedEmbedder, EmbeddingError, EmbeddingProvider, HttpEmbeddingConfig, HttpEmbeddingProvider,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingProvider;

pub use hashing::{entity_point_id, hash_text, hash_to_u64};

pub use llm::{Completion, CompletionProvider, GenaiProvider, LlmError};
#[cfg(any(test, feature = "mock"))]
pub use llm::MockCompletionProvider;

pub use pipeline::{
    PipelineConfig, PipelineDiagnostics, PipelineError, RankedCandidate, SearchPipeline,
    SearchRequest, SearchResponse,
};

pub use rerank::{
    IdentityResolver, ParseError, RawRanking, RerankConfig, RerankEngine, RerankResult,
    heuristic_rank, normalize_score, parse_filter_response, parse_rerank_response,
};

pub use retrieval::{
    RetrievalConfig, RetrievalEngine, RetrievalError, RetrievalQuery, RetrievalRequest,
    RetrievalResult, RetryConfig,
};

pub use scoring::{ScoredCandidate, ScoringWeights, SkillRequirement, SkillScorer};

pub use vectordb::{
    ChunkType, EmbeddingRecord, QdrantStore, RecordMetadata, SearchFilters, SearchHit,
    VectorQuery, VectorStore, VectorStoreError, VectorStoreHealth,
};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::{MockVectorStore, cosine_similarity};
