use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::VectorStoreError;
use crate::candidate::{CompanyTier, SeniorityLevel, Specialty};

/// Logical subset of a profile that was embedded.
///
/// Multiple embeddings per entity are allowed, one per chunk type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    FullProfile,
    Experience,
    Skills,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullProfile => "full_profile",
            Self::Experience => "experience",
            Self::Skills => "skills",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full_profile" => Some(Self::FullProfile),
            "experience" => Some(Self::Experience),
            "skills" => Some(Self::Skills),
            _ => None,
        }
    }
}

/// Denormalized scalar attributes stored alongside each vector for filter
/// pushdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub years_experience: Option<f32>,
    pub current_level: Option<SeniorityLevel>,
    pub company_tier: Option<CompanyTier>,
    pub overall_score: Option<f32>,
    pub country: Option<String>,
    /// First-listed specialty only; secondary specialties never participate
    /// in filtering.
    pub primary_specialty: Option<Specialty>,
}

impl RecordMetadata {
    /// Builds metadata from a candidate record.
    pub fn from_candidate(candidate: &crate::candidate::CandidateRecord) -> Self {
        Self {
            years_experience: candidate.years_experience,
            current_level: candidate.current_level,
            company_tier: candidate.company_tier,
            overall_score: candidate.overall_score,
            country: candidate.country.clone(),
            primary_specialty: candidate.primary_specialty(),
        }
    }
}

/// A stored embedding with its filterable metadata.
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    pub entity_id: String,
    pub vector: Vec<f32>,
    pub model_version: String,
    pub chunk_type: ChunkType,
    pub metadata: RecordMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmbeddingRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        entity_id: impl Into<String>,
        vector: Vec<f32>,
        model_version: impl Into<String>,
        chunk_type: ChunkType,
        metadata: RecordMetadata,
    ) -> Self {
        let now = Utc::now();
        Self {
            entity_id: entity_id.into(),
            vector,
            model_version: model_version.into(),
            chunk_type,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates the dimension invariant: exactly `expected_dim` finite
    /// components.
    pub fn validate(&self, expected_dim: usize) -> Result<(), VectorStoreError> {
        if self.vector.len() != expected_dim {
            return Err(VectorStoreError::InvalidDimension {
                expected: expected_dim,
                actual: self.vector.len(),
            });
        }
        if self.vector.iter().any(|v| !v.is_finite()) {
            return Err(VectorStoreError::NonFiniteComponent {
                entity_id: self.entity_id.clone(),
            });
        }
        Ok(())
    }
}

/// One nearest-neighbor hit. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub entity_id: String,
    /// Cosine similarity in `[-1, 1]`.
    pub similarity: f32,
    pub metadata: RecordMetadata,
}

/// Exact-match metadata filters pushed into the vector query.
///
/// Country and specialty filters are null-inclusive: a candidate with no
/// country or no specialty data passes, since missing data is not evidence
/// of a mismatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    pub min_years_experience: Option<f32>,
    pub current_level: Option<SeniorityLevel>,
    pub company_tier: Option<CompanyTier>,
    pub min_score: Option<f32>,
    pub countries: Option<Vec<String>>,
    pub specialties: Option<Vec<Specialty>>,
}

impl SearchFilters {
    /// Reference filter semantics. The Qdrant adapter pushes the same
    /// predicates down as payload conditions; the mock evaluates this
    /// directly.
    pub fn matches(&self, metadata: &RecordMetadata) -> bool {
        if let Some(min_years) = self.min_years_experience
            && !metadata.years_experience.is_some_and(|y| y >= min_years)
        {
            return false;
        }

        if let Some(level) = self.current_level
            && metadata.current_level != Some(level)
        {
            return false;
        }

        if let Some(tier) = self.company_tier
            && metadata.company_tier != Some(tier)
        {
            return false;
        }

        if let Some(min_score) = self.min_score
            && !metadata.overall_score.is_some_and(|s| s >= min_score)
        {
            return false;
        }

        if let Some(countries) = &self.countries
            && let Some(country) = &metadata.country
            && !countries.iter().any(|c| c.eq_ignore_ascii_case(country))
        {
            return false;
        }

        if let Some(specialties) = &self.specialties
            && let Some(primary) = metadata.primary_specialty
            && !specialties.contains(&primary)
        {
            return false;
        }

        true
    }

    /// Returns `true` when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.min_years_experience.is_none()
            && self.current_level.is_none()
            && self.company_tier.is_none()
            && self.min_score.is_none()
            && self.countries.is_none()
            && self.specialties.is_none()
    }
}

/// Parameters for a nearest-neighbor query.
#[derive(Debug, Clone)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    /// Minimum cosine similarity; hits below are dropped store-side.
    pub threshold: f32,
    pub limit: usize,
    pub model_version: Option<String>,
    pub chunk_type: Option<ChunkType>,
    pub filters: SearchFilters,
}

impl VectorQuery {
    pub fn new(vector: Vec<f32>, threshold: f32, limit: usize) -> Self {
        Self {
            vector,
            threshold,
            limit,
            model_version: None,
            chunk_type: None,
            filters: SearchFilters::default(),
        }
    }

    pub fn with_chunk_type(mut self, chunk_type: ChunkType) -> Self {
        self.chunk_type = Some(chunk_type);
        self
    }

    pub fn with_model_version(mut self, model_version: impl Into<String>) -> Self {
        self.model_version = Some(model_version.into());
        self
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// Vector store health snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreHealth {
    pub connected: bool,
    pub collection_exists: bool,
    pub total_points: u64,
}
