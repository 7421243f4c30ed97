use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter,
    PointStruct, Range, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use std::collections::HashMap;
use tracing::debug;

use super::error::VectorStoreError;
use super::model::{
    EmbeddingRecord, RecordMetadata, SearchHit, VectorQuery, VectorStoreHealth,
};
use crate::candidate::{CompanyTier, SeniorityLevel, Specialty};
use crate::hashing::entity_point_id;

/// Minimal async interface the retrieval engine depends on.
pub trait VectorStore: Send + Sync {
    /// Creates the collection if it doesn't exist.
    fn ensure_collection(
        &self,
    ) -> impl std::future::Future<Output = Result<(), VectorStoreError>> + Send;

    /// Upserts embedding records. Records are validated against the store
    /// dimension before any network call.
    fn upsert(
        &self,
        records: Vec<EmbeddingRecord>,
    ) -> impl std::future::Future<Output = Result<(), VectorStoreError>> + Send;

    /// Nearest-neighbor query with threshold and metadata filters.
    fn query(
        &self,
        query: VectorQuery,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHit>, VectorStoreError>> + Send;

    /// Deletes every chunk embedding for the given entities.
    fn delete(
        &self,
        entity_ids: Vec<String>,
    ) -> impl std::future::Future<Output = Result<(), VectorStoreError>> + Send;

    /// Reports connectivity and collection state.
    fn health_check(
        &self,
    ) -> impl std::future::Future<Output = Result<VectorStoreHealth, VectorStoreError>> + Send;
}

#[derive(Clone)]
/// Qdrant-backed vector store bound to one collection.
pub struct QdrantStore {
    client: Qdrant,
    url: String,
    collection: String,
    dim: usize,
}

impl QdrantStore {
    /// Creates a store for `url`, bound to `collection` with vectors of
    /// dimension `dim`.
    pub async fn new(url: &str, collection: &str, dim: usize) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorStoreError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
            dim,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    fn validate_query_vector(&self, vector: &[f32]) -> Result<(), VectorStoreError> {
        if vector.len() != self.dim {
            return Err(VectorStoreError::InvalidDimension {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(VectorStoreError::NonFiniteComponent {
                entity_id: "<query>".to_string(),
            });
        }
        Ok(())
    }

    fn build_filter(query: &VectorQuery) -> Option<Filter> {
        let mut must: Vec<Condition> = Vec::new();
        let filters = &query.filters;

        if let Some(model_version) = &query.model_version {
            must.push(Condition::matches("model_version", model_version.clone()));
        }

        if let Some(chunk_type) = query.chunk_type {
            must.push(Condition::matches("chunk_type", chunk_type.as_str().to_string()));
        }

        if let Some(min_years) = filters.min_years_experience {
            must.push(Condition::range(
                "years_experience",
                Range {
                    gte: Some(f64::from(min_years)),
                    ..Default::default()
                },
            ));
        }

        if let Some(level) = filters.current_level {
            must.push(Condition::matches("current_level", level.as_str().to_string()));
        }

        if let Some(tier) = filters.company_tier {
            must.push(Condition::matches("company_tier", tier.as_str().to_string()));
        }

        if let Some(min_score) = filters.min_score {
            must.push(Condition::range(
                "overall_score",
                Range {
                    gte: Some(f64::from(min_score)),
                    ..Default::default()
                },
            ));
        }

        // Null-inclusive: a candidate without country/specialty data passes.
        if let Some(countries) = &filters.countries {
            let mut either: Vec<Condition> = countries
                .iter()
                .map(|c| Condition::matches("country", c.to_uppercase()))
                .collect();
            either.push(Condition::is_null("country"));
            must.push(Filter::should(either).into());
        }

        if let Some(specialties) = &filters.specialties {
            let mut either: Vec<Condition> = specialties
                .iter()
                .map(|s| Condition::matches("primary_specialty", s.as_str().to_string()))
                .collect();
            either.push(Condition::is_null("primary_specialty"));
            must.push(Filter::should(either).into());
        }

        if must.is_empty() {
            None
        } else {
            Some(Filter::must(must))
        }
    }

    fn record_to_point(record: EmbeddingRecord) -> PointStruct {
        let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
        payload.insert("entity_id".to_string(), record.entity_id.clone().into());
        payload.insert("model_version".to_string(), record.model_version.into());
        payload.insert(
            "chunk_type".to_string(),
            record.chunk_type.as_str().to_string().into(),
        );
        payload.insert(
            "updated_at".to_string(),
            record.updated_at.timestamp().into(),
        );

        let meta = record.metadata;
        if let Some(years) = meta.years_experience {
            payload.insert("years_experience".to_string(), f64::from(years).into());
        }
        if let Some(level) = meta.current_level {
            payload.insert("current_level".to_string(), level.as_str().to_string().into());
        }
        if let Some(tier) = meta.company_tier {
            payload.insert("company_tier".to_string(), tier.as_str().to_string().into());
        }
        if let Some(score) = meta.overall_score {
            payload.insert("overall_score".to_string(), f64::from(score).into());
        }
        if let Some(country) = meta.country {
            payload.insert("country".to_string(), country.to_uppercase().into());
        }
        if let Some(specialty) = meta.primary_specialty {
            payload.insert(
                "primary_specialty".to_string(),
                specialty.as_str().to_string().into(),
            );
        }

        let point_id = entity_point_id(&record.entity_id, record.chunk_type.as_str());
        PointStruct::new(point_id, record.vector, payload)
    }

    fn hit_from_scored_point(point: qdrant_client::qdrant::ScoredPoint) -> Option<SearchHit> {
        let payload = point.payload;

        let entity_id = payload
            .get("entity_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())?;

        let metadata = RecordMetadata {
            years_experience: payload
                .get("years_experience")
                .and_then(|v| v.as_double())
                .map(|y| y as f32),
            current_level: payload
                .get("current_level")
                .and_then(|v| v.as_str())
                .and_then(|s| SeniorityLevel::parse(s)),
            company_tier: payload
                .get("company_tier")
                .and_then(|v| v.as_str())
                .and_then(|s| CompanyTier::parse(s)),
            overall_score: payload
                .get("overall_score")
                .and_then(|v| v.as_double())
                .map(|s| s as f32),
            country: payload
                .get("country")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            primary_specialty: payload
                .get("primary_specialty")
                .and_then(|v| v.as_str())
                .and_then(|s| Specialty::parse(s)),
        };

        Some(SearchHit {
            entity_id,
            similarity: point.score,
            metadata,
        })
    }
}

impl VectorStore for QdrantStore {
    async fn ensure_collection(&self) -> Result<(), VectorStoreError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorStoreError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        if exists {
            return Ok(());
        }

        let vectors_config = VectorParamsBuilder::new(self.dim as u64, Distance::Cosine);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| VectorStoreError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn upsert(&self, records: Vec<EmbeddingRecord>) -> Result<(), VectorStoreError> {
        if records.is_empty() {
            return Ok(());
        }

        for record in &records {
            record.validate(self.dim)?;
        }

        let points: Vec<PointStruct> = records.into_iter().map(Self::record_to_point).collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| VectorStoreError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn query(&self, query: VectorQuery) -> Result<Vec<SearchHit>, VectorStoreError> {
        self.validate_query_vector(&query.vector)?;

        let mut builder =
            SearchPointsBuilder::new(&self.collection, query.vector.clone(), query.limit as u64)
                .with_payload(true)
                .score_threshold(query.threshold);

        if let Some(filter) = Self::build_filter(&query) {
            builder = builder.filter(filter);
        }

        let response = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| VectorStoreError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        let hits: Vec<SearchHit> = response
            .result
            .into_iter()
            .filter_map(Self::hit_from_scored_point)
            .collect();

        debug!(
            collection = %self.collection,
            hits = hits.len(),
            threshold = query.threshold,
            "Vector search complete"
        );

        Ok(hits)
    }

    async fn delete(&self, entity_ids: Vec<String>) -> Result<(), VectorStoreError> {
        if entity_ids.is_empty() {
            return Ok(());
        }

        // Delete by payload filter: removes every chunk embedding of each
        // entity regardless of chunk type.
        let conditions: Vec<Condition> = entity_ids
            .into_iter()
            .map(|id| Condition::matches("entity_id", id))
            .collect();
        let filter = Filter::should(conditions);

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(filter)
                    .wait(true),
            )
            .await
            .map_err(|e| VectorStoreError::DeleteFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn health_check(&self) -> Result<VectorStoreHealth, VectorStoreError> {
        if self.client.health_check().await.is_err() {
            return Ok(VectorStoreHealth {
                connected: false,
                collection_exists: false,
                total_points: 0,
            });
        }

        let collection_exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .unwrap_or(false);

        let total_points = if collection_exists {
            self.client
                .count(CountPointsBuilder::new(&self.collection).exact(false))
                .await
                .ok()
                .and_then(|r| r.result)
                .map(|r| r.count)
                .unwrap_or(0)
        } else {
            0
        };

        Ok(VectorStoreHealth {
            connected: true,
            collection_exists,
            total_points,
        })
    }
}
