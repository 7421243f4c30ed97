use parking_lot::RwLock;
use std::collections::HashMap;

use super::client::VectorStore;
use super::error::VectorStoreError;
use super::model::{EmbeddingRecord, SearchHit, VectorQuery, VectorStoreHealth};
use crate::hashing::entity_point_id;

/// In-memory vector store with the same filter semantics as the Qdrant
/// adapter.
pub struct MockVectorStore {
    points: RwLock<HashMap<u64, EmbeddingRecord>>,
    dim: usize,
    collection_ready: RwLock<bool>,
    unreachable: RwLock<bool>,
}

impl MockVectorStore {
    pub fn new(dim: usize) -> Self {
        Self {
            points: RwLock::new(HashMap::new()),
            dim,
            collection_ready: RwLock::new(false),
            unreachable: RwLock::new(false),
        }
    }

    /// Forces every subsequent call to fail with a connection error.
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.write() = unreachable;
    }

    pub fn point_count(&self) -> usize {
        self.points.read().len()
    }

    fn check_reachable(&self, op: &str) -> Result<(), VectorStoreError> {
        if *self.unreachable.read() {
            return Err(VectorStoreError::ConnectionFailed {
                url: format!("mock://{op}"),
                message: "mock store marked unreachable".to_string(),
            });
        }
        Ok(())
    }
}

impl VectorStore for MockVectorStore {
    async fn ensure_collection(&self) -> Result<(), VectorStoreError> {
        self.check_reachable("ensure_collection")?;
        *self.collection_ready.write() = true;
        Ok(())
    }

    async fn upsert(&self, records: Vec<EmbeddingRecord>) -> Result<(), VectorStoreError> {
        self.check_reachable("upsert")?;

        for record in &records {
            record.validate(self.dim)?;
        }

        let mut points = self.points.write();
        for record in records {
            let id = entity_point_id(&record.entity_id, record.chunk_type.as_str());
            points.insert(id, record);
        }

        Ok(())
    }

    async fn query(&self, query: VectorQuery) -> Result<Vec<SearchHit>, VectorStoreError> {
        self.check_reachable("query")?;

        if query.vector.len() != self.dim {
            return Err(VectorStoreError::InvalidDimension {
                expected: self.dim,
                actual: query.vector.len(),
            });
        }

        let points = self.points.read();
        let mut hits: Vec<SearchHit> = points
            .values()
            .filter(|r| {
                query
                    .model_version
                    .as_deref()
                    .is_none_or(|mv| r.model_version == mv)
            })
            .filter(|r| query.chunk_type.is_none_or(|ct| r.chunk_type == ct))
            .filter(|r| query.filters.matches(&r.metadata))
            .map(|r| SearchHit {
                entity_id: r.entity_id.clone(),
                similarity: cosine_similarity(&query.vector, &r.vector),
                metadata: r.metadata.clone(),
            })
            .filter(|hit| hit.similarity >= query.threshold)
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        hits.truncate(query.limit);
        Ok(hits)
    }

    async fn delete(&self, entity_ids: Vec<String>) -> Result<(), VectorStoreError> {
        self.check_reachable("delete")?;

        let mut points = self.points.write();
        points.retain(|_, r| !entity_ids.contains(&r.entity_id));
        Ok(())
    }

    async fn health_check(&self) -> Result<VectorStoreHealth, VectorStoreError> {
        if *self.unreachable.read() {
            return Ok(VectorStoreHealth {
                connected: false,
                collection_exists: false,
                total_points: 0,
            });
        }

        Ok(VectorStoreHealth {
            connected: true,
            collection_exists: *self.collection_ready.read(),
            total_points: self.points.read().len() as u64,
        })
    }
}

/// Plain cosine similarity over f32 slices.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
