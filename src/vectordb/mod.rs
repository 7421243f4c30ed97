//! Vector store abstraction and Qdrant adapter.

pub mod client;
pub mod error;
pub mod mock;
pub mod model;


pub use client::{QdrantStore, VectorStore};
pub use error::VectorStoreError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorStore, cosine_similarity};
pub use model::{
    ChunkType, EmbeddingRecord, RecordMetadata, SearchFilters, SearchHit, VectorQuery,
    VectorStoreHealth,
};
