//! Vector store provider trait for storing and searching embeddings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::types::{FragmentMetadata, VectorRecord};

/// Match returned by a similarity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    /// Fragment id
    pub id: String,
    /// Similarity score (0.0 to 1.0, higher is more similar)
    pub score: f32,
    /// Metadata stored with the vector
    #[serde(default)]
    pub metadata: FragmentMetadata,
}

/// Per-namespace statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceStats {
    #[serde(default)]
    pub vector_count: u64,
}

/// Index-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    #[serde(default)]
    pub total_vector_count: u64,
    #[serde(default)]
    pub dimension: usize,
    #[serde(default)]
    pub index_fullness: f32,
    #[serde(default)]
    pub namespaces: HashMap<String, NamespaceStats>,
}

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `PineconeStore`: Pinecone index over its REST data plane
/// - `InMemoryVectorStore`: process-local cosine index
///
/// Stores are assumed eventually consistent: a query right after an upsert
/// or delete may not observe it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Upsert one batch of records, returning the ids the store accepted
    async fn upsert(&self, records: &[VectorRecord]) -> Result<Vec<String>>;

    /// Return the `top_k` nearest matches ordered by descending score
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>>;

    /// Remove every vector in the index
    async fn delete_all(&self) -> Result<()>;

    /// Get index statistics
    async fn stats(&self) -> Result<IndexStats>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;
}
