//! Process-local vector store
//!
//! Brute-force cosine search over a concurrent map. Used for local runs
//! without a Pinecone index and as the store behind integration tests.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{FragmentMetadata, VectorRecord};

use super::vector_store::{IndexStats, NamespaceStats, VectorMatch, VectorStoreProvider};

struct StoredVector {
    values: Vec<f32>,
    metadata: FragmentMetadata,
}

/// In-memory vector store keyed by fragment id
#[derive(Default)]
pub struct InMemoryVectorStore {
    vectors: DashMap<String, StoredVector>,
}

impl InMemoryVectorStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    fn dimension(&self) -> Option<usize> {
        self.vectors.iter().next().map(|entry| entry.values.len())
    }
}

/// Cosine similarity clamped to `[0, 1]`; zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0) as f32
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<Vec<String>> {
        if let Some(expected) = self.dimension() {
            if let Some(bad) = records.iter().find(|r| r.values.len() != expected) {
                return Err(Error::vector_db(format!(
                    "Vector '{}' has dimension {}, index expects {}",
                    bad.id,
                    bad.values.len(),
                    expected
                )));
            }
        }

        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            self.vectors.insert(
                record.id.clone(),
                StoredVector {
                    values: record.values.clone(),
                    metadata: record.metadata.clone(),
                },
            );
            ids.push(record.id.clone());
        }
        Ok(ids)
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>> {
        let mut matches: Vec<VectorMatch> = self
            .vectors
            .iter()
            .map(|entry| VectorMatch {
                id: entry.key().clone(),
                score: cosine_similarity(vector, &entry.values),
                metadata: entry.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.id.cmp(&b.id))
        });
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn delete_all(&self) -> Result<()> {
        self.vectors.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<IndexStats> {
        let count = self.vectors.len() as u64;
        let mut namespaces = HashMap::new();
        if count > 0 {
            namespaces.insert(String::new(), NamespaceStats { vector_count: count });
        }

        Ok(IndexStats {
            total_vector_count: count,
            dimension: self.dimension().unwrap_or(0),
            index_fullness: 0.0,
            namespaces,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
