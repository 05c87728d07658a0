//! Pinecone vector store over the index data-plane REST API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::VectorStoreConfig;
use crate::error::{Error, Result};
use crate::types::{FragmentMetadata, VectorRecord};

use super::vector_store::{IndexStats, VectorMatch, VectorStoreProvider};

/// Pinecone index client
pub struct PineconeStore {
    client: Client,
    /// `https://{index host}` without trailing slash
    base_url: String,
    api_key: String,
    namespace: String,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<PineconeVector<'a>>,
    namespace: &'a str,
}

#[derive(Serialize)]
struct PineconeVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a FragmentMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    namespace: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<PineconeMatch>,
}

#[derive(Deserialize)]
struct PineconeMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Value,
}

impl PineconeStore {
    /// Create a new Pinecone store for the configured index host
    pub fn new(config: &VectorStoreConfig) -> Result<Self> {
        if config.pinecone_index_host.is_empty() {
            return Err(Error::Config("Pinecone index host is not configured".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url(&config.pinecone_index_host),
            api_key: config.pinecone_api_key.clone(),
            namespace: config.namespace.clone(),
        })
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::vector_db(format!("Pinecone request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::vector_db(format!(
                "Pinecone {} failed ({}): {}",
                path, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::vector_db(format!("Invalid Pinecone response from {}: {}", path, e)))
    }
}

#[async_trait]
impl VectorStoreProvider for PineconeStore {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<Vec<String>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let request = UpsertRequest {
            vectors: records
                .iter()
                .map(|r| PineconeVector {
                    id: &r.id,
                    values: &r.values,
                    metadata: &r.metadata,
                })
                .collect(),
            namespace: &self.namespace,
        };

        let body = self.post("/vectors/upsert", &request).await?;
        let upserted = body["upsertedCount"].as_u64().unwrap_or(records.len() as u64);
        tracing::debug!("Pinecone upserted {} vectors", upserted);

        Ok(records.iter().map(|r| r.id.clone()).collect())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: &self.namespace,
        };

        let body = self.post("/query", &request).await?;
        let response: QueryResponse = serde_json::from_value(body)?;

        Ok(response
            .matches
            .into_iter()
            .map(|m| VectorMatch {
                id: m.id,
                score: m.score,
                metadata: metadata_from_value(&m.metadata),
            })
            .collect())
    }

    async fn delete_all(&self) -> Result<()> {
        self.post(
            "/vectors/delete",
            &json!({ "deleteAll": true, "namespace": self.namespace }),
        )
        .await?;
        Ok(())
    }

    async fn stats(&self) -> Result<IndexStats> {
        let body = self.post("/describe_index_stats", &json!({})).await?;
        let stats: IndexStats = serde_json::from_value(body)?;
        Ok(scoped_to_namespace(stats, &self.namespace))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.stats().await.is_ok())
    }
}

fn base_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

/// Report the configured namespace's count as the total, since `delete_all`
/// and `query` only ever touch that namespace. Responses without a
/// namespace breakdown keep the index-wide total for the default namespace.
fn scoped_to_namespace(mut stats: IndexStats, namespace: &str) -> IndexStats {
    if let Some(ns) = stats.namespaces.get(namespace) {
        stats.total_vector_count = ns.vector_count;
    } else if !namespace.is_empty() || !stats.namespaces.is_empty() {
        stats.total_vector_count = 0;
    }
    stats
}

/// Read fragment metadata leniently: Pinecone returns numbers as floats
/// and older records may lack fields.
fn metadata_from_value(value: &Value) -> FragmentMetadata {
    let text = |key: &str| value[key].as_str().unwrap_or_default().to_string();
    let chunk_index = value["chunk_index"]
        .as_u64()
        .or_else(|| value["chunk_index"].as_f64().map(|f| f as u64))
        .map(|i| i as usize);

    FragmentMetadata {
        text: text("text"),
        filename: text("filename"),
        document_id: text("document_id"),
        chunk_index,
    }
}
