//! Configuration for the RAG system

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// OpenAI embedding + chat configuration
    pub openai: OpenAiConfig,
    /// Vector store configuration
    pub vector_store: VectorStoreConfig,
    /// Guard-rail thresholds and query defaults
    pub guard_rails: GuardRailConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file. Missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Override secrets and deployment settings from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.openai.api_key = key;
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Some(key) = lookup("PINECONE_API_KEY") {
            self.vector_store.pinecone_api_key = key;
        }
        if let Some(host) = lookup("PINECONE_INDEX_HOST") {
            self.vector_store.pinecone_index_host = host;
        }
        if let Some(namespace) = lookup("PINECONE_NAMESPACE") {
            self.vector_store.namespace = namespace;
        }
        if let Some(host) = lookup("RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RAG_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(level) = lookup("RAG_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be > 0".into()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.vector_store.upsert_batch_size == 0 {
            return Err(Error::Config("vector_store.upsert_batch_size must be > 0".into()));
        }
        if self.openai.api_key.is_empty() {
            return Err(Error::Config("OPENAI_API_KEY is not set".into()));
        }
        if self.vector_store.provider == VectorStoreKind::Pinecone {
            if self.vector_store.pinecone_api_key.is_empty() {
                return Err(Error::Config("PINECONE_API_KEY is not set".into()));
            }
            if self.vector_store.pinecone_index_host.is_empty() {
                return Err(Error::Config("PINECONE_INDEX_HOST is not set".into()));
            }
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// OpenAI configuration (embeddings and chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API base URL
    pub base_url: String,
    /// API key, usually provided through `OPENAI_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Embedding model name
    pub embedding_model: String,
    /// Embedding dimensions
    pub embedding_dimensions: usize,
    /// Chat model name
    pub chat_model: String,
    /// Sampling temperature for answers
    pub temperature: f32,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimensions: 1536,
            chat_model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Which vector store backs the index
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreKind {
    /// Pinecone serverless/pod index over REST
    #[default]
    Pinecone,
    /// Process-local index, lost on restart
    Memory,
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// Backend selection
    pub provider: VectorStoreKind,
    /// Pinecone index host, e.g. `my-index-abc123.svc.us-east-1.pinecone.io`
    pub pinecone_index_host: String,
    /// Pinecone API key, usually provided through `PINECONE_API_KEY`
    #[serde(skip_serializing)]
    pub pinecone_api_key: String,
    /// Namespace inside the index (empty = default namespace)
    pub namespace: String,
    /// Vectors per upsert request
    pub upsert_batch_size: usize,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            provider: VectorStoreKind::Pinecone,
            pinecone_index_host: String::new(),
            pinecone_api_key: String::new(),
            namespace: String::new(),
            upsert_batch_size: 100,
            timeout_secs: 30,
        }
    }
}

/// Guard-rail heuristics and query defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardRailConfig {
    /// Queries shorter than this (in characters, after trimming) are rejected
    pub min_query_chars: usize,
    /// Answers shorter than this (in characters, after trimming) count as generic
    pub min_answer_chars: usize,
    /// Hedging phrases that mark an answer as generic (matched case-insensitively)
    pub generic_phrases: Vec<String>,
    /// Default number of matches to retrieve
    pub default_max_results: usize,
    /// Default minimum similarity score
    pub default_similarity_threshold: f32,
    /// Deadline for each embedding, vector store and LLM call, in seconds
    pub call_timeout_secs: u64,
}

impl GuardRailConfig {
    /// Deadline applied to each external call
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl Default for GuardRailConfig {
    fn default() -> Self {
        Self {
            min_query_chars: 3,
            min_answer_chars: 20,
            generic_phrases: vec![
                "no tengo información específica".to_string(),
                "no puedo proporcionar detalles".to_string(),
                "consulta los documentos".to_string(),
                "información no es suficiente".to_string(),
            ],
            default_max_results: 5,
            default_similarity_threshold: 0.7,
            call_timeout_secs: 60,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "guardrail_rag=info,tower_http=info".to_string(),
        }
    }
}
