//! OpenAI-based providers for embeddings and LLM
//!
//! Wraps the shared OpenAiClient to implement the provider traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::OpenAiConfig;
use crate::error::Result;
use crate::generation::OpenAiClient;

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// OpenAI embedding provider (text-embedding-3-small by default)
pub struct OpenAiEmbedder {
    client: Arc<OpenAiClient>,
}

impl OpenAiEmbedder {
    /// Create a new OpenAI embedder
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        Ok(Self::from_client(Arc::new(OpenAiClient::new(config)?)))
    }

    /// Create from existing OpenAiClient
    pub fn from_client(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.client.dimensions()
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }
}

/// OpenAI chat provider for answer generation
pub struct OpenAiLlm {
    client: Arc<OpenAiClient>,
}

impl OpenAiLlm {
    /// Create a new OpenAI LLM provider
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        Ok(Self::from_client(Arc::new(OpenAiClient::new(config)?)))
    }

    /// Create from existing OpenAiClient
    pub fn from_client(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmProvider for OpenAiLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.client.chat(prompt).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn model(&self) -> String {
        self.client.chat_model().to_string()
    }
}

/// Combined OpenAI provider that shares a single client for both embeddings and LLM
pub struct OpenAiProvider {
    embedder: OpenAiEmbedder,
    llm: OpenAiLlm,
}

impl OpenAiProvider {
    /// Create a new combined OpenAI provider
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = Arc::new(OpenAiClient::new(config)?);
        Ok(Self {
            embedder: OpenAiEmbedder::from_client(Arc::clone(&client)),
            llm: OpenAiLlm::from_client(client),
        })
    }

    /// Split into separate providers
    pub fn split(self) -> (OpenAiEmbedder, OpenAiLlm) {
        (self.embedder, self.llm)
    }
}
