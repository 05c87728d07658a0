//! Application state for the RAG server

use std::sync::Arc;

use crate::config::{RagConfig, VectorStoreKind};
use crate::error::Result;
use crate::ingestion::{IndexMaintenance, IngestPipeline};
use crate::providers::{
    EmbeddingProvider, InMemoryVectorStore, LlmProvider, OpenAiProvider, PineconeStore,
    VectorStoreProvider,
};
use crate::retrieval::GuardRailEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    engine: GuardRailEngine,
    ingest: IngestPipeline,
    maintenance: IndexMaintenance,
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
}

impl AppState {
    /// Create application state with the providers selected by `config`
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!(
            "Initializing RAG application state (vector store: {:?})...",
            config.vector_store.provider
        );

        let (embedder, llm) = OpenAiProvider::new(&config.openai)?.split();
        tracing::info!(
            "OpenAI providers initialized ({} / {})",
            config.openai.embedding_model,
            config.openai.chat_model
        );

        let vector_store: Arc<dyn VectorStoreProvider> = match config.vector_store.provider {
            VectorStoreKind::Pinecone => {
                tracing::info!(
                    "Using Pinecone index at {}",
                    config.vector_store.pinecone_index_host
                );
                Arc::new(PineconeStore::new(&config.vector_store)?)
            }
            VectorStoreKind::Memory => {
                tracing::warn!("Using in-memory vector store; vectors are lost on restart");
                Arc::new(InMemoryVectorStore::new())
            }
        };

        Ok(Self::from_providers(
            config,
            Arc::new(embedder),
            vector_store,
            Arc::new(llm),
        ))
    }

    /// Assemble state from already-built providers
    pub fn from_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let engine = GuardRailEngine::new(
            Arc::clone(&embedder),
            Arc::clone(&vector_store),
            Arc::clone(&llm),
            config.guard_rails.clone(),
        );
        let ingest = IngestPipeline::new(Arc::clone(&embedder), Arc::clone(&vector_store), &config);
        let maintenance =
            IndexMaintenance::new(Arc::clone(&vector_store), config.guard_rails.call_timeout());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                engine,
                ingest,
                maintenance,
                embedder,
                vector_store,
                llm,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Query engine
    pub fn engine(&self) -> &GuardRailEngine {
        &self.inner.engine
    }

    /// Ingestion pipeline
    pub fn ingest(&self) -> &IngestPipeline {
        &self.inner.ingest
    }

    /// Index statistics and wipe
    pub fn maintenance(&self) -> &IndexMaintenance {
        &self.inner.maintenance
    }

    /// Probe every collaborator, returning (embedder, vector store, llm)
    pub async fn health(&self) -> (bool, bool, bool) {
        let (embedder, store, llm) = tokio::join!(
            self.inner.embedder.health_check(),
            self.inner.vector_store.health_check(),
            self.inner.llm.health_check(),
        );
        (
            embedder.unwrap_or(false),
            store.unwrap_or(false),
            llm.unwrap_or(false),
        )
    }

    /// Chat model used for answers
    pub fn chat_model(&self) -> String {
        self.inner.llm.model()
    }
}
