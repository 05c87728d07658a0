//! Provider abstractions for embeddings, LLM, and vector storage
//!
//! Trait-based seams so the pipeline can run against OpenAI + Pinecone in
//! production and against in-process fakes locally.

pub mod embedding;
pub mod llm;
pub mod vector_store;
pub mod memory;
pub mod openai;
pub mod pinecone;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use memory::InMemoryVectorStore;
pub use openai::{OpenAiEmbedder, OpenAiLlm, OpenAiProvider};
pub use pinecone::PineconeStore;
pub use vector_store::{IndexStats, NamespaceStats, VectorMatch, VectorStoreProvider};
