//! Guard-rail query engine
//!
//! Runs one query through its gates in a fixed order:
//!
//! 1. empty query
//! 2. short query
//! 3. retrieval (embed + vector search)
//! 4. similarity threshold
//! 5. context assembly and answer generation
//! 6. genericness screen
//! 7. confidence scoring
//!
//! Gates that stop processing produce a [`QueryOutcome`], never an error.
//! Collaborator failures and deadlines are returned as [`Error`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::GuardRailConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{EmbeddingProvider, LlmProvider, VectorMatch, VectorStoreProvider};
use crate::types::{Query, QueryOutcome, QueryRequest, QueryResult, Source};

use super::confidence;
use super::guard_rails::is_too_generic;

/// Await `fut`, failing with [`Error::Timeout`] once `deadline` passes
pub async fn with_deadline<T>(
    operation: &'static str,
    deadline: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| Error::Timeout {
            operation,
            elapsed: deadline,
        })?
}

/// Query pipeline over the embedding, vector store and LLM collaborators
pub struct GuardRailEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
    rails: GuardRailConfig,
    call_timeout: Duration,
}

impl GuardRailEngine {
    /// Create an engine with the given collaborators and thresholds
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
        rails: GuardRailConfig,
    ) -> Self {
        let call_timeout = rails.call_timeout();
        Self {
            embedder,
            vector_store,
            llm,
            rails,
            call_timeout,
        }
    }

    /// Override the per-call deadline
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Normalize a wire request, run it and shape the result
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResult> {
        let query = request.normalize(&self.rails);
        let outcome = self.answer(&query).await?;
        Ok(outcome.into_result(query.text))
    }

    /// Run a normalized query through the gates
    pub async fn answer(&self, query: &Query) -> Result<QueryOutcome> {
        if query.text.is_empty() {
            tracing::info!("Guard rail: empty query");
            return Ok(QueryOutcome::EmptyQuery);
        }

        if query.char_len() < self.rails.min_query_chars {
            tracing::info!("Guard rail: short query ({} chars)", query.char_len());
            return Ok(QueryOutcome::ShortQuery {
                min_chars: self.rails.min_query_chars,
            });
        }

        let matches = self.retrieve(query).await?;
        let max_score = matches.iter().map(|m| m.score).fold(0.0f32, f32::max);

        let relevant: Vec<VectorMatch> = matches
            .into_iter()
            .filter(|m| m.score >= query.similarity_threshold)
            .collect();

        if relevant.is_empty() {
            tracing::info!(
                "Guard rail: low similarity (max {:.3}, threshold {:.3})",
                max_score,
                query.similarity_threshold
            );
            return Ok(QueryOutcome::LowSimilarity {
                max_score,
                threshold: query.similarity_threshold,
            });
        }

        let context = PromptBuilder::build_context(&relevant);
        let answer = with_deadline(
            "answer generation",
            self.call_timeout,
            self.llm.generate_answer(&query.text, &context),
        )
        .await?;

        let sources: Vec<Source> = relevant.iter().map(Source::from_match).collect();

        if is_too_generic(&answer, &self.rails) {
            tracing::info!("Guard rail: generic response");
            return Ok(QueryOutcome::GenericResponse { sources });
        }

        let confidence = confidence::score(&relevant);
        let average_similarity = confidence::mean_score(&relevant).unwrap_or(0.0);
        tracing::debug!(
            "Answered with {} chunks, mean similarity {:.3}, confidence {}",
            relevant.len(),
            average_similarity,
            confidence
        );

        Ok(QueryOutcome::Answered {
            answer,
            sources,
            confidence,
            average_similarity: average_similarity as f32,
            context_chunks_used: relevant.len(),
        })
    }

    async fn retrieve(&self, query: &Query) -> Result<Vec<VectorMatch>> {
        let embedding = with_deadline(
            "query embedding",
            self.call_timeout,
            self.embedder.embed(&query.text),
        )
        .await?;

        let matches = with_deadline(
            "vector search",
            self.call_timeout,
            self.vector_store.query(&embedding, query.max_results),
        )
        .await?;

        tracing::debug!("Retrieved {} matches", matches.len());
        Ok(matches)
    }
}
