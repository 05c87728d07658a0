//! Ingestion pipeline: extract, chunk, embed, upsert

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::retrieval::with_deadline;
use crate::types::{IngestReport, VectorRecord};

use super::{FileParser, TextChunker};

/// Split `items` into consecutive windows of at most `size` elements
pub fn batches<T>(items: &[T], size: usize) -> std::slice::Chunks<'_, T> {
    items.chunks(size.max(1))
}

/// Turns uploaded files into vectors in the store
pub struct IngestPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreProvider>,
    chunker: TextChunker,
    batch_size: usize,
    call_timeout: Duration,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
        config: &RagConfig,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            chunker: TextChunker::from_config(&config.chunking),
            batch_size: config.vector_store.upsert_batch_size,
            call_timeout: config.guard_rails.call_timeout(),
        }
    }

    /// Ingest one uploaded file
    pub async fn ingest(&self, filename: &str, data: Vec<u8>) -> Result<IngestReport> {
        if filename.trim().is_empty() {
            return Err(Error::MissingFilename);
        }
        FileParser::detect(filename)?;

        let start = Instant::now();
        let name = filename.to_string();
        let text = tokio::task::spawn_blocking(move || FileParser::extract(&name, &data))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        tracing::debug!(
            "Extracted {} chars from {} in {:?}",
            text.chars().count(),
            filename,
            start.elapsed()
        );

        self.ingest_text(filename, &text).await
    }

    /// Ingest already-extracted text
    pub async fn ingest_text(&self, filename: &str, text: &str) -> Result<IngestReport> {
        if text.trim().is_empty() {
            return Err(Error::NoValidText);
        }

        let fragments = self.chunker.chunk(text, filename);
        let document_id = match fragments.first() {
            Some(fragment) => fragment.document_id,
            None => return Err(Error::NoChunks),
        };

        let mut records = Vec::with_capacity(fragments.len());
        for fragment in &fragments {
            let values = with_deadline(
                "fragment embedding",
                self.call_timeout,
                self.embedder.embed(&fragment.text),
            )
            .await?;
            records.push(VectorRecord::from_fragment(fragment, values));
        }

        let mut vector_ids = Vec::with_capacity(records.len());
        for batch in batches(&records, self.batch_size) {
            let accepted = with_deadline(
                "vector upsert",
                self.call_timeout,
                self.vector_store.upsert(batch),
            )
            .await?;
            vector_ids.extend(accepted);
        }

        tracing::info!(
            "Ingested {} ({}): {} chunks, {} vectors",
            filename,
            document_id,
            fragments.len(),
            vector_ids.len()
        );

        Ok(IngestReport {
            document_id,
            filename: filename.to_string(),
            text_length: text.chars().count(),
            chunks_count: fragments.len(),
            vectors_count: vector_ids.len(),
            vector_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::embedding::MockEmbeddingProvider;
    use crate::providers::vector_store::MockVectorStoreProvider;
    use std::sync::Mutex;

    fn config(chunk_size: usize, batch_size: usize) -> RagConfig {
        let mut config = RagConfig::default();
        config.chunking.chunk_size = chunk_size;
        config.chunking.chunk_overlap = 0;
        config.vector_store.upsert_batch_size = batch_size;
        config
    }

    fn embedder() -> MockEmbeddingProvider {
        let mut embedder = MockEmbeddingProvider::new();
        embedder.expect_embed().returning(|_| Ok(vec![0.5, 0.5]));
        embedder
    }

    #[test]
    fn test_batches_windows() {
        let items: Vec<u32> = (0..250).collect();
        let sizes: Vec<usize> = batches(&items, 100).map(<[u32]>::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);

        let empty: Vec<u32> = Vec::new();
        assert_eq!(batches(&empty, 100).count(), 0);
        assert_eq!(batches(&items[..3], 0).count(), 3);
    }

    #[tokio::test]
    async fn test_upserts_in_batches_and_concatenates_ids() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_store = Arc::clone(&seen);

        let mut store = MockVectorStoreProvider::new();
        store.expect_upsert().times(3).returning(move |records| {
            seen_in_store.lock().unwrap().push(records.len());
            Ok(records.iter().map(|r| r.id.clone()).collect())
        });

        let pipeline = IngestPipeline::new(Arc::new(embedder()), Arc::new(store), &config(10, 2));
        let text = "uno dos\n\ntres cua\n\ncinco s\n\nsiete o\n\nnueve d";

        let report = pipeline.ingest_text("n.txt", text).await.unwrap();

        assert_eq!(report.chunks_count, 5);
        assert_eq!(report.vectors_count, 5);
        assert_eq!(*seen.lock().unwrap(), vec![2, 2, 1]);
        let expected: Vec<String> = (0..5)
            .map(|i| format!("{}_{}", report.document_id, i))
            .collect();
        assert_eq!(report.vector_ids, expected);
    }

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let pipeline = IngestPipeline::new(
            Arc::new(MockEmbeddingProvider::new()),
            Arc::new(MockVectorStoreProvider::new()),
            &RagConfig::default(),
        );

        let err = pipeline.ingest_text("vacio.txt", " \n\t ").await.unwrap_err();
        assert!(matches!(err, Error::NoValidText));

        let err = pipeline.ingest("vacio.txt", b"   ".to_vec()).await.unwrap_err();
        assert!(matches!(err, Error::NoValidText));
    }

    #[tokio::test]
    async fn test_unsupported_and_missing_filename_rejected_early() {
        let pipeline = IngestPipeline::new(
            Arc::new(MockEmbeddingProvider::new()),
            Arc::new(MockVectorStoreProvider::new()),
            &RagConfig::default(),
        );

        let err = pipeline.ingest("foto.jpg", b"data".to_vec()).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));

        let err = pipeline.ingest("  ", b"data".to_vec()).await.unwrap_err();
        assert!(matches!(err, Error::MissingFilename));
    }

    #[tokio::test]
    async fn test_embedding_failure_stops_before_upsert() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed()
            .returning(|_| Err(Error::embedding("quota exceeded")));

        let pipeline = IngestPipeline::new(
            Arc::new(embedder),
            Arc::new(MockVectorStoreProvider::new()),
            &RagConfig::default(),
        );

        let err = pipeline.ingest_text("a.txt", "contenido válido").await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }
}
