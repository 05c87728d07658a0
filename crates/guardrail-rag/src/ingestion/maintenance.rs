//! Index-wide maintenance: statistics and full wipe

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::providers::VectorStoreProvider;
use crate::retrieval::with_deadline;
use crate::types::{DeleteAllReport, IndexStatsReport};

/// Destructive and read-only operations over the whole index
pub struct IndexMaintenance {
    vector_store: Arc<dyn VectorStoreProvider>,
    call_timeout: Duration,
}

impl IndexMaintenance {
    pub fn new(vector_store: Arc<dyn VectorStoreProvider>, call_timeout: Duration) -> Self {
        Self {
            vector_store,
            call_timeout,
        }
    }

    /// Current index statistics
    pub async fn stats(&self) -> Result<IndexStatsReport> {
        let stats = with_deadline("index stats", self.call_timeout, self.vector_store.stats()).await?;
        Ok(stats.into())
    }

    /// Delete every vector, reporting the count seen before the delete.
    ///
    /// The store applies deletes eventually; a stats call right after this
    /// may still report vectors.
    pub async fn delete_all(&self) -> Result<DeleteAllReport> {
        let before = with_deadline("index stats", self.call_timeout, self.vector_store.stats())
            .await?
            .total_vector_count;

        tracing::warn!("Deleting all vectors ({} before delete)", before);
        with_deadline("delete all", self.call_timeout, self.vector_store.delete_all()).await?;

        Ok(DeleteAllReport::issued(before))
    }
}
