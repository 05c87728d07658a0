//! Response types for RAG queries and index maintenance

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::providers::vector_store::{IndexStats, NamespaceStats, VectorMatch};

/// Characters of fragment text kept in a source preview
pub const PREVIEW_CHARS: usize = 200;

const EMPTY_QUERY_ANSWER: &str = "Por favor proporciona una pregunta válida.";
const GENERIC_ANSWER: &str =
    "No puedo dar una respuesta específica con la información disponible.";

/// Coarse label of how well an answer is supported by retrieved evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(label)
    }
}

/// Which gate stopped normal processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardRail {
    EmptyQuery,
    ShortQuery,
    LowSimilarity,
    GenericResponse,
}

impl fmt::Display for GuardRail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::EmptyQuery => "empty_query",
            Self::ShortQuery => "short_query",
            Self::LowSimilarity => "low_similarity",
            Self::GenericResponse => "generic_response",
        };
        f.write_str(tag)
    }
}

/// A retrieved fragment as shown to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Owning document id
    pub document_id: String,
    /// Source filename
    pub filename: String,
    /// Fragment id
    pub chunk_id: String,
    /// Similarity score
    pub score: f32,
    /// First [`PREVIEW_CHARS`] characters of the fragment, `...` appended if cut
    pub content_preview: String,
}

impl Source {
    /// Project a match into the response shape
    pub fn from_match(m: &VectorMatch) -> Self {
        Self {
            document_id: m.metadata.document_id.clone(),
            filename: m.metadata.filename.clone(),
            chunk_id: m.id.clone(),
            score: m.score,
            content_preview: content_preview(&m.metadata.text),
        }
    }
}

/// Truncate text to [`PREVIEW_CHARS`] characters, marking truncation with `...`
pub fn content_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Terminal state reached by the guard-rail engine
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Query text was empty after trimming
    EmptyQuery,
    /// Query text was shorter than `min_chars`
    ShortQuery { min_chars: usize },
    /// No match reached the threshold
    LowSimilarity { max_score: f32, threshold: f32 },
    /// The model answered with a hedge; evidence is still attached
    GenericResponse { sources: Vec<Source> },
    /// Normal answer
    Answered {
        answer: String,
        sources: Vec<Source>,
        confidence: Confidence,
        average_similarity: f32,
        context_chunks_used: usize,
    },
}

impl QueryOutcome {
    /// Gate that stopped processing, if any
    pub fn guard_rail(&self) -> Option<GuardRail> {
        match self {
            Self::EmptyQuery => Some(GuardRail::EmptyQuery),
            Self::ShortQuery { .. } => Some(GuardRail::ShortQuery),
            Self::LowSimilarity { .. } => Some(GuardRail::LowSimilarity),
            Self::GenericResponse { .. } => Some(GuardRail::GenericResponse),
            Self::Answered { .. } => None,
        }
    }

    /// Shape the outcome for the wire
    pub fn into_result(self, query: impl Into<String>) -> QueryResult {
        let query = query.into();
        let guard_rail_triggered = self.guard_rail();
        match self {
            Self::EmptyQuery => QueryResult {
                query,
                answer: EMPTY_QUERY_ANSWER.to_string(),
                sources: Vec::new(),
                confidence: Confidence::None,
                guard_rail_triggered,
                average_similarity: None,
                context_chunks_used: None,
            },
            Self::ShortQuery { min_chars } => QueryResult {
                query,
                answer: format!(
                    "La pregunta es demasiado corta. Mínimo {} caracteres.",
                    min_chars
                ),
                sources: Vec::new(),
                confidence: Confidence::Low,
                guard_rail_triggered,
                average_similarity: None,
                context_chunks_used: None,
            },
            Self::LowSimilarity { max_score, threshold } => QueryResult {
                query,
                answer: format!(
                    "No encontré información suficientemente relevante (máx: {:.3}, requerido: {:.3})",
                    max_score, threshold
                ),
                sources: Vec::new(),
                confidence: Confidence::Low,
                guard_rail_triggered,
                average_similarity: None,
                context_chunks_used: None,
            },
            Self::GenericResponse { sources } => QueryResult {
                query,
                answer: GENERIC_ANSWER.to_string(),
                sources,
                confidence: Confidence::Low,
                guard_rail_triggered,
                average_similarity: None,
                context_chunks_used: None,
            },
            Self::Answered {
                answer,
                sources,
                confidence,
                average_similarity,
                context_chunks_used,
            } => QueryResult {
                query,
                answer,
                sources,
                confidence,
                guard_rail_triggered,
                average_similarity: Some(average_similarity),
                context_chunks_used: Some(context_chunks_used),
            },
        }
    }
}

/// Response from a RAG query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Normalized query text
    pub query: String,
    /// Answer or fixed guard-rail message
    pub answer: String,
    /// Evidence used for the answer
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Evidence support label
    pub confidence: Confidence,
    /// Gate that stopped normal processing
    pub guard_rail_triggered: Option<GuardRail>,
    /// Mean score of the matches used
    pub average_similarity: Option<f32>,
    /// Number of matches used as context
    pub context_chunks_used: Option<usize>,
}

/// Result of wiping the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAllReport {
    pub status: String,
    pub message: String,
    /// Pre-delete count; the store may lag before it reports zero
    pub vectors_deleted: u64,
    pub vectors_before: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub operation: String,
}

impl DeleteAllReport {
    /// Report for a delete issued against `vectors_before` vectors
    pub fn issued(vectors_before: u64) -> Self {
        let (message, note) = if vectors_before == 0 {
            ("No hay vectores para eliminar".to_string(), None)
        } else {
            (
                format!(
                    "Eliminación iniciada. {} vectores serán eliminados",
                    vectors_before
                ),
                Some("La eliminación puede tardar unos segundos en completarse".to_string()),
            )
        };
        Self {
            status: "success".to_string(),
            message,
            vectors_deleted: vectors_before,
            vectors_before,
            note,
            operation: "delete_all_vectors".to_string(),
        }
    }
}

/// Index statistics as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStatsReport {
    pub status: String,
    pub total_vectors: u64,
    pub dimension: usize,
    pub index_fullness: f32,
    pub namespaces: HashMap<String, NamespaceStats>,
    pub operation: String,
}

impl From<IndexStats> for IndexStatsReport {
    fn from(stats: IndexStats) -> Self {
        Self {
            status: "success".to_string(),
            total_vectors: stats.total_vector_count,
            dimension: stats.dimension,
            index_fullness: stats.index_fullness,
            namespaces: stats.namespaces,
            operation: "get_index_stats".to_string(),
        }
    }
}
