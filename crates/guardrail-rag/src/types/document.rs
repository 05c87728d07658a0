//! Document and fragment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported upload types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// CSV file
    Csv,
}

impl FileType {
    /// Extensions accepted by the upload endpoint, in display order
    pub const SUPPORTED_EXTENSIONS: &'static [&'static str] = &[".pdf", ".docx", ".txt", ".md", ".csv"];

    /// Detect file type from extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            "md" => Some(Self::Markdown),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Detect file type from a filename
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// MIME type reported back to clients
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Txt => "text/plain",
            Self::Markdown => "text/markdown",
            Self::Csv => "text/csv",
        }
    }
}

/// A bounded slice of one document's text, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Shared by every fragment cut from the same document
    pub document_id: Uuid,
    /// `{document_id}_{ordinal}`
    pub fragment_id: String,
    /// Zero-based position within the document
    pub ordinal: usize,
    /// Fragment text
    pub text: String,
    /// Name of the uploaded file
    pub source_filename: String,
}

impl Fragment {
    /// Create a fragment, deriving its id from the document id and ordinal
    pub fn new(
        document_id: Uuid,
        ordinal: usize,
        text: String,
        source_filename: impl Into<String>,
    ) -> Self {
        Self {
            fragment_id: Self::fragment_id(&document_id, ordinal),
            document_id,
            ordinal,
            text,
            source_filename: source_filename.into(),
        }
    }

    /// Build the id of the `ordinal`-th fragment of a document
    pub fn fragment_id(document_id: &Uuid, ordinal: usize) -> String {
        format!("{}_{}", document_id, ordinal)
    }
}

/// Metadata stored next to each vector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentMetadata {
    /// Fragment text
    #[serde(default)]
    pub text: String,
    /// Source filename
    #[serde(default)]
    pub filename: String,
    /// Owning document id
    #[serde(default)]
    pub document_id: String,
    /// Fragment ordinal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
}

impl From<&Fragment> for FragmentMetadata {
    fn from(fragment: &Fragment) -> Self {
        Self {
            text: fragment.text.clone(),
            filename: fragment.source_filename.clone(),
            document_id: fragment.document_id.to_string(),
            chunk_index: Some(fragment.ordinal),
        }
    }
}

/// One embedded fragment ready for upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Fragment id
    pub id: String,
    /// Embedding values
    pub values: Vec<f32>,
    /// Fragment metadata
    pub metadata: FragmentMetadata,
}

impl VectorRecord {
    /// Pair a fragment with its embedding
    pub fn from_fragment(fragment: &Fragment, values: Vec<f32>) -> Self {
        Self {
            id: fragment.fragment_id.clone(),
            values,
            metadata: FragmentMetadata::from(fragment),
        }
    }
}

/// Counts reported after ingesting one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Id shared by the document's fragments
    pub document_id: Uuid,
    /// Uploaded filename
    pub filename: String,
    /// Extracted text length in characters
    pub text_length: usize,
    /// Fragments produced by the chunker
    pub chunks_count: usize,
    /// Vectors accepted by the store
    pub vectors_count: usize,
    /// Ids accepted by the store, in submission order
    #[serde(skip)]
    pub vector_ids: Vec<String>,
}

/// Upload endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub document_id: Uuid,
    pub filename: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<usize>,
    pub upload_date: DateTime<Utc>,
    pub text_length: usize,
    pub chunks_count: usize,
    pub vectors_count: usize,
    pub status: String,
    pub message: String,
}

impl DocumentResponse {
    /// Wrap an ingestion report for the upload endpoint
    pub fn from_report(report: IngestReport, content_type: Option<String>, size_bytes: usize) -> Self {
        Self {
            message: format!("Document '{}' processed successfully", report.filename),
            document_id: report.document_id,
            filename: report.filename,
            content_type,
            size_bytes: Some(size_bytes),
            upload_date: Utc::now(),
            text_length: report.text_length,
            chunks_count: report.chunks_count,
            vectors_count: report.vectors_count,
            status: "success".to_string(),
        }
    }
}
