//! Core types for the RAG system

pub mod document;
pub mod query;
pub mod response;

pub use document::{
    DocumentResponse, FileType, Fragment, FragmentMetadata, IngestReport, VectorRecord,
};
pub use query::{Query, QueryRequest};
pub use response::{
    Confidence, DeleteAllReport, GuardRail, IndexStatsReport, QueryOutcome, QueryResult, Source,
};
