//! guardrail-rag: grounded document Q&A with guard-rail gated answering
//!
//! Documents are extracted, chunked, embedded and upserted into a vector
//! index. Queries pass through a fixed sequence of gates (empty query, short
//! query, similarity threshold, generic answer) before an answer is returned
//! with its sources and a confidence label.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use retrieval::GuardRailEngine;
pub use types::{
    document::{FileType, Fragment},
    query::QueryRequest,
    response::{Confidence, GuardRail, QueryOutcome, QueryResult},
};
