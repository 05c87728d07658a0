//! Document ingestion: extraction, chunking, embedding and index upkeep

mod chunker;
mod maintenance;
mod parser;
mod processor;

pub use chunker::{TextChunker, DEFAULT_SEPARATORS};
pub use maintenance::IndexMaintenance;
pub use parser::FileParser;
pub use processor::{batches, IngestPipeline};
