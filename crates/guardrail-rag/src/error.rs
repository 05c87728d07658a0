//! Error types for the RAG system
//!
//! Guard-rail outcomes (empty query, low similarity, ...) are *not* errors;
//! they are regular [`crate::types::QueryResult`] values. Everything in this
//! enum is either rejected input or a failing collaborator.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG system errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upload without a filename
    #[error("Filename is required")]
    MissingFilename,

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Extraction produced only whitespace
    #[error("Document contains no valid text")]
    NoValidText,

    /// Chunker produced no fragments
    #[error("Could not create text chunks")]
    NoChunks,

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector database error
    #[error("Vector database error: {0}")]
    VectorDb(String),

    /// LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// An external call exceeded its deadline
    #[error("{operation} timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector db error
    pub fn vector_db(message: impl Into<String>) -> Self {
        Self::VectorDb(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "config_error",
                msg.clone(),
            ),
            Error::MissingFilename => (
                StatusCode::BAD_REQUEST,
                "missing_filename",
                self.to_string(),
            ),
            Error::UnsupportedFileType(_) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                self.to_string(),
            ),
            Error::FileParse { filename, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "parse_error",
                format!("Failed to parse '{}': {}", filename, message),
            ),
            Error::NoValidText => (StatusCode::BAD_REQUEST, "empty_document", self.to_string()),
            Error::NoChunks => (StatusCode::BAD_REQUEST, "no_chunks", self.to_string()),
            Error::Embedding(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "embedding_error",
                msg.clone(),
            ),
            Error::VectorDb(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "vector_db_error",
                msg.clone(),
            ),
            Error::Llm(msg) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error", msg.clone()),
            Error::Timeout { .. } => (
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
                self.to_string(),
            ),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "json_error",
                err.to_string(),
            ),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
        };

        if status.is_server_error() {
            tracing::error!("{}: {}", error_type, message);
        } else {
            tracing::warn!("{}: {}", error_type, message);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        for err in [
            Error::MissingFilename,
            Error::UnsupportedFileType("exe".into()),
            Error::NoValidText,
            Error::NoChunks,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_collaborator_errors_map_to_server_errors() {
        for err in [
            Error::embedding("quota"),
            Error::vector_db("unreachable"),
            Error::llm("overloaded"),
            Error::file_parse("a.pdf", "broken xref"),
            Error::Timeout {
                operation: "vector query",
                elapsed: Duration::from_secs(5),
            },
        ] {
            assert!(err.into_response().status().is_server_error());
        }
    }
}
