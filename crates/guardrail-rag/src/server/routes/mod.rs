//! API routes for the RAG server

pub mod documents;
pub mod query;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::server::state::AppState;
use crate::types::FileType;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .nest("/documents", document_routes(max_upload_size))
        .route("/info", get(info))
}

fn document_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload - with larger body limit for files
        .route(
            "/upload",
            post(documents::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/query", post(query::query_documents))
        .route("/vectors/stats", get(documents::index_stats))
        .route("/vectors/delete-all", delete(documents::delete_all_vectors))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<Value> {
    let rails = &state.config().guard_rails;
    Json(json!({
        "name": "guardrail-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document Q&A with similarity, genericness and confidence guard rails",
        "chat_model": state.chat_model(),
        "supported_types": FileType::SUPPORTED_EXTENSIONS,
        "defaults": {
            "max_results": rails.default_max_results,
            "similarity_threshold": rails.default_similarity_threshold,
        },
        "endpoints": {
            "POST /api/documents/upload": "Upload and index one file (multipart field 'file')",
            "POST /api/documents/query": "Ask a question over indexed documents",
            "GET /api/documents/vectors/stats": "Index statistics",
            "DELETE /api/documents/vectors/delete-all": "Remove every vector from the index"
        }
    }))
}
