//! Guard-railed query endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResult};

/// POST /api/documents/query - Answer a question from indexed documents
pub async fn query_documents(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResult>> {
    let start = Instant::now();

    tracing::info!("Query: \"{}\"", request.query.trim());

    let result = state.engine().query(&request).await?;

    tracing::info!(
        "Query completed in {}ms (confidence: {}, guard rail: {})",
        start.elapsed().as_millis(),
        result.confidence,
        result
            .guard_rail_triggered
            .map(|g| g.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(Json(result))
}
