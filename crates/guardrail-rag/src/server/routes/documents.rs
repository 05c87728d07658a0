//! Document upload and index maintenance endpoints

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::ingestion::FileParser;
use crate::server::state::AppState;
use crate::types::{DeleteAllReport, DocumentResponse, IndexStatsReport};

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

/// POST /api/documents/upload - Upload and index one file
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>)> {
    let start = Instant::now();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Internal(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => return Err(Error::MissingFilename),
        };
        let file_type = FileParser::detect(&filename)?;
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| file_type.content_type().to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("Failed to read file data: {}", e)))?;
        let size_bytes = data.len();

        tracing::info!("Upload: {} ({} bytes)", filename, size_bytes);

        let report = state.ingest().ingest(&filename, data.to_vec()).await?;

        tracing::info!(
            "Processed {} in {}ms",
            filename,
            start.elapsed().as_millis()
        );

        return Ok((
            StatusCode::CREATED,
            Json(DocumentResponse::from_report(
                report,
                Some(content_type),
                size_bytes,
            )),
        ));
    }

    Err(Error::MissingFilename)
}

/// GET /api/documents/vectors/stats - Index statistics
pub async fn index_stats(State(state): State<AppState>) -> Result<Json<IndexStatsReport>> {
    Ok(Json(state.maintenance().stats().await?))
}

/// DELETE /api/documents/vectors/delete-all - Remove every vector
pub async fn delete_all_vectors(State(state): State<AppState>) -> Result<Json<DeleteAllReport>> {
    Ok(Json(state.maintenance().delete_all().await?))
}
