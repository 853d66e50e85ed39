//! Extraction endpoint — the stateless collaborator surface.
//!
//! Mirrors the contract the upload pipeline depends on: document id and
//! filename in, structured record or failure out, with the extractor's own
//! latency. It does not touch the store — the pipeline feeds results back
//! itself.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::models::ExtractedData;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    #[serde(default)]
    pub document_id: Option<Uuid>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub document_id: Uuid,
    pub extracted_data: ExtractedData,
    pub quality_score: u8,
    pub processed_at: DateTime<Utc>,
}

/// `POST /api/extract` — run the extractor for one document.
///
/// Both fields are required; a simulated failure surfaces as a 500 with the
/// canonical message.
pub async fn run(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let document_id = payload
        .document_id
        .ok_or_else(|| ApiError::BadRequest("Document ID is required".into()))?;
    let filename = payload
        .filename
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Filename is required".into()))?;

    tracing::info!(document_id = %document_id, file = %filename, "Processing extraction request");

    let extraction = state
        .extractor()
        .extract(document_id, &filename)
        .await
        .map_err(|e| ApiError::ExtractionFailed(e.to_string()))?;

    Ok(Json(ExtractResponse {
        document_id,
        extracted_data: extraction.data,
        quality_score: extraction.quality_score,
        processed_at: extraction.processed_at,
    }))
}
