//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub document_count: usize,
    pub dataset_count: usize,
}

/// `GET /api/health` — connection check for the UI.
pub async fn check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let store = state.read()?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        document_count: store.documents().len(),
        dataset_count: store.datasets().len(),
    }))
}
