//! Dataset endpoints — creation, membership tagging, duplicate checks, and
//! the active view selector.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::models::Dataset;
use crate::state::{AppState, StoreEvent};
use crate::store::DatasetPatch;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetsResponse {
    pub datasets: Vec<Dataset>,
    pub active_dataset_id: Option<Uuid>,
}

/// `GET /api/datasets` — all datasets with their memberships.
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatasetsResponse>, ApiError> {
    let store = state.read()?;
    Ok(Json(DatasetsResponse {
        datasets: store.datasets().to_vec(),
        active_dataset_id: store.active_dataset_id(),
    }))
}

#[derive(Deserialize)]
pub struct CreateDatasetRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatasetResponse {
    pub dataset_id: Uuid,
}

/// `POST /api/datasets` — create an empty dataset. A name colliding
/// case-insensitively with an existing one is rejected with 409.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDatasetRequest>,
) -> Result<(StatusCode, Json<CreateDatasetResponse>), ApiError> {
    let dataset_id = state.mutate(|s| {
        s.create_dataset(&payload.name, payload.description, payload.color)
    })??;
    state.emit(StoreEvent::DatasetCreated {
        dataset_id,
        name: payload.name.trim().to_string(),
    });

    tracing::info!(dataset_id = %dataset_id, name = %payload.name.trim(), "Dataset created");
    Ok((StatusCode::CREATED, Json(CreateDatasetResponse { dataset_id })))
}

#[derive(Deserialize)]
pub struct UpdateDatasetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

/// `PATCH /api/datasets/:id` — partial update; renames go through the same
/// collision check as creation.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDatasetRequest>,
) -> Result<StatusCode, ApiError> {
    let patch = DatasetPatch {
        name: payload.name,
        description: payload.description,
        color: payload.color,
        categories: payload.categories,
    };
    state.mutate(|s| s.update_dataset(id, patch))??;
    state.emit(StoreEvent::DatasetUpdated { dataset_id: id });
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/datasets/:id` — remove the dataset and unlink its members.
/// Always 204; unknown ids are a no-op.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.mutate(|s| s.delete_dataset(id))?;
    state.emit(StoreEvent::DatasetDeleted { dataset_id: id });
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub dataset_id: Option<Uuid>,
}

/// `POST /api/datasets/active` — set the view selector (`null` selects the
/// all-documents view). Selecting an unknown id falls back to `null`.
pub async fn select(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectRequest>,
) -> Result<StatusCode, ApiError> {
    let active = state.mutate(|s| {
        s.select_dataset(payload.dataset_id);
        s.active_dataset_id()
    })?;
    state.emit(StoreEvent::ActiveDatasetChanged {
        dataset_id: active,
    });
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    pub document_ids: Vec<Uuid>,
}

/// `POST /api/datasets/:id/documents` — tag every listed document into the
/// dataset. Duplicate ids collapse; unknown document ids are skipped.
pub async fn tag_documents(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TagRequest>,
) -> Result<StatusCode, ApiError> {
    let tagged = state.mutate(|s| {
        if s.dataset(id).is_none() {
            return false;
        }
        s.bulk_tag(id, &payload.document_ids);
        true
    })?;
    if !tagged {
        return Err(ApiError::NotFound(format!("Dataset not found: {id}")));
    }
    state.emit(StoreEvent::MembershipChanged { dataset_id: id });
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/datasets/:id/documents/:doc_id` — remove one membership
/// edge. Removing an absent edge is a no-op, so this always returns 204.
pub async fn untag_document(
    State(state): State<Arc<AppState>>,
    Path((id, doc_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state.mutate(|s| s.untag_document(id, doc_id))?;
    state.emit(StoreEvent::MembershipChanged { dataset_id: id });
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheckResponse {
    pub duplicates: Vec<Uuid>,
}

/// `POST /api/datasets/:id/duplicate-check` — which of the candidates are
/// already present in the dataset by filename? Pure read.
pub async fn duplicate_check(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TagRequest>,
) -> Result<Json<DuplicateCheckResponse>, ApiError> {
    let store = state.read()?;
    if store.dataset(id).is_none() {
        return Err(ApiError::NotFound(format!("Dataset not found: {id}")));
    }
    Ok(Json(DuplicateCheckResponse {
        duplicates: store.detect_duplicates(id, &payload.document_ids),
    }))
}
