//! Document endpoints — listing, upload intake, review, deletion.
//!
//! `POST /api/documents/upload` is the start of the per-file pipeline: the
//! document is registered first (status `queued`, dataset memberships
//! applied), then request validation runs, then extraction is spawned as an
//! independent task. A validation failure therefore leaves a `failed`
//! document behind, so the rejection stays visible in the document list.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::models::{Document, DocumentStatus, ExtractedData};
use crate::pipeline::{self, validate_upload, UploadValidationError};
use crate::state::{AppState, StoreEvent};

#[derive(Deserialize)]
pub struct ListQuery {
    /// Overrides the store's active dataset selector for this request.
    pub dataset_id: Option<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsResponse {
    pub documents: Vec<Document>,
    pub active_dataset_id: Option<Uuid>,
}

/// `GET /api/documents` — the view projection: all documents, or only the
/// members of the requested (or active) dataset.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let store = state.read()?;
    let documents = match query.dataset_id {
        Some(dataset_id) => store.view(Some(dataset_id)),
        None => store.current_view(),
    };

    Ok(Json(DocumentsResponse {
        documents: documents.into_iter().cloned().collect(),
        active_dataset_id: store.active_dataset_id(),
    }))
}

/// `GET /api/documents/:id` — single document detail.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    let store = state.read()?;
    store
        .document(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Document not found: {id}")))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub document_id: Uuid,
    pub filename: String,
    pub size: u64,
}

/// `POST /api/documents/upload` — multipart intake of one PDF.
///
/// Expects a `file` part and zero or more `dataset_id` text parts. Returns
/// the registered document id; extraction continues in the background.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<(String, Option<String>, u64)> = None;
    let mut dataset_ids: Vec<Uuid> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().map(ToString::to_string);
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
                let Some(filename) = filename.filter(|f| !f.is_empty()) else {
                    return Err(ApiError::BadRequest(
                        UploadValidationError::NoFile.to_string(),
                    ));
                };
                file = Some((filename, content_type, bytes.len() as u64));
            }
            Some("dataset_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {e}")))?;
                let id = Uuid::parse_str(text.trim())
                    .map_err(|e| ApiError::BadRequest(format!("Invalid dataset id: {e}")))?;
                dataset_ids.push(id);
            }
            _ => {}
        }
    }

    let Some((filename, content_type, size)) = file else {
        return Err(ApiError::BadRequest(
            UploadValidationError::NoFile.to_string(),
        ));
    };

    let document_id = state.mutate(|s| s.register_document(&filename, &dataset_ids))?;
    state.emit(StoreEvent::DocumentRegistered {
        document_id,
        filename: filename.clone(),
    });

    if let Err(e) = validate_upload(&filename, content_type.as_deref(), size) {
        if let Ok(Ok(())) = state.mutate(|s| {
            s.update_status(document_id, DocumentStatus::Failed, Some(e.to_string()))
        }) {
            state.emit(StoreEvent::StatusChanged {
                document_id,
                status: DocumentStatus::Failed,
            });
        }
        return Err(ApiError::BadRequest(e.to_string()));
    }

    tracing::info!(
        document_id = %document_id,
        file = %filename,
        size_kb = size / 1024,
        "Upload accepted, extraction queued"
    );

    tokio::spawn(pipeline::process_document(
        Arc::clone(&state),
        document_id,
        filename.clone(),
    ));

    Ok(Json(UploadResponse {
        document_id,
        filename,
        size,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub extracted_data: ExtractedData,
}

/// `POST /api/documents/:id/review` — store corrected fields and finalize
/// the review.
pub async fn review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<Document>, ApiError> {
    state.mutate(|s| s.save_review(id, payload.extracted_data))??;
    state.emit(StoreEvent::ReviewSaved { document_id: id });

    let store = state.read()?;
    let doc = store
        .document(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Document not found: {id}")))?;

    tracing::info!(document_id = %id, "Review saved");
    Ok(Json(doc))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    pub has_unsaved_changes: bool,
}

/// `PATCH /api/documents/:id/draft` — review-draft flag.
pub async fn draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DraftRequest>,
) -> Result<StatusCode, ApiError> {
    state.mutate(|s| s.set_unsaved_changes(id, payload.has_unsaved_changes))??;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/documents/:id` — cascade delete. Deleting an unknown id is
/// a no-op, so this always returns 204.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.mutate(|s| s.delete_document(id))?;
    state.emit(StoreEvent::DocumentDeleted { document_id: id });
    Ok(StatusCode::NO_CONTENT)
}
