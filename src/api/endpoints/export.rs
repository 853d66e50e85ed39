//! Export endpoints — the current view as a downloadable file.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::export;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExportQuery {
    /// Overrides the store's active dataset selector for this request.
    pub dataset_id: Option<Uuid>,
}

/// `GET /api/export/csv` — the current view as delimited text.
pub async fn csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let bytes = {
        let store = state.read()?;
        let documents = match query.dataset_id {
            Some(dataset_id) => store.view(Some(dataset_id)),
            None => store.current_view(),
        };
        export::to_csv(&documents, store.datasets())?
    };

    Ok(download_response(bytes, "text/csv", "leasedesk-export.csv"))
}

/// `GET /api/export/xlsx` — the current view as a spreadsheet.
pub async fn xlsx(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let bytes = {
        let store = state.read()?;
        let documents = match query.dataset_id {
            Some(dataset_id) => store.view(Some(dataset_id)),
            None => store.current_view(),
        };
        export::to_xlsx(&documents, store.datasets())?
    };

    Ok(download_response(
        bytes,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "leasedesk-export.xlsx",
    ))
}

fn download_response(bytes: Vec<u8>, content_type: &'static str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
