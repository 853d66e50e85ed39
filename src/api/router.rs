//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Store endpoints are nested under `/api/`; the event WebSocket lives at
//! `/ws/events`. No auth — the service binds to loopback for a single
//! local user.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::websocket;
use crate::state::AppState;

/// Multipart envelope allowance on top of the 10 MiB file cap, so the size
/// check in `validate_upload` is the one that rejects oversized files.
const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

/// Build the full application router.
pub fn api_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/documents", get(endpoints::documents::list))
        .route("/documents/upload", post(endpoints::documents::upload))
        .route(
            "/documents/:id",
            get(endpoints::documents::detail).delete(endpoints::documents::remove),
        )
        .route("/documents/:id/review", post(endpoints::documents::review))
        .route("/documents/:id/draft", patch(endpoints::documents::draft))
        .route(
            "/datasets",
            get(endpoints::datasets::list).post(endpoints::datasets::create),
        )
        .route("/datasets/active", post(endpoints::datasets::select))
        .route(
            "/datasets/:id",
            patch(endpoints::datasets::update).delete(endpoints::datasets::remove),
        )
        .route(
            "/datasets/:id/documents",
            post(endpoints::datasets::tag_documents),
        )
        .route(
            "/datasets/:id/documents/:doc_id",
            delete(endpoints::datasets::untag_document),
        )
        .route(
            "/datasets/:id/duplicate-check",
            post(endpoints::datasets::duplicate_check),
        )
        .route("/extract", post(endpoints::extract::run))
        .route("/export/csv", get(endpoints::export::csv))
        .route("/export/xlsx", get(endpoints::export::xlsx))
        .with_state(state.clone());

    let ws = Router::new()
        .route("/ws/events", get(websocket::ws_upgrade))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(ws)
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
