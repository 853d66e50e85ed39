//! Upload pipeline — request validation plus per-file orchestration.
//!
//! Each uploaded file runs its own task: mark `processing`, call the
//! extractor, write the result back. Files are fully independent — a
//! failure in one never affects another, and there is no cancellation once
//! a file has started. Store writes for a single document are sequentially
//! awaited, so no document ever sees out-of-order status updates.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::DocumentStatus;
use crate::state::{AppState, StoreEvent};

/// Maximum accepted upload size (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// The only accepted content type.
pub const ALLOWED_MIME: &str = "application/pdf";

/// Request-level upload rejection. Messages are surfaced verbatim to the
/// client.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UploadValidationError {
    #[error("No file provided")]
    NoFile,

    #[error("Only PDF files are allowed")]
    WrongType,

    #[error("File size exceeds maximum allowed size of 10MB")]
    TooLarge,

    #[error("File must have .pdf extension")]
    WrongExtension,
}

/// Stateless request checks: declared content type, size cap, extension.
///
/// When the client did not declare a content type, the filename's guessed
/// type stands in for it, so a bare `curl` upload of `lease.pdf` still
/// passes.
pub fn validate_upload(
    filename: &str,
    content_type: Option<&str>,
    size: u64,
) -> Result<(), UploadValidationError> {
    match content_type {
        Some(declared) => {
            if declared != ALLOWED_MIME {
                return Err(UploadValidationError::WrongType);
            }
        }
        None => {
            let guessed = mime_guess::from_path(filename).first_or_octet_stream();
            if guessed.essence_str() != ALLOWED_MIME {
                return Err(UploadValidationError::WrongType);
            }
        }
    }

    if size > MAX_FILE_SIZE {
        return Err(UploadValidationError::TooLarge);
    }

    if !filename.to_ascii_lowercase().ends_with(".pdf") {
        return Err(UploadValidationError::WrongExtension);
    }

    Ok(())
}

/// Run one registered document through extraction.
///
/// Spawned per file by the upload endpoint. A document deleted while its
/// extraction is in flight shows up as `NotFound` on the write-back; that
/// is an already-converged state, logged and ignored.
pub async fn process_document(state: Arc<AppState>, document_id: Uuid, filename: String) {
    set_status(&state, document_id, DocumentStatus::Processing, None);

    let extractor = state.extractor();
    match extractor.extract(document_id, &filename).await {
        Ok(extraction) => {
            let quality_score = extraction.quality_score;
            let written = state.mutate(|s| {
                s.attach_extracted_data(document_id, extraction.data, quality_score)
            });
            match written {
                Ok(Ok(())) => {
                    state.emit(StoreEvent::DataExtracted {
                        document_id,
                        quality_score,
                    });
                }
                Ok(Err(e)) => {
                    tracing::debug!(
                        document_id = %document_id,
                        error = %e,
                        "Dropping extraction result for vanished document"
                    );
                }
                Err(e) => tracing::error!(error = %e, "State unavailable during write-back"),
            }
        }
        Err(e) => {
            tracing::warn!(
                document_id = %document_id,
                file = %filename,
                error = %e,
                "Extraction failed"
            );
            set_status(
                &state,
                document_id,
                DocumentStatus::Failed,
                Some(e.to_string()),
            );
        }
    }
}

fn set_status(state: &AppState, document_id: Uuid, status: DocumentStatus, error: Option<String>) {
    match state.mutate(|s| s.update_status(document_id, status, error)) {
        Ok(Ok(())) => state.emit(StoreEvent::StatusChanged {
            document_id,
            status,
        }),
        Ok(Err(e)) => {
            tracing::debug!(
                document_id = %document_id,
                error = %e,
                "Ignoring status write for vanished document"
            );
        }
        Err(e) => tracing::error!(error = %e, "State unavailable during status write"),
    }
}
