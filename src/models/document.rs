use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DocumentStatus;
use super::extracted::ExtractedData;

/// One uploaded file plus its processing status and extracted data.
///
/// `dataset_ids` is the document side of the many-to-many membership
/// relation. Invariant: `d.dataset_ids` contains `s.id` exactly when
/// `s.document_ids` contains `d.id`. Only the store mutates either side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub status: DocumentStatus,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<ExtractedData>,
    /// 0–100, set together with `extracted_data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u8>,
    #[serde(default)]
    pub is_reviewed: bool,
    /// Review-draft flag. Logically ephemeral UI state, persisted with the
    /// rest of the document for simplicity.
    #[serde(default)]
    pub has_unsaved_changes: bool,
    #[serde(default)]
    pub dataset_ids: BTreeSet<Uuid>,
}

impl Document {
    /// Freshly registered document: status `queued`, nothing extracted yet.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            status: DocumentStatus::Queued,
            uploaded_at: Utc::now(),
            processed_at: None,
            error: None,
            extracted_data: None,
            quality_score: None,
            is_reviewed: false,
            has_unsaved_changes: false,
            dataset_ids: BTreeSet::new(),
        }
    }

    /// Case-insensitive filename comparison, used by duplicate detection.
    pub fn filename_matches(&self, other: &str) -> bool {
        self.filename.eq_ignore_ascii_case(other)
    }
}
