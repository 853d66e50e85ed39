use serde::{Deserialize, Serialize};

/// Processing lifecycle of an uploaded document.
///
/// Transitions are driven by the upload pipeline and the review-save
/// operation; the store itself does not police them. Early snapshots used a
/// terminal `done` status which later revisions folded into
/// `awaiting_review` — it is still accepted on read but never written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Queued,
    Processing,
    #[serde(alias = "done")]
    AwaitingReview,
    Reviewed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::AwaitingReview => "awaiting_review",
            Self::Reviewed => "reviewed",
            Self::Failed => "failed",
        }
    }

    /// Whether the pipeline is finished with this document, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::AwaitingReview | Self::Reviewed | Self::Failed)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid document status: {0}")]
pub struct InvalidStatus(pub String);

impl std::str::FromStr for DocumentStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "processing" => Ok(Self::Processing),
            "awaiting_review" | "done" => Ok(Self::AwaitingReview),
            "reviewed" => Ok(Self::Reviewed),
            "failed" => Ok(Self::Failed),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}
