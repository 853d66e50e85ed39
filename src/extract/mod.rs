//! Extraction seam — the contract downstream code depends on.
//!
//! The shipped implementation ([`MockExtractor`]) synthesizes plausible
//! lease data; a real document-understanding backend would implement the
//! same trait. Tests inject their own deterministic fakes.

pub mod mock;

pub use mock::MockExtractor;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::ExtractedData;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The flaky-service failure path. The message is part of the endpoint
    /// contract and is surfaced verbatim to clients and into the document's
    /// `error` field.
    #[error("Extraction failed: Please upload again")]
    Failed,
}

/// Successful extraction output.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub data: ExtractedData,
    /// Overall quality indicator, 0–100.
    pub quality_score: u8,
    pub processed_at: DateTime<Utc>,
}

/// A document-understanding backend: filename and id in, structured record
/// or error out, with realistic latency.
///
/// The filename is accepted for parity with the real contract; the mock
/// ignores its content.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, document_id: Uuid, filename: &str)
        -> Result<Extraction, ExtractError>;
}
