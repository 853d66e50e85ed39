use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined, named group of documents.
///
/// Names are unique case-insensitively across the store. `document_ids` is
/// the dataset side of the membership relation — see
/// [`Document`](super::Document) for the invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub document_ids: BTreeSet<Uuid>,
    /// Cosmetic UI grouping tags; no invariant attached.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl Dataset {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        color: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            color,
            created_at: Utc::now(),
            document_ids: BTreeSet::new(),
            categories: Vec::new(),
        }
    }

    /// Case-insensitive name comparison, used for duplicate-name rejection.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_dataset_is_empty() {
        let ds = Dataset::new("Leases 2024", None, Some("#2563eb".into()));
        assert!(ds.document_ids.is_empty());
        assert!(ds.categories.is_empty());
        assert_eq!(ds.color.as_deref(), Some("#2563eb"));
    }

    #[test]
    fn name_match_ignores_case_and_padding() {
        let ds = Dataset::new("Leases", None, None);
        assert!(ds.name_matches("LEASES"));
        assert!(ds.name_matches("  leases "));
        assert!(!ds.name_matches("Leases 2024"));
    }

    #[test]
    fn wire_format_is_camel_case() {
        let ds = Dataset::new("Leases", None, None);
        let json = serde_json::to_value(&ds).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("documentIds").is_some());
        assert!(json.get("description").is_none());
        assert!(json.get("categories").is_none());
    }
}
