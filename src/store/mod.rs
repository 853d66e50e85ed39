//! Document/dataset store — the single authoritative container for uploaded
//! documents, user-defined datasets, and the active view selector.
//!
//! The store owns both sides of the many-to-many membership relation
//! (`Document.dataset_ids` / `Dataset.document_ids`). All mutations go
//! through methods here, each of which updates both projections together, so
//! callers can never observe a half-applied membership edge.
//!
//! Failure semantics: user-triggered edge cases (tagging an already-tagged
//! document, deleting an unknown id) are defined as no-ops, not errors. Only
//! operations that would violate an invariant — creating a dataset whose
//! name collides case-insensitively with an existing one — are rejected.

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotError};

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Dataset, Document, DocumentStatus, ExtractedData};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(Uuid),

    #[error("A dataset named '{0}' already exists")]
    DuplicateName(String),

    #[error("Dataset name must not be empty")]
    EmptyName,
}

/// Partial update for [`DocumentStore::update_dataset`]. `None` fields are
/// left untouched.
#[derive(Debug, Default, Clone)]
pub struct DatasetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub categories: Option<Vec<String>>,
}

/// In-memory state: insertion-ordered documents and datasets plus the
/// nullable view selector (`None` = "all documents").
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    datasets: Vec<Dataset>,
    active_dataset_id: Option<Uuid>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted parts.
    ///
    /// The documents' `dataset_ids` are authoritative: every dataset's
    /// `document_ids` is rebuilt from them, and document references to
    /// datasets that no longer exist are pruned. This makes a desynchronized
    /// snapshot impossible to load — the relation is consistent by
    /// construction.
    pub fn restore(
        mut documents: Vec<Document>,
        mut datasets: Vec<Dataset>,
        active_dataset_id: Option<Uuid>,
    ) -> Self {
        for dataset in &mut datasets {
            dataset.document_ids.clear();
        }
        for doc in &mut documents {
            doc.dataset_ids.retain(|dataset_id| {
                match datasets.iter_mut().find(|d| d.id == *dataset_id) {
                    Some(dataset) => {
                        dataset.document_ids.insert(doc.id);
                        true
                    }
                    None => {
                        tracing::warn!(
                            document_id = %doc.id,
                            dataset_id = %dataset_id,
                            "Pruned reference to missing dataset while restoring snapshot"
                        );
                        false
                    }
                }
            });
        }

        let active_dataset_id =
            active_dataset_id.filter(|id| datasets.iter().any(|d| d.id == *id));

        Self {
            documents,
            datasets,
            active_dataset_id,
        }
    }

    // ── Document lifecycle ──────────────────────────────────

    /// Register a freshly uploaded file with status `queued` and link it
    /// into the named datasets. Unknown dataset ids are dropped from the
    /// membership rather than failing the call — registration itself always
    /// succeeds.
    pub fn register_document(&mut self, filename: &str, dataset_ids: &[Uuid]) -> Uuid {
        let mut doc = Document::new(filename);

        for dataset_id in dataset_ids {
            match self.datasets.iter_mut().find(|d| d.id == *dataset_id) {
                Some(dataset) => {
                    dataset.document_ids.insert(doc.id);
                    doc.dataset_ids.insert(*dataset_id);
                }
                None => {
                    tracing::warn!(
                        filename = %filename,
                        dataset_id = %dataset_id,
                        "Dropping unknown dataset id at registration"
                    );
                }
            }
        }

        let id = doc.id;
        self.documents.push(doc);
        id
    }

    /// Overwrite a document's status and error message. Passing `None`
    /// clears any previous error. The store does not police transition
    /// legality — the pipeline and review-save are the only writers and own
    /// the ordering.
    pub fn update_status(
        &mut self,
        id: Uuid,
        status: DocumentStatus,
        error: Option<String>,
    ) -> Result<(), StoreError> {
        let doc = self.document_mut(id)?;
        doc.status = status;
        doc.error = error;
        Ok(())
    }

    /// Attach extraction output, overwriting any prior result, and force the
    /// document into `awaiting_review`.
    pub fn attach_extracted_data(
        &mut self,
        id: Uuid,
        data: ExtractedData,
        quality_score: u8,
    ) -> Result<(), StoreError> {
        let doc = self.document_mut(id)?;
        doc.extracted_data = Some(data);
        doc.quality_score = Some(quality_score);
        doc.processed_at = Some(Utc::now());
        doc.status = DocumentStatus::AwaitingReview;
        doc.error = None;
        Ok(())
    }

    /// Store user-corrected fields and finalize the review. This is the only
    /// path into `reviewed`. The quality score and `processed_at` keep their
    /// extraction-time values — the review corrects fields, it does not
    /// re-extract.
    pub fn save_review(&mut self, id: Uuid, edited: ExtractedData) -> Result<(), StoreError> {
        let doc = self.document_mut(id)?;
        doc.extracted_data = Some(edited);
        doc.status = DocumentStatus::Reviewed;
        doc.is_reviewed = true;
        doc.has_unsaved_changes = false;
        doc.error = None;
        Ok(())
    }

    /// Mark or clear the review-draft flag.
    pub fn set_unsaved_changes(&mut self, id: Uuid, has_changes: bool) -> Result<(), StoreError> {
        self.document_mut(id)?.has_unsaved_changes = has_changes;
        Ok(())
    }

    /// Remove a document and cascade it out of every dataset it belongs to.
    /// Unknown ids are a no-op — a concurrent delete racing an in-flight
    /// pipeline is expected and harmless.
    pub fn delete_document(&mut self, id: Uuid) {
        let Some(index) = self.documents.iter().position(|d| d.id == id) else {
            return;
        };
        let doc = self.documents.remove(index);
        for dataset_id in &doc.dataset_ids {
            if let Some(dataset) = self.datasets.iter_mut().find(|d| d.id == *dataset_id) {
                dataset.document_ids.remove(&id);
            }
        }
    }

    // ── Datasets ────────────────────────────────────────────

    /// Create an empty dataset. Names are compared case-insensitively
    /// against every existing dataset; collisions are rejected, not merged.
    pub fn create_dataset(
        &mut self,
        name: &str,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Uuid, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.datasets.iter().any(|d| d.name_matches(name)) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }

        let dataset = Dataset::new(name, description, color);
        let id = dataset.id;
        self.datasets.push(dataset);
        Ok(id)
    }

    /// Apply a partial update. Renames go through the same case-insensitive
    /// collision check as creation (excluding the dataset itself).
    pub fn update_dataset(&mut self, id: Uuid, patch: DatasetPatch) -> Result<(), StoreError> {
        if let Some(new_name) = &patch.name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(StoreError::EmptyName);
            }
            if self
                .datasets
                .iter()
                .any(|d| d.id != id && d.name_matches(new_name))
            {
                return Err(StoreError::DuplicateName(new_name.to_string()));
            }
        }

        let dataset = self
            .datasets
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::DatasetNotFound(id))?;

        if let Some(name) = patch.name {
            dataset.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            dataset.description = Some(description);
        }
        if let Some(color) = patch.color {
            dataset.color = Some(color);
        }
        if let Some(categories) = patch.categories {
            dataset.categories = categories;
        }
        Ok(())
    }

    /// Remove a dataset and unlink it from every member document (the
    /// inverse of the document-delete cascade). If it was the active view
    /// selector, the view falls back to "all documents". Unknown ids are a
    /// no-op.
    pub fn delete_dataset(&mut self, id: Uuid) {
        let Some(index) = self.datasets.iter().position(|d| d.id == id) else {
            return;
        };
        let dataset = self.datasets.remove(index);
        for doc_id in &dataset.document_ids {
            if let Some(doc) = self.documents.iter_mut().find(|d| d.id == *doc_id) {
                doc.dataset_ids.remove(&id);
            }
        }
        if self.active_dataset_id == Some(id) {
            self.active_dataset_id = None;
        }
    }

    /// Set the view selector. Purely a filter — membership is untouched.
    /// Selecting an id that does not exist falls back to the all-documents
    /// view.
    pub fn select_dataset(&mut self, id: Option<Uuid>) {
        self.active_dataset_id = id.filter(|id| self.datasets.iter().any(|d| d.id == *id));
    }

    // ── Membership edges ────────────────────────────────────

    /// Idempotently add one membership edge, updating both sides together.
    /// Unknown dataset or document ids are a no-op.
    pub fn tag_document(&mut self, dataset_id: Uuid, document_id: Uuid) {
        let Some(dataset) = self.datasets.iter_mut().find(|d| d.id == dataset_id) else {
            return;
        };
        let Some(doc) = self.documents.iter_mut().find(|d| d.id == document_id) else {
            return;
        };
        dataset.document_ids.insert(document_id);
        doc.dataset_ids.insert(dataset_id);
    }

    /// Idempotently remove one membership edge; removing an absent edge is a
    /// no-op.
    pub fn untag_document(&mut self, dataset_id: Uuid, document_id: Uuid) {
        if let Some(dataset) = self.datasets.iter_mut().find(|d| d.id == dataset_id) {
            dataset.document_ids.remove(&document_id);
        }
        if let Some(doc) = self.documents.iter_mut().find(|d| d.id == document_id) {
            doc.dataset_ids.remove(&dataset_id);
        }
    }

    /// Tag every listed document. Duplicates in the input collapse naturally
    /// because membership is set-valued.
    pub fn bulk_tag(&mut self, dataset_id: Uuid, document_ids: &[Uuid]) {
        for document_id in document_ids {
            self.tag_document(dataset_id, *document_id);
        }
    }

    /// Subset of `candidates` whose filename already matches (case-
    /// insensitively) a document in the target dataset. Pure read.
    ///
    /// Filename-only matching: two distinct documents with the same name are
    /// indistinguishable here. Known limitation, kept deliberately.
    pub fn detect_duplicates(&self, dataset_id: Uuid, candidates: &[Uuid]) -> Vec<Uuid> {
        let Some(dataset) = self.datasets.iter().find(|d| d.id == dataset_id) else {
            return Vec::new();
        };
        let member_names: Vec<&str> = dataset
            .document_ids
            .iter()
            .filter_map(|id| self.document(*id))
            .map(|d| d.filename.as_str())
            .collect();

        let mut seen = std::collections::BTreeSet::new();
        candidates
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| self.document(*id))
            .filter(|doc| member_names.iter().any(|name| doc.filename_matches(name)))
            .map(|doc| doc.id)
            .collect()
    }

    // ── Reads ───────────────────────────────────────────────

    /// The derived view: all documents when `active` is `None`, otherwise
    /// only members of that dataset. Always a live filter over `documents`,
    /// never separate state.
    pub fn view(&self, active: Option<Uuid>) -> Vec<&Document> {
        match active {
            None => self.documents.iter().collect(),
            Some(dataset_id) => self
                .documents
                .iter()
                .filter(|d| d.dataset_ids.contains(&dataset_id))
                .collect(),
        }
    }

    /// The view for the store's own selector.
    pub fn current_view(&self) -> Vec<&Document> {
        self.view(self.active_dataset_id)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn document(&self, id: Uuid) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn dataset(&self, id: Uuid) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn active_dataset_id(&self) -> Option<Uuid> {
        self.active_dataset_id
    }

    fn document_mut(&mut self, id: Uuid) -> Result<&mut Document, StoreError> {
        self.documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::DocumentNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> ExtractedData {
        ExtractedData {
            name: "Max".into(),
            surname: "Müller".into(),
            address_street: "Gartenstraße".into(),
            address_house_number: "7".into(),
            address_zip_code: "10115".into(),
            address_city: "Berlin".into(),
            warm_rent: 1100,
            cold_rent: 900,
            rent_increase_type: "Staffelmiete".into(),
            date: chrono::NaiveDate::from_ymd_opt(2021, 9, 1).unwrap(),
            is_active: true,
            deposit: None,
            contract_term_months: Some(24),
            notice_period_months: None,
            landlord_entity: Some("Hausverwaltung GmbH".into()),
            confidence: None,
        }
    }

    /// The bidirectional membership invariant, checked exhaustively:
    /// `d.dataset_ids.contains(s.id) ⟺ s.document_ids.contains(d.id)`.
    fn assert_membership_consistent(store: &DocumentStore) {
        for doc in store.documents() {
            for dataset_id in &doc.dataset_ids {
                let dataset = store
                    .dataset(*dataset_id)
                    .expect("document references a dataset that does not exist");
                assert!(
                    dataset.document_ids.contains(&doc.id),
                    "dataset {} missing back-reference to document {}",
                    dataset.name,
                    doc.filename
                );
            }
        }
        for dataset in store.datasets() {
            for doc_id in &dataset.document_ids {
                let doc = store
                    .document(*doc_id)
                    .expect("dataset references a document that does not exist");
                assert!(
                    doc.dataset_ids.contains(&dataset.id),
                    "document {} missing back-reference to dataset {}",
                    doc.filename,
                    dataset.name
                );
            }
        }
    }

    #[test]
    fn register_links_both_sides() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        let id = store.register_document("lease.pdf", &[ds]);

        let doc = store.document(id).unwrap();
        assert_eq!(doc.status, DocumentStatus::Queued);
        assert!(doc.dataset_ids.contains(&ds));
        assert!(store.dataset(ds).unwrap().document_ids.contains(&id));
        assert_membership_consistent(&store);
    }

    #[test]
    fn register_drops_unknown_dataset_ids_but_still_succeeds() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        let phantom = Uuid::new_v4();
        let id = store.register_document("lease.pdf", &[ds, phantom]);

        let doc = store.document(id).unwrap();
        assert_eq!(doc.dataset_ids.len(), 1);
        assert!(doc.dataset_ids.contains(&ds));
        assert_membership_consistent(&store);
    }

    #[test]
    fn update_status_overwrites_and_clears_error() {
        let mut store = DocumentStore::new();
        let id = store.register_document("lease.pdf", &[]);

        store
            .update_status(id, DocumentStatus::Failed, Some("boom".into()))
            .unwrap();
        assert_eq!(store.document(id).unwrap().error.as_deref(), Some("boom"));

        store
            .update_status(id, DocumentStatus::Processing, None)
            .unwrap();
        let doc = store.document(id).unwrap();
        assert_eq!(doc.status, DocumentStatus::Processing);
        assert!(doc.error.is_none());
    }

    #[test]
    fn update_status_unknown_id_is_reported() {
        let mut store = DocumentStore::new();
        let err = store
            .update_status(Uuid::new_v4(), DocumentStatus::Failed, None)
            .unwrap_err();
        assert!(matches!(err, StoreError::DocumentNotFound(_)));
    }

    #[test]
    fn attach_then_review_progression() {
        let mut store = DocumentStore::new();
        let id = store.register_document("lease.pdf", &[]);

        store.attach_extracted_data(id, sample_data(), 88).unwrap();
        let doc = store.document(id).unwrap();
        assert_eq!(doc.status, DocumentStatus::AwaitingReview);
        assert!(doc.extracted_data.is_some());
        assert_eq!(doc.quality_score, Some(88));
        assert!(doc.processed_at.is_some());
        assert!(!doc.is_reviewed);

        let mut edited = sample_data();
        edited.cold_rent = 950;
        store.set_unsaved_changes(id, true).unwrap();
        store.save_review(id, edited).unwrap();

        let doc = store.document(id).unwrap();
        assert_eq!(doc.status, DocumentStatus::Reviewed);
        assert!(doc.is_reviewed);
        assert!(!doc.has_unsaved_changes);
        assert_eq!(doc.extracted_data.as_ref().unwrap().cold_rent, 950);
        // Review does not re-extract
        assert_eq!(doc.quality_score, Some(88));
    }

    #[test]
    fn attach_overwrites_prior_data_unconditionally() {
        let mut store = DocumentStore::new();
        let id = store.register_document("lease.pdf", &[]);

        store.attach_extracted_data(id, sample_data(), 70).unwrap();
        let mut second = sample_data();
        second.warm_rent = 1234;
        store.attach_extracted_data(id, second, 95).unwrap();

        let doc = store.document(id).unwrap();
        assert_eq!(doc.extracted_data.as_ref().unwrap().warm_rent, 1234);
        assert_eq!(doc.quality_score, Some(95));
    }

    #[test]
    fn attach_clears_a_previous_failure() {
        let mut store = DocumentStore::new();
        let id = store.register_document("lease.pdf", &[]);
        store
            .update_status(id, DocumentStatus::Failed, Some("flaky".into()))
            .unwrap();

        store.attach_extracted_data(id, sample_data(), 80).unwrap();
        let doc = store.document(id).unwrap();
        assert_eq!(doc.status, DocumentStatus::AwaitingReview);
        assert!(doc.error.is_none());
    }

    #[test]
    fn duplicate_dataset_name_rejected_case_insensitively() {
        let mut store = DocumentStore::new();
        store.create_dataset("Leases", None, None).unwrap();

        let err = store.create_dataset("leases", None, None).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
        let err = store.create_dataset("  LEASES ", None, None).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
        assert_eq!(store.datasets().len(), 1);
    }

    #[test]
    fn blank_dataset_name_rejected() {
        let mut store = DocumentStore::new();
        assert!(matches!(
            store.create_dataset("   ", None, None),
            Err(StoreError::EmptyName)
        ));
        assert!(store.datasets().is_empty());
    }

    #[test]
    fn rename_collision_rejected_but_self_rename_allowed() {
        let mut store = DocumentStore::new();
        let a = store.create_dataset("Leases", None, None).unwrap();
        store.create_dataset("Archive", None, None).unwrap();

        let err = store
            .update_dataset(
                a,
                DatasetPatch {
                    name: Some("ARCHIVE".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));

        // Renaming to a different casing of itself is fine
        store
            .update_dataset(
                a,
                DatasetPatch {
                    name: Some("LEASES".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(store.dataset(a).unwrap().name, "LEASES");
    }

    #[test]
    fn tagging_is_idempotent() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        let id = store.register_document("lease.pdf", &[]);

        store.tag_document(ds, id);
        store.tag_document(ds, id);
        assert_eq!(store.dataset(ds).unwrap().document_ids.len(), 1);
        assert_eq!(store.document(id).unwrap().dataset_ids.len(), 1);

        store.untag_document(ds, id);
        store.untag_document(ds, id);
        assert!(store.dataset(ds).unwrap().document_ids.is_empty());
        assert!(store.document(id).unwrap().dataset_ids.is_empty());
        assert_membership_consistent(&store);
    }

    #[test]
    fn tagging_unknown_ids_is_a_no_op() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        let id = store.register_document("lease.pdf", &[]);

        store.tag_document(Uuid::new_v4(), id);
        store.tag_document(ds, Uuid::new_v4());
        assert!(store.document(id).unwrap().dataset_ids.is_empty());
        assert!(store.dataset(ds).unwrap().document_ids.is_empty());
    }

    #[test]
    fn bulk_tag_collapses_duplicates() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        let a = store.register_document("a.pdf", &[]);
        let b = store.register_document("b.pdf", &[]);

        store.bulk_tag(ds, &[a, b, a, a]);
        assert_eq!(store.dataset(ds).unwrap().document_ids.len(), 2);
        assert_membership_consistent(&store);
    }

    #[test]
    fn delete_document_cascades_out_of_every_dataset() {
        let mut store = DocumentStore::new();
        let ds1 = store.create_dataset("Leases", None, None).unwrap();
        let ds2 = store.create_dataset("Archive", None, None).unwrap();
        let id = store.register_document("lease.pdf", &[ds1, ds2]);

        store.delete_document(id);
        assert!(store.document(id).is_none());
        assert!(store.dataset(ds1).unwrap().document_ids.is_empty());
        assert!(store.dataset(ds2).unwrap().document_ids.is_empty());
        assert_membership_consistent(&store);

        // Deleting again is a no-op
        store.delete_document(id);
    }

    #[test]
    fn delete_dataset_unlinks_members_and_clears_selector() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        let id = store.register_document("lease.pdf", &[ds]);
        store.select_dataset(Some(ds));

        store.delete_dataset(ds);
        assert!(store.dataset(ds).is_none());
        assert!(store.document(id).unwrap().dataset_ids.is_empty());
        assert_eq!(store.active_dataset_id(), None);
        assert_membership_consistent(&store);
    }

    #[test]
    fn select_unknown_dataset_falls_back_to_all() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        store.select_dataset(Some(ds));
        assert_eq!(store.active_dataset_id(), Some(ds));

        store.select_dataset(Some(Uuid::new_v4()));
        assert_eq!(store.active_dataset_id(), None);
    }

    #[test]
    fn view_is_a_live_filter() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        let a = store.register_document("a.pdf", &[ds]);
        let b = store.register_document("b.pdf", &[]);

        assert_eq!(store.view(None).len(), 2);
        let filtered = store.view(Some(ds));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, a);

        store.tag_document(ds, b);
        assert_eq!(store.view(Some(ds)).len(), 2);
    }

    #[test]
    fn current_view_follows_the_selector() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        store.register_document("a.pdf", &[ds]);
        store.register_document("b.pdf", &[]);

        assert_eq!(store.current_view().len(), 2);
        store.select_dataset(Some(ds));
        assert_eq!(store.current_view().len(), 1);
    }

    #[test]
    fn detect_duplicates_matches_filenames_case_insensitively() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        let member = store.register_document("lease.pdf", &[ds]);
        let dup = store.register_document("LEASE.pdf", &[]);
        let other = store.register_document("other.pdf", &[]);

        let found = store.detect_duplicates(ds, &[dup, other]);
        assert_eq!(found, vec![dup]);

        // Pure read: nothing changed
        assert!(!store.dataset(ds).unwrap().document_ids.contains(&dup));
        assert!(store.dataset(ds).unwrap().document_ids.contains(&member));
    }

    #[test]
    fn detect_duplicates_on_unknown_dataset_is_empty() {
        let mut store = DocumentStore::new();
        let id = store.register_document("lease.pdf", &[]);
        assert!(store.detect_duplicates(Uuid::new_v4(), &[id]).is_empty());
    }

    #[test]
    fn restore_rebuilds_dataset_side_from_documents() {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        let id = store.register_document("lease.pdf", &[ds]);

        // Simulate a desynchronized snapshot: dataset side empty, plus a
        // dangling reference on the document.
        let mut documents = store.documents.clone();
        let mut datasets = store.datasets.clone();
        datasets[0].document_ids.clear();
        documents[0].dataset_ids.insert(Uuid::new_v4());

        let restored = DocumentStore::restore(documents, datasets, Some(ds));
        assert!(restored.dataset(ds).unwrap().document_ids.contains(&id));
        assert_eq!(restored.document(id).unwrap().dataset_ids.len(), 1);
        assert_eq!(restored.active_dataset_id(), Some(ds));
        assert_membership_consistent(&restored);
    }

    #[test]
    fn restore_drops_stale_active_selector() {
        let restored = DocumentStore::restore(Vec::new(), Vec::new(), Some(Uuid::new_v4()));
        assert_eq!(restored.active_dataset_id(), None);
    }

    #[test]
    fn membership_invariant_survives_a_mixed_workload() {
        let mut store = DocumentStore::new();
        let ds1 = store.create_dataset("Leases", None, None).unwrap();
        let ds2 = store.create_dataset("Archive", None, None).unwrap();

        let mut ids = Vec::new();
        for i in 0..6 {
            ids.push(store.register_document(&format!("doc-{i}.pdf"), &[ds1]));
        }
        store.bulk_tag(ds2, &ids[..4]);
        store.untag_document(ds1, ids[0]);
        store.delete_document(ids[1]);
        store.delete_dataset(ds2);
        store.tag_document(ds1, ids[5]);

        assert_membership_consistent(&store);
    }
}
