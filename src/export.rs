//! On-demand export of the current document view.
//!
//! Both formats are pure projections of already-validated store data: one
//! row per document, columns for the filename, every extracted lease field,
//! the document's dataset names, and the reviewed flag. Documents that have
//! not been extracted yet still appear — their field cells are empty.

use rust_xlsxwriter::{Format, Workbook};

use crate::models::{Dataset, Document, ExtractedData};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook generation failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Column headers: filename, the lease fields in declaration order, then
/// the membership and review columns.
pub fn header() -> Vec<&'static str> {
    let mut header = vec!["filename"];
    header.extend(ExtractedData::FIELD_NAMES);
    header.push("datasets");
    header.push("reviewed");
    header
}

/// One export row for a document. Dataset names are joined in store
/// insertion order.
fn row(doc: &Document, datasets: &[Dataset]) -> Vec<String> {
    let mut row = Vec::with_capacity(ExtractedData::FIELD_NAMES.len() + 3);
    row.push(doc.filename.clone());
    match &doc.extracted_data {
        Some(data) => row.extend(data.field_values()),
        None => row.extend(std::iter::repeat(String::new()).take(ExtractedData::FIELD_NAMES.len())),
    }
    let names: Vec<&str> = datasets
        .iter()
        .filter(|d| doc.dataset_ids.contains(&d.id))
        .map(|d| d.name.as_str())
        .collect();
    row.push(names.join(", "));
    row.push(doc.is_reviewed.to_string());
    row
}

/// Serialize the given documents as delimited text.
pub fn to_csv(documents: &[&Document], datasets: &[Dataset]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header())?;
    for doc in documents {
        writer.write_record(row(doc, datasets))?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

/// Serialize the given documents as a single-sheet workbook.
pub fn to_xlsx(documents: &[&Document], datasets: &[Dataset]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Documents")?;

    for (col, title) in header().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    for (r, doc) in documents.iter().enumerate() {
        for (c, value) in row(doc, datasets).into_iter().enumerate() {
            sheet.write_string((r + 1) as u32, c as u16, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;

    fn sample_data() -> ExtractedData {
        ExtractedData {
            name: "Emma".into(),
            surname: "Wagner".into(),
            address_street: "Lindenstraße".into(),
            address_house_number: "44".into(),
            address_zip_code: "04109".into(),
            address_city: "Leipzig".into(),
            warm_rent: 760,
            cold_rent: 610,
            rent_increase_type: "Indexmiete".into(),
            date: chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            is_active: false,
            deposit: Some(1830),
            contract_term_months: None,
            notice_period_months: None,
            landlord_entity: None,
            confidence: None,
        }
    }

    fn populated_store() -> DocumentStore {
        let mut store = DocumentStore::new();
        let ds = store.create_dataset("Leases", None, None).unwrap();
        let extracted = store.register_document("lease.pdf", &[ds]);
        store.register_document("pending.pdf", &[]);
        store.attach_extracted_data(extracted, sample_data(), 82).unwrap();
        store
    }

    #[test]
    fn header_starts_with_filename_and_ends_with_review_columns() {
        let header = header();
        assert_eq!(header.first(), Some(&"filename"));
        assert_eq!(header[header.len() - 2], "datasets");
        assert_eq!(header.last(), Some(&"reviewed"));
        assert_eq!(header.len(), ExtractedData::FIELD_NAMES.len() + 3);
    }

    #[test]
    fn csv_round_trips_with_empty_cells_for_pending_documents() {
        let store = populated_store();
        let bytes = to_csv(&store.view(None), store.datasets()).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "filename");

        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);

        // Extracted document carries its fields and dataset name
        assert_eq!(&records[0][0], "lease.pdf");
        assert_eq!(&records[0][1], "Emma");
        assert_eq!(&records[0][headers.len() - 2], "Leases");
        assert_eq!(&records[0][headers.len() - 1], "false");

        // Pending document exports empty field cells
        assert_eq!(&records[1][0], "pending.pdf");
        assert_eq!(&records[1][1], "");
        assert_eq!(&records[1][headers.len() - 2], "");
    }

    #[test]
    fn csv_respects_the_dataset_filter() {
        let store = populated_store();
        let ds = store.datasets()[0].id;
        let bytes = to_csv(&store.view(Some(ds)), store.datasets()).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "lease.pdf");
    }

    #[test]
    fn xlsx_output_is_a_zip_container() {
        let store = populated_store();
        let bytes = to_xlsx(&store.view(None), store.datasets()).unwrap();
        // XLSX is a ZIP archive
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn empty_view_still_produces_a_header() {
        let store = DocumentStore::new();
        let bytes = to_csv(&store.view(None), store.datasets()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("filename,"));
        assert_eq!(text.lines().count(), 1);
    }
}
