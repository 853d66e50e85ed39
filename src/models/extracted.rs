use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured lease fields produced by extraction.
///
/// Owned exclusively by its document; review edits replace the whole record.
/// Field names stay snake_case on the wire — they are the column names the
/// export formats and the browser UI both key on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    pub name: String,
    pub surname: String,
    pub address_street: String,
    pub address_house_number: String,
    pub address_zip_code: String,
    pub address_city: String,
    /// Monthly rent including utilities, EUR.
    pub warm_rent: u32,
    /// Monthly rent excluding utilities, EUR.
    pub cold_rent: u32,
    pub rent_increase_type: String,
    pub date: NaiveDate,
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_term_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice_period_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landlord_entity: Option<String>,

    /// Per-field extraction confidence, 0.0–1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<BTreeMap<String, f32>>,
}

impl ExtractedData {
    /// Export column names, in declaration order.
    pub const FIELD_NAMES: [&'static str; 15] = [
        "name",
        "surname",
        "address_street",
        "address_house_number",
        "address_zip_code",
        "address_city",
        "warm_rent",
        "cold_rent",
        "rent_increase_type",
        "date",
        "is_active",
        "deposit",
        "contract_term_months",
        "notice_period_months",
        "landlord_entity",
    ];

    /// Field values as display strings, aligned with [`Self::FIELD_NAMES`].
    /// Absent optional fields render as empty strings.
    pub fn field_values(&self) -> [String; 15] {
        [
            self.name.clone(),
            self.surname.clone(),
            self.address_street.clone(),
            self.address_house_number.clone(),
            self.address_zip_code.clone(),
            self.address_city.clone(),
            self.warm_rent.to_string(),
            self.cold_rent.to_string(),
            self.rent_increase_type.clone(),
            self.date.to_string(),
            self.is_active.to_string(),
            self.deposit.map(|v| v.to_string()).unwrap_or_default(),
            self.contract_term_months
                .map(|v| v.to_string())
                .unwrap_or_default(),
            self.notice_period_months
                .map(|v| v.to_string())
                .unwrap_or_default(),
            self.landlord_entity.clone().unwrap_or_default(),
        ]
    }
}
