//! Mocked extraction backend.
//!
//! Produces random but plausible German lease fields with per-field
//! confidence scores, simulates 1–2 s of processing latency, and fails a
//! configurable fraction of calls (~5% by default) to model a flaky
//! external extraction service.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use uuid::Uuid;

use super::{ExtractError, Extraction, Extractor};
use crate::models::ExtractedData;

const FIRST_NAMES: &[&str] = &[
    "Max", "Anna", "Thomas", "Julia", "Michael", "Sarah", "Lukas", "Emma", "Felix", "Laura",
];
const LAST_NAMES: &[&str] = &[
    "Müller", "Schmidt", "Schneider", "Fischer", "Weber", "Meyer", "Wagner", "Becker", "Schulz",
    "Hoffmann",
];
const STREETS: &[&str] = &[
    "Hauptstraße",
    "Bahnhofstraße",
    "Kirchstraße",
    "Schulstraße",
    "Gartenstraße",
    "Bergstraße",
    "Waldstraße",
    "Lindenstraße",
];
const CITIES: &[&str] = &[
    "München",
    "Berlin",
    "Hamburg",
    "Frankfurt",
    "Köln",
    "Stuttgart",
    "Düsseldorf",
    "Leipzig",
    "Dortmund",
    "Essen",
];
const RENT_INCREASE_TYPES: &[&str] = &[
    "Staffelmiete",
    "Indexmiete",
    "Festmiete",
    "Wertsicherungsklausel",
];
const LANDLORDS: &[&str] = &[
    "Hausverwaltung GmbH",
    "Immobilien AG",
    "Wohnbau Gesellschaft",
    "Private Vermietung",
];

/// Default probability of a simulated extraction failure.
const DEFAULT_FAILURE_RATE: f64 = 0.05;

pub struct MockExtractor {
    failure_rate: f64,
    simulate_latency: bool,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self {
            failure_rate: DEFAULT_FAILURE_RATE,
            simulate_latency: true,
        }
    }

    /// Override the failure probability (0.0 disables the failure path).
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Skip the simulated 1–2 s processing delay. For tests.
    pub fn without_delay(mut self) -> Self {
        self.simulate_latency = false;
        self
    }
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Extractor for MockExtractor {
    async fn extract(
        &self,
        document_id: Uuid,
        filename: &str,
    ) -> Result<Extraction, ExtractError> {
        // Draw the delay before awaiting: ThreadRng must not be held across
        // an await point.
        let delay_ms = if self.simulate_latency {
            rand::thread_rng().gen_range(1000..2000)
        } else {
            0
        };
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        let mut rng = rand::thread_rng();
        if rng.gen_bool(self.failure_rate) {
            tracing::warn!(
                document_id = %document_id,
                file = %filename,
                "Simulated extraction failure"
            );
            return Err(ExtractError::Failed);
        }

        let data = synthesize_lease_data(&mut rng);
        let quality_score = rng.gen_range(70..=95);

        tracing::info!(
            document_id = %document_id,
            file = %filename,
            quality = quality_score,
            "Extraction complete"
        );

        Ok(Extraction {
            data,
            quality_score,
            processed_at: Utc::now(),
        })
    }
}

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

/// ~80% of confidences land in the high band, the rest in a low band that
/// the UI flags for review.
fn confidence<R: Rng>(rng: &mut R) -> f32 {
    if rng.gen_bool(0.8) {
        rng.gen_range(80..=98) as f32 / 100.0
    } else {
        rng.gen_range(65..=75) as f32 / 100.0
    }
}

/// Generate one plausible lease record with per-field confidences.
/// Optional fields are present ~70% of the time, each independently.
fn synthesize_lease_data<R: Rng>(rng: &mut R) -> ExtractedData {
    let cold_rent = rng.gen_range(500..=2000);
    let warm_rent = cold_rent + rng.gen_range(100..=400);
    let date = NaiveDate::from_ymd_opt(
        rng.gen_range(2019..=2024),
        rng.gen_range(1..=12),
        rng.gen_range(1..=28),
    )
    .expect("day range 1..=28 is valid for every month");

    let mut conf = std::collections::BTreeMap::new();
    for field in [
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
    ] {
        conf.insert(field.to_string(), confidence(rng));
    }

    let deposit = rng.gen_bool(0.7).then(|| {
        conf.insert("deposit".into(), confidence(rng));
        cold_rent * rng.gen_range(2..=4)
    });
    let contract_term_months = rng.gen_bool(0.7).then(|| {
        conf.insert("contract_term_months".into(), confidence(rng));
        rng.gen_range(12..=36)
    });
    let notice_period_months = rng.gen_bool(0.7).then(|| {
        conf.insert("notice_period_months".into(), confidence(rng));
        rng.gen_range(1..=6)
    });
    let landlord_entity = rng.gen_bool(0.7).then(|| {
        conf.insert("landlord_entity".into(), confidence(rng));
        pick(rng, LANDLORDS).to_string()
    });

    ExtractedData {
        name: pick(rng, FIRST_NAMES).to_string(),
        surname: pick(rng, LAST_NAMES).to_string(),
        address_street: pick(rng, STREETS).to_string(),
        address_house_number: rng.gen_range(1..=150).to_string(),
        address_zip_code: (10000 + rng.gen_range(0..=89999)).to_string(),
        address_city: pick(rng, CITIES).to_string(),
        warm_rent,
        cold_rent,
        rent_increase_type: pick(rng, RENT_INCREASE_TYPES).to_string(),
        date,
        is_active: rng.gen_bool(0.8),
        deposit,
        contract_term_months,
        notice_period_months,
        landlord_entity,
        confidence: Some(conf),
    }
}
