//! Drug database lookup by NDC.
//!
//! A raw barcode payload is expanded into NDC candidates and each candidate
//! is queried in order. A failed query only skips that candidate; the first
//! candidate that returns a product ends the search.

mod openfda;

pub use openfda::OpenFdaSource;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::barcode::ndc_candidates;
use crate::error::LookupError;
use crate::models::config::LookupConfig;
use crate::models::medication::{DrugRecord, MedicationInfo};

/// A product database that can be queried by exact product NDC.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Query a single dash-formatted product NDC.
    ///
    /// Returns `Ok(None)` when the query succeeded but matched nothing.
    async fn query(&self, product_ndc: &str) -> Result<Option<DrugRecord>, LookupError>;
}

/// Resolves raw barcode payloads to drug records.
pub struct DrugLookup<S: ProductSource> {
    source: S,
}

impl<S: ProductSource> DrugLookup<S> {
    /// Create a lookup over a product source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying product source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Find the first product matching any NDC candidate of `raw_code`.
    ///
    /// Candidates are tried sequentially, once each. Errors on a candidate
    /// are logged and skipped.
    pub async fn find(&self, raw_code: &str) -> Option<DrugRecord> {
        let candidates = ndc_candidates(raw_code);
        if candidates.is_empty() {
            debug!("No NDC candidates for code {:?}", raw_code);
            return None;
        }

        for candidate in &candidates {
            debug!("Querying product NDC {}", candidate);

            match self.source.query(candidate).await {
                Ok(Some(record)) => {
                    info!("Matched product NDC {}", candidate);
                    return Some(record);
                }
                Ok(None) => debug!("No product for NDC {}", candidate),
                Err(e) => warn!("Lookup for NDC {} failed, trying next candidate: {}", candidate, e),
            }
        }

        info!("No product found for code {:?} ({} candidates)", raw_code, candidates.len());
        None
    }
}

/// Map a drug record to a medication.
///
/// Always yields exactly one medication. The database carries no
/// frequency, so the configured default is used; the first listed route is
/// title-cased, falling back to the configured default route.
pub fn medication_from_record(record: &DrugRecord, defaults: &LookupConfig) -> MedicationInfo {
    let name = non_empty(record.brand_name.as_deref())
        .or_else(|| non_empty(record.generic_name.as_deref()))
        .unwrap_or("Unknown");

    let dosage = record
        .active_ingredients
        .first()
        .map(|i| i.strength.clone())
        .unwrap_or_default();

    let route = record
        .route
        .first()
        .and_then(|r| non_empty(Some(r.as_str())))
        .map(title_case)
        .unwrap_or_else(|| defaults.default_route.clone());

    MedicationInfo {
        name: Some(name.to_string()),
        dosage: Some(dosage),
        frequency: Some(defaults.default_frequency.clone()),
        route: Some(route),
        ..Default::default()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Capitalize the first letter of each word and lowercase the rest:
/// "ORAL" -> "Oral", "RESPIRATORY (INHALATION)" -> "Respiratory (Inhalation)".
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut capitalized = false;
            let mut out = String::with_capacity(word.len());
            for c in word.chars() {
                if !capitalized && c.is_alphabetic() {
                    out.extend(c.to_uppercase());
                    capitalized = true;
                } else {
                    out.extend(c.to_lowercase());
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(" ")
}
