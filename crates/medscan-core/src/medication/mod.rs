//! Medication field extraction from OCR text.

mod confidence;
mod parser;
pub mod rules;

pub use confidence::{medication_confidence, with_confidence};
pub use parser::RuleBasedParser;

use crate::models::medication::MedicationInfo;

/// Turns label text into medication records.
pub trait MedicationParser {
    /// Extract a single best-effort record.
    fn parse(&self, text: &str) -> MedicationInfo;

    /// Extract every medication on the label.
    ///
    /// The default yields exactly one record per text block.
    fn parse_multiple(&self, text: &str) -> Vec<MedicationInfo> {
        vec![self.parse(text)]
    }
}
