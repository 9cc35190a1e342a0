//! Structural confidence scoring.
//!
//! The score measures which fields were found, not how certain the OCR
//! engine was about the characters.

use crate::models::medication::MedicationInfo;

const NAME_WEIGHT: u32 = 3;
const DOSAGE_WEIGHT: u32 = 2;
const FREQUENCY_WEIGHT: u32 = 2;
const ROUTE_WEIGHT: u32 = 1;
const INSTRUCTIONS_WEIGHT: u32 = 2;

/// Score a record from 0 to 100.
///
/// Only present, non-empty fields contribute, to both the numerator and the
/// denominator. A record with none of the scored fields scores 0.
pub fn medication_confidence(medication: &MedicationInfo) -> u8 {
    let fields = [
        (&medication.name, NAME_WEIGHT),
        (&medication.dosage, DOSAGE_WEIGHT),
        (&medication.frequency, FREQUENCY_WEIGHT),
        (&medication.route, ROUTE_WEIGHT),
        (&medication.instructions, INSTRUCTIONS_WEIGHT),
    ];

    let mut score = 0;
    let mut total = 0;
    for (field, weight) in fields {
        if MedicationInfo::has(field) {
            score += weight;
            total += weight;
        }
    }

    if total == 0 {
        return 0;
    }

    (100.0 * score as f64 / total as f64).round() as u8
}

/// Attach the structural score to a record.
pub fn with_confidence(mut medication: MedicationInfo) -> MedicationInfo {
    medication.confidence = Some(medication_confidence(&medication));
    medication
}
