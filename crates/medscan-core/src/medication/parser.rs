//! Rule-based medication parser.

use tracing::{debug, info};

use crate::models::medication::MedicationInfo;

use super::rules::{
    extract_dosage, extract_frequency, extract_instructions, extract_name, extract_route,
};
use super::MedicationParser;

/// Composes the independent field rules into one record.
///
/// Prescriber, quantity and refills have no rule and are always absent.
#[derive(Debug, Default, Clone)]
pub struct RuleBasedParser;

impl RuleBasedParser {
    pub fn new() -> Self {
        Self
    }
}

impl MedicationParser for RuleBasedParser {
    fn parse(&self, text: &str) -> MedicationInfo {
        info!("Parsing {} characters of label text", text.len());

        let medication = MedicationInfo {
            name: Some(extract_name(text)),
            dosage: extract_dosage(text),
            frequency: extract_frequency(text),
            route: extract_route(text),
            instructions: extract_instructions(text),
            ..Default::default()
        };

        debug!(
            "Parsed medication '{}' (dosage: {:?}, frequency: {:?}, route: {:?}, instructions: {})",
            medication.display_name(),
            medication.dosage,
            medication.frequency,
            medication.route,
            medication.instructions.is_some()
        );

        medication
    }
}
