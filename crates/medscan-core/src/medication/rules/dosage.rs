//! Strength extraction.

use super::patterns::DOSAGE_PATTERN;
use super::{verbatim_matches, ExtractionMatch, FieldExtractor};

/// Matches a number followed by a unit (mg, mcg, g, ml, unit, units).
#[derive(Debug, Default)]
pub struct DosageExtractor;

impl DosageExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for DosageExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        verbatim_matches(&DOSAGE_PATTERN, text)
    }
}

/// Extract the first dosage, as written.
pub fn extract_dosage(text: &str) -> Option<String> {
    DosageExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_units() {
        assert_eq!(extract_dosage("500 mg tablets").as_deref(), Some("500 mg"));
        assert_eq!(extract_dosage("Levothyroxine 50mcg").as_deref(), Some("50mcg"));
        assert_eq!(extract_dosage("Insulin 10 UNITS").as_deref(), Some("10 UNITS"));
        assert_eq!(extract_dosage("Amoxicillin 250mg/5ml").as_deref(), Some("250mg"));
    }

    #[test]
    fn test_decimal_strength() {
        assert_eq!(extract_dosage("Warfarin 2.5 mg").as_deref(), Some("2.5 mg"));
    }

    #[test]
    fn test_no_unit_no_match() {
        assert_eq!(extract_dosage("Take 1 tablet"), None);
        assert_eq!(extract_dosage("123456789012"), None);
    }

    #[test]
    fn test_extract_all() {
        let all = DosageExtractor::new().extract_all("5 mg/2 ml vial, 1 g total");
        let values: Vec<&str> = all.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["5 mg", "2 ml", "1 g"]);
        assert_eq!(all[1].position, Some((5, 9)));
    }
}
