//! Medication name extraction.

use super::patterns::{NAME_CODE_DIGITS, NAME_LETTERS};
use super::{ExtractionMatch, FieldExtractor};

/// Name reported when no line qualifies.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Picks the first label line that reads like a product name.
///
/// A line qualifies when it has a run of three letters and no run of four
/// digits, which keeps barcode and lot number lines out.
#[derive(Debug, Default)]
pub struct NameExtractor;

impl NameExtractor {
    pub fn new() -> Self {
        Self
    }

    fn qualifies(line: &str) -> bool {
        NAME_LETTERS.is_match(line) && !NAME_CODE_DIGITS.is_match(line)
    }
}

impl FieldExtractor for NameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();
        let mut offset = 0;

        for raw in text.split('\n') {
            let line = raw.trim();
            if !line.is_empty() && Self::qualifies(line) {
                let start = offset + (raw.len() - raw.trim_start().len());
                results.push(
                    ExtractionMatch::new(line.to_string(), line).with_position(start, start + line.len()),
                );
            }
            offset += raw.len() + 1;
        }

        results
    }
}

/// Extract the medication name, falling back to [`UNKNOWN_NAME`].
pub fn extract_name(text: &str) -> String {
    NameExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_qualifying_line() {
        let text = "\n   \nMETFORMIN HCL  \nLISINOPRIL";
        assert_eq!(extract_name(text), "METFORMIN HCL");
    }

    #[test]
    fn test_skips_code_lines() {
        let text = "NDC 0093-1048-01\nRx 1234567\nAtorvastatin 20 mg";
        assert_eq!(extract_name(text), "Atorvastatin 20 mg");
    }

    #[test]
    fn test_short_words_do_not_qualify() {
        assert_eq!(extract_name("Rx\nNo 12\nab 1"), UNKNOWN_NAME);
    }

    #[test]
    fn test_unknown_when_nothing_qualifies() {
        assert_eq!(extract_name("123456789012"), UNKNOWN_NAME);
        assert_eq!(extract_name(""), UNKNOWN_NAME);
    }

    #[test]
    fn test_position_points_at_trimmed_line() {
        let text = "0012345\n  Amoxicillin  \nTake one.";
        let m = NameExtractor::new().extract(text).unwrap();
        let (start, end) = m.position.unwrap();
        assert_eq!(&text[start..end], "Amoxicillin");
    }

    #[test]
    fn test_extract_all_lists_every_candidate() {
        let all = NameExtractor::new().extract_all("Amoxicillin\n250 mg\nCapsules");
        let names: Vec<&str> = all.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(names, vec!["Amoxicillin", "Capsules"]);
    }
}
