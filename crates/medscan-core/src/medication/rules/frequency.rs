//! Administration frequency extraction.

use super::patterns::FREQUENCY_PATTERN;
use super::{verbatim_matches, ExtractionMatch, FieldExtractor};

/// Matches the first frequency token: once, twice, three times, daily,
/// BID, TID or QID.
#[derive(Debug, Default)]
pub struct FrequencyExtractor;

impl FrequencyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for FrequencyExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        verbatim_matches(&FREQUENCY_PATTERN, text)
    }
}

/// Extract the first frequency token, as written.
pub fn extract_frequency(text: &str) -> Option<String> {
    FrequencyExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_token_wins() {
        assert_eq!(
            extract_frequency("Take 1 tablet by mouth twice daily.").as_deref(),
            Some("twice")
        );
        assert_eq!(extract_frequency("DAILY with food").as_deref(), Some("DAILY"));
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(extract_frequency("1 cap bid").as_deref(), Some("bid"));
        assert_eq!(extract_frequency("Sig: 2 tabs TID prn").as_deref(), Some("TID"));
        assert_eq!(extract_frequency("three times a day").as_deref(), Some("three times"));
    }

    #[test]
    fn test_none() {
        assert_eq!(extract_frequency("as needed for pain"), None);
    }

    #[test]
    fn test_extract_all() {
        let all = FrequencyExtractor::new().extract_all("once daily, or twice");
        let values: Vec<&str> = all.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["once", "daily", "twice"]);
    }
}
