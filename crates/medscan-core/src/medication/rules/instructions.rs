//! Directions extraction.

use super::patterns::INSTRUCTIONS_PATTERN;
use super::{verbatim_matches, ExtractionMatch, FieldExtractor};

/// Matches from "take" up to and including the next period.
#[derive(Debug, Default)]
pub struct InstructionsExtractor;

impl InstructionsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for InstructionsExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        verbatim_matches(&INSTRUCTIONS_PATTERN, text)
    }
}

/// Extract the first "take ..." sentence, period included.
pub fn extract_instructions(text: &str) -> Option<String> {
    InstructionsExtractor::new().extract(text).map(|m| m.value)
}
