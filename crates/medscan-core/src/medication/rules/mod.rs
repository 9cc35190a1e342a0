//! Pattern rules for medication label fields.
//!
//! Each rule runs over the whole text on its own; no rule reads another
//! rule's result.

pub mod dosage;
pub mod frequency;
pub mod instructions;
pub mod name;
pub mod patterns;
pub mod route;

pub use dosage::{extract_dosage, DosageExtractor};
pub use frequency::{extract_frequency, FrequencyExtractor};
pub use instructions::{extract_instructions, InstructionsExtractor};
pub use name::{extract_name, NameExtractor, UNKNOWN_NAME};
pub use route::{extract_route, RouteExtractor};

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched field value and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Every non-overlapping match of `pattern`, value taken verbatim.
pub(crate) fn verbatim_matches(pattern: &Regex, text: &str) -> Vec<ExtractionMatch<String>> {
    pattern
        .find_iter(text)
        .map(|m| {
            ExtractionMatch::new(m.as_str().to_string(), m.as_str()).with_position(m.start(), m.end())
        })
        .collect()
}
