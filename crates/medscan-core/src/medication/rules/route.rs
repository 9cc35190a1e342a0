//! Route of administration extraction.

use super::patterns::ROUTE_PATTERN;
use super::{verbatim_matches, ExtractionMatch, FieldExtractor};

/// Matches the first route token: oral, by mouth, topical, IV, IM or
/// inhalation.
///
/// Tokens are not anchored to word boundaries, so "IV" also matches inside
/// words such as "ACTIVE".
#[derive(Debug, Default)]
pub struct RouteExtractor;

impl RouteExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for RouteExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        verbatim_matches(&ROUTE_PATTERN, text)
    }
}

/// Extract the first route token, as written.
pub fn extract_route(text: &str) -> Option<String> {
    RouteExtractor::new().extract(text).map(|m| m.value)
}
