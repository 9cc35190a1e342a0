//! Regex patterns for medication label extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Name line filters
    pub static ref NAME_LETTERS: Regex = Regex::new(r"[A-Za-z]{3,}").unwrap();

    pub static ref NAME_CODE_DIGITS: Regex = Regex::new(r"[0-9]{4,}").unwrap();

    // Strength: number followed by a unit token
    pub static ref DOSAGE_PATTERN: Regex = Regex::new(
        r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(mg|mcg|g|ml|units?)"
    ).unwrap();

    // Frequency tokens, first wins
    pub static ref FREQUENCY_PATTERN: Regex = Regex::new(
        r"(?i)(once|twice|three times|daily|BID|TID|QID)"
    ).unwrap();

    // Route tokens, matched anywhere in a word
    pub static ref ROUTE_PATTERN: Regex = Regex::new(
        r"(?i)(oral|by mouth|topical|IV|IM|inhalation)"
    ).unwrap();

    // "Take ..." up to and including the next period
    pub static ref INSTRUCTIONS_PATTERN: Regex = Regex::new(r"(?i)take[^.]+\.").unwrap();
}
