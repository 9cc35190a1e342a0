//! NDC (National Drug Code) candidate generation from raw barcode payloads.
//!
//! A product NDC is segmented labeler-product, but the split is ambiguous
//! without a checksum: 4-4, 5-3 or 5-4. Only the 4-4 and 5-3 groupings are
//! generated, which are the forms the product lookup accepts.

/// Digit count of a bare NDC.
pub const NDC_DIGITS: usize = 11;

/// Digit count of a UPC-A wrapped NDC (leading indicator digit + NDC).
pub const UPC_DIGITS: usize = 12;

/// Generate dash-formatted product NDC candidates for a raw barcode payload.
///
/// Non-digit characters are stripped first. A 12-digit payload has its
/// leading digit dropped; an 11-digit payload is used as-is; any other
/// length yields no candidates. Candidates keep generation order and are
/// de-duplicated.
pub fn ndc_candidates(raw: &str) -> Vec<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let ndc11 = match digits.len() {
        UPC_DIGITS => &digits[1..],
        NDC_DIGITS => digits.as_str(),
        _ => return Vec::new(),
    };

    let mut candidates: Vec<String> = Vec::with_capacity(2);
    for candidate in [
        format!("{}-{}", &ndc11[0..4], &ndc11[4..8]),
        format!("{}-{}", &ndc11[0..5], &ndc11[5..8]),
    ] {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eleven_digits() {
        assert_eq!(
            ndc_candidates("00087606005"),
            vec!["0008-7606".to_string(), "00087-606".to_string()]
        );
    }

    #[test]
    fn test_twelve_digits_drop_leading() {
        assert_eq!(
            ndc_candidates("300870606005"),
            vec!["0087-0606".to_string(), "00870-606".to_string()]
        );
        assert_eq!(ndc_candidates("300870606005"), ndc_candidates("00870606005"));
    }

    #[test]
    fn test_non_digits_are_stripped() {
        assert_eq!(ndc_candidates("0008-7606-005"), ndc_candidates("00087606005"));
        assert_eq!(ndc_candidates(" 3 00870 60600 5\n"), ndc_candidates("300870606005"));
    }

    #[test]
    fn test_unsupported_lengths() {
        assert!(ndc_candidates("").is_empty());
        assert!(ndc_candidates("abc").is_empty());
        assert!(ndc_candidates("0087606005").is_empty());
        assert!(ndc_candidates("5901234123457").is_empty());
        assert!(ndc_candidates("00300480278912").is_empty());
    }

    #[test]
    fn test_every_length_other_than_eleven_or_twelve_is_empty() {
        for len in 0..20 {
            let digits = "7".repeat(len);
            let candidates = ndc_candidates(&digits);
            match len {
                NDC_DIGITS | UPC_DIGITS => assert!(!candidates.is_empty()),
                _ => assert!(candidates.is_empty(), "length {} produced candidates", len),
            }
        }
    }

    #[test]
    fn test_slices_and_discards_trailing_digits() {
        let candidates = ndc_candidates("12345678901");
        assert_eq!(candidates, vec!["1234-5678".to_string(), "12345-678".to_string()]);
        assert!(candidates.iter().all(|c| !c.contains('9')));
    }

    #[test]
    fn test_candidates_are_unique() {
        for raw in ["00000000000", "11111111111", "012345678901", "99999999999"] {
            let candidates = ndc_candidates(raw);
            assert_eq!(candidates.len(), 2);
            assert_ne!(candidates[0], candidates[1]);
        }
    }
}
