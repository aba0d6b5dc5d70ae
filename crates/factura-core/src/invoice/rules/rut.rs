//! RUT (Chilean tax identification number) extraction and validation.

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::{RUT_PATTERN, RUT_STANDALONE};

/// RUT field extractor.
pub struct RutExtractor {
    validate: bool,
}

impl RutExtractor {
    /// Create a new RUT extractor.
    pub fn new() -> Self {
        Self { validate: true }
    }

    /// Set whether to validate the check digit.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    fn accept(&self, body: &str, check: &str) -> Option<String> {
        let rut = normalize_rut(body, check);
        (!self.validate || validate_rut(&rut)).then_some(rut)
    }
}

impl Default for RutExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for RutExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        // Labeled "RUT:" first (higher confidence)
        for caps in RUT_PATTERN.captures_iter(text) {
            let Some(full_match) = caps.get(0) else { continue };
            if let Some(rut) = self.accept(&caps[1], &caps[2]) {
                results.push(
                    ExtractionMatch::new(rut, 0.95, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        for caps in RUT_STANDALONE.captures_iter(text) {
            let Some(full_match) = caps.get(0) else { continue };
            let Some(rut) = self.accept(&caps[1], &caps[2]) else { continue };

            if results.iter().any(|r| r.value == rut) {
                continue;
            }

            results.push(
                ExtractionMatch::new(rut, 0.7, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        results
    }
}

/// Extract the first RUT from text (usually the issuing supplier).
pub fn extract_rut(text: &str) -> Option<String> {
    RutExtractor::new().extract(text).map(|m| m.value)
}

/// Canonical form: body digits, dash, upper-case check digit (`76123456-7`).
fn normalize_rut(body: &str, check: &str) -> String {
    let digits: String = body.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("{}-{}", digits, check.to_uppercase())
}

/// Validate a RUT using the modulo-11 check digit.
///
/// Body digits are weighted 2, 3, 4, 5, 6, 7 cyclically from the right;
/// `11 - sum % 11` gives the check digit, with 11 → `0` and 10 → `K`.
pub fn validate_rut(rut: &str) -> bool {
    let cleaned: String = rut
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() < 2 {
        return false;
    }

    let (body, check) = cleaned.split_at(cleaned.len() - 1);
    if body.len() < 7 || body.len() > 8 || !body.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = body
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .zip([2, 3, 4, 5, 6, 7].iter().cycle())
        .map(|(d, w)| d * w)
        .sum();

    let expected = match 11 - sum % 11 {
        11 => '0',
        10 => 'K',
        n => char::from_digit(n, 10).unwrap_or('?'),
    };

    check.starts_with(expected)
}

/// Format RUT with thousands dots (`76.123.456-7`).
pub fn format_rut(rut: &str) -> String {
    let Some((body, check)) = rut.rsplit_once('-') else {
        return rut.to_string();
    };
    let digits: String = body.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut formatted = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(c);
    }

    format!("{}-{}", formatted, check.to_uppercase())
}
