//! A single OCR text line prepared for item extraction.

use super::segment::{clean_line, find_bare_numbers, find_numeric_tokens, BareNumber, NumericToken};

/// One line of the document, with the token lists derived from its cleaned text.
///
/// Offsets in `numbers` and `quantities` index into `cleaned`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the source document.
    pub number: usize,
    /// Trimmed source text.
    pub original: String,
    /// Text after [`clean_line`].
    pub cleaned: String,
    /// Every numeric token, in order.
    pub numbers: Vec<NumericToken>,
    /// Free-standing 1-3 digit numbers, in order.
    pub quantities: Vec<BareNumber>,
}

impl Line {
    pub fn new(number: usize, original: &str) -> Self {
        let original = original.trim().to_string();
        let cleaned = clean_line(&original);
        let numbers = find_numeric_tokens(&cleaned);
        let quantities = find_bare_numbers(&cleaned);

        Self {
            number,
            original,
            cleaned,
            numbers,
            quantities,
        }
    }

    /// Peso amounts on the line (price candidates), in order.
    pub fn amounts(&self) -> impl Iterator<Item = u64> + '_ {
        self.numbers.iter().filter_map(|t| t.amount)
    }

    pub fn has_amount(&self) -> bool {
        self.amounts().next().is_some()
    }

    /// Cleaned length in characters.
    pub fn len(&self) -> usize {
        self.cleaned.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cleaned.is_empty()
    }

    /// Cleaned text split into words.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.cleaned.split_whitespace()
    }
}
