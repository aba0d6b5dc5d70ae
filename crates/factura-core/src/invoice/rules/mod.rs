//! Rule-based field extractors for Chilean invoices.

pub mod amounts;
pub mod dates;
pub mod folio;
pub mod patterns;
pub mod rut;

pub use amounts::{
    extract_document_total, extract_net_total, format_clp, looks_like_fallback_quantity,
    looks_like_price, looks_like_quantity, parse_amount, parse_chilean_decimal, parse_number,
    select_price,
};
pub use dates::{extract_issue_date, DateExtractor};
pub use folio::extract_folio;
pub use rut::{extract_rut, format_rut, validate_rut, RutExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
