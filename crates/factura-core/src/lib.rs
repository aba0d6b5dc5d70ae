//! Core library for Chilean supplier-invoice OCR item extraction.
//!
//! This crate provides:
//! - Chilean number parsing (`15.000`, `1.200,50`)
//! - Line classification into product-table candidates
//! - Staged line-item extraction (coded, uncoded and table rows)
//! - Best-effort matching against a read-only product catalog
//! - Header fields: folio, issue date, supplier RUT and totals
//!
//! The crate never touches images or storage; it turns OCR text and a catalog
//! snapshot into reviewable item suggestions.

pub mod catalog;
pub mod error;
pub mod invoice;
pub mod models;
pub mod source;

pub use catalog::{match_product, CatalogProduct, CatalogSnapshot};
pub use error::{CatalogError, FacturaError, Result, SourceError};
pub use invoice::{InvoiceItemParser, InvoiceParser, LineClassifier};
pub use invoice::rules::parse_amount;
pub use models::config::FacturaConfig;
pub use models::invoice::{ExtractionResult, ExtractionStats, InvoiceHeader};
pub use models::item::{CatalogMatch, ExtractedItem, MatchKind, ProductRef, Strategy};
pub use source::{PlainTextSource, TextSource};

/// Extract items from one document with default settings.
///
/// Fails only when the catalog itself is malformed.
pub fn extract_items(raw_text: &str, catalog: &[CatalogProduct]) -> Result<Vec<ExtractedItem>> {
    let snapshot = CatalogSnapshot::build(catalog)?;
    Ok(InvoiceItemParser::new().extract_items(raw_text, &snapshot))
}
