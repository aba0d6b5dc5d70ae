//! Data models shared by the extractor and its callers.

pub mod config;
pub mod invoice;
pub mod item;

pub use config::{ExtractionConfig, FacturaConfig, MatchingConfig, VocabularyConfig};
pub use invoice::{ExtractionResult, ExtractionStats, InvoiceHeader};
pub use item::{CatalogMatch, ExtractedItem, MatchKind, ProductRef, Strategy};
