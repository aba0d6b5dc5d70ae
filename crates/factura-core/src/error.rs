//! Error types for the factura-core library.
//!
//! Malformed OCR input is never an error: unparseable lines are skipped and
//! garbage tokens parse to `None`. The variants below cover the conditions
//! that should fail loudly instead, such as a catalog that is broken at the
//! data level or a configuration that makes extraction meaningless.

use thiserror::Error;

/// Main error type for the factura library.
#[derive(Error, Debug)]
pub enum FacturaError {
    /// Catalog snapshot could not be built.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Document text could not be obtained.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while building a catalog snapshot.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two catalog records share the same product id.
    #[error("duplicate product id {0}")]
    DuplicateId(u64),

    /// A catalog record has a blank name.
    #[error("product {0} has an empty name")]
    EmptyName(u64),

    /// The catalog payload could not be decoded.
    #[error("failed to decode catalog: {0}")]
    Decode(String),
}

/// Errors raised by upstream text sources.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document could not be read.
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    /// The document has a format the source does not handle.
    #[error("unsupported document format: {0}")]
    Unsupported(String),
}

/// Result type for the factura library.
pub type Result<T> = std::result::Result<T, FacturaError>;
