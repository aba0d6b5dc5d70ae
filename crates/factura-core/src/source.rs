//! Upstream text sources.
//!
//! OCR acquisition happens outside this crate; a source only has to turn a
//! document path into its recognized text.

use std::path::Path;

use tracing::debug;

use crate::error::{Result, SourceError};

/// Produces the OCR text of one document.
pub trait TextSource: Send + Sync {
    fn text_for_document(&self, path: &Path) -> Result<String>;
}

/// Reads OCR text dumps (`.txt`, `.text`, `.ocr`) from disk.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; OCR engines
/// occasionally emit stray bytes.
#[derive(Debug, Clone, Default)]
pub struct PlainTextSource {
    any_extension: bool,
}

/// Extensions accepted by [`PlainTextSource`].
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "ocr"];

impl PlainTextSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept files regardless of their extension.
    pub fn with_any_extension(mut self, any: bool) -> Self {
        self.any_extension = any;
        self
    }

    fn check_extension(&self, path: &Path) -> Result<()> {
        if self.any_extension {
            return Ok(());
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if TEXT_EXTENSIONS.contains(&extension.as_str()) {
            Ok(())
        } else {
            Err(SourceError::Unsupported(path.display().to_string()).into())
        }
    }
}

impl TextSource for PlainTextSource {
    fn text_for_document(&self, path: &Path) -> Result<String> {
        self.check_extension(path)?;

        let bytes = std::fs::read(path).map_err(|e| SourceError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
