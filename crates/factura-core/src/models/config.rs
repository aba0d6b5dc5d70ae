//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FacturaError, Result};

/// Main configuration for factura.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturaConfig {
    /// Line classification and item extraction settings.
    pub extraction: ExtractionConfig,

    /// Extra vocabulary on top of the built-in keyword tables.
    pub vocabulary: VocabularyConfig,

    /// Catalog matching settings.
    pub matching: MatchingConfig,
}

/// Line classification and item extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines shorter than this (in characters) cannot hold an item row.
    pub min_line_length: usize,

    /// Minimum cleaned length for the uncoded and table-row fallbacks.
    pub fallback_min_line_length: usize,

    /// Ratio above which the largest amount on a row is read as a total column.
    pub total_column_ratio: u64,

    /// Minimum length of a cleaned product name.
    pub min_name_length: usize,

    /// Run the uncoded and table-row strategies when coded rows yield nothing.
    pub enable_fallbacks: bool,

    /// Extract folio, date, supplier RUT and document total.
    pub extract_header: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_line_length: 8,
            fallback_min_line_length: 15,
            total_column_ratio: 10,
            min_name_length: 3,
            enable_fallbacks: true,
            extract_header: true,
        }
    }
}

/// Words added to the built-in vocabulary tables.
///
/// Entries are matched case-insensitively and without accents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub header_keywords: Vec<String>,
    pub footer_keywords: Vec<String>,
    pub metadata_prefixes: Vec<String>,
    pub unit_abbreviations: Vec<String>,
    pub excluded_words: Vec<String>,
    pub name_prefix_denylist: Vec<String>,
}

/// Catalog matching settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Annotate items with catalog matches.
    pub enabled: bool,

    /// Minimum keyword-overlap score for a match.
    pub min_keyword_score: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_keyword_score: 1,
        }
    }
}

impl FacturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings that would break the item invariants.
    pub fn validate(&self) -> Result<()> {
        let extraction = &self.extraction;

        if extraction.min_line_length == 0 {
            return Err(FacturaError::Config(
                "extraction.min_line_length must be greater than 0".to_string(),
            ));
        }
        if extraction.min_name_length < 3 {
            return Err(FacturaError::Config(
                "extraction.min_name_length must be at least 3".to_string(),
            ));
        }
        if extraction.total_column_ratio < 2 {
            return Err(FacturaError::Config(
                "extraction.total_column_ratio must be at least 2".to_string(),
            ));
        }
        if self.matching.min_keyword_score == 0 {
            return Err(FacturaError::Config(
                "matching.min_keyword_score must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FacturaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FacturaConfig =
            serde_json::from_str(r#"{"extraction": {"min_line_length": 10}}"#).unwrap();

        assert_eq!(config.extraction.min_line_length, 10);
        assert_eq!(config.extraction.fallback_min_line_length, 15);
        assert_eq!(config.matching, MatchingConfig::default());
    }

    #[test]
    fn test_validate_rejects_short_names() {
        let mut config = FacturaConfig::default();
        config.extraction.min_name_length = 2;
        assert!(matches!(config.validate(), Err(FacturaError::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FacturaConfig::default();
        config.vocabulary.unit_abbreviations.push("DISP".to_string());
        config.save(&path).unwrap();

        assert_eq!(FacturaConfig::from_file(&path).unwrap(), config);
    }
}
