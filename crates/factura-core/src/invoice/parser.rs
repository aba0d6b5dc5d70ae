//! Invoice item parser: classification, staged extraction and catalog matching.

use std::time::Instant;

use tracing::{debug, info};

use crate::catalog::CatalogSnapshot;
use crate::error::Result;
use crate::models::config::FacturaConfig;
use crate::models::invoice::{ExtractionResult, ExtractionStats, InvoiceHeader};
use crate::models::item::{ExtractedItem, Strategy};

use super::classifier::LineClassifier;
use super::line::Line;
use super::rules::{
    extract_document_total, extract_folio, extract_issue_date, extract_net_total, format_rut,
    FieldExtractor, RutExtractor,
};
use super::strategies::{uncoded_row, RawItem, StrategyContext, StrategyFn, PIPELINE};
use super::vocabulary::Vocabulary;

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse one document's OCR text.
    ///
    /// Never fails on malformed text: unusable lines are skipped and a
    /// document without items yields an empty item list plus a warning.
    fn parse(&self, text: &str, catalog: &CatalogSnapshot) -> ExtractionResult;

    /// Items only, in document order.
    fn extract_items(&self, text: &str, catalog: &CatalogSnapshot) -> Vec<ExtractedItem> {
        self.parse(text, catalog).items
    }
}

/// Rule-based line-item parser for Chilean supplier invoices.
///
/// Holds no mutable state; one instance can serve many documents, from many
/// threads.
#[derive(Debug, Clone)]
pub struct InvoiceItemParser {
    config: FacturaConfig,
    vocabulary: Vocabulary,
}

impl InvoiceItemParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            config: FacturaConfig::default(),
            vocabulary: Vocabulary::standard(),
        }
    }

    /// Create a parser from a validated configuration.
    pub fn from_config(config: FacturaConfig) -> Result<Self> {
        config.validate()?;
        let vocabulary = Vocabulary::with_extras(&config.vocabulary);
        Ok(Self { config, vocabulary })
    }

    /// Enable or disable the uncoded and table-row stages.
    pub fn with_fallbacks(mut self, enabled: bool) -> Self {
        self.config.extraction.enable_fallbacks = enabled;
        self
    }

    /// Enable or disable catalog matching.
    pub fn with_matching(mut self, enabled: bool) -> Self {
        self.config.matching.enabled = enabled;
        self
    }

    /// Enable or disable folio, date, RUT and totals extraction.
    pub fn with_header_extraction(mut self, enabled: bool) -> Self {
        self.config.extraction.extract_header = enabled;
        self
    }

    pub fn config(&self) -> &FacturaConfig {
        &self.config
    }

    pub fn classifier(&self) -> LineClassifier<'_> {
        LineClassifier::new(&self.vocabulary)
            .with_min_line_length(self.config.extraction.min_line_length)
    }

    /// Run the strategy stages over the candidate lines.
    ///
    /// Each stage covers the whole document; the first stage that yields any
    /// item wins and later stages are skipped. When coded rows win, lines
    /// without a code are still read as uncoded rows, in document order.
    pub fn run_pipeline(&self, candidates: &[Line]) -> Option<(Strategy, Vec<ExtractedItem>)> {
        let ctx = StrategyContext {
            vocabulary: &self.vocabulary,
            config: &self.config.extraction,
        };
        let fallbacks = self.config.extraction.enable_fallbacks;
        let pipeline: &[(Strategy, StrategyFn)] = &PIPELINE;
        let stages = if fallbacks { pipeline } else { &pipeline[..1] };

        for (strategy, extract) in stages {
            let mut items = Vec::new();
            let mut missed = Vec::new();

            for line in candidates {
                match extract(line, &ctx) {
                    Some(raw) => items.push(to_item(raw, line, *strategy)),
                    None => missed.push(line),
                }
            }

            debug!(
                "Stage {}: {} items from {} candidate lines",
                strategy,
                items.len(),
                candidates.len()
            );

            if items.is_empty() {
                continue;
            }

            if *strategy == Strategy::CodedRow && fallbacks {
                let coded = items.len();
                items.extend(missed.into_iter().filter_map(|line| {
                    let raw = uncoded_row(line, &ctx)?;
                    Some(to_item(raw, line, Strategy::UncodedRow))
                }));
                items.sort_by_key(|item| item.line_number);
                debug!("Uncoded rows among coded rows: {}", items.len() - coded);
            }

            return Some((*strategy, items));
        }

        None
    }

    /// Extract folio, issue date, supplier RUT and totals.
    pub fn extract_header(&self, text: &str) -> InvoiceHeader {
        InvoiceHeader {
            folio: extract_folio(text).map(|m| m.value),
            issue_date: extract_issue_date(text).map(|m| m.value),
            supplier_rut: RutExtractor::new().extract(text).map(|m| format_rut(&m.value)),
            net_total: extract_net_total(text).map(|m| m.value),
            document_total: extract_document_total(text).map(|m| m.value),
        }
    }

    fn annotate(&self, items: Vec<ExtractedItem>, catalog: &CatalogSnapshot) -> Vec<ExtractedItem> {
        if !self.config.matching.enabled || catalog.is_empty() {
            return items;
        }

        let min_score = self.config.matching.min_keyword_score;
        items
            .into_iter()
            .map(|item| {
                let found = catalog.find_match_with(&item.raw_name, min_score);
                item.with_match(found)
            })
            .collect()
    }
}

fn to_item(raw: RawItem, line: &Line, strategy: Strategy) -> ExtractedItem {
    ExtractedItem::new(raw.name, raw.quantity, raw.unit_price)
        .with_code(raw.code)
        .with_origin(line.number, strategy)
}

impl Default for InvoiceItemParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for InvoiceItemParser {
    fn parse(&self, text: &str, catalog: &CatalogSnapshot) -> ExtractionResult {
        let start = Instant::now();
        let lines_total = text.lines().count();

        info!(
            "Parsing invoice items from {} lines ({} characters)",
            lines_total,
            text.len()
        );

        let candidates = self.classifier().classify(text);
        let header_detected = !candidates.is_permissive();
        let lines: Vec<Line> = candidates.collect();

        let (strategy, items) = match self.run_pipeline(&lines) {
            Some((strategy, items)) => (Some(strategy), items),
            None => (None, Vec::new()),
        };
        let items = self.annotate(items, catalog);

        let header = if self.config.extraction.extract_header {
            self.extract_header(text)
        } else {
            InvoiceHeader::default()
        };

        let mut result = ExtractionResult {
            header,
            items,
            warnings: Vec::new(),
            stats: ExtractionStats {
                lines_total,
                candidate_lines: lines.len(),
                header_detected,
                strategy,
            },
            processing_time_ms: 0,
        };
        result.warnings = result.validate();
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Extracted {} items ({} matched) with {} warnings",
            result.items.len(),
            result.matched_count(),
            result.warnings.len()
        );

        result
    }
}
