//! Document-level extraction results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::item::{ExtractedItem, Strategy};

/// Header fields of a Chilean supplier invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Folio (invoice number).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folio: Option<String>,

    /// Date the invoice was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,

    /// Supplier RUT, formatted `76.123.456-7`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_rut: Option<String>,

    /// Labeled net total (before tax) in pesos.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_total: Option<u64>,

    /// Labeled document total in pesos.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_total: Option<u64>,
}

impl InvoiceHeader {
    pub fn is_empty(&self) -> bool {
        self.folio.is_none()
            && self.issue_date.is_none()
            && self.supplier_rut.is_none()
            && self.net_total.is_none()
            && self.document_total.is_none()
    }
}

/// Counters describing one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Lines in the input text.
    pub lines_total: usize,

    /// Lines that survived classification.
    pub candidate_lines: usize,

    /// Whether a table header was found.
    pub header_detected: bool,

    /// Stage that produced the items, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

/// Result of extracting one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub header: InvoiceHeader,

    /// Items in document order.
    pub items: Vec<ExtractedItem>,

    /// Extraction warnings for the reviewer.
    pub warnings: Vec<String>,

    pub stats: ExtractionStats,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Sum of item subtotals.
    pub fn items_total(&self) -> u64 {
        self.items.iter().map(|item| item.subtotal).sum()
    }

    /// Items with a catalog suggestion.
    pub fn matched_count(&self) -> usize {
        self.items.iter().filter(|item| item.matched).count()
    }

    /// Check the result for consistency issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.items.is_empty() {
            issues.push("No items detected, enter items manually".to_string());
        }

        for (index, item) in self.items.iter().enumerate() {
            for issue in item.validate() {
                issues.push(format!("Item {}: {}", index + 1, issue));
            }
        }

        // item prices are net of tax
        let expected = self.header.net_total.or(self.header.document_total);
        if let Some(total) = expected {
            let items_total = self.items_total();
            if !self.items.is_empty() && items_total != total {
                issues.push(format!(
                    "Items total ({}) differs from document total ({})",
                    items_total, total
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(items: Vec<ExtractedItem>, document_total: Option<u64>) -> ExtractionResult {
        ExtractionResult {
            header: InvoiceHeader {
                document_total,
                ..Default::default()
            },
            items,
            ..Default::default()
        }
    }

    #[test]
    fn test_items_total() {
        let result = result(
            vec![
                ExtractedItem::new("PRODUCTO A", 1, 15_000),
                ExtractedItem::new("PRODUCTO B", 3, 2_000),
            ],
            Some(21_000),
        );

        assert_eq!(result.items_total(), 21_000);
        assert!(result.validate().is_empty());
    }

    #[test]
    fn test_total_mismatch_is_reported() {
        let result = result(vec![ExtractedItem::new("PRODUCTO A", 1, 15_000)], Some(17_850));
        let issues = result.validate();

        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("17850"));
    }

    #[test]
    fn test_net_total_is_preferred() {
        let mut result = result(vec![ExtractedItem::new("PRODUCTO A", 1, 15_000)], Some(17_850));
        result.header.net_total = Some(15_000);

        assert!(result.validate().is_empty());
    }

    #[test]
    fn test_empty_result() {
        let result = result(Vec::new(), None);

        assert_eq!(result.validate(), vec!["No items detected, enter items manually"]);
        assert_eq!(result.matched_count(), 0);
        assert!(result.header.is_empty());
    }
}
