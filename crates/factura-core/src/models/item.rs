//! Extracted line items and their catalog annotations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extraction strategy that produced an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Row opening with a 4-7 digit product code.
    CodedRow,
    /// Row without a code, priced by its largest amount.
    UncodedRow,
    /// Last-resort multi-number row.
    TableRow,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::CodedRow => "coded_row",
            Strategy::UncodedRow => "uncoded_row",
            Strategy::TableRow => "table_row",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weak reference to a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// How a catalog match was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    /// Normalized name equals a catalog key.
    Exact,
    /// One of name and key contains the other.
    Substring,
    /// Keyword overlap with the given score.
    Keyword { score: u32 },
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Exact => f.write_str("exact"),
            MatchKind::Substring => f.write_str("substring"),
            MatchKind::Keyword { score } => write!(f, "keyword({})", score),
        }
    }
}

/// A best-effort catalog match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMatch {
    pub product: ProductRef,
    pub kind: MatchKind,
}

/// One product row recovered from an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedItem {
    /// Cleaned product description.
    pub raw_name: String,

    /// Units bought (at least 1).
    pub quantity: u32,

    /// Unit price in whole pesos.
    pub unit_price: u64,

    /// `unit_price * quantity`, always computed.
    pub subtotal: u64,

    /// Suggested catalog product, for review.
    pub matched_product: Option<ProductRef>,

    /// True iff `matched_product` is set.
    pub matched: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_kind: Option<MatchKind>,

    /// Product code leading the row, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// 1-based line number in the source text.
    pub line_number: usize,

    pub strategy: Strategy,
}

impl ExtractedItem {
    /// Create an unmatched item; the subtotal is computed here.
    pub fn new(raw_name: impl Into<String>, quantity: u32, unit_price: u64) -> Self {
        let quantity = quantity.max(1);
        Self {
            raw_name: raw_name.into(),
            quantity,
            unit_price,
            subtotal: unit_price * u64::from(quantity),
            matched_product: None,
            matched: false,
            match_kind: None,
            code: None,
            line_number: 0,
            strategy: Strategy::CodedRow,
        }
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    /// Record where the item came from.
    pub fn with_origin(mut self, line_number: usize, strategy: Strategy) -> Self {
        self.line_number = line_number;
        self.strategy = strategy;
        self
    }

    /// Attach (or clear) a catalog match, keeping `matched` in sync.
    pub fn with_match(mut self, found: Option<CatalogMatch>) -> Self {
        match found {
            Some(CatalogMatch { product, kind }) => {
                self.matched_product = Some(product);
                self.match_kind = Some(kind);
                self.matched = true;
            }
            None => {
                self.matched_product = None;
                self.match_kind = None;
                self.matched = false;
            }
        }
        self
    }

    /// Check the item invariants. Returns a list of violations.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.quantity == 0 {
            issues.push("Quantity is zero".to_string());
        }
        if self.subtotal != self.unit_price * u64::from(self.quantity) {
            issues.push(format!(
                "Subtotal {} differs from {} x {}",
                self.subtotal, self.quantity, self.unit_price
            ));
        }
        if self.raw_name.chars().count() < 3 {
            issues.push(format!("Name '{}' is too short", self.raw_name));
        }
        if !self.raw_name.chars().any(char::is_alphabetic) {
            issues.push(format!("Name '{}' has no letters", self.raw_name));
        }
        if self.matched != self.matched_product.is_some() {
            issues.push("Matched flag out of sync with product".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn whisky() -> CatalogMatch {
        CatalogMatch {
            product: ProductRef {
                id: 1,
                name: "Whisky Reserva 12 Años".to_string(),
                sku: None,
            },
            kind: MatchKind::Substring,
        }
    }

    #[test]
    fn test_subtotal_is_computed() {
        let item = ExtractedItem::new("WHISKY RESERVA", 2, 25_000);
        assert_eq!(item.subtotal, 50_000);
        assert!(item.validate().is_empty());
    }

    #[test]
    fn test_zero_quantity_defaults_to_one() {
        let item = ExtractedItem::new("ACEITE", 0, 1_990);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.subtotal, 1_990);
    }

    #[test]
    fn test_with_match_keeps_flag_in_sync() {
        let item = ExtractedItem::new("WHISKY RESERVA", 1, 25_000).with_match(Some(whisky()));
        assert!(item.matched);
        assert_eq!(item.matched_product.as_ref().map(|p| p.id), Some(1));
        assert_eq!(item.match_kind, Some(MatchKind::Substring));

        let item = item.with_match(None);
        assert!(!item.matched);
        assert!(item.match_kind.is_none());
        assert!(item.validate().is_empty());
    }

    #[test]
    fn test_serialization_shape() {
        let item = ExtractedItem::new("WHISKY RESERVA", 2, 25_000)
            .with_origin(4, Strategy::UncodedRow)
            .with_match(Some(CatalogMatch {
                kind: MatchKind::Keyword { score: 2 },
                ..whisky()
            }));
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["strategy"], "uncoded_row");
        assert_eq!(json["match_kind"]["kind"], "keyword");
        assert_eq!(json["match_kind"]["score"], 2);
        assert_eq!(json["matched_product"]["id"], 1);
        assert!(json.get("code").is_none());
    }
}
