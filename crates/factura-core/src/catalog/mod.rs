//! Read-only product catalog snapshot used for best-effort matching.
//!
//! A snapshot is built once from the caller's product list and never changes
//! afterwards. It can be shared across threads and reused for many documents.

mod matcher;

pub use matcher::match_product;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::models::item::ProductRef;

/// Keywords must be longer than this many characters.
pub(crate) const MIN_KEYWORD_CHARS: usize = 3;

/// A product record supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl CatalogProduct {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sku: None,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }
}

#[derive(Debug, Clone)]
struct IndexEntry {
    key: String,
    product: usize,
}

/// Immutable index from normalized names and keywords to products.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: Vec<ProductRef>,
    entries: Vec<IndexEntry>,
}

impl CatalogSnapshot {
    /// A snapshot with no products; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index.
    ///
    /// Full-name keys come first, then keyword keys (words longer than three
    /// characters). When two products share a key the first one keeps it.
    pub fn build(records: &[CatalogProduct]) -> std::result::Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        let mut products = Vec::with_capacity(records.len());

        for record in records {
            if !ids.insert(record.id) {
                return Err(CatalogError::DuplicateId(record.id));
            }
            if normalize_name(&record.name).is_empty() {
                return Err(CatalogError::EmptyName(record.id));
            }
            products.push(ProductRef {
                id: record.id,
                name: record.name.trim().to_string(),
                sku: record.sku.clone(),
            });
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (index, product) in products.iter().enumerate() {
            let key = normalize_name(&product.name);
            if seen.insert(key.clone()) {
                entries.push(IndexEntry { key, product: index });
            }
        }

        for (index, product) in products.iter().enumerate() {
            for word in normalize_name(&product.name).split(' ') {
                if word.chars().count() > MIN_KEYWORD_CHARS && seen.insert(word.to_string()) {
                    entries.push(IndexEntry {
                        key: word.to_string(),
                        product: index,
                    });
                }
            }
        }

        debug!(
            "Built catalog snapshot: {} products, {} keys",
            products.len(),
            entries.len()
        );

        Ok(Self { products, entries })
    }

    /// Decode a JSON array of products and build the index.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<CatalogProduct> =
            serde_json::from_str(json).map_err(|e| CatalogError::Decode(e.to_string()))?;
        Ok(Self::build(&records)?)
    }

    /// Load a JSON catalog file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[ProductRef] {
        &self.products
    }

    /// Number of lookup keys (full names plus keywords).
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Index keys with their products, in lookup order.
    pub(crate) fn keys(&self) -> impl Iterator<Item = (&str, &ProductRef)> {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), &self.products[entry.product]))
    }
}

/// Lower-case, trim and collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
