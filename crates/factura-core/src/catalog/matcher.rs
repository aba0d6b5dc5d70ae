//! Name-to-product matching.

use tracing::trace;

use super::{normalize_name, CatalogSnapshot, MIN_KEYWORD_CHARS};
use crate::models::item::{CatalogMatch, MatchKind, ProductRef};

/// Default minimum keyword score.
pub const DEFAULT_MIN_KEYWORD_SCORE: u32 = 1;

impl CatalogSnapshot {
    /// Best-effort match for an extracted product name.
    pub fn find_match(&self, name: &str) -> Option<CatalogMatch> {
        self.find_match_with(name, DEFAULT_MIN_KEYWORD_SCORE)
    }

    /// Match with an explicit minimum keyword score.
    ///
    /// Tries, in order: an exact key, a key and name where one contains the
    /// other, and finally keyword overlap scoring.
    pub fn find_match_with(&self, name: &str, min_score: u32) -> Option<CatalogMatch> {
        let name = normalize_name(name);
        if name.is_empty() || self.is_empty() {
            return None;
        }

        if let Some((_, product)) = self.keys().find(|(key, _)| *key == name) {
            return Some(found(product, MatchKind::Exact));
        }

        if let Some((_, product)) = self
            .keys()
            .find(|(key, _)| name.contains(key) || key.contains(name.as_str()))
        {
            return Some(found(product, MatchKind::Substring));
        }

        let words: Vec<&str> = name.split(' ').collect();
        let mut best: Option<(u32, &ProductRef)> = None;

        for (key, product) in self.keys() {
            let score = keyword_score(&words, key);
            if score >= min_score && best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, product));
            }
        }

        let (score, product) = best?;
        trace!(name = %name, product = product.id, score, "Keyword match");
        Some(found(product, MatchKind::Keyword { score }))
    }
}

/// +1 per name word longer than three characters found in the key, +2 when
/// the key itself sits inside a name word.
fn keyword_score(words: &[&str], key: &str) -> u32 {
    let overlap = words
        .iter()
        .filter(|word| word.chars().count() > MIN_KEYWORD_CHARS && key.contains(**word))
        .count() as u32;
    let contained = if words.iter().any(|word| word.contains(key)) { 2 } else { 0 };

    overlap + contained
}

fn found(product: &ProductRef, kind: MatchKind) -> CatalogMatch {
    CatalogMatch {
        product: product.clone(),
        kind,
    }
}

/// Match `name` against `catalog`, returning the product reference only.
pub fn match_product(name: &str, catalog: &CatalogSnapshot) -> Option<ProductRef> {
    catalog.find_match(name).map(|m| m.product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogProduct;
    use pretty_assertions::assert_eq;

    fn catalog(names: &[&str]) -> CatalogSnapshot {
        let records: Vec<CatalogProduct> = names
            .iter()
            .enumerate()
            .map(|(i, name)| CatalogProduct::new(i as u64 + 1, *name))
            .collect();
        CatalogSnapshot::build(&records).unwrap()
    }

    #[test]
    fn test_substring_match() {
        let catalog = catalog(&["Whisky Reserva 12 Años"]);
        let found = catalog.find_match("WHISKY RESERVA").unwrap();

        assert_eq!(found.product.id, 1);
        assert_eq!(found.kind, MatchKind::Substring);
    }

    #[test]
    fn test_no_match() {
        let catalog = catalog(&["Whisky Reserva 12 Años"]);
        assert_eq!(catalog.find_match("CLAVOS 2 PULGADAS"), None);
        assert_eq!(match_product("CLAVOS 2 PULGADAS", &catalog), None);
    }

    #[test]
    fn test_exact_match_wins_over_substring() {
        let catalog = catalog(&["Pisco Especial 35", "Pisco"]);
        let found = catalog.find_match("  pisco ").unwrap();

        assert_eq!(found.product.id, 2);
        assert_eq!(found.kind, MatchKind::Exact);
    }

    #[test]
    fn test_keyword_match() {
        let catalog = catalog(&["Aceite Maravilla 1L", "Arroz Grado 2"]);
        // "aceit" sits inside a key but no key sits inside the name
        let found = catalog.find_match("ACEIT GIRASOL").unwrap();

        assert_eq!(found.product.id, 1);
        assert_eq!(found.kind, MatchKind::Keyword { score: 1 });

        let found = catalog.find_match("ACEITE GIRASOL").unwrap();
        assert_eq!(found.kind, MatchKind::Substring);
    }

    #[test]
    fn test_keyword_min_score() {
        let catalog = catalog(&["Aceite Maravilla 1L"]);
        assert!(catalog.find_match_with("ACEIT GIRASOL", 2).is_none());
    }

    #[test]
    fn test_empty_catalog_and_name() {
        assert_eq!(CatalogSnapshot::empty().find_match("WHISKY"), None);
        assert_eq!(catalog(&["Whisky"]).find_match("   "), None);
    }

    #[test]
    fn test_keyword_score() {
        assert_eq!(keyword_score(&["aceite", "girasol"], "aceite maravilla 1l"), 1);
        assert_eq!(keyword_score(&["coca-cola", "zero"], "cola"), 2);
        assert_eq!(keyword_score(&["sal"], "sal de mar"), 0);
    }
}
