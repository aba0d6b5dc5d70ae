//! Folio (invoice number) extraction.

use super::ExtractionMatch;
use super::patterns::{FOLIO_HASH, FOLIO_KEYWORD, FOLIO_LABELED, FOLIO_NUMBER_SIGN};

/// Extract the invoice folio, trying the most specific labels first.
pub fn extract_folio(text: &str) -> Option<ExtractionMatch<String>> {
    let patterns = [
        (&*FOLIO_LABELED, 0.95),
        (&*FOLIO_KEYWORD, 0.9),
        (&*FOLIO_HASH, 0.9),
        (&*FOLIO_NUMBER_SIGN, 0.6),
    ];

    patterns.into_iter().find_map(|(pattern, confidence)| {
        let caps = pattern.captures(text)?;
        let full_match = caps.get(0)?;
        Some(
            ExtractionMatch::new(caps[1].to_string(), confidence, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_folio_labeled() {
        let folio = extract_folio("FACTURA ELECTRONICA N° 004521").unwrap();
        assert_eq!(folio.value, "004521");
        assert_eq!(extract_folio("Factura Nº: 12345").unwrap().value, "12345");
    }

    #[test]
    fn test_extract_folio_keyword_and_hash() {
        assert_eq!(extract_folio("Folio 778").unwrap().value, "778");
        assert_eq!(extract_folio("Factura # 991").unwrap().value, "991");
    }

    #[test]
    fn test_extract_folio_number_sign() {
        let folio = extract_folio("DOCUMENTO TRIBUTARIO\nN°: 88123").unwrap();
        assert_eq!(folio.value, "88123");
        assert!(folio.confidence < 0.9);
    }

    #[test]
    fn test_no_folio() {
        assert!(extract_folio("VINO TINTO 2 4.990").is_none());
    }
}
