//! Keyword tables used by the line classifier and the name cleaner.
//!
//! Entries are stored lower-case and without accents; see [`normalize_word`].

use std::collections::HashSet;

use crate::models::config::VocabularyConfig;

/// Column titles of an item table header.
pub const HEADER_KEYWORDS: &[&str] = &[
    "codigo", "cod", "descripcion", "detalle", "precio", "cantidad", "cant", "grado",
    "unidad", "u.m", "um", "item", "producto", "productos", "articulo", "valor",
    "unitario", "p.unit", "descuento",
];

/// Words of the totals block that closes an item table.
pub const FOOTER_KEYWORDS: &[&str] = &[
    "subtotal", "sub-total", "total", "totales", "neto", "iva", "exento", "impuesto",
    "impuestos", "monto",
];

/// First words of document metadata lines (parties, contact, dates, folio).
pub const METADATA_PREFIXES: &[&str] = &[
    "cliente", "proveedor", "señor", "señores", "senor", "senores", "sr", "sres", "rut",
    "r.u.t", "giro", "direccion", "domicilio", "comuna", "ciudad", "region", "fono",
    "telefono", "tel", "celular", "email", "e-mail", "correo", "fecha", "emision",
    "vencimiento", "factura", "boleta", "guia", "folio", "razon", "nombre", "vendedor",
    "condicion", "forma", "oc", "timbre", "resolucion", "sii", "www", "web", "despacho",
    "atencion", "contacto", "av", "avda", "avenida", "calle", "pasaje", "sucursal", "casa",
];

/// Unit-of-measure abbreviations that leak into product names.
pub const UNIT_ABBREVIATIONS: &[&str] = &[
    "cj", "cjs", "un", "und", "uds", "kg", "kgs", "lt", "lts", "pz", "um", "gl", "ml", "cl",
    "cc", "gr", "kl", "mt", "doc", "bot", "paq", "bx",
];

/// Header words that leak into product names.
pub const EXCLUDED_WORDS: &[&str] = &[
    "codigo", "cod", "descripcion", "detalle", "cantidad", "cant", "precio", "unit",
    "unitario", "p.unit", "unidad", "descuento", "dcto", "valor", "ptax", "um", "u.m",
    "item", "alcoh",
];

/// A cleaned name starting with one of these is a party or totals field.
pub const NAME_PREFIX_DENYLIST: &[&str] = &[
    "cliente", "proveedor", "señor", "señores", "senor", "senores", "sr", "sres", "rut",
    "r.u.t", "giro", "direccion", "fono", "telefono", "email", "fecha", "factura",
    "boleta", "razon", "vendedor", "comuna", "ciudad", "total", "subtotal", "neto",
    "iva", "monto",
];

/// One-letter words kept in names (Spanish conjunctions and prepositions).
pub const SINGLE_CHAR_WORDS: &[&str] = &["y", "e", "o", "u", "a"];

/// Lower-case a word, drop accents and strip surrounding punctuation.
///
/// `ñ` is kept; `"Código:"` becomes `"codigo"`, `"U.M."` becomes `"u.m"`.
pub fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| matches!(c, '.' | ',' | ':' | ';' | '$' | '-'))
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect()
}

/// The part of a word before any `$` or digit (`"TOTAL$30.000"` gives `"TOTAL"`).
pub fn keyword_part(word: &str) -> &str {
    word.split(|c: char| c == '$' || c.is_ascii_digit())
        .next()
        .unwrap_or(word)
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        other => other,
    }
}

/// The keyword tables in effect for one parser.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    header_keywords: HashSet<String>,
    footer_keywords: HashSet<String>,
    metadata_prefixes: HashSet<String>,
    unit_abbreviations: HashSet<String>,
    excluded_words: HashSet<String>,
    name_prefix_denylist: HashSet<String>,
    single_char_words: HashSet<String>,
}

impl Vocabulary {
    /// The built-in tables.
    pub fn standard() -> Self {
        Self::with_extras(&VocabularyConfig::default())
    }

    /// The built-in tables extended with configured words.
    pub fn with_extras(extra: &VocabularyConfig) -> Self {
        Self {
            header_keywords: table(HEADER_KEYWORDS, &extra.header_keywords),
            footer_keywords: table(FOOTER_KEYWORDS, &extra.footer_keywords),
            metadata_prefixes: table(METADATA_PREFIXES, &extra.metadata_prefixes),
            unit_abbreviations: table(UNIT_ABBREVIATIONS, &extra.unit_abbreviations),
            excluded_words: table(EXCLUDED_WORDS, &extra.excluded_words),
            name_prefix_denylist: table(NAME_PREFIX_DENYLIST, &extra.name_prefix_denylist),
            single_char_words: table(SINGLE_CHAR_WORDS, &[]),
        }
    }

    pub fn is_header_keyword(&self, word: &str) -> bool {
        self.header_keywords.contains(&normalize_word(word))
    }

    pub fn is_footer_keyword(&self, word: &str) -> bool {
        self.footer_keywords.contains(&normalize_word(word))
    }

    pub fn is_metadata_prefix(&self, word: &str) -> bool {
        self.metadata_prefixes.contains(&normalize_word(word))
    }

    /// Unit abbreviations and header-leakage words.
    pub fn is_noise_word(&self, word: &str) -> bool {
        let word = normalize_word(word);
        self.unit_abbreviations.contains(&word) || self.excluded_words.contains(&word)
    }

    pub fn is_denied_name_prefix(&self, word: &str) -> bool {
        self.name_prefix_denylist.contains(&normalize_word(word))
    }

    pub fn keeps_single_char(&self, word: &str) -> bool {
        self.single_char_words.contains(&normalize_word(word))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

fn table(builtin: &[&str], extra: &[String]) -> HashSet<String> {
    builtin
        .iter()
        .map(|w| normalize_word(w))
        .chain(extra.iter().map(|w| normalize_word(w)))
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("Código:"), "codigo");
        assert_eq!(normalize_word("U.M."), "u.m");
        assert_eq!(normalize_word("SEÑORES"), "señores");
        assert_eq!(normalize_word("$"), "");
    }

    #[test]
    fn test_keyword_part() {
        assert_eq!(keyword_part("TOTAL$30.000"), "TOTAL");
        assert_eq!(keyword_part("SUBTOTAL15.000"), "SUBTOTAL");
        assert_eq!(keyword_part("Neto:"), "Neto:");
        assert_eq!(keyword_part("$15.000"), "");
    }

    #[test]
    fn test_address_openers_are_metadata() {
        let vocabulary = Vocabulary::standard();

        for word in ["Av.", "AVDA", "Avenida", "Calle", "Pasaje", "Sucursal", "Casa"] {
            assert!(vocabulary.is_metadata_prefix(word), "{}", word);
        }
    }

    #[test]
    fn test_standard_tables() {
        let vocabulary = Vocabulary::standard();

        assert!(vocabulary.is_header_keyword("DESCRIPCIÓN"));
        assert!(vocabulary.is_footer_keyword("SUBTOTAL"));
        assert!(vocabulary.is_metadata_prefix("Fono"));
        assert!(vocabulary.is_noise_word("KG"));
        assert!(vocabulary.is_noise_word("cantidad"));
        assert!(!vocabulary.is_noise_word("whisky"));
        assert!(vocabulary.is_denied_name_prefix("Cliente"));
        assert!(vocabulary.keeps_single_char("Y"));
        assert!(!vocabulary.keeps_single_char("x"));
    }

    #[test]
    fn test_extras_extend_tables() {
        let extra = VocabularyConfig {
            unit_abbreviations: vec!["DISP".to_string()],
            ..Default::default()
        };
        let vocabulary = Vocabulary::with_extras(&extra);

        assert!(vocabulary.is_noise_word("disp"));
        assert!(vocabulary.is_noise_word("ml"));
        assert!(!Vocabulary::standard().is_noise_word("disp"));
    }
}
