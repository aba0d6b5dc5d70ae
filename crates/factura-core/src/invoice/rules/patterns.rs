//! Common regex patterns for Chilean invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Chilean money grammar: "." groups thousands, "," starts the decimals
    pub static ref AMOUNT_GRAMMAR: Regex = Regex::new(
        r"^(?:\d{1,3}(?:\.\d{3})+|\d+)(?:,\d+)?$"
    ).unwrap();

    // Numeric tokens inside free text ("15.000", "1.200,50", "25000", "3")
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(
        r"\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+(?:,\d+)?"
    ).unwrap();

    // Thousands-grouped amounts only ("15.000", "1.234.567")
    pub static ref GROUPED_AMOUNT: Regex = Regex::new(
        r"\b\d{1,3}(?:\.\d{3})+(?:,\d+)?\b"
    ).unwrap();

    pub static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();

    // Decimal pairs such as alcohol grades or percentages ("12,5", "40.5")
    pub static ref DECIMAL_PAIR: Regex = Regex::new(
        r"\b\d{1,2}[,.]\d\b"
    ).unwrap();

    // Product code at the start of a row, followed by a separator
    pub static ref CODED_ROW: Regex = Regex::new(
        r"^(\d{4,7})(?:\s*-\s*|\s+)(\S.*)$"
    ).unwrap();

    // Secondary alphanumeric code leading the description ("AB123", "7801234567890")
    pub static ref SECONDARY_CODE: Regex = Regex::new(
        r"^[A-Za-z]{0,4}\d[A-Za-z0-9-]*\s+"
    ).unwrap();

    pub static ref LEADING_NUMBER: Regex = Regex::new(r"^\d+\s*").unwrap();

    // Chilean RUT (tax id): 76.123.456-7, 76123456-K
    pub static ref RUT_PATTERN: Regex = Regex::new(
        r"(?i)(?:R\.?\s*U\.?\s*T\.?)[\s:]*(\d{1,2}\.?\d{3}\.?\d{3})\s*-\s*([\dK])\b"
    ).unwrap();

    pub static ref RUT_STANDALONE: Regex = Regex::new(
        r"(?i)\b(\d{1,2}\.\d{3}\.\d{3}|\d{7,8})-([\dK])\b"
    ).unwrap();

    // Dates
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_SPANISH_LONG: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+de\s+(enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|setiembre|octubre|noviembre|diciembre)\s+(?:del?\s+)?(\d{4})\b"
    ).unwrap();

    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"(?i)fecha(?:\s+de)?(?:\s+emisi[oó]n)?[\s:]*(.+?)(?:\n|$)"
    ).unwrap();

    // Folio / invoice number
    pub static ref FOLIO_LABELED: Regex = Regex::new(
        r"(?i)factura(?:\s+electr[oó]nica)?\s*n[°ºo]?\.?\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref FOLIO_KEYWORD: Regex = Regex::new(
        r"(?i)\bfolio\s*(?:n[°ºo]?\.?)?\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref FOLIO_HASH: Regex = Regex::new(
        r"(?i)factura\s*#\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref FOLIO_NUMBER_SIGN: Regex = Regex::new(
        r"(?i)\bn[°º]?\.?\s*:?\s*(\d{4,})\b"
    ).unwrap();

    // Net total before tax ("Subtotal 15.000", "Monto Neto: $15.000")
    pub static ref NET_TOTAL: Regex = Regex::new(
        r"(?i)\b(?:sub\s*-?\s*total|monto\s+neto|neto)\s*:?\s*\$?\s*(\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+(?:,\d+)?)"
    ).unwrap();

    // Document total ("Total: $12.345")
    pub static ref DOCUMENT_TOTAL: Regex = Regex::new(
        r"(?i)\btotal\s*:?\s*\$?\s*(\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+(?:,\d+)?)"
    ).unwrap();
}
