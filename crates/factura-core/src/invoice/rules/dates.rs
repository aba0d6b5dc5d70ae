//! Date extraction for Chilean invoices.

use chrono::NaiveDate;

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::{DATE_DMY, DATE_SPANISH_LONG, DATE_YMD, ISSUE_DATE};

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        // Chilean documents write DD/MM/YYYY or DD-MM-YYYY
        for caps in DATE_DMY.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);

            if let (Some(date), Some(full_match)) =
                (NaiveDate::from_ymd_opt(year, month, day), caps.get(0))
            {
                results.push(
                    ExtractionMatch::new(date, 0.9, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // ISO-like YYYY-MM-DD
        for caps in DATE_YMD.captures_iter(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);

            let (Some(date), Some(full_match)) =
                (NaiveDate::from_ymd_opt(year, month, day), caps.get(0))
            else {
                continue;
            };
            if results.iter().any(|r| r.value == date) {
                continue;
            }

            results.push(
                ExtractionMatch::new(date, 0.9, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        // "15 de enero de 2024"
        for caps in DATE_SPANISH_LONG.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month = spanish_month_to_number(&caps[2]);
            let year: i32 = caps[3].parse().unwrap_or(0);

            let (Some(date), Some(full_match)) =
                (NaiveDate::from_ymd_opt(year, month, day), caps.get(0))
            else {
                continue;
            };
            if results.iter().any(|r| r.value == date) {
                continue;
            }

            results.push(
                ExtractionMatch::new(date, 0.95, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        results.sort_by_key(|r| r.position.map(|(start, _)| start));
        results
    }
}

/// Extract the issue date, preferring a "Fecha (de emisión):" label.
pub fn extract_issue_date(text: &str) -> Option<ExtractionMatch<NaiveDate>> {
    let extractor = DateExtractor::new();

    for caps in ISSUE_DATE.captures_iter(text) {
        let date_text = &caps[1];
        if let Some(date) = extractor.extract(date_text) {
            return Some(ExtractionMatch::new(date.value, 0.95, date_text));
        }
    }

    extractor.extract(text)
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: 00-50 → 2000s, 51-99 → 1900s
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn spanish_month_to_number(month: &str) -> u32 {
    match month.to_lowercase().as_str() {
        "enero" => 1,
        "febrero" => 2,
        "marzo" => 3,
        "abril" => 4,
        "mayo" => 5,
        "junio" => 6,
        "julio" => 7,
        "agosto" => 8,
        "septiembre" | "setiembre" => 9,
        "octubre" => 10,
        "noviembre" => 11,
        "diciembre" => 12,
        _ => 0,
    }
}
