//! Line classification: decides which OCR lines may hold a product row.
//!
//! Lines are scanned in document order. A header line (column titles) opens a
//! product table and a totals line closes it; tables may reopen further down.
//! Documents without any header are scanned in permissive mode, where every
//! line that survives the length and metadata filters is a candidate.

use std::collections::HashSet;
use std::iter::Enumerate;
use std::str::Lines;

use tracing::trace;

use super::line::Line;
use super::rules::amounts::looks_like_price;
use super::segment::{has_grouped_amount, starts_with_code};
use super::vocabulary::{keyword_part, normalize_word, Vocabulary};

/// Default minimum length of a line that can hold an item row.
pub const DEFAULT_MIN_LINE_LENGTH: usize = 8;

/// Distinct column titles needed for a line to count as a table header.
const MIN_HEADER_KEYWORDS: usize = 2;

/// Splits document text into candidate product lines.
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier<'a> {
    vocabulary: &'a Vocabulary,
    min_line_length: usize,
}

impl<'a> LineClassifier<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self {
            vocabulary,
            min_line_length: DEFAULT_MIN_LINE_LENGTH,
        }
    }

    /// Set the minimum trimmed line length.
    pub fn with_min_line_length(mut self, min_line_length: usize) -> Self {
        self.min_line_length = min_line_length;
        self
    }

    /// Candidate lines of `text`, in document order.
    ///
    /// The returned iterator is lazy and can be cloned to restart the scan.
    pub fn classify<'t>(&self, text: &'t str) -> Candidates<'a, 't> {
        let permissive = !self.has_header(text);
        if permissive {
            trace!("No table header found, scanning in permissive mode");
        }

        Candidates {
            classifier: *self,
            lines: text.lines().enumerate(),
            permissive,
            in_table: false,
        }
    }

    /// True when any line of `text` is a table header.
    pub fn has_header(&self, text: &str) -> bool {
        text.lines()
            .filter(|raw| self.long_enough(raw))
            .any(|raw| self.is_header(&Line::new(0, raw)))
    }

    /// Column-title line: at least two distinct header keywords and no amount.
    pub fn is_header(&self, line: &Line) -> bool {
        if line.has_amount() {
            return false;
        }

        let keywords: HashSet<String> = line
            .words()
            .map(keyword_part)
            .filter(|word| self.vocabulary.is_header_keyword(word))
            .map(normalize_word)
            .collect();

        keywords.len() >= MIN_HEADER_KEYWORDS
    }

    /// Totals line: a footer keyword next to a money amount, on a line that
    /// does not open with a product code.
    ///
    /// The keyword may be glued to the amount (`TOTAL$30.000`).
    pub fn is_footer(&self, line: &Line) -> bool {
        line.words()
            .map(keyword_part)
            .any(|word| self.vocabulary.is_footer_keyword(word))
            && line.amounts().any(looks_like_price)
            && !starts_with_code(&line.cleaned)
    }

    /// Party, contact or document metadata line.
    ///
    /// A line opening with a metadata word is still kept when it starts with a
    /// product code or carries a grouped money amount that is not a RUT.
    pub fn is_metadata(&self, line: &Line) -> bool {
        let Some(first) = line.words().next() else {
            return false;
        };

        self.vocabulary.is_metadata_prefix(first)
            && !starts_with_code(&line.cleaned)
            && !has_grouped_amount(&line.cleaned)
    }

    fn long_enough(&self, raw: &str) -> bool {
        raw.trim().chars().count() >= self.min_line_length
    }
}

/// Lazy iterator over candidate lines.
#[derive(Debug, Clone)]
pub struct Candidates<'a, 't> {
    classifier: LineClassifier<'a>,
    lines: Enumerate<Lines<'t>>,
    permissive: bool,
    in_table: bool,
}

impl Candidates<'_, '_> {
    /// True when the document has no table header.
    pub fn is_permissive(&self) -> bool {
        self.permissive
    }
}

impl Iterator for Candidates<'_, '_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let classifier = self.classifier;

        for (index, raw) in self.lines.by_ref() {
            if !classifier.long_enough(raw) {
                continue;
            }

            let line = Line::new(index + 1, raw);

            if classifier.is_header(&line) {
                trace!(line = line.number, "Table header");
                self.in_table = true;
                continue;
            }

            if self.in_table && classifier.is_footer(&line) {
                trace!(line = line.number, "Table footer");
                self.in_table = false;
                continue;
            }

            if !self.permissive && !self.in_table {
                trace!(line = line.number, "Outside product table");
                continue;
            }

            if classifier.is_metadata(&line) {
                trace!(line = line.number, text = %line.original, "Metadata line");
                continue;
            }

            return Some(line);
        }

        None
    }
}
