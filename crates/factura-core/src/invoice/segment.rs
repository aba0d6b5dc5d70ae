//! Text segmentation helpers shared by the classifier and the strategies.

use super::rules::amounts::{parse_amount, parse_number};
use super::rules::patterns::{
    CODED_ROW, DECIMAL_PAIR, DIGIT_RUN, GROUPED_AMOUNT, LEADING_NUMBER, NUMERIC_TOKEN,
    SECONDARY_CODE,
};
use super::vocabulary::Vocabulary;

/// A number found in a line, with byte offsets into that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericToken {
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// Value under the lenient grammar ([`parse_number`]).
    pub value: Option<u64>,
    /// Value as a stand-alone peso amount ([`parse_amount`]).
    pub amount: Option<u64>,
}

/// A free-standing 1-3 digit number: a quantity candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BareNumber {
    pub value: u64,
    pub start: usize,
    pub end: usize,
}

/// Replace everything except letters, digits and `. , $ -` with spaces and
/// collapse whitespace.
pub fn clean_line(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | ',' | '$' | '-') {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a coded row into its 4-7 digit product code and the rest.
pub fn split_code_and_rest(text: &str) -> Option<(&str, &str)> {
    let caps = CODED_ROW.captures(text)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// True when the text opens with a 4-7 digit product code.
pub fn starts_with_code(text: &str) -> bool {
    CODED_ROW.is_match(text)
}

/// All numeric tokens of a line in order of appearance.
pub fn find_numeric_tokens(text: &str) -> Vec<NumericToken> {
    NUMERIC_TOKEN
        .find_iter(text)
        .map(|m| NumericToken {
            text: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
            value: parse_number(m.as_str()),
            amount: parse_amount(m.as_str()),
        })
        .collect()
}

/// 1-3 digit numbers that are not part of a larger figure.
///
/// A run is rejected when it touches a letter or a `$`, or when it is joined
/// to more digits through `.`, `,` or `-` (thousands groups, decimals, RUTs).
pub fn find_bare_numbers(text: &str) -> Vec<BareNumber> {
    DIGIT_RUN
        .find_iter(text)
        .filter(|m| m.len() <= 3)
        .filter(|m| {
            let mut before = text[..m.start()].chars().rev();
            let mut after = text[m.end()..].chars();
            !touches_figure(before.next(), before.next())
                && !touches_figure(after.next(), after.next())
        })
        .filter_map(|m| {
            Some(BareNumber {
                value: m.as_str().parse().ok()?,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect()
}

fn touches_figure(adjacent: Option<char>, beyond: Option<char>) -> bool {
    match adjacent {
        Some(c) if c.is_alphanumeric() || c == '$' => true,
        Some('.' | ',' | '-') => beyond.is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// True when the text holds a thousands-grouped peso amount that is not the
/// body of a RUT (`76.123.456-7`).
pub fn has_grouped_amount(text: &str) -> bool {
    GROUPED_AMOUNT.find_iter(text).any(|m| {
        let mut after = text[m.end()..].chars();
        let is_rut = after.next() == Some('-')
            && after.next().is_some_and(|c| c.is_ascii_digit() || c.eq_ignore_ascii_case(&'k'));
        !is_rut && parse_amount(m.as_str()).is_some()
    })
}

/// Drop a leading secondary code such as `AB123` or an EAN.
pub fn strip_secondary_code(text: &str) -> &str {
    match SECONDARY_CODE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Drop a leading run of digits.
pub fn strip_leading_number(text: &str) -> &str {
    match LEADING_NUMBER.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Blank out grade and percentage figures (`12,5`, `40.5`).
pub fn strip_decimal_pairs(text: &str) -> String {
    DECIMAL_PAIR.replace_all(text, " ").into_owned()
}

/// Blank out every numeric token.
pub fn strip_numeric_tokens(text: &str) -> String {
    NUMERIC_TOKEN.replace_all(text, " ").into_owned()
}

/// Remove unit abbreviations, header-leakage words and stray one-letter
/// tokens, and collapse whitespace.
pub fn strip_known_noise_words(text: &str, vocabulary: &Vocabulary) -> String {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| matches!(c, '.' | ',' | '$' | '-')))
        .filter(|word| !word.is_empty())
        .filter(|word| !vocabulary.is_noise_word(word))
        .filter(|word| word.chars().count() > 1 || vocabulary.keeps_single_char(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn the descriptive part of a row into a product name.
///
/// Returns `None` when what is left is too short, has no letters, or opens
/// with a party/totals field word.
pub fn clean_name(text: &str, vocabulary: &Vocabulary, min_length: usize) -> Option<String> {
    let without_pairs = strip_decimal_pairs(text);
    let without_numbers = strip_numeric_tokens(&without_pairs);
    let name = strip_known_noise_words(&without_numbers, vocabulary);

    if name.chars().count() < min_length || !name.chars().any(char::is_alphabetic) {
        return None;
    }

    let first_word = name.split_whitespace().next()?;
    if vocabulary.is_denied_name_prefix(first_word) {
        return None;
    }

    Some(name)
}
