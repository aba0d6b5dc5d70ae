//! Amount parsing for Chilean invoices.
//!
//! Chilean documents write `15.000` for fifteen thousand and `1.200,50` for
//! one thousand two hundred and a half. Peso amounts on supplier invoices are
//! whole units, so fractions are parsed exactly and then truncated.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

use super::ExtractionMatch;
use super::patterns::{AMOUNT_GRAMMAR, DOCUMENT_TOTAL, NET_TOTAL};

/// Largest amount accepted as a real price or total.
pub const MAX_AMOUNT: u64 = 10_000_000;

/// Lower bound for a price on structured rows.
pub const MIN_PRICE: u64 = 1_000;

/// Lower bound for a price in the table-row fallback.
pub const RELAXED_MIN_PRICE: u64 = 100;

/// Upper bound for a quantity on structured rows.
pub const MAX_QUANTITY: u32 = 100;

/// Upper bound for a quantity in the fallback strategies.
pub const FALLBACK_MAX_QUANTITY: u32 = 1_000;

/// A largest amount this many times above the runner-up is a total column.
pub const TOTAL_COLUMN_RATIO: u64 = 10;

/// Minimum number of integer digits for a token to count as money on its own.
const MIN_AMOUNT_DIGITS: usize = 4;

/// Parse a Chilean-formatted number into its exact decimal value.
///
/// Accepts `\d{1,3}(\.\d{3})*(,\d+)?` and bare digit runs with an optional
/// `,\d+` fraction. Anything else returns `None`.
pub fn parse_chilean_decimal(token: &str) -> Option<Decimal> {
    let token = token.trim();
    if !AMOUNT_GRAMMAR.is_match(token) {
        return None;
    }

    let normalized = token.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

/// Parse any Chilean-formatted number, truncating the fraction.
///
/// Values above [`MAX_AMOUNT`] are rejected.
pub fn parse_number(token: &str) -> Option<u64> {
    let value = parse_chilean_decimal(token)?.trunc().to_u64()?;
    (value <= MAX_AMOUNT).then_some(value)
}

/// Parse a token that is plausible as a peso amount on its own.
///
/// Same grammar as [`parse_number`], but the integer part must have at least
/// four digits: `"19.500"` and `"25000"` parse, `"12"` and `"999"` do not.
pub fn parse_amount(token: &str) -> Option<u64> {
    if integer_digits(token) < MIN_AMOUNT_DIGITS {
        return None;
    }
    parse_number(token)
}

fn integer_digits(token: &str) -> usize {
    token
        .trim()
        .split(',')
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_digit())
        .count()
}

/// Quantities on structured rows.
pub fn looks_like_quantity(n: u64) -> bool {
    (1..=u64::from(MAX_QUANTITY)).contains(&n)
}

/// Quantities in the fallback strategies.
pub fn looks_like_fallback_quantity(n: u64) -> bool {
    (1..=u64::from(FALLBACK_MAX_QUANTITY)).contains(&n)
}

pub fn looks_like_price(n: u64) -> bool {
    n >= MIN_PRICE
}

/// Choose the unit price among the amounts found on one row.
///
/// Takes the largest amount, unless it is more than `ratio` times the
/// second-largest; that shape is read as a line-total column, and the
/// second-largest is returned instead.
pub fn select_price(amounts: &[u64], ratio: u64) -> Option<u64> {
    let mut sorted = amounts.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    match sorted.as_slice() {
        [] => None,
        [only] => Some(*only),
        [largest, second, ..] => {
            if *largest > second.saturating_mul(ratio) {
                Some(*second)
            } else {
                Some(*largest)
            }
        }
    }
}

/// Format an amount in Chilean style (`$15.000`).
pub fn format_clp(amount: u64) -> String {
    let digits = amount.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    formatted.push('$');

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(c);
    }

    formatted
}

/// Extract the labeled document total ("Total: $12.345").
///
/// The last labeled total wins; the grand total closes the totals block.
pub fn extract_document_total(text: &str) -> Option<ExtractionMatch<u64>> {
    DOCUMENT_TOTAL
        .captures_iter(text)
        .filter_map(|caps| {
            let full_match = caps.get(0)?;
            let value = parse_number(&caps[1])?;
            Some(
                ExtractionMatch::new(value, 0.9, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            )
        })
        .last()
}

/// Extract the labeled net total ("Subtotal", "Neto").
pub fn extract_net_total(text: &str) -> Option<ExtractionMatch<u64>> {
    NET_TOTAL.captures_iter(text).find_map(|caps| {
        let full_match = caps.get(0)?;
        let value = parse_number(&caps[1])?;
        Some(
            ExtractionMatch::new(value, 0.85, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    })
}
