//! Item extraction strategies.
//!
//! Each strategy is a pure function from a candidate [`Line`] to an optional
//! [`RawItem`]. The parser runs them as document-level stages in [`PIPELINE`]
//! order: a later stage only runs when every earlier one found nothing, except
//! that uncoded rows are also read from the lines a coded stage passed over.

use super::line::Line;
use super::rules::amounts::{
    looks_like_fallback_quantity, looks_like_price, looks_like_quantity, select_price,
    RELAXED_MIN_PRICE,
};
use super::segment::{
    clean_name, find_bare_numbers, find_numeric_tokens, split_code_and_rest,
    strip_leading_number, strip_secondary_code, NumericToken,
};
use super::vocabulary::Vocabulary;
use crate::models::config::ExtractionConfig;
use crate::models::item::Strategy;

/// Fields recovered from one line, before catalog matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub code: Option<String>,
}

/// Shared, read-only inputs of the strategies.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub vocabulary: &'a Vocabulary,
    pub config: &'a ExtractionConfig,
}

pub type StrategyFn = fn(&Line, &StrategyContext<'_>) -> Option<RawItem>;

/// Strategies in priority order.
pub const PIPELINE: [(Strategy, StrategyFn); 3] = [
    (Strategy::CodedRow, coded_row),
    (Strategy::UncodedRow, uncoded_row),
    (Strategy::TableRow, table_row),
];

/// Row opening with a 4-7 digit product code.
///
/// The price is picked by [`select_price`] among the amounts after the code
/// and any secondary code. The quantity is the smallest free-standing 1-100 number that differs from
/// the code.
pub fn coded_row(line: &Line, ctx: &StrategyContext<'_>) -> Option<RawItem> {
    let (code, rest) = split_code_and_rest(&line.cleaned)?;
    let description = strip_secondary_code(rest);

    let amounts: Vec<u64> = find_numeric_tokens(description)
        .iter()
        .filter_map(|token| token.amount)
        .filter(|&amount| looks_like_price(amount))
        .collect();
    let unit_price = select_price(&amounts, ctx.config.total_column_ratio)?;

    let code_value = code.parse::<u64>().ok();
    let quantity = find_bare_numbers(rest)
        .iter()
        .map(|n| n.value)
        .filter(|&n| looks_like_quantity(n) && Some(n) != code_value)
        .min()
        .unwrap_or(1);

    let name = clean_name(
        description,
        ctx.vocabulary,
        ctx.config.min_name_length,
    )?;

    Some(RawItem {
        name,
        quantity: to_quantity(quantity),
        unit_price,
        code: Some(code.to_string()),
    })
}

/// Row without a product code: the largest amount is the price and the name
/// is the text before it.
pub fn uncoded_row(line: &Line, ctx: &StrategyContext<'_>) -> Option<RawItem> {
    if line.len() < ctx.config.fallback_min_line_length {
        return None;
    }

    let price = first_largest(
        line.numbers
            .iter()
            .filter_map(|token| Some((token, token.amount?)))
            .filter(|&(_, amount)| looks_like_price(amount)),
    )?;

    let quantity = line
        .quantities
        .iter()
        .map(|n| n.value)
        .find(|&n| looks_like_fallback_quantity(n))
        .unwrap_or(1);

    let before_price = &line.cleaned[..price.0.start];
    let name = clean_name(
        strip_leading_number(before_price),
        ctx.vocabulary,
        ctx.config.min_name_length,
    )?;

    Some(RawItem {
        name,
        quantity: to_quantity(quantity),
        unit_price: price.1,
        code: None,
    })
}

/// Last-resort row with at least two numbers.
///
/// Takes the largest number of at least 1000 as the price, or failing that the
/// largest of at least 100.
pub fn table_row(line: &Line, ctx: &StrategyContext<'_>) -> Option<RawItem> {
    if line.len() < ctx.config.fallback_min_line_length || line.numbers.len() < 2 {
        return None;
    }

    let valued = || {
        line.numbers
            .iter()
            .enumerate()
            .filter_map(|(index, token)| Some(((index, token), token.value?)))
    };

    let ((price_index, _), unit_price) =
        first_largest(valued().filter(|&(_, value)| looks_like_price(value)))
            .or_else(|| first_largest(valued().filter(|&(_, value)| value >= RELAXED_MIN_PRICE)))?;

    let quantity = valued()
        .filter(|&((index, token), _)| index != price_index && is_plain_integer(token))
        .map(|(_, value)| value)
        .find(|&value| looks_like_quantity(value))
        .unwrap_or(1);

    let first_digit = line
        .cleaned
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(line.cleaned.len());
    let name = clean_name(
        &line.cleaned[..first_digit],
        ctx.vocabulary,
        ctx.config.min_name_length,
    )?;

    Some(RawItem {
        name,
        quantity: to_quantity(quantity),
        unit_price,
        code: None,
    })
}

/// The first entry holding the largest value.
fn first_largest<T>(entries: impl Iterator<Item = (T, u64)>) -> Option<(T, u64)> {
    entries.reduce(|best, entry| if entry.1 > best.1 { entry } else { best })
}

fn is_plain_integer(token: &NumericToken) -> bool {
    token.text.chars().all(|c| c.is_ascii_digit())
}

fn to_quantity(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(strategy: StrategyFn, text: &str) -> Option<RawItem> {
        let vocabulary = Vocabulary::standard();
        let config = ExtractionConfig::default();
        let ctx = StrategyContext {
            vocabulary: &vocabulary,
            config: &config,
        };
        strategy(&Line::new(1, text), &ctx)
    }

    fn item(name: &str, quantity: u32, unit_price: u64, code: Option<&str>) -> RawItem {
        RawItem {
            name: name.to_string(),
            quantity,
            unit_price,
            code: code.map(str::to_string),
        }
    }

    #[test]
    fn test_coded_row() {
        assert_eq!(
            run(coded_row, "1234 PRODUCTO A 1 15.000"),
            Some(item("PRODUCTO A", 1, 15_000, Some("1234")))
        );
    }

    #[test]
    fn test_coded_row_strips_grades_and_units() {
        assert_eq!(
            run(coded_row, "556677 - PISCO ALTO DEL CARMEN 35,5 750 ML 6 4.990"),
            Some(item("PISCO ALTO DEL CARMEN", 6, 4_990, Some("556677")))
        );
        assert_eq!(
            run(coded_row, "4455 AB123 CERVEZA KUNSTMANN CJ 24 UN 12 18.990"),
            Some(item("CERVEZA KUNSTMANN", 12, 18_990, Some("4455")))
        );
    }

    #[test]
    fn test_secondary_code_is_not_a_price() {
        assert_eq!(
            run(coded_row, "1234 12345 PISCO MISTRAL 2 4.990"),
            Some(item("PISCO MISTRAL", 2, 4_990, Some("1234")))
        );
    }

    #[test]
    fn test_coded_row_total_column() {
        assert_eq!(
            run(coded_row, "7788 AGUA MINERAL 24 1.590 38.160"),
            Some(item("AGUA MINERAL", 24, 1_590, Some("7788")))
        );
        assert_eq!(
            run(coded_row, "7788 BOLSA PAPEL 100 1.200 120.000").map(|i| i.unit_price),
            Some(1_200)
        );
        // within the ratio the largest amount wins, even when it is a line total
        assert_eq!(
            run(coded_row, "7788 AGUA MINERAL 6 1.590 9.540").map(|i| i.unit_price),
            Some(9_540)
        );
    }

    #[test]
    fn test_coded_row_rejections() {
        assert_eq!(run(coded_row, "1234 PRODUCTO A 1 990"), None);
        assert_eq!(run(coded_row, "1234 12 15.000"), None);
        assert_eq!(run(coded_row, "1234 Cliente Sur 15.000"), None);
        assert_eq!(run(coded_row, "WHISKY RESERVA 2 25000"), None);
    }

    #[test]
    fn test_uncoded_row() {
        assert_eq!(
            run(uncoded_row, "WHISKY RESERVA 2 25000"),
            Some(item("WHISKY RESERVA", 2, 25_000, None))
        );
        assert_eq!(
            run(uncoded_row, "001 ACEITE MARAVILLA 3.490"),
            Some(item("ACEITE MARAVILLA", 1, 3_490, None))
        );
    }

    #[test]
    fn test_uncoded_row_needs_length_and_price() {
        assert_eq!(run(uncoded_row, "PAN 2 1.500"), None);
        assert_eq!(run(uncoded_row, "MANZANAS VERDES 2 990"), None);
    }

    #[test]
    fn test_table_row_relaxed_price() {
        assert_eq!(
            run(table_row, "CHICLE MENTA 12 450"),
            Some(item("CHICLE MENTA", 12, 450, None))
        );
        assert_eq!(
            run(table_row, "AZUCAR GRANULADA 5 1.190 5.950"),
            Some(item("AZUCAR GRANULADA", 5, 5_950, None))
        );
    }

    #[test]
    fn test_table_row_needs_two_numbers() {
        assert_eq!(run(table_row, "SERVICIO DE DESPACHO 15.000"), None);
        assert_eq!(run(table_row, "GOMITAS SURTIDAS 3 45"), None);
    }

    #[test]
    fn test_pipeline_order() {
        let order: Vec<Strategy> = PIPELINE.iter().map(|(strategy, _)| *strategy).collect();
        assert_eq!(
            order,
            vec![Strategy::CodedRow, Strategy::UncodedRow, Strategy::TableRow]
        );
    }
}
