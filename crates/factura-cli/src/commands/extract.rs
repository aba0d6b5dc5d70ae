//! Extract command - extract line items from a single OCR text file.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use factura_core::invoice::rules::format_clp;
use factura_core::invoice::{InvoiceItemParser, InvoiceParser};
use factura_core::models::invoice::ExtractionResult;
use factura_core::source::{PlainTextSource, TextSource};

use super::catalog::load_catalog;
use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input OCR text file ("-" reads stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Product catalog for matching (JSON or CSV)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Accept input files with any extension
    #[arg(long)]
    any_extension: bool,

    /// Print extraction warnings to stderr
    #[arg(long)]
    warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = InvoiceItemParser::from_config(config)?;
    let catalog = load_catalog(args.catalog.as_deref())?;

    let text = if args.input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        info!("Processing file: {}", args.input.display());
        PlainTextSource::new()
            .with_any_extension(args.any_extension)
            .text_for_document(&args.input)?
    };

    let result = parser.parse(&text, &catalog);

    if args.warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} items written to {}",
            style("✓").green(),
            result.items.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "line",
        "code",
        "name",
        "quantity",
        "unit_price",
        "subtotal",
        "matched",
        "product_id",
        "product_name",
        "match_kind",
        "strategy",
    ])?;

    for item in &result.items {
        let product = item.matched_product.as_ref();
        wtr.write_record([
            &item.line_number.to_string(),
            item.code.as_deref().unwrap_or(""),
            &item.raw_name,
            &item.quantity.to_string(),
            &item.unit_price.to_string(),
            &item.subtotal.to_string(),
            &item.matched.to_string(),
            &product.map(|p| p.id.to_string()).unwrap_or_default(),
            product.map(|p| p.name.as_str()).unwrap_or(""),
            &item.match_kind.map(|k| k.to_string()).unwrap_or_default(),
            item.strategy.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let header = &result.header;
    let mut output = String::new();

    if let Some(folio) = &header.folio {
        output.push_str(&format!("Folio: {}\n", folio));
    }
    if let Some(date) = header.issue_date {
        output.push_str(&format!("Date: {}\n", date.format("%d/%m/%Y")));
    }
    if let Some(rut) = &header.supplier_rut {
        output.push_str(&format!("Supplier RUT: {}\n", rut));
    }
    if !header.is_empty() {
        output.push('\n');
    }

    output.push_str(&format!("Items ({}):\n", result.items.len()));
    for item in &result.items {
        output.push_str(&format!(
            "  {:>3} x {:<40} {:>12} {:>12}",
            item.quantity,
            item.raw_name,
            format_clp(item.unit_price),
            format_clp(item.subtotal)
        ));
        if let Some(product) = &item.matched_product {
            output.push_str(&format!("  -> #{} {}", product.id, product.name));
        }
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format!("Items total: {}\n", format_clp(result.items_total())));
    if let Some(net) = header.net_total {
        output.push_str(&format!("Net total:   {}\n", format_clp(net)));
    }
    if let Some(total) = header.document_total {
        output.push_str(&format!("Total:       {}\n", format_clp(total)));
    }

    for warning in &result.warnings {
        output.push_str(&format!("! {}\n", warning));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use factura_core::catalog::CatalogSnapshot;

    fn sample() -> ExtractionResult {
        InvoiceItemParser::new().parse(
            "CODIGO DESCRIPCION PRECIO\n1234 PRODUCTO A 2 15.000\nSUBTOTAL 30.000",
            &CatalogSnapshot::empty(),
        )
    }

    #[test]
    fn test_format_csv() {
        let csv = format_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2,1234,PRODUCTO A,2,15000,30000,false,,,,coded_row");
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&sample());

        assert!(text.contains("Items (1):"));
        assert!(text.contains("$15.000"));
        assert!(text.contains("Net total:   $30.000"));
    }
}
