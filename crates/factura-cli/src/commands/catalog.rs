//! Catalog command - check a product catalog and try names against it.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::info;

use factura_core::catalog::{CatalogProduct, CatalogSnapshot};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    command: CatalogCommand,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// Load a catalog and report its size
    Check {
        /// Catalog file (JSON array or CSV with id,name,sku columns)
        file: PathBuf,
    },

    /// Match a product name against a catalog
    Match {
        /// Catalog file
        file: PathBuf,

        /// Product name as printed on the invoice
        name: String,

        /// Minimum keyword overlap for a keyword match
        #[arg(long, default_value = "1")]
        min_score: u32,
    },
}

pub async fn run(args: CatalogArgs) -> anyhow::Result<()> {
    match args.command {
        CatalogCommand::Check { file } => check_catalog(&file),
        CatalogCommand::Match {
            file,
            name,
            min_score,
        } => match_name(&file, &name, min_score),
    }
}

/// Load the catalog at `path`, or an empty one when no path is given.
///
/// Files ending in `.csv` are read as CSV; anything else as JSON.
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<CatalogSnapshot> {
    let Some(path) = path else {
        return Ok(CatalogSnapshot::empty());
    };

    if !path.exists() {
        anyhow::bail!("Catalog file not found: {}", path.display());
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let snapshot = if is_csv {
        let mut rdr = csv::Reader::from_path(path)?;
        let mut products = Vec::new();
        for record in rdr.deserialize() {
            let product: CatalogProduct = record?;
            products.push(product);
        }
        CatalogSnapshot::build(&products)?
    } else {
        CatalogSnapshot::from_json_file(path)?
    };

    info!("Loaded {} catalog products from {}", snapshot.len(), path.display());
    Ok(snapshot)
}

fn check_catalog(path: &Path) -> anyhow::Result<()> {
    let snapshot = load_catalog(Some(path))?;

    println!(
        "{} {} products, {} lookup keys",
        style("✓").green(),
        snapshot.len(),
        snapshot.key_count()
    );

    Ok(())
}

fn match_name(path: &Path, name: &str, min_score: u32) -> anyhow::Result<()> {
    let snapshot = load_catalog(Some(path))?;

    match snapshot.find_match_with(name, min_score) {
        Some(found) => println!(
            "{} #{} {} ({})",
            style("✓").green(),
            found.product.id,
            found.product.name,
            found.kind
        ),
        None => println!("{} No match for {:?}", style("ℹ").blue(), name),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_csv_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("productos.csv");
        std::fs::write(&path, "id,name,sku\n1,Vino Gato Negro,GN-750\n2,Pisco Mistral,\n").unwrap();

        let snapshot = load_catalog(Some(&path)).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.products()[0].sku.as_deref(), Some("GN-750"));
        assert_eq!(snapshot.products()[1].sku, None);
    }

    #[test]
    fn test_load_without_path() {
        assert!(load_catalog(None).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("productos.json");
        std::fs::write(&path, r#"[{"id":1,"name":"Vino"},{"id":1,"name":"Pisco"}]"#).unwrap();

        assert!(load_catalog(Some(&path)).is_err());
    }
}
