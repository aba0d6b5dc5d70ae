//! CLI subcommands.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod extract;

use std::path::Path;

use factura_core::models::config::FacturaConfig;

/// Load the configuration given with `-c`, else the saved user config.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FacturaConfig> {
    match config_path {
        Some(path) => Ok(FacturaConfig::from_file(Path::new(path))?),
        None => config::load_user_config(),
    }
}
