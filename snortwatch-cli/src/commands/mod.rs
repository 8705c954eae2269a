//! Command handlers -- one module per subcommand

use std::path::Path;

use snortwatch_core::config::SnortwatchConfig;

use crate::error::CliError;

pub mod config;
pub mod scan;

/// Load the effective configuration: file (if given) + environment, validated.
pub async fn load_config(path: Option<&Path>) -> Result<SnortwatchConfig, CliError> {
    let config = match path {
        Some(path) => SnortwatchConfig::load(path).await?,
        None => SnortwatchConfig::from_env()?,
    };
    Ok(config)
}

/// Label for where the configuration came from.
pub fn source_label(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults + environment)".to_owned())
}
