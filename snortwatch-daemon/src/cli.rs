//! CLI argument definitions for snortwatch-daemon.
//!
//! Uses `clap` v4 derive macros. Flags take precedence over the
//! environment and the config file.

use std::path::PathBuf;

use clap::Parser;
use snortwatch_core::config::SnortwatchConfig;

/// Snortwatch Prometheus exporter.
///
/// Serves per-category Snort alert counters. Every scrape of the metrics
/// endpoint ingests alerts appended to the Snort log since the previous one.
#[derive(Parser, Debug)]
#[command(name = "snortwatch-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to snortwatch.toml. Without it, defaults and environment are used.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    #[arg(long)]
    pub log_format: Option<String>,

    /// Override the metrics listen address.
    #[arg(long)]
    pub listen_addr: Option<String>,

    /// Override the metrics port.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Validate configuration and exit without starting the exporter.
    #[arg(long)]
    pub validate: bool,
}

impl DaemonCli {
    /// Apply flag overrides on top of a loaded configuration.
    ///
    /// The caller re-validates the result.
    pub fn apply_overrides(&self, config: &mut SnortwatchConfig) {
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.general.log_format = format.clone();
        }
        if let Some(addr) = &self.listen_addr {
            config.metrics.listen_addr = addr.clone();
        }
        if let Some(port) = self.port {
            config.metrics.port = port;
        }
    }
}
