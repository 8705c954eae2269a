//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Snortwatch -- Snort alert counters for Prometheus.
///
/// Use `snortwatch <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "snortwatch", version, about, long_about = None)]
pub struct Cli {
    /// Path to snortwatch.toml. Without it, defaults and environment are used.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics on stderr (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one ingestion pass and print per-category counts.
    Scan(ScanArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Run one ingestion pass over the Snort alert log.
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Count every well-formed line without reading or writing the ledger.
    #[arg(long)]
    pub dry_run: bool,

    /// Override the alert log path.
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Override the ledger path.
    #[arg(long)]
    pub ledger: Option<PathBuf>,
}

// ---- config ----

/// Manage configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Load and validate the configuration.
    Validate,
    /// Print the effective configuration as TOML.
    Show {
        /// Only show one section (general, source, ledger, metrics).
        #[arg(long)]
        section: Option<String>,
    },
}
