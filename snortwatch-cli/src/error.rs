//! CLI-specific error types and exit code mapping

use snortwatch_alert_pipeline::AlertPipelineError;
use snortwatch_core::error::SnortwatchError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The scan pass was aborted or its ledger commit failed.
    #[error("scan error: {0}")]
    Scan(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                 |
    /// |------|-----------------------------------------|
    /// | 0    | Success                                 |
    /// | 1    | General / command error                 |
    /// | 2    | Configuration error                     |
    /// | 3    | Scan aborted or ledger not durable      |
    /// | 10   | IO error                                |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Scan(_) => 3,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<SnortwatchError> for CliError {
    fn from(e: SnortwatchError) -> Self {
        match e {
            SnortwatchError::Config(inner) => Self::Config(inner.to_string()),
            SnortwatchError::Scrape(inner) => Self::Scan(inner.to_string()),
            SnortwatchError::Io(io) => Self::Io(io),
        }
    }
}

impl From<AlertPipelineError> for CliError {
    fn from(e: AlertPipelineError) -> Self {
        match e {
            AlertPipelineError::Config { .. } => Self::Config(e.to_string()),
            other => Self::Scan(other.to_string()),
        }
    }
}
