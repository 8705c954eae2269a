//! Logging initialization for snortwatch-daemon.
//!
//! Builds a `tracing-subscriber` registry from the `[general]` section.
//! `RUST_LOG` takes precedence over `general.log_level`.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use snortwatch_core::config::GeneralConfig;

/// Initialize the global tracing subscriber.
///
/// Must be called once, before the first scrape.
///
/// * `"json"` - one JSON object per event (production)
/// * `"pretty"` - multi-line human-readable output (development)
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("invalid log level '{}'", config.log_level))?,
    };
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.log_format.as_str() {
        "json" => registry.with(fmt::layer().json()).try_init(),
        "pretty" => registry.with(fmt::layer().pretty()).try_init(),
        other => {
            anyhow::bail!("unknown log format '{}', expected 'json' or 'pretty'", other);
        }
    };

    result.with_context(|| {
        format!(
            "failed to initialize {} tracing subscriber",
            config.log_format
        )
    })
}
