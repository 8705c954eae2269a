use anyhow::Result;
use clap::Parser;

use snortwatch_core::config::SnortwatchConfig;
use snortwatch_daemon::cli::DaemonCli;
use snortwatch_daemon::{logging, metrics_server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    let mut config = match &cli.config {
        Some(path) => SnortwatchConfig::load(path).await?,
        None => SnortwatchConfig::from_env()?,
    };
    cli.apply_overrides(&mut config);
    config.validate()?;

    if cli.validate {
        println!("configuration is valid");
        return Ok(());
    }

    logging::init_tracing(&config.general)?;

    tracing::info!(
        source = %config.source.path,
        ledger = %config.ledger.path,
        namespace = %config.metrics.namespace,
        "snortwatch-daemon starting"
    );

    let state = metrics_server::build_state(&config)?;
    metrics_server::serve(&config.metrics, state, shutdown_signal()).await?;

    tracing::info!("snortwatch-daemon shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
