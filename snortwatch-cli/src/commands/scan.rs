//! `snortwatch scan` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use snortwatch_alert_pipeline::{
    Category, ScrapeConfig, ScrapeCoordinatorBuilder, ScrapeReport,
};
use snortwatch_core::config::SnortwatchConfig;
use snortwatch_core::metrics::metric_name;

use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_config(config_path).await?;
    let report = run(&args, config).await?;
    writer.render(&report)?;
    Ok(())
}

/// Run one ingestion pass and collect the report.
pub async fn run(args: &ScanArgs, mut config: SnortwatchConfig) -> Result<ScanReport, CliError> {
    if let Some(source) = &args.source {
        config.source.path = source.display().to_string();
    }
    if let Some(ledger) = &args.ledger {
        config.ledger.path = ledger.display().to_string();
    }

    let scrape_config = ScrapeConfig::from_core(&config);
    let mut coordinator = ScrapeCoordinatorBuilder::new()
        .config(scrape_config)
        .dry_run(args.dry_run)
        .build()?;

    info!(
        source = %config.source.path,
        dry_run = args.dry_run,
        "starting alert scan"
    );

    let report = coordinator.scrape().await?;

    let counts = Category::ALL
        .iter()
        .map(|category| CategoryCount {
            category: category.label(),
            metric: metric_name(&config.metrics.namespace, category.metric_suffix()),
            count: report.new_alerts.get(*category),
        })
        .collect();

    Ok(ScanReport {
        source: config.source.path,
        ledger: (!args.dry_run).then_some(config.ledger.path),
        dry_run: args.dry_run,
        counts,
        report,
    })
}

/// Result of one `scan` run.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// Alert log that was read
    pub source: String,
    /// Ledger file, absent for dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger: Option<String>,
    pub dry_run: bool,
    /// New alerts per category, in exposition order
    pub counts: Vec<CategoryCount>,
    /// Pass statistics
    pub report: ScrapeReport,
}

/// New alerts for one category.
#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: &'static str,
    /// Counter name the daemon exports for this category
    pub metric: String,
    pub count: u64,
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Scan: {}", self.source.bold())?;
        match &self.ledger {
            Some(ledger) => writeln!(w, "Ledger: {}", ledger)?,
            None => writeln!(w, "Ledger: {}", "(dry run, not used)".yellow())?,
        }
        writeln!(w)?;

        writeln!(w, "{:<18} {:<32} {:>8}", "Category", "Metric", "New")?;
        writeln!(w, "{}", "-".repeat(60))?;
        for entry in &self.counts {
            let count = if entry.count > 0 {
                entry.count.to_string().green().bold()
            } else {
                entry.count.to_string().normal()
            };
            writeln!(w, "{:<18} {:<32} {:>8}", entry.category, entry.metric, count)?;
        }
        writeln!(w)?;

        let r = &self.report;
        writeln!(
            w,
            "Lines read: {}  already counted: {}  empty: {}  malformed: {}  committed: {}",
            r.lines_read, r.skipped_seen, r.skipped_empty, r.skipped_malformed, r.committed
        )?;
        if r.skipped_malformed > 0 {
            writeln!(
                w,
                "{}",
                "Malformed lines are retried on the next scan.".yellow()
            )?;
        }

        Ok(())
    }
}
