//! Exporter health reporting.
//!
//! Health is derived from the scrape coordinator: the exporter is
//! degraded after an aborted scrape or while ledger entries are not yet
//! durable. The metrics route keeps serving in either case.

use std::time::Instant;

use serde::Serialize;

use snortwatch_alert_pipeline::{CounterSnapshot, ScrapeCoordinator};
use snortwatch_core::pipeline::HealthStatus;

/// Health report served on the health route.
#[derive(Debug, Clone, Serialize)]
pub struct ExporterHealth {
    /// Status after the most recent scrape.
    #[serde(flatten)]
    pub status: HealthStatus,
    /// Seconds since the exporter started.
    pub uptime_secs: u64,
    /// Scrapes that committed to the ledger.
    pub completed_scrapes: u64,
    /// Counted identities still waiting for a durable ledger write.
    pub pending_ledger_entries: usize,
    /// Current counter values.
    pub totals: CounterSnapshot,
}

impl ExporterHealth {
    /// Build a report from the coordinator's current state.
    pub fn collect(coordinator: &ScrapeCoordinator, started: Instant) -> Self {
        Self {
            status: coordinator.health(),
            uptime_secs: started.elapsed().as_secs(),
            completed_scrapes: coordinator.completed_scrapes(),
            pending_ledger_entries: coordinator.pending_count(),
            totals: coordinator.counters().snapshot(),
        }
    }
}
