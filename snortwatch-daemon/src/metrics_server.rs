//! Prometheus metrics HTTP server.
//!
//! Every request to the metrics endpoint first runs one scrape pass over
//! the Snort alert log, then renders the counters. Passes are serialized
//! through a mutex, so concurrent requests wait for the pass in flight.
//! A failed pass is logged and the last-known counter values are served.
//!
//! The recorder is built per process and never installed globally.
//!
//! # Usage
//!
//! ```ignore
//! let state = build_state(&config)?;
//! serve(&config.metrics, state, shutdown_signal()).await?;
//! ```

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use snortwatch_alert_pipeline::{
    AlertCounters, ScrapeConfig, ScrapeCoordinator, ScrapeCoordinatorBuilder, ScrapeReport,
};
use snortwatch_core::config::{HEALTH_ENDPOINT, MetricsConfig, SnortwatchConfig};

use crate::health::ExporterHealth;

/// Prometheus text exposition content type.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// State shared by all request handlers.
pub struct ExporterState {
    coordinator: Arc<Mutex<ScrapeCoordinator>>,
    handle: PrometheusHandle,
    started: Instant,
}

/// Handle to the shared exporter state.
pub type SharedState = Arc<ExporterState>;

impl ExporterState {
    /// Wrap a coordinator and the handle of the recorder its counters live in.
    pub fn new(coordinator: ScrapeCoordinator, handle: PrometheusHandle) -> Self {
        Self {
            coordinator: Arc::new(Mutex::new(coordinator)),
            handle,
            started: Instant::now(),
        }
    }

    /// Run one scrape pass.
    ///
    /// The pass runs on its own task so a client disconnect cannot cancel
    /// it halfway through a ledger commit.
    pub async fn scrape(&self) -> Option<ScrapeReport> {
        let coordinator = Arc::clone(&self.coordinator);
        let task = tokio::spawn(async move { coordinator.lock().await.scrape().await });

        match task.await {
            Ok(Ok(report)) => Some(report),
            // the coordinator already logged the failure
            Ok(Err(_)) => None,
            Err(e) => {
                tracing::error!(error = %e, "scrape task failed");
                None
            }
        }
    }

    /// Render all registered metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Current health report. Waits for a scrape in flight.
    pub async fn health(&self) -> ExporterHealth {
        let coordinator = self.coordinator.lock().await;
        ExporterHealth::collect(&coordinator, self.started)
    }
}

/// Build the recorder, counters and scrape coordinator for a configuration.
pub fn build_state(config: &SnortwatchConfig) -> Result<SharedState> {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let counters = Arc::new(AlertCounters::with_recorder(
        &recorder,
        &config.metrics.namespace,
    ));

    let coordinator = ScrapeCoordinatorBuilder::new()
        .config(ScrapeConfig::from_core(config))
        .counters(counters)
        .build()
        .context("failed to build scrape coordinator")?;

    Ok(Arc::new(ExporterState::new(coordinator, handle)))
}

/// Build the HTTP router: the metrics endpoint plus the health route.
pub fn router(state: SharedState, endpoint: &str) -> Router {
    Router::new()
        .route(endpoint, get(metrics_handler))
        .route(HEALTH_ENDPOINT, get(health_handler))
        .with_state(state)
}

async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    state.scrape().await;
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.render(),
    )
}

async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let report = state.health().await;
    let code = if report.status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, axum::Json(report))
}

/// Resolve the configured listen address.
pub fn listen_addr(config: &MetricsConfig) -> Result<SocketAddr> {
    let ip: IpAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid metrics listen address '{}'", config.listen_addr))?;
    Ok(SocketAddr::new(ip, config.port))
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn serve(
    config: &MetricsConfig,
    state: SharedState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listen_addr(config)?;
    if addr.ip().is_unspecified() {
        tracing::warn!(
            listen_addr = %addr,
            "metrics endpoint is exposed on all interfaces; restrict listen_addr in untrusted networks"
        );
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", addr))?;

    tracing::info!(
        listen_addr = %addr,
        endpoint = %config.endpoint,
        "Prometheus metrics endpoint active"
    );

    serve_on(listener, router(state, &config.endpoint), shutdown).await
}

/// Serve an already-bound listener until `shutdown` resolves.
pub async fn serve_on(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("metrics server failed")
}
