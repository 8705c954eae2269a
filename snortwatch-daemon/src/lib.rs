//! Snortwatch daemon library.
//!
//! Exposes the daemon's building blocks for integration testing.
//! In production, `snortwatch-daemon` is used as a binary (main.rs).

pub mod cli;
pub mod health;
pub mod logging;
pub mod metrics_server;
