//! Snortwatch CLI library.
//!
//! Exposes argument parsing, command handlers and output rendering so the
//! binary stays a thin dispatcher and the handlers can be tested directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
