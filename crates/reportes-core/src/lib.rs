#![forbid(unsafe_code)]
//! reportes-core library.
//!
//! Ticket model, error catalogue, configuration loading and the SQLite
//! store shared by the `rp` binary and the statistics engine.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types where appropriate.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod db;
pub mod error;
pub mod model;
