// Path: crates/telemetry/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # T81 Telemetry
//!
//! This crate provides the observability infrastructure for the T81 engine:
//! structured logging initialization, a Prometheus registry for the engine's
//! counters, and abstract sinks decoupling metric instrumentation from the backend.

/// The initialization routine for global structured logging.
pub mod init;
/// The concrete implementation of metrics sinks using the `prometheus` crate.
pub mod prometheus;
/// Abstract traits (`*MetricsSink`) that define the contract for metrics reporting.
pub mod sinks;
/// A simple RAII timer for measuring the duration of an engine operation.
pub mod time;

// Re-export the public helper functions for easy access to the global sinks.
pub use sinks::{arithmetic_metrics, error_metrics, storage_metrics};
