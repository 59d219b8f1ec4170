// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured storage metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn storage_metrics() -> &'static dyn StorageMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns a static reference to the configured arithmetic metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn arithmetic_metrics() -> &'static dyn ArithmeticMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

// --- Trait Definitions ---

/// A sink for metrics related to limb storage.
pub trait StorageMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of file-backed limb allocations.
    fn inc_mapped_allocations(&self);
    /// Increments the counter of file-backed limb buffers released.
    fn inc_mapped_releases(&self);
    /// Raises the process-wide mapped-bytes gauge by `bytes`.
    ///
    /// The gauge is shared by every engine in the process, so sinks only ever
    /// receive deltas.
    fn add_mapped_bytes(&self, bytes: u64);
    /// Lowers the process-wide mapped-bytes gauge by `bytes`.
    fn sub_mapped_bytes(&self, bytes: u64);
}
impl StorageMetricsSink for NopSink {
    fn inc_mapped_allocations(&self) {}
    fn inc_mapped_releases(&self) {}
    fn add_mapped_bytes(&self, _bytes: u64) {}
    fn sub_mapped_bytes(&self, _bytes: u64) {}
}

/// A sink for metrics related to the arithmetic operations.
pub trait ArithmeticMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter of completed operations, labeled by operation name.
    fn inc_operations(&self, op: &'static str);
    /// Observes the latency of one operation, labeled by operation name.
    fn observe_operation_duration(&self, op: &'static str, duration_secs: f64);
    /// Increments the hit or miss counter of the multiplication cache.
    fn inc_cache_lookup(&self, hit: bool);
}
impl ArithmeticMetricsSink for NopSink {
    fn inc_operations(&self, _op: &'static str) {}
    fn observe_operation_duration(&self, _op: &'static str, _duration_secs: f64) {}
    fn inc_cache_lookup(&self, _hit: bool) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and variant.
    fn inc_error(&self, kind: &'static str, variant: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _variant: &'static str) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink: StorageMetricsSink + ArithmeticMetricsSink + ErrorMetricsSink {}

// Blanket implementation to allow any type that implements all sub-traits
// to be used as a `MetricsSink`.
impl<T> MetricsSink for T where T: StorageMetricsSink + ArithmeticMetricsSink + ErrorMetricsSink {}
