// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram_vec, register_int_counter, register_int_counter_vec,
    register_int_gauge, Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

// --- Metric Statics ---
// The collectors are registered exactly once, by the first call to `install`.

struct Collectors {
    mapped_allocations_total: IntCounter,
    mapped_releases_total: IntCounter,
    mapped_bytes: IntGauge,
    operations_total: IntCounterVec,
    operation_duration_seconds: HistogramVec,
    cache_lookups_total: IntCounterVec,
    errors_total: IntCounterVec,
}

impl Collectors {
    fn register() -> Result<Self, prometheus::Error> {
        Ok(Self {
            mapped_allocations_total: register_int_counter!(
                "t81_storage_mapped_allocations_total",
                "Total number of limb buffers backed by a mapped temporary file."
            )?,
            mapped_releases_total: register_int_counter!(
                "t81_storage_mapped_releases_total",
                "Total number of mapped limb buffers unmapped and released."
            )?,
            mapped_bytes: register_int_gauge!(
                "t81_storage_mapped_bytes",
                "Bytes currently held in mapped limb storage."
            )?,
            operations_total: register_int_counter_vec!(
                "t81_operations_total",
                "Total engine operations completed, labeled by operation.",
                &["op"]
            )?,
            operation_duration_seconds: register_histogram_vec!(
                "t81_operation_duration_seconds",
                "Latency of engine operations.",
                &["op"],
                exponential_buckets(0.000_001, 4.0, 14)?
            )?,
            cache_lookups_total: register_int_counter_vec!(
                "t81_mul_cache_lookups_total",
                "Multiplication cache lookups, labeled by outcome.",
                &["outcome"]
            )?,
            errors_total: register_int_counter_vec!(
                "t81_errors_total",
                "Total number of errors, categorized by type and variant.",
                &["kind", "variant"]
            )?,
        })
    }
}

static COLLECTORS: OnceCell<Collectors> = OnceCell::new();
static PROMETHEUS_SINK: PrometheusSink = PrometheusSink;

/// Forwards every sink call to the registered Prometheus collectors.
#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

impl StorageMetricsSink for PrometheusSink {
    fn inc_mapped_allocations(&self) {
        if let Some(c) = COLLECTORS.get() {
            c.mapped_allocations_total.inc();
        }
    }
    fn inc_mapped_releases(&self) {
        if let Some(c) = COLLECTORS.get() {
            c.mapped_releases_total.inc();
        }
    }
    fn add_mapped_bytes(&self, bytes: u64) {
        if let Some(c) = COLLECTORS.get() {
            c.mapped_bytes.add(gauge_delta(bytes));
        }
    }
    fn sub_mapped_bytes(&self, bytes: u64) {
        if let Some(c) = COLLECTORS.get() {
            c.mapped_bytes.sub(gauge_delta(bytes));
        }
    }
}

fn gauge_delta(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}

impl ArithmeticMetricsSink for PrometheusSink {
    fn inc_operations(&self, op: &'static str) {
        if let Some(c) = COLLECTORS.get() {
            c.operations_total.with_label_values(&[op]).inc();
        }
    }
    fn observe_operation_duration(&self, op: &'static str, duration_secs: f64) {
        if let Some(c) = COLLECTORS.get() {
            c.operation_duration_seconds
                .with_label_values(&[op])
                .observe(duration_secs);
        }
    }
    fn inc_cache_lookup(&self, hit: bool) {
        if let Some(c) = COLLECTORS.get() {
            let outcome = if hit { "hit" } else { "miss" };
            c.cache_lookups_total.with_label_values(&[outcome]).inc();
        }
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, variant: &'static str) {
        if let Some(c) = COLLECTORS.get() {
            c.errors_total.with_label_values(&[kind, variant]).inc();
        }
    }
}

/// Registers the Prometheus collectors and installs the sink globally.
///
/// Calling this more than once returns the already installed sink.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    COLLECTORS.get_or_try_init(Collectors::register)?;
    let sink: &'static dyn MetricsSink = &PROMETHEUS_SINK;
    // A different sink may have been installed first; keep whichever won.
    Ok(*SINK.get_or_init(|| sink))
}

/// Renders the default registry in the Prometheus text exposition format.
pub fn render() -> Result<String, prometheus::Error> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
