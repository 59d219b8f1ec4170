// Path: crates/engine/src/stats.rs

//! Per-engine resource accounting.
//!
//! Counters live on the engine instance rather than in process globals; every
//! update is also forwarded to the installed telemetry sink.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use t81_telemetry::{arithmetic_metrics, storage_metrics};

/// Atomic counters shared by an engine and every limb buffer it allocated.
#[derive(Debug, Default)]
pub struct EngineStats {
    mapped_bytes: AtomicU64,
    mapping_events: AtomicU64,
    operations: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

/// A point-in-time copy of [`EngineStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    /// Bytes currently held in mapped limb storage.
    pub mapped_bytes: u64,
    /// Number of mapped allocations plus mapped releases.
    pub mapping_events: u64,
    /// Number of public operations completed successfully.
    pub operations: u64,
    /// Multiplication cache hits.
    pub cache_hits: u64,
    /// Multiplication cache misses.
    pub cache_misses: u64,
}

impl EngineStats {
    pub(crate) fn record_mapped(&self, bytes: u64) {
        self.mapped_bytes.fetch_add(bytes, Ordering::AcqRel);
        self.mapping_events.fetch_add(1, Ordering::Relaxed);
        let sink = storage_metrics();
        sink.inc_mapped_allocations();
        sink.add_mapped_bytes(bytes);
    }

    pub(crate) fn record_unmapped(&self, bytes: u64) {
        let prev = self
            .mapped_bytes
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                Some(cur.saturating_sub(bytes))
            })
            .unwrap_or_default();
        self.mapping_events.fetch_add(1, Ordering::Relaxed);
        let sink = storage_metrics();
        sink.inc_mapped_releases();
        // Only what this engine actually held leaves the shared gauge.
        sink.sub_mapped_bytes(prev.min(bytes));
    }

    pub(crate) fn record_operation(&self, op: &'static str) {
        self.operations.fetch_add(1, Ordering::Relaxed);
        arithmetic_metrics().inc_operations(op);
    }

    pub(crate) fn record_cache_lookup(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
        arithmetic_metrics().inc_cache_lookup(hit);
    }

    /// Bytes currently held in mapped limb storage.
    pub fn mapped_bytes(&self) -> u64 {
        self.mapped_bytes.load(Ordering::Acquire)
    }

    /// Reads every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            mapped_bytes: self.mapped_bytes.load(Ordering::Acquire),
            mapping_events: self.mapping_events.load(Ordering::Relaxed),
            operations: self.operations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }
}
