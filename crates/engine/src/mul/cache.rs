// Path: crates/engine/src/mul/cache.rs

//! The Result Cache: a small fixed-capacity map from operand text to product.

use crate::int::BigTernaryInt;
use t81_types::config::CachePolicy;

#[derive(Debug)]
struct Entry {
    key: String,
    value: BigTernaryInt,
    last_used: u64,
}

/// Memoized products keyed by `"<a>*<b>"` in canonical trit text.
///
/// Holds at most one entry per key. When full, `SlotZero` overwrites the
/// first slot and `Lru` overwrites the least recently read or written entry.
#[derive(Debug)]
pub struct MulCache {
    entries: Vec<Entry>,
    capacity: usize,
    policy: CachePolicy,
    tick: u64,
}

impl MulCache {
    /// An empty cache. A capacity of zero disables caching.
    pub fn new(capacity: usize, policy: CachePolicy) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            policy,
            tick: 0,
        }
    }

    /// False for a zero-capacity cache, which never stores anything.
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// The composite key for `a * b`.
    pub fn key(a: &BigTernaryInt, b: &BigTernaryInt) -> String {
        format!("{}*{}", a, b)
    }

    /// Looks up a product, refreshing its recency.
    pub fn get(&mut self, key: &str) -> Option<&BigTernaryInt> {
        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.iter_mut().find(|e| e.key == key)?;
        entry.last_used = tick;
        Some(&entry.value)
    }

    /// Stores a product, replacing any entry with the same key.
    pub fn insert(&mut self, key: String, value: BigTernaryInt) {
        if self.capacity == 0 {
            return;
        }
        self.tick += 1;
        let entry = Entry {
            key,
            value,
            last_used: self.tick,
        };
        if let Some(slot) = self.entries.iter_mut().find(|e| e.key == entry.key) {
            *slot = entry;
            return;
        }
        if self.entries.len() < self.capacity {
            self.entries.push(entry);
            return;
        }
        let victim = match self.policy {
            CachePolicy::SlotZero => 0,
            CachePolicy::Lru => self
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.last_used)
                .map_or(0, |(i, _)| i),
        };
        if let Some(slot) = self.entries.get_mut(victim) {
            tracing::trace!(target: "t81::mul", evicted = %slot.key, policy = ?self.policy, "cache eviction");
            *slot = entry;
        }
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `key` is cached. Does not affect recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }
}
