// Path: crates/engine/src/storage/mod.rs

//! The Limb Store: backing buffers for big-integer digits.
//!
//! This module manages the lifecycle of a limb buffer, including:
//! - Choosing heap or file-backed storage through a [`StoragePolicy`].
//! - Growing a buffer while preserving its digits.
//! - Trimming redundant most-significant zero limbs.
//! - Releasing storage (unmapping and closing any backing file).

pub mod heap;
pub mod mapped;

pub use heap::HeapStorage;
pub use mapped::MappedStorage;

use crate::stats::EngineStats;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use t81_types::config::EngineConfig;
use t81_types::error::TernaryError;
use t81_types::{Result, BYTES_PER_LIMB};

/// Where a limb buffer lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StorageKind {
    /// Ordinary process-heap allocation.
    Heap,
    /// A shared mapping of an anonymous, unlinked temporary file.
    Mapped,
}

/// A contiguous, zero-initialized buffer of base-81 digits.
pub trait LimbStorage: Send + Sync + fmt::Debug {
    /// The strategy that produced this buffer.
    fn kind(&self) -> StorageKind;
    /// The whole buffer, including capacity beyond the in-use length.
    fn as_slice(&self) -> &[u8];
    /// Mutable access to the whole buffer.
    fn as_mut_slice(&mut self) -> &mut [u8];
}

/// Decides which storage strategy backs a buffer of a given size.
pub trait StoragePolicy: Send + Sync + fmt::Debug {
    /// Picks the storage kind for a buffer of `bytes` bytes.
    fn select(&self, bytes: usize) -> StorageKind;
}

/// Maps buffers of at least `threshold` bytes, keeps smaller ones on the heap.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPolicy {
    /// The size in bytes at which storage switches to a mapped file.
    pub threshold: usize,
}

impl StoragePolicy for ThresholdPolicy {
    fn select(&self, bytes: usize) -> StorageKind {
        if bytes < self.threshold {
            StorageKind::Heap
        } else {
            StorageKind::Mapped
        }
    }
}

/// Creates limb storage according to a policy, accounting mapped bytes.
///
/// Cloning is cheap; clones share the policy and the statistics.
#[derive(Debug, Clone)]
pub struct Allocator {
    policy: Arc<dyn StoragePolicy>,
    spill_dir: Option<PathBuf>,
    stats: Arc<EngineStats>,
}

impl Allocator {
    /// Builds an allocator from an explicit policy.
    pub fn new(
        policy: Arc<dyn StoragePolicy>,
        spill_dir: Option<PathBuf>,
        stats: Arc<EngineStats>,
    ) -> Self {
        Self {
            policy,
            spill_dir,
            stats,
        }
    }

    /// Builds a [`ThresholdPolicy`] allocator from the engine configuration.
    pub fn from_config(config: &EngineConfig, stats: Arc<EngineStats>) -> Self {
        Self::new(
            Arc::new(ThresholdPolicy {
                threshold: config.mmap_threshold_bytes,
            }),
            config.spill_dir.clone(),
            stats,
        )
    }

    /// The statistics this allocator reports into.
    pub fn stats(&self) -> &Arc<EngineStats> {
        &self.stats
    }

    /// Allocates a zeroed store of `max(len, 1)` limbs.
    pub fn allocate(&self, len: usize) -> Result<LimbStore> {
        let len = len.max(1);
        Ok(LimbStore {
            storage: self.storage(len)?,
            len,
        })
    }

    /// Allocates a store holding a copy of `limbs`, trimmed of leading zero limbs.
    pub fn from_limbs(&self, limbs: &[u8]) -> Result<LimbStore> {
        let used = significant_len(limbs);
        let mut store = self.allocate(used)?;
        if let (Some(dst), Some(src)) = (store.as_mut_slice().get_mut(..used), limbs.get(..used)) {
            dst.copy_from_slice(src);
        }
        Ok(store)
    }

    fn storage(&self, limbs: usize) -> Result<Box<dyn LimbStorage>> {
        let bytes = limbs.checked_mul(BYTES_PER_LIMB).ok_or_else(|| {
            TernaryError::Memory(format!("{} limbs exceed the address space", limbs))
        })?;
        match self.policy.select(bytes) {
            StorageKind::Heap => Ok(Box::new(HeapStorage::zeroed(bytes)?)),
            StorageKind::Mapped => {
                let mapped =
                    MappedStorage::create(bytes, self.spill_dir.as_deref(), self.stats.clone())
                        .map_err(|e| {
                            tracing::warn!(target: "t81::storage", bytes, error = %e, "mapped allocation failed");
                            e
                        })?;
                Ok(Box::new(mapped))
            }
        }
    }
}

/// An owned, growable sequence of base-81 limbs, least significant first.
pub struct LimbStore {
    storage: Box<dyn LimbStorage>,
    len: usize,
}

impl LimbStore {
    /// Number of limbs in use.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True only for a released store.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of limbs the current storage can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.storage.as_slice().len() / BYTES_PER_LIMB
    }

    /// The strategy backing this store.
    pub fn kind(&self) -> StorageKind {
        self.storage.kind()
    }

    /// The limbs in use.
    pub fn as_slice(&self) -> &[u8] {
        let all = self.storage.as_slice();
        all.get(..self.len).unwrap_or(all)
    }

    /// Mutable access to the limbs in use.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let len = self.len;
        let all = self.storage.as_mut_slice();
        let cap = all.len();
        &mut all[..len.min(cap)]
    }

    /// Extends the store to `new_len` limbs. New limbs are zero.
    ///
    /// When the capacity is insufficient, storage is reallocated through
    /// `alloc` (so the heap-or-mapped decision is taken again on the new size)
    /// and the existing digits are copied over.
    pub fn grow(&mut self, new_len: usize, alloc: &Allocator) -> Result<()> {
        if new_len <= self.len {
            return Ok(());
        }
        if new_len <= self.capacity() {
            let old = self.len;
            self.len = new_len;
            self.as_mut_slice()[old..].fill(0);
            return Ok(());
        }
        let new_cap = new_len.max(self.capacity().saturating_mul(2));
        let mut storage = alloc.storage(new_cap)?;
        storage.as_mut_slice()[..self.len].copy_from_slice(self.as_slice());
        tracing::trace!(
            target: "t81::storage",
            from = self.capacity(),
            to = new_cap,
            kind = ?storage.kind(),
            "reallocated limb storage"
        );
        self.storage = storage;
        self.len = new_len;
        Ok(())
    }

    /// Shortens the in-use length. Limbs beyond it stay allocated.
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// Drops redundant most-significant zero limbs, keeping at least one limb.
    pub fn trim(&mut self) {
        if self.is_empty() {
            return;
        }
        self.len = significant_len(self.as_slice());
    }

    /// Releases the storage now. A released store is empty; releasing twice is a no-op.
    pub fn release(&mut self) {
        if self.is_empty() {
            return;
        }
        self.storage = Box::<HeapStorage>::default();
        self.len = 0;
    }
}

impl fmt::Debug for LimbStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LimbStore")
            .field("kind", &self.kind())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Length of `limbs` without most-significant zero limbs, never below one.
pub(crate) fn significant_len(limbs: &[u8]) -> usize {
    limbs
        .iter()
        .rposition(|&d| d != 0)
        .map_or(1, |top| top + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocator(threshold: usize) -> Allocator {
        let config = EngineConfig {
            mmap_threshold_bytes: threshold,
            ..EngineConfig::default()
        };
        Allocator::from_config(&config, Arc::new(EngineStats::default()))
    }

    #[test]
    fn test_small_allocation_uses_heap() {
        let alloc = allocator(1024);
        let store = alloc.allocate(10).unwrap();
        assert_eq!(store.kind(), StorageKind::Heap);
        assert_eq!(store.len(), 10);
        assert!(store.as_slice().iter().all(|&d| d == 0));
        assert_eq!(alloc.stats().mapped_bytes(), 0);
    }

    #[test]
    fn test_mapped_accounting_is_in_bytes() {
        let alloc = allocator(0);
        let store = alloc.allocate(12).unwrap();
        assert_eq!(store.capacity(), 12);
        assert_eq!(alloc.stats().mapped_bytes(), (12 * BYTES_PER_LIMB) as u64);
    }

    #[test]
    fn test_unaddressable_length_is_a_memory_error() {
        let alloc = allocator(usize::MAX);
        let err = alloc.allocate(isize::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, TernaryError::Memory(_)));
    }

    #[test]
    fn test_zero_length_allocates_one_limb() {
        let alloc = allocator(1024);
        let store = alloc.allocate(0).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.as_slice(), &[0]);
    }

    #[test]
    fn test_threshold_allocation_is_mapped_and_accounted() {
        let alloc = allocator(64);
        let mut store = alloc.allocate(64).unwrap();
        assert_eq!(store.kind(), StorageKind::Mapped);
        assert_eq!(alloc.stats().mapped_bytes(), 64);

        store.as_mut_slice()[63] = 80;
        assert_eq!(store.as_slice()[63], 80);

        drop(store);
        let snap = alloc.stats().snapshot();
        assert_eq!(snap.mapped_bytes, 0);
        assert_eq!(snap.mapping_events, 2);
    }

    #[test]
    fn test_release_is_idempotent() {
        let alloc = allocator(8);
        let mut store = alloc.allocate(16).unwrap();
        assert_eq!(alloc.stats().mapped_bytes(), 16);
        store.release();
        assert!(store.is_empty());
        assert_eq!(alloc.stats().mapped_bytes(), 0);
        store.release();
        assert_eq!(alloc.stats().snapshot().mapping_events, 2);
    }

    #[test]
    fn test_grow_preserves_digits_and_crosses_threshold() {
        let alloc = allocator(32);
        let mut store = alloc.allocate(3).unwrap();
        store.as_mut_slice().copy_from_slice(&[1, 2, 3]);
        assert_eq!(store.kind(), StorageKind::Heap);

        store.grow(40, &alloc).unwrap();
        assert_eq!(store.kind(), StorageKind::Mapped);
        assert_eq!(store.len(), 40);
        assert_eq!(&store.as_slice()[..3], &[1, 2, 3]);
        assert!(store.as_slice()[3..].iter().all(|&d| d == 0));
    }

    #[test]
    fn test_grow_within_capacity_zeroes_reused_limbs() {
        let alloc = allocator(1024);
        let mut store = alloc.allocate(4).unwrap();
        store.as_mut_slice().copy_from_slice(&[5, 6, 7, 8]);
        store.truncate(2);
        assert_eq!(store.capacity(), 4);
        store.grow(4, &alloc).unwrap();
        assert_eq!(store.as_slice(), &[5, 6, 0, 0]);
    }

    #[test]
    fn test_spill_dir_is_used_for_mapped_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            mmap_threshold_bytes: 1,
            spill_dir: Some(dir.path().to_path_buf()),
            ..EngineConfig::default()
        };
        let alloc = Allocator::from_config(&config, Arc::new(EngineStats::default()));
        let store = alloc.allocate(8).unwrap();
        assert_eq!(store.kind(), StorageKind::Mapped);
        // The backing file is unlinked immediately, so the directory stays empty.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_spill_dir_is_a_mapping_error() {
        let config = EngineConfig {
            mmap_threshold_bytes: 1,
            spill_dir: Some(PathBuf::from("/nonexistent/t81-spill")),
            ..EngineConfig::default()
        };
        let alloc = Allocator::from_config(&config, Arc::new(EngineStats::default()));
        let err = alloc.allocate(8).unwrap_err();
        assert!(matches!(err, TernaryError::Mapping { .. }));
    }

    #[test]
    fn test_significant_len() {
        assert_eq!(significant_len(&[0, 0, 0]), 1);
        assert_eq!(significant_len(&[4, 0, 7, 0]), 3);
        assert_eq!(significant_len(&[]), 1);
    }
}
