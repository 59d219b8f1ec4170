// Path: crates/engine/src/storage/mapped.rs

//! File-backed limb storage for large operands.
//!
//! The backing file is created already unlinked, so it disappears with the last
//! open descriptor. The mapping is shared read/write, which lets the kernel page
//! cold limbs out to the file instead of to swap.

use super::{LimbStorage, StorageKind};
use crate::stats::EngineStats;
use memmap2::MmapMut;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use t81_types::error::TernaryError;
use t81_types::Result;

/// A limb buffer backed by a memory-mapped anonymous temporary file.
pub struct MappedStorage {
    // Field order matters: the map is dropped (unmapped) before the file is closed.
    map: MmapMut,
    _file: File,
    bytes: usize,
    stats: Arc<EngineStats>,
}

impl MappedStorage {
    /// Creates an unlinked file of `bytes` bytes in `dir` (or the OS temp dir) and maps it.
    pub fn create(bytes: usize, dir: Option<&Path>, stats: Arc<EngineStats>) -> Result<Self> {
        let bytes = bytes.max(1);
        let file = match dir {
            Some(dir) => tempfile::tempfile_in(dir),
            None => tempfile::tempfile(),
        }
        .map_err(|e| TernaryError::mapping("creating backing file", e))?;

        let len = u64::try_from(bytes)
            .map_err(|_| TernaryError::Overflow(format!("{} bytes exceeds file size range", bytes)))?;
        file.set_len(len)
            .map_err(|e| TernaryError::mapping("resizing backing file", e))?;

        // SAFETY: the file was created unlinked by this process and is owned by this
        // value, so no other handle can truncate or remap it while the map is alive.
        #[allow(unsafe_code)]
        let map = unsafe { MmapMut::map_mut(&file) }
            .map_err(|e| TernaryError::mapping("mapping backing file", e))?;

        stats.record_mapped(bytes as u64);
        tracing::debug!(target: "t81::storage", bytes, "mapped limb storage");

        Ok(Self {
            map,
            _file: file,
            bytes,
            stats,
        })
    }
}

impl LimbStorage for MappedStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Mapped
    }

    fn as_slice(&self) -> &[u8] {
        &self.map
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.map
    }
}

impl std::fmt::Debug for MappedStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedStorage")
            .field("bytes", &self.bytes)
            .finish_non_exhaustive()
    }
}

impl Drop for MappedStorage {
    fn drop(&mut self) {
        self.stats.record_unmapped(self.bytes as u64);
        tracing::debug!(target: "t81::storage", bytes = self.bytes, "released mapped limb storage");
    }
}
