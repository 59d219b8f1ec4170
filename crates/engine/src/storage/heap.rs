// Path: crates/engine/src/storage/heap.rs

//! Ordinary process-heap limb storage.

use super::{LimbStorage, StorageKind};
use t81_types::Result;

/// A zero-initialized limb buffer on the process heap.
#[derive(Debug, Default)]
pub struct HeapStorage {
    digits: Vec<u8>,
}

impl HeapStorage {
    /// Allocates `bytes` zeroed bytes, reporting allocation failure instead of aborting.
    pub fn zeroed(bytes: usize) -> Result<Self> {
        Ok(Self {
            digits: try_zeroed(bytes)?,
        })
    }
}

/// A zeroed scratch vector. Allocation failure surfaces as `TernaryError::Memory`.
pub(crate) fn try_zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, 0);
    Ok(buf)
}

impl LimbStorage for HeapStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Heap
    }

    fn as_slice(&self) -> &[u8] {
        &self.digits
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.digits
    }
}
