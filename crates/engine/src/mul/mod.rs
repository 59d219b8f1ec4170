// Path: crates/engine/src/mul/mod.rs

//! The Multiplication Engine.
//!
//! Operands are padded to a common length and multiplied with direct
//! convolution at or below the Karatsuba cutoff, Karatsuba above it.
//! [`multiply`] consults the Result Cache first and stores every computed
//! product; hits are deep-copied out so callers never share storage with the
//! cache. With a zero-capacity cache it goes straight to [`product`].

pub mod cache;
pub mod kernel;

pub use cache::MulCache;
pub use kernel::{karatsuba_product, naive_product};

use crate::int::BigTernaryInt;
use crate::storage::{Allocator, LimbStore};
use parking_lot::Mutex;
use t81_types::Result;

/// Multiplies without consulting any cache.
pub fn product(
    a: &BigTernaryInt,
    b: &BigTernaryInt,
    cutoff: usize,
    alloc: &Allocator,
) -> Result<BigTernaryInt> {
    let sign = a.sign().product(b.sign());
    if a.is_zero() || b.is_zero() {
        return Ok(BigTernaryInt::from_parts(sign, alloc.allocate(1)?));
    }
    let n = a.len().max(b.len());
    // Padded copies come from the allocator so large operands stay off the heap.
    let lhs = padded(a, n, alloc)?;
    let rhs = padded(b, n, alloc)?;
    let mut out = alloc.allocate(2 * n)?;
    kernel::karatsuba(lhs.as_slice(), rhs.as_slice(), out.as_mut_slice(), cutoff)?;
    Ok(BigTernaryInt::from_parts(sign, out))
}

fn padded(value: &BigTernaryInt, len: usize, alloc: &Allocator) -> Result<LimbStore> {
    let mut store = alloc.allocate(len)?;
    let limbs = value.limbs();
    if let Some(dst) = store.as_mut_slice().get_mut(..limbs.len()) {
        dst.copy_from_slice(limbs);
    }
    Ok(store)
}

/// Multiplies through the Result Cache.
///
/// The lock is not held while the product is computed, so two threads missing
/// on the same key both compute it; the second insert replaces the first.
pub fn multiply(
    a: &BigTernaryInt,
    b: &BigTernaryInt,
    cutoff: usize,
    cache: &Mutex<MulCache>,
    alloc: &Allocator,
) -> Result<BigTernaryInt> {
    if a.is_zero() || b.is_zero() || !cache.lock().is_enabled() {
        return product(a, b, cutoff, alloc);
    }
    let key = MulCache::key(a, b);
    {
        let mut guard = cache.lock();
        let hit = guard.get(&key).map(|v| v.duplicate(alloc)).transpose()?;
        alloc.stats().record_cache_lookup(hit.is_some());
        if let Some(hit) = hit {
            tracing::trace!(target: "t81::mul", key = %key, "cache hit");
            return Ok(hit);
        }
    }
    let result = product(a, b, cutoff, alloc)?;
    cache.lock().insert(key, result.duplicate(alloc)?);
    Ok(result)
}

#[cfg(test)]
mod tests;
