// Path: crates/engine/src/derived.rs

//! Derived Operations built on the native fast path and on `multiply`.

use crate::convert::{from_i64, from_u64, to_i64};
use crate::int::BigTernaryInt;
use crate::storage::Allocator;
use t81_types::error::TernaryError;
use t81_types::Result;

/// Reads a non-negative bounded argument through the small-integer fast path.
fn bounded_argument(value: &BigTernaryInt, cap: u64, what: &str) -> Result<u64> {
    if value.is_negative() {
        return Err(TernaryError::NegativeInput(format!(
            "{} must not be negative",
            what
        )));
    }
    let n = to_i64(value)?.unsigned_abs();
    if n > cap {
        return Err(TernaryError::Overflow(format!(
            "{} {} exceeds the limit of {}",
            what, n, cap
        )));
    }
    Ok(n)
}

/// `n!` computed natively in `u64`, then converted.
///
/// `cap` is at most 20, the largest factorial representable in 64 bits.
pub fn factorial(n: &BigTernaryInt, cap: u64, alloc: &Allocator) -> Result<BigTernaryInt> {
    let n = bounded_argument(n, cap, "factorial argument")?;
    let value = (2..=n).try_fold(1u64, |acc, k| acc.checked_mul(k)).ok_or_else(|| {
        TernaryError::Overflow(format!("{}! does not fit in 64 bits", n))
    })?;
    from_u64(value, alloc)
}

/// `base^exponent` by `exponent` sequential multiplications.
///
/// `multiply` is the product operation to use, normally the cached one.
pub fn power<F>(
    base: &BigTernaryInt,
    exponent: &BigTernaryInt,
    cap: u64,
    alloc: &Allocator,
    mut multiply: F,
) -> Result<BigTernaryInt>
where
    F: FnMut(&BigTernaryInt, &BigTernaryInt) -> Result<BigTernaryInt>,
{
    let exponent = bounded_argument(exponent, cap, "exponent")?;
    let mut acc = from_i64(1, alloc)?;
    for _ in 0..exponent {
        // The previous accumulator is dropped here, releasing its storage.
        acc = multiply(&acc, base)?;
    }
    Ok(acc)
}
