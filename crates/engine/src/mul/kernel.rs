// Path: crates/engine/src/mul/kernel.rs

//! Unsigned product kernels over raw limb slices.
//!
//! Both kernels produce identical limbs for every input; Karatsuba only changes
//! the cost. Scratch buffers for the three sub-products are allocated per
//! recursion level and dropped on return. Scratch allocation is fallible, so an
//! exhausted heap surfaces as `TernaryError::Memory` rather than an abort.

use crate::arith::{add_into, add_shifted, sub_in_place};
use crate::storage::heap::try_zeroed;
use t81_types::config::MIN_KARATSUBA_CUTOFF;
use t81_types::{Result, LIMB_RADIX};

/// Direct O(n^2) convolution. Returns `a.len() + b.len()` limbs.
pub fn naive_product(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    let mut out = try_zeroed(a.len() + b.len())?;
    schoolbook(a, b, &mut out);
    Ok(out)
}

/// Karatsuba product with the given cutoff. Returns `2 * max(a.len(), b.len())` limbs.
///
/// Cutoffs below [`MIN_KARATSUBA_CUTOFF`] are raised to it.
pub fn karatsuba_product(a: &[u8], b: &[u8], cutoff: usize) -> Result<Vec<u8>> {
    let n = a.len().max(b.len());
    let a = padded(a, n)?;
    let b = padded(b, n)?;
    let mut out = try_zeroed(2 * n)?;
    karatsuba(&a, &b, &mut out, cutoff)?;
    Ok(out)
}

/// Copies `limbs` into a buffer of exactly `len` limbs, zero-padded on the high end.
fn padded(limbs: &[u8], len: usize) -> Result<Vec<u8>> {
    let mut buf = try_zeroed(len)?;
    for (dst, &src) in buf.iter_mut().zip(limbs) {
        *dst = src;
    }
    Ok(buf)
}

/// Column-wise convolution with the carry folded in per output position.
/// `out` must be zeroed or is overwritten up to its length.
pub(crate) fn schoolbook(a: &[u8], b: &[u8], out: &mut [u8]) {
    if a.is_empty() || b.is_empty() {
        out.fill(0);
        return;
    }
    let radix = u64::from(LIMB_RADIX);
    let mut carry = 0u64;
    for (k, slot) in out.iter_mut().enumerate() {
        let mut column = carry;
        let first = k.saturating_sub(b.len() - 1);
        for (i, &x) in a.iter().enumerate().take(k + 1).skip(first) {
            column += u64::from(x) * u64::from(b[k - i]);
        }
        *slot = (column % radix) as u8;
        carry = column / radix;
    }
}

/// Karatsuba on equal-length operands. `out` must hold `2 * a.len()` limbs.
///
/// The half sums are one limb wider than the high halves, so the middle
/// recursion only shrinks once `n` exceeds 3; the cutoff is clamped to keep it
/// terminating.
pub(crate) fn karatsuba(a: &[u8], b: &[u8], out: &mut [u8], cutoff: usize) -> Result<()> {
    let cutoff = cutoff.max(MIN_KARATSUBA_CUTOFF);
    let n = a.len();
    if n <= cutoff {
        schoolbook(a, b, out);
        return Ok(());
    }
    let half = n / 2;
    let (a_low, a_high) = a.split_at(half);
    let (b_low, b_high) = b.split_at(half);
    let high_len = n - half;

    let mut low = try_zeroed(2 * half)?;
    karatsuba(a_low, b_low, &mut low, cutoff)?;
    let mut high = try_zeroed(2 * high_len)?;
    karatsuba(a_high, b_high, &mut high, cutoff)?;

    // The half sums keep their carry-out limb, so they are one limb wider.
    let mut a_sum = try_zeroed(high_len + 1)?;
    add_into(a_low, a_high, &mut a_sum);
    let mut b_sum = try_zeroed(high_len + 1)?;
    add_into(b_low, b_high, &mut b_sum);
    let mut middle = try_zeroed(2 * (high_len + 1))?;
    karatsuba(&a_sum, &b_sum, &mut middle, cutoff)?;
    sub_in_place(&mut middle, &low);
    sub_in_place(&mut middle, &high);

    out.fill(0);
    add_shifted(out, &low, 0);
    add_shifted(out, &middle, half);
    add_shifted(out, &high, 2 * half);
    Ok(())
}
