// Path: crates/engine/src/arith.rs

//! The Sign-Magnitude Arithmetic Core and the unsigned limb primitives shared
//! with the multiplication and division engines.

use crate::int::{BigTernaryInt, SignedView};
use crate::storage::Allocator;
use std::cmp::Ordering;
use t81_types::{Result, LIMB_RADIX};

const RADIX: u16 = LIMB_RADIX as u16;

/// Compares two magnitudes of possibly different lengths.
pub fn compare_magnitude(a: &[u8], b: &[u8]) -> Ordering {
    let common = a.len().min(b.len());
    let (a_low, a_high) = a.split_at(common);
    let (b_low, b_high) = b.split_at(common);
    if a_high.iter().any(|&d| d != 0) {
        return Ordering::Greater;
    }
    if b_high.iter().any(|&d| d != 0) {
        return Ordering::Less;
    }
    a_low.iter().rev().cmp(b_low.iter().rev())
}

/// Signed addition.
pub fn add(a: SignedView<'_>, b: SignedView<'_>, alloc: &Allocator) -> Result<BigTernaryInt> {
    if a.sign == b.sign {
        let mut out = alloc.allocate(a.limbs.len().max(b.limbs.len()) + 1)?;
        add_into(a.limbs, b.limbs, out.as_mut_slice());
        return Ok(BigTernaryInt::from_parts(a.sign, out));
    }
    let (larger, smaller) = match compare_magnitude(a.limbs, b.limbs) {
        Ordering::Equal => return Ok(BigTernaryInt::from_parts(a.sign, alloc.allocate(1)?)),
        Ordering::Greater => (a, b),
        Ordering::Less => (b, a),
    };
    let mut out = alloc.from_limbs(larger.limbs)?;
    sub_in_place(out.as_mut_slice(), smaller.limbs);
    Ok(BigTernaryInt::from_parts(larger.sign, out))
}

/// Signed subtraction: `a + (-b)`. Neither operand is modified.
pub fn subtract(a: SignedView<'_>, b: SignedView<'_>, alloc: &Allocator) -> Result<BigTernaryInt> {
    add(a, b.negate(), alloc)
}

/// Writes `a + b` into `out`, which must be zeroed and long enough for the carry.
pub(crate) fn add_into(a: &[u8], b: &[u8], out: &mut [u8]) {
    let mut carry = 0u16;
    for (i, slot) in out.iter_mut().enumerate() {
        let sum = u16::from(a.get(i).copied().unwrap_or(0))
            + u16::from(b.get(i).copied().unwrap_or(0))
            + carry;
        *slot = (sum % RADIX) as u8;
        carry = sum / RADIX;
    }
}

/// `acc -= b` with borrow propagation. Requires `acc >= b` as magnitudes.
pub(crate) fn sub_in_place(acc: &mut [u8], b: &[u8]) {
    let mut borrow = 0i16;
    for (i, slot) in acc.iter_mut().enumerate() {
        let sub = i16::from(b.get(i).copied().unwrap_or(0)) + borrow;
        if sub == 0 && i >= b.len() {
            break;
        }
        let mut d = i16::from(*slot) - sub;
        if d < 0 {
            d += RADIX as i16;
            borrow = 1;
        } else {
            borrow = 0;
        }
        *slot = d as u8;
    }
}

/// `acc += src * 81^shift`, carrying as far as `acc` reaches.
pub(crate) fn add_shifted(acc: &mut [u8], src: &[u8], shift: usize) {
    let Some(window) = acc.get_mut(shift..) else {
        return;
    };
    let mut carry = 0u16;
    for (i, slot) in window.iter_mut().enumerate() {
        let add = u16::from(src.get(i).copied().unwrap_or(0)) + carry;
        if add == 0 && i >= src.len() {
            break;
        }
        let sum = u16::from(*slot) + add;
        *slot = (sum % RADIX) as u8;
        carry = sum / RADIX;
    }
}

/// Writes `a * digit` into `out`, which must hold `a.len() + 1` limbs.
pub(crate) fn mul_small(a: &[u8], digit: u8, out: &mut [u8]) {
    let mut carry = 0u16;
    for (i, slot) in out.iter_mut().enumerate() {
        let v = u16::from(a.get(i).copied().unwrap_or(0)) * u16::from(digit) + carry;
        *slot = (v % RADIX) as u8;
        carry = v / RADIX;
    }
}
