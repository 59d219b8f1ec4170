// Path: crates/engine/src/div/mod.rs

//! The Division Engine: schoolbook long division, one dividend limb at a time.
//!
//! The running remainder starts at zero. For each dividend limb, most
//! significant first, the remainder is shifted up one limb, the limb is brought
//! in, and the largest quotient digit `q` in `0..=80` with `divisor * q <=
//! remainder` is found by trial multiplication. Division truncates toward zero.

use crate::arith::{compare_magnitude, mul_small, sub_in_place};
use crate::int::BigTernaryInt;
use crate::storage::heap::try_zeroed;
use crate::storage::Allocator;
use std::cmp::Ordering;
use t81_types::error::TernaryError;
use t81_types::{Result, LIMB_RADIX};

const MAX_DIGIT: u8 = (LIMB_RADIX - 1) as u8;

/// Returns `(quotient, remainder)`.
///
/// The quotient is negative when exactly one operand is; the remainder takes
/// the dividend's sign, so `a == b * quotient + remainder` and
/// `|remainder| < |b|`.
pub fn divide(
    a: &BigTernaryInt,
    b: &BigTernaryInt,
    alloc: &Allocator,
) -> Result<(BigTernaryInt, BigTernaryInt)> {
    if b.is_zero() {
        return Err(TernaryError::DivideByZero);
    }
    let divisor = b.limbs();
    let dividend = a.limbs();

    let mut quotient = alloc.allocate(dividend.len())?;
    // remainder < divisor before each shift, so one extra limb always suffices.
    let mut remainder = alloc.allocate(divisor.len() + 1)?;
    let mut trial = try_zeroed(divisor.len() + 1)?;

    for (i, &limb) in dividend.iter().enumerate().rev() {
        let rem = remainder.as_mut_slice();
        rem.copy_within(..rem.len() - 1, 1);
        rem[0] = limb;

        let mut q = 0;
        for candidate in 1..=MAX_DIGIT {
            mul_small(divisor, candidate, &mut trial);
            if compare_magnitude(&trial, rem) == Ordering::Greater {
                break;
            }
            q = candidate;
        }
        if q > 0 {
            mul_small(divisor, q, &mut trial);
            sub_in_place(rem, &trial);
        }
        quotient.as_mut_slice()[i] = q;
    }

    Ok((
        BigTernaryInt::from_parts(a.sign().product(b.sign()), quotient),
        BigTernaryInt::from_parts(a.sign(), remainder),
    ))
}

#[cfg(test)]
mod tests;
