// Path: crates/engine/src/convert.rs

//! The Base Converter: trit text, balanced-ternary text and native integers.
//!
//! Trit text is most-significant first (`"102"` is eleven). Limbs are
//! least-significant first. Because the limb radix is exactly 3^4, four trits
//! map onto one limb and parsing can fold four trits at a time.

use crate::arith;
use crate::int::{is_zero_limbs, BigTernaryInt, Sign};
use crate::storage::{Allocator, LimbStore};
use t81_types::error::TernaryError;
use t81_types::{Result, LIMB_RADIX, TRITS_PER_LIMB};

/// Splits one limb into its four trits, least significant first.
pub(crate) fn limb_to_trits(limb: u8) -> [u8; TRITS_PER_LIMB] {
    [limb % 3, limb / 3 % 3, limb / 9 % 3, limb / 27 % 3]
}

/// Packs four trits, least significant first, into one limb.
pub(crate) fn trits_to_limb(trits: [u8; TRITS_PER_LIMB]) -> u8 {
    trits.iter().rev().fold(0, |acc, &t| acc * 3 + t)
}

/// Parses signed trit text, folding four trits per step.
///
/// Accepts an optional leading `-` or `+` followed by at least one of
/// `0`, `1`, `2`. `"-0"` is positive zero.
pub fn parse(text: &str, alloc: &Allocator) -> Result<BigTernaryInt> {
    let (sign, digits) = split_sign(text)?;
    let mut store = alloc.allocate(1)?;

    let (head, body) = digits.split_at(digits.len() % TRITS_PER_LIMB);
    for &c in head {
        fold(&mut store, 3, u32::from(c - b'0'), alloc)?;
    }
    for group in body.chunks_exact(TRITS_PER_LIMB) {
        let value = group
            .iter()
            .fold(0u32, |acc, &c| acc * 3 + u32::from(c - b'0'));
        fold(&mut store, LIMB_RADIX, value, alloc)?;
    }
    Ok(BigTernaryInt::from_parts(sign, store))
}

/// Parses signed trit text one trit at a time. Agrees with [`parse`] on every input.
pub fn parse_unbatched(text: &str, alloc: &Allocator) -> Result<BigTernaryInt> {
    let (sign, digits) = split_sign(text)?;
    let mut store = alloc.allocate(1)?;
    for &c in digits {
        fold(&mut store, 3, u32::from(c - b'0'), alloc)?;
    }
    Ok(BigTernaryInt::from_parts(sign, store))
}

fn split_sign(text: &str) -> Result<(Sign, &[u8])> {
    let (sign, digits) = if let Some(rest) = text.strip_prefix('-') {
        (Sign::Negative, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (Sign::Positive, rest)
    } else {
        (Sign::Positive, text)
    };
    if digits.is_empty() {
        return Err(TernaryError::InvalidInput(format!(
            "no trits in {:?}",
            text
        )));
    }
    if let Some((pos, c)) = digits
        .char_indices()
        .find(|(_, c)| !matches!(c, '0'..='2'))
    {
        return Err(TernaryError::InvalidInput(format!(
            "invalid trit {:?} at offset {}",
            c, pos
        )));
    }
    Ok((sign, digits.as_bytes()))
}

/// `store = store * radix + digit`, growing by one limb on carry-out.
fn fold(store: &mut LimbStore, radix: u32, digit: u32, alloc: &Allocator) -> Result<()> {
    let mut carry = digit;
    for limb in store.as_mut_slice() {
        let v = u32::from(*limb) * radix + carry;
        *limb = (v % LIMB_RADIX) as u8;
        carry = v / LIMB_RADIX;
    }
    if carry > 0 {
        // radix <= 81 and digit <= 80, so the carry is a single limb.
        store.grow(store.len() + 1, alloc)?;
        if let Some(top) = store.as_mut_slice().last_mut() {
            *top = carry as u8;
        }
    }
    Ok(())
}

/// Canonical trit text: `"0"` for zero, `-` prefix for negatives, no leading zeros.
pub fn format(value: &BigTernaryInt) -> String {
    if value.is_zero() {
        return "0".to_owned();
    }
    let mut out = String::with_capacity(value.len() * TRITS_PER_LIMB + 1);
    if value.is_negative() {
        out.push('-');
    }
    value
        .limbs()
        .iter()
        .rev()
        .flat_map(|&limb| limb_to_trits(limb).into_iter().rev())
        .skip_while(|&t| t == 0)
        .for_each(|t| out.push(char::from(b'0' + t)));
    out
}

/// Formats by repeated division of a working copy by 3. Agrees with [`format`].
pub fn format_unbatched(value: &BigTernaryInt) -> String {
    if value.is_zero() {
        return "0".to_owned();
    }
    let mut work = value.limbs().to_vec();
    let mut digits = Vec::with_capacity(work.len() * TRITS_PER_LIMB);
    while !is_zero_limbs(&work) {
        let mut rem = 0u32;
        for limb in work.iter_mut().rev() {
            let cur = rem * LIMB_RADIX + u32::from(*limb);
            *limb = (cur / 3) as u8;
            rem = cur % 3;
        }
        digits.push(b'0' + rem as u8);
    }
    let mut out = String::with_capacity(digits.len() + 1);
    if value.is_negative() {
        out.push('-');
    }
    out.extend(digits.iter().rev().map(|&d| char::from(d)));
    out
}

/// Parses balanced-ternary text over `-` (minus one), `0` and `+` (plus one),
/// most significant first. The numeral carries its own sign.
pub fn parse_balanced(text: &str, alloc: &Allocator) -> Result<BigTernaryInt> {
    if text.is_empty() {
        return Err(TernaryError::InvalidInput(
            "empty balanced ternary numeral".to_owned(),
        ));
    }
    // Split into the positions holding `+` and those holding `-`, then subtract.
    let mut plus = alloc.allocate(1)?;
    let mut minus = alloc.allocate(1)?;
    for (pos, c) in text.char_indices() {
        let (p, m) = match c {
            '+' => (1, 0),
            '0' => (0, 0),
            '-' => (0, 1),
            other => {
                return Err(TernaryError::InvalidInput(format!(
                    "invalid balanced trit {:?} at offset {}",
                    other, pos
                )))
            }
        };
        fold(&mut plus, 3, p, alloc)?;
        fold(&mut minus, 3, m, alloc)?;
    }
    let plus = BigTernaryInt::from_parts(Sign::Positive, plus);
    let minus = BigTernaryInt::from_parts(Sign::Positive, minus);
    arith::subtract(plus.view(), minus.view(), alloc)
}

/// Canonical balanced-ternary text: `"0"` for zero, otherwise no leading `0`.
pub fn format_balanced(value: &BigTernaryInt) -> String {
    if value.is_zero() {
        return "0".to_owned();
    }
    let mut digits: Vec<i8> = Vec::with_capacity(value.len() * TRITS_PER_LIMB + 1);
    let mut carry = 0u8;
    for &limb in value.limbs() {
        for t in limb_to_trits(limb) {
            match t + carry {
                0 => {
                    digits.push(0);
                    carry = 0;
                }
                1 => {
                    digits.push(1);
                    carry = 0;
                }
                2 => {
                    digits.push(-1);
                    carry = 1;
                }
                _ => {
                    digits.push(0);
                    carry = 1;
                }
            }
        }
    }
    if carry > 0 {
        digits.push(1);
    }
    while digits.last() == Some(&0) {
        digits.pop();
    }
    let flip = if value.is_negative() { -1 } else { 1 };
    digits
        .iter()
        .rev()
        .map(|&d| match d * flip {
            1 => '+',
            -1 => '-',
            _ => '0',
        })
        .collect()
}

/// Converts a native integer.
pub fn from_i64(n: i64, alloc: &Allocator) -> Result<BigTernaryInt> {
    let sign = if n < 0 { Sign::Negative } else { Sign::Positive };
    from_magnitude(sign, n.unsigned_abs(), alloc)
}

pub(crate) fn from_u64(n: u64, alloc: &Allocator) -> Result<BigTernaryInt> {
    from_magnitude(Sign::Positive, n, alloc)
}

fn from_magnitude(sign: Sign, mut magnitude: u64, alloc: &Allocator) -> Result<BigTernaryInt> {
    // 81^11 > u64::MAX
    let mut limbs = [0u8; 11];
    for limb in limbs.iter_mut() {
        *limb = (magnitude % u64::from(LIMB_RADIX)) as u8;
        magnitude /= u64::from(LIMB_RADIX);
    }
    Ok(BigTernaryInt::from_parts(sign, alloc.from_limbs(&limbs)?))
}

/// Converts to a native integer, failing with `Overflow` outside the `i64` range.
pub fn to_i64(value: &BigTernaryInt) -> Result<i64> {
    let overflow = || {
        TernaryError::Overflow(format!(
            "value of {} limbs does not fit in a 64-bit integer",
            value.len()
        ))
    };
    let magnitude = value
        .limbs()
        .iter()
        .rev()
        .try_fold(0u64, |acc, &limb| {
            acc.checked_mul(u64::from(LIMB_RADIX))?
                .checked_add(u64::from(limb))
        })
        .ok_or_else(overflow)?;
    if value.is_negative() {
        0i64.checked_sub_unsigned(magnitude).ok_or_else(overflow)
    } else {
        i64::try_from(magnitude).map_err(|_| overflow())
    }
}
