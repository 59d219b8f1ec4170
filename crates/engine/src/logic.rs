// Path: crates/engine/src/logic.rs

//! The Ternary Logic Layer.
//!
//! Kleene-style operators on trits: AND is `min`, OR is `max`, NOT is `2 - t`
//! and XOR is addition mod 3. They apply position-wise over zero-extended
//! operands, either on a [`TritArray`] or on the magnitudes of two big integers.

use crate::convert::{limb_to_trits, trits_to_limb};
use crate::int::{BigTernaryInt, Sign};
use crate::storage::Allocator;
use std::fmt;
use std::str::FromStr;
use t81_types::error::TernaryError;
use t81_types::{Result, LIMB_RADIX};

// The scalar operators only ever see validated trits (0..=2); they saturate
// rather than panic on anything else.

/// Trit-wise AND.
pub(crate) fn and(a: u8, b: u8) -> u8 {
    a.min(b)
}

/// Trit-wise OR.
pub(crate) fn or(a: u8, b: u8) -> u8 {
    a.max(b)
}

/// Trit-wise NOT.
pub(crate) fn not(a: u8) -> u8 {
    2u8.saturating_sub(a)
}

/// Trit-wise XOR.
pub(crate) fn xor(a: u8, b: u8) -> u8 {
    ((u16::from(a) + u16::from(b)) % 3) as u8
}

/// A sequence of trits, index 0 least significant. Carries no sign.
///
/// Results keep the longer operand's length; zero trits are not trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TritArray {
    trits: Vec<u8>,
}

impl TritArray {
    /// Wraps `trits`, rejecting any value above 2.
    pub fn new(trits: Vec<u8>) -> Result<Self> {
        if let Some(pos) = trits.iter().position(|&t| t > 2) {
            return Err(TernaryError::InvalidInput(format!(
                "trit value {} at index {} is out of range",
                trits[pos], pos
            )));
        }
        Ok(Self { trits })
    }

    /// The trits, least significant first.
    pub fn as_slice(&self) -> &[u8] {
        &self.trits
    }

    /// Number of trits.
    pub fn len(&self) -> usize {
        self.trits.len()
    }

    /// True for the empty array.
    pub fn is_empty(&self) -> bool {
        self.trits.is_empty()
    }

    /// Position-wise AND.
    pub fn and(&self, other: &Self) -> Self {
        self.zip_with(other, and)
    }

    /// Position-wise OR.
    pub fn or(&self, other: &Self) -> Self {
        self.zip_with(other, or)
    }

    /// Position-wise XOR.
    pub fn xor(&self, other: &Self) -> Self {
        self.zip_with(other, xor)
    }

    /// Position-wise NOT.
    pub fn not(&self) -> Self {
        Self {
            trits: self.trits.iter().map(|&t| not(t)).collect(),
        }
    }

    fn zip_with(&self, other: &Self, op: fn(u8, u8) -> u8) -> Self {
        let len = self.len().max(other.len());
        let at = |v: &[u8], i: usize| v.get(i).copied().unwrap_or(0);
        Self {
            trits: (0..len)
                .map(|i| op(at(&self.trits, i), at(&other.trits, i)))
                .collect(),
        }
    }
}

/// Parses trit text written most significant first, like a numeral.
impl FromStr for TritArray {
    type Err = TernaryError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .rev()
            .map(|c| match c {
                '0'..='2' => Ok(c as u8 - b'0'),
                other => Err(TernaryError::InvalidInput(format!(
                    "invalid trit {:?}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(|trits| Self { trits })
    }
}

impl fmt::Display for TritArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &t in self.trits.iter().rev() {
            write!(f, "{}", t)?;
        }
        Ok(())
    }
}

/// Applies a binary trit operator to every trit of two magnitudes.
pub fn trit_binary(
    a: &BigTernaryInt,
    b: &BigTernaryInt,
    op: fn(u8, u8) -> u8,
    alloc: &Allocator,
) -> Result<BigTernaryInt> {
    let (x, y) = (a.limbs(), b.limbs());
    let mut out = alloc.allocate(x.len().max(y.len()))?;
    for (i, slot) in out.as_mut_slice().iter_mut().enumerate() {
        let lhs = limb_to_trits(x.get(i).copied().unwrap_or(0));
        let rhs = limb_to_trits(y.get(i).copied().unwrap_or(0));
        let mut trits = [0u8; 4];
        for ((t, l), r) in trits.iter_mut().zip(lhs).zip(rhs) {
            *t = op(l, r);
        }
        *slot = trits_to_limb(trits);
    }
    Ok(BigTernaryInt::from_parts(Sign::Positive, out))
}

/// Complements every trit of the in-use limbs of the magnitude.
pub fn trit_not(a: &BigTernaryInt, alloc: &Allocator) -> Result<BigTernaryInt> {
    let mut out = alloc.from_limbs(a.limbs())?;
    let max = (LIMB_RADIX - 1) as u8;
    for limb in out.as_mut_slice() {
        *limb = max - *limb;
    }
    Ok(BigTernaryInt::from_parts(Sign::Positive, out))
}
