// Path: crates/engine/src/int.rs

//! The sign-magnitude big integer and its borrowed views.

use crate::storage::{Allocator, LimbStore, StorageKind};
use serde::Serialize;
use std::fmt;
use t81_types::Result;

/// The sign of a [`BigTernaryInt`]. Zero is always [`Sign::Positive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Sign {
    /// Zero or greater.
    #[default]
    Positive,
    /// Strictly less than zero.
    Negative,
}

impl Sign {
    /// The opposite sign.
    pub fn flip(self) -> Self {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }

    /// Sign of a product or quotient: negative when exactly one operand is.
    pub fn product(self, other: Sign) -> Self {
        if self == other {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

/// An arbitrary-precision integer stored as a sign and base-81 limbs.
///
/// Invariants: at least one limb is in use, the most significant limb is
/// non-zero unless the value is zero, and zero is positive. Values are never
/// mutated by the arithmetic operations; each operation returns a new value.
pub struct BigTernaryInt {
    sign: Sign,
    limbs: LimbStore,
}

impl BigTernaryInt {
    /// Wraps a limb store, trimming it and collapsing negative zero.
    pub(crate) fn from_parts(sign: Sign, mut limbs: LimbStore) -> Self {
        limbs.trim();
        let sign = if is_zero_limbs(limbs.as_slice()) {
            Sign::Positive
        } else {
            sign
        };
        Self { sign, limbs }
    }

    /// The sign; positive for zero.
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// True when the value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Negative
    }

    /// True when the magnitude is zero.
    pub fn is_zero(&self) -> bool {
        is_zero_limbs(self.limbs.as_slice())
    }

    /// The in-use limbs, least significant first.
    pub fn limbs(&self) -> &[u8] {
        self.limbs.as_slice()
    }

    /// Number of limbs in use.
    pub fn len(&self) -> usize {
        self.limbs.len()
    }

    /// Never true for a live value; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Whether the limbs live on the heap or in a mapped file.
    pub fn storage_kind(&self) -> StorageKind {
        self.limbs.kind()
    }

    /// Deep-copies the value into fresh storage chosen by `alloc`.
    pub fn duplicate(&self, alloc: &Allocator) -> Result<Self> {
        Ok(Self::from_parts(self.sign, alloc.from_limbs(self.limbs())?))
    }

    /// A borrowed sign-magnitude view of this value.
    pub fn view(&self) -> SignedView<'_> {
        SignedView {
            sign: self.sign,
            limbs: self.limbs.as_slice(),
        }
    }
}

impl PartialEq for BigTernaryInt {
    fn eq(&self, other: &Self) -> bool {
        self.sign == other.sign && self.limbs() == other.limbs()
    }
}

impl Eq for BigTernaryInt {}

impl fmt::Debug for BigTernaryInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigTernaryInt")
            .field("sign", &self.sign)
            .field("limbs", &self.limbs())
            .field("storage", &self.storage_kind())
            .finish()
    }
}

impl fmt::Display for BigTernaryInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::convert::format(self))
    }
}

/// A borrowed sign plus magnitude.
///
/// Negating a view flips only the view's sign; the stored value is untouched.
#[derive(Debug, Clone, Copy)]
pub struct SignedView<'a> {
    /// Sign of the viewed value.
    pub sign: Sign,
    /// Limbs of the viewed value, least significant first.
    pub limbs: &'a [u8],
}

impl<'a> SignedView<'a> {
    /// The same magnitude with the opposite sign.
    pub fn negate(self) -> Self {
        Self {
            sign: self.sign.flip(),
            limbs: self.limbs,
        }
    }

    /// True when the magnitude is zero.
    pub fn is_zero(&self) -> bool {
        is_zero_limbs(self.limbs)
    }
}

pub(crate) fn is_zero_limbs(limbs: &[u8]) -> bool {
    limbs.iter().all(|&d| d == 0)
}
