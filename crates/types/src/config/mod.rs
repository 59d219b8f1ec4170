// Path: crates/types/src/config/mod.rs

//! Shared configuration structures for the T81 engine.
use crate::error::TernaryError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The largest factorial argument whose result fits a native `u64`.
pub const MAX_NATIVE_FACTORIAL: u64 = 20;

/// The smallest Karatsuba cutoff for which the recursion is guaranteed to shrink.
///
/// A split of `n` limbs recurses on `n / 2 + 1` limbs for the half sums, which is
/// only smaller than `n` once `n >= 4`.
pub const MIN_KARATSUBA_CUTOFF: usize = 4;

/// Selects how the multiplication result cache replaces an entry when full.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum CachePolicy {
    /// Fill the first empty slot, otherwise overwrite slot 0.
    #[default]
    SlotZero,
    /// Overwrite the least recently used slot.
    Lru,
}

/// Configuration for a `TernaryEngine` instance.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Allocations of this many bytes or more are backed by a mapped temporary file.
    #[serde(default = "default_mmap_threshold_bytes")]
    pub mmap_threshold_bytes: usize,
    /// Directory for the unlinked backing files. `None` uses the OS temp directory.
    #[serde(default)]
    pub spill_dir: Option<PathBuf>,
    /// Operand length (in limbs) at or below which direct convolution is used.
    #[serde(default = "default_karatsuba_cutoff")]
    pub karatsuba_cutoff: usize,
    /// Number of multiplication results kept in the cache. Zero disables it.
    #[serde(default = "default_mul_cache_capacity")]
    pub mul_cache_capacity: usize,
    /// Replacement policy of the multiplication cache.
    #[serde(default)]
    pub cache_policy: CachePolicy,
    /// Largest accepted factorial argument.
    #[serde(default = "default_factorial_cap")]
    pub factorial_cap: u64,
    /// Largest accepted exponent for `power` and the trit shifts.
    #[serde(default = "default_power_cap")]
    pub power_cap: u64,
}

fn default_mmap_threshold_bytes() -> usize {
    500 * 1024
}
fn default_karatsuba_cutoff() -> usize {
    16
}
fn default_mul_cache_capacity() -> usize {
    8
}
fn default_factorial_cap() -> u64 {
    MAX_NATIVE_FACTORIAL
}
fn default_power_cap() -> u64 {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mmap_threshold_bytes: default_mmap_threshold_bytes(),
            spill_dir: None,
            karatsuba_cutoff: default_karatsuba_cutoff(),
            mul_cache_capacity: default_mul_cache_capacity(),
            cache_policy: CachePolicy::default(),
            factorial_cap: default_factorial_cap(),
            power_cap: default_power_cap(),
        }
    }
}

impl EngineConfig {
    /// Checks the invariants the arithmetic code relies on.
    pub fn validate(&self) -> Result<(), TernaryError> {
        if self.karatsuba_cutoff < MIN_KARATSUBA_CUTOFF {
            return Err(TernaryError::Config(format!(
                "karatsuba_cutoff must be at least {}, got {}",
                MIN_KARATSUBA_CUTOFF, self.karatsuba_cutoff
            )));
        }
        if self.factorial_cap > MAX_NATIVE_FACTORIAL {
            return Err(TernaryError::Config(format!(
                "factorial_cap must not exceed {}, got {}",
                MAX_NATIVE_FACTORIAL, self.factorial_cap
            )));
        }
        if let Some(dir) = &self.spill_dir {
            if dir.as_os_str().is_empty() {
                return Err(TernaryError::Config("spill_dir must not be empty".into()));
            }
        }
        Ok(())
    }
}
