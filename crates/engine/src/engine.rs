// Path: crates/engine/src/engine.rs

//! The engine context object owning the configuration, the allocator, the
//! Result Cache and the resource counters.

use crate::int::BigTernaryInt;
use crate::logic;
use crate::mul::MulCache;
use crate::stats::{EngineStats, StatsSnapshot};
use crate::storage::Allocator;
use crate::{arith, convert, derived, div, mul};
use parking_lot::Mutex;
use std::sync::Arc;
use t81_telemetry::time::OperationTimer;
use t81_telemetry::{arithmetic_metrics, error_metrics};
use t81_types::config::EngineConfig;
use t81_types::error::{ErrorCode, TernaryError};
use t81_types::Result;

/// Arbitrary-precision ternary arithmetic with configurable storage and caching.
///
/// The engine is `Send + Sync`; operations take `&self` and never mutate their
/// operands. Every successful operation is counted and timed, every failure is
/// counted by error code.
#[derive(Debug)]
pub struct TernaryEngine {
    config: EngineConfig,
    allocator: Allocator,
    cache: Mutex<MulCache>,
    stats: Arc<EngineStats>,
}

impl TernaryEngine {
    /// Validates `config` and builds an engine with an empty cache.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let stats = Arc::new(EngineStats::default());
        let allocator = Allocator::from_config(&config, stats.clone());
        let cache = Mutex::new(MulCache::new(config.mul_cache_capacity, config.cache_policy));
        tracing::info!(
            target: "t81::engine",
            mmap_threshold_bytes = config.mmap_threshold_bytes,
            karatsuba_cutoff = config.karatsuba_cutoff,
            mul_cache_capacity = config.mul_cache_capacity,
            cache_policy = ?config.cache_policy,
            "ternary engine ready"
        );
        Self {
            config,
            allocator,
            cache,
            stats,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The allocator every value of this engine is created through.
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// A copy of the resource counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Drops every cached product.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    fn instrument<T>(&self, op: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _timer = OperationTimer::new(arithmetic_metrics(), op);
        match f() {
            Ok(value) => {
                self.stats.record_operation(op);
                Ok(value)
            }
            Err(e) => {
                error_metrics().inc_error("ternary", e.code());
                tracing::debug!(target: "t81::engine", op, error = %e, "operation failed");
                Err(e)
            }
        }
    }

    fn multiply_cached(&self, a: &BigTernaryInt, b: &BigTernaryInt) -> Result<BigTernaryInt> {
        mul::multiply(
            a,
            b,
            self.config.karatsuba_cutoff,
            &self.cache,
            &self.allocator,
        )
    }

    fn power_of_three(&self, trits: i64) -> Result<BigTernaryInt> {
        if trits < 0 {
            return Err(TernaryError::NegativeInput(format!(
                "shift count {} is negative",
                trits
            )));
        }
        let three = convert::from_i64(3, &self.allocator)?;
        let exponent = convert::from_i64(trits, &self.allocator)?;
        derived::power(
            &three,
            &exponent,
            self.config.power_cap,
            &self.allocator,
            |x, y| self.multiply_cached(x, y),
        )
    }

    /// Parses signed trit text such as `"-1202"`.
    pub fn parse(&self, text: &str) -> Result<BigTernaryInt> {
        self.instrument("parse", || convert::parse(text, &self.allocator))
    }

    /// Parses balanced-ternary text such as `"+0-"`.
    pub fn parse_balanced(&self, text: &str) -> Result<BigTernaryInt> {
        self.instrument("parse_balanced", || {
            convert::parse_balanced(text, &self.allocator)
        })
    }

    /// Canonical trit text.
    pub fn format(&self, value: &BigTernaryInt) -> String {
        convert::format(value)
    }

    /// Canonical balanced-ternary text.
    pub fn format_balanced(&self, value: &BigTernaryInt) -> String {
        convert::format_balanced(value)
    }

    /// Converts a native integer.
    pub fn from_i64(&self, n: i64) -> Result<BigTernaryInt> {
        self.instrument("from_i64", || convert::from_i64(n, &self.allocator))
    }

    /// Converts to a native integer; `Overflow` outside the `i64` range.
    pub fn to_i64(&self, value: &BigTernaryInt) -> Result<i64> {
        self.instrument("to_i64", || convert::to_i64(value))
    }

    /// Deep copy into fresh storage.
    pub fn duplicate(&self, value: &BigTernaryInt) -> Result<BigTernaryInt> {
        self.instrument("duplicate", || value.duplicate(&self.allocator))
    }

    /// `a + b`.
    pub fn add(&self, a: &BigTernaryInt, b: &BigTernaryInt) -> Result<BigTernaryInt> {
        self.instrument("add", || arith::add(a.view(), b.view(), &self.allocator))
    }

    /// `a - b`.
    pub fn subtract(&self, a: &BigTernaryInt, b: &BigTernaryInt) -> Result<BigTernaryInt> {
        self.instrument("subtract", || {
            arith::subtract(a.view(), b.view(), &self.allocator)
        })
    }

    /// `a * b`, served from the Result Cache when possible.
    pub fn multiply(&self, a: &BigTernaryInt, b: &BigTernaryInt) -> Result<BigTernaryInt> {
        self.instrument("multiply", || self.multiply_cached(a, b))
    }

    /// `(a / b, a % b)`, truncating toward zero.
    pub fn divide(
        &self,
        a: &BigTernaryInt,
        b: &BigTernaryInt,
    ) -> Result<(BigTernaryInt, BigTernaryInt)> {
        self.instrument("divide", || div::divide(a, b, &self.allocator))
    }

    /// `base^exponent` by repeated multiplication.
    pub fn power(&self, base: &BigTernaryInt, exponent: &BigTernaryInt) -> Result<BigTernaryInt> {
        self.instrument("power", || {
            derived::power(
                base,
                exponent,
                self.config.power_cap,
                &self.allocator,
                |x, y| self.multiply_cached(x, y),
            )
        })
    }

    /// `n!` for `0 <= n <= factorial_cap`.
    pub fn factorial(&self, n: &BigTernaryInt) -> Result<BigTernaryInt> {
        self.instrument("factorial", || {
            derived::factorial(n, self.config.factorial_cap, &self.allocator)
        })
    }

    /// `value * 3^trits`.
    pub fn shift_left(&self, value: &BigTernaryInt, trits: i64) -> Result<BigTernaryInt> {
        self.instrument("shift_left", || {
            let scale = self.power_of_three(trits)?;
            self.multiply_cached(value, &scale)
        })
    }

    /// `value / 3^trits`, truncating toward zero.
    pub fn shift_right(&self, value: &BigTernaryInt, trits: i64) -> Result<BigTernaryInt> {
        self.instrument("shift_right", || {
            let scale = self.power_of_three(trits)?;
            div::divide(value, &scale, &self.allocator).map(|(quotient, _)| quotient)
        })
    }

    /// Trit-wise AND of the magnitudes.
    pub fn trit_and(&self, a: &BigTernaryInt, b: &BigTernaryInt) -> Result<BigTernaryInt> {
        self.instrument("trit_and", || {
            logic::trit_binary(a, b, logic::and, &self.allocator)
        })
    }

    /// Trit-wise OR of the magnitudes.
    pub fn trit_or(&self, a: &BigTernaryInt, b: &BigTernaryInt) -> Result<BigTernaryInt> {
        self.instrument("trit_or", || {
            logic::trit_binary(a, b, logic::or, &self.allocator)
        })
    }

    /// Trit-wise XOR of the magnitudes.
    pub fn trit_xor(&self, a: &BigTernaryInt, b: &BigTernaryInt) -> Result<BigTernaryInt> {
        self.instrument("trit_xor", || {
            logic::trit_binary(a, b, logic::xor, &self.allocator)
        })
    }

    /// Trit-wise NOT of the magnitude.
    pub fn trit_not(&self, a: &BigTernaryInt) -> Result<BigTernaryInt> {
        self.instrument("trit_not", || logic::trit_not(a, &self.allocator))
    }
}

impl Default for TernaryEngine {
    /// An engine with [`EngineConfig::default`], which always validates.
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageKind;

    #[test]
    fn test_engine_rejects_invalid_config() {
        let config = EngineConfig {
            karatsuba_cutoff: 2,
            ..EngineConfig::default()
        };
        assert!(matches!(
            TernaryEngine::new(config),
            Err(TernaryError::Config(_))
        ));
    }

    #[test]
    fn test_default_matches_new_with_default_config() {
        let default = TernaryEngine::default();
        let built = TernaryEngine::new(EngineConfig::default()).unwrap();
        assert_eq!(default.config(), built.config());
        assert_eq!(default.stats(), built.stats());

        let a = default.parse("1212").unwrap();
        let b = default.parse("2").unwrap();
        default.multiply(&a, &b).unwrap();
        default.multiply(&a, &b).unwrap();
        // The default engine caches products like any other.
        assert_eq!(default.stats().cache_hits, 1);
    }

    #[test]
    fn test_operations_are_counted() {
        let engine = TernaryEngine::default();
        let a = engine.parse("102").unwrap();
        let b = engine.parse("21").unwrap();
        assert_eq!(engine.format(&engine.add(&a, &b).unwrap()), "200");
        assert!(engine.parse("3").is_err());
        // Failed operations are not counted.
        assert_eq!(engine.stats().operations, 3);
    }

    #[test]
    fn test_shifts() {
        let engine = TernaryEngine::default();
        let v = engine.parse("-1201").unwrap();
        assert_eq!(engine.format(&engine.shift_left(&v, 3).unwrap()), "-1201000");
        assert_eq!(engine.format(&engine.shift_right(&v, 2).unwrap()), "-12");
        assert_eq!(engine.format(&engine.shift_right(&v, 9).unwrap()), "0");
        assert_eq!(engine.shift_left(&v, 0).unwrap(), v);
        assert!(matches!(
            engine.shift_left(&v, -1),
            Err(TernaryError::NegativeInput(_))
        ));
        assert!(matches!(
            engine.shift_right(&v, 1001),
            Err(TernaryError::Overflow(_))
        ));
    }

    #[test]
    fn test_clear_cache_forces_recompute() {
        let engine = TernaryEngine::default();
        let a = engine.parse("1212").unwrap();
        let b = engine.parse("2").unwrap();
        engine.multiply(&a, &b).unwrap();
        engine.multiply(&a, &b).unwrap();
        engine.clear_cache();
        engine.multiply(&a, &b).unwrap();
        let stats = engine.stats();
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 2);
    }

    #[test]
    fn test_mapped_values_are_released_on_drop() {
        let engine = TernaryEngine::new(EngineConfig {
            mmap_threshold_bytes: 16,
            ..EngineConfig::default()
        })
        .unwrap();
        let big = engine.parse(&"2".repeat(200)).unwrap();
        assert_eq!(big.storage_kind(), StorageKind::Mapped);
        let copy = engine.duplicate(&big).unwrap();
        assert_eq!(copy, big);
        assert!(engine.stats().mapped_bytes > 0);
        drop(big);
        drop(copy);
        assert_eq!(engine.stats().mapped_bytes, 0);
    }
}
