// Path: crates/engine/src/mul/tests/mod.rs
use super::*;
use crate::convert::{format, from_i64, parse, to_i64};
use crate::int::Sign;
use crate::test_support::{heap_allocator, mapped_allocator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use t81_types::config::{CachePolicy, MIN_KARATSUBA_CUTOFF};

fn random_limbs(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen_range(0..81)).collect()
}

#[test]
fn test_schoolbook_small_products() {
    assert_eq!(naive_product(&[5], &[5]).unwrap(), vec![25, 0]);
    assert_eq!(naive_product(&[80], &[80]).unwrap(), vec![1, 79]);
    assert_eq!(naive_product(&[80, 80], &[80, 80]).unwrap(), vec![1, 0, 79, 80]);
    assert_eq!(naive_product(&[], &[3]).unwrap(), vec![0]);
}

#[test]
fn test_karatsuba_matches_naive_across_the_cutoff() {
    let mut rng = StdRng::seed_from_u64(0x7481);
    for (len_a, len_b) in [(1, 1), (15, 16), (16, 16), (17, 17), (33, 20), (64, 64), (101, 7)] {
        for _ in 0..4 {
            let a = random_limbs(&mut rng, len_a);
            let b = random_limbs(&mut rng, len_b);
            let naive = naive_product(&a, &b).unwrap();
            for cutoff in [4, 5, 16] {
                let fast = karatsuba_product(&a, &b, cutoff).unwrap();
                assert_eq!(
                    crate::storage::significant_len(&naive),
                    crate::storage::significant_len(&fast)
                );
                let n = crate::storage::significant_len(&naive);
                assert_eq!(naive[..n], fast[..n], "{len_a}x{len_b} cutoff {cutoff}");
            }
        }
    }
}

#[test]
fn test_karatsuba_all_max_limbs_keeps_top_carry() {
    // (81^n - 1)^2 stresses the carry-out of the half sums.
    for n in [17, 32, 33, 50] {
        let a = vec![80u8; n];
        let naive = naive_product(&a, &a).unwrap();
        let fast = karatsuba_product(&a, &a, 4).unwrap();
        assert_eq!(naive, fast, "n = {n}");
    }
}

#[test]
fn test_cutoff_below_minimum_is_clamped() {
    let naive = naive_product(&[1, 2, 3], &[4, 5, 6]).unwrap();
    for cutoff in 0..MIN_KARATSUBA_CUTOFF {
        assert_eq!(karatsuba_product(&[1, 2, 3], &[4, 5, 6], cutoff).unwrap(), naive);
    }

    let mut rng = StdRng::seed_from_u64(0x0c);
    let a = random_limbs(&mut rng, 23);
    let b = random_limbs(&mut rng, 19);
    let naive = naive_product(&a, &b).unwrap();
    let fast = karatsuba_product(&a, &b, 0).unwrap();
    let n = crate::storage::significant_len(&naive);
    assert_eq!(naive[..n], fast[..n]);

    let alloc = heap_allocator();
    let x = from_i64(-123_456_789, &alloc).unwrap();
    let y = from_i64(987_654, &alloc).unwrap();
    let p = product(&x, &y, 0, &alloc).unwrap();
    assert_eq!(to_i64(&p).unwrap(), -123_456_789 * 987_654);
}

#[test]
fn test_product_signs_and_zero() {
    let alloc = heap_allocator();
    let p = |a: &str, b: &str| {
        let a = parse(a, &alloc).unwrap();
        let b = parse(b, &alloc).unwrap();
        product(&a, &b, 16, &alloc).unwrap()
    };
    assert_eq!(format(&p("12", "12")), "221");
    assert_eq!(format(&p("-12", "12")), "-221");
    assert_eq!(format(&p("-12", "-12")), "221");

    let zero = p("-0", "-2101");
    assert!(zero.is_zero());
    assert_eq!(zero.sign(), Sign::Positive);
    assert_eq!(p("-2101", "0").sign(), Sign::Positive);
}

#[test]
fn test_product_matches_native_arithmetic() {
    let alloc = heap_allocator();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let x: i64 = rng.gen_range(-3_000_000_000..3_000_000_000);
        let y: i64 = rng.gen_range(-3_000_000_000..3_000_000_000);
        let a = from_i64(x, &alloc).unwrap();
        let b = from_i64(y, &alloc).unwrap();
        let got = product(&a, &b, 4, &alloc).unwrap();
        assert_eq!(to_i64(&got).unwrap(), x * y);
    }
}

#[test]
fn test_cache_hit_returns_equal_independent_copy() {
    let alloc = heap_allocator();
    let cache = Mutex::new(MulCache::new(8, CachePolicy::SlotZero));
    let a = parse("1201", &alloc).unwrap();
    let b = parse("-22", &alloc).unwrap();

    let first = multiply(&a, &b, 16, &cache, &alloc).unwrap();
    let second = multiply(&a, &b, 16, &cache, &alloc).unwrap();
    assert_eq!(first, second);
    assert_eq!(format(&a), "1201");
    assert_eq!(format(&b), "-22");

    let stats = alloc.stats().snapshot();
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(cache.lock().len(), 1);
}

#[test]
fn test_zero_operands_bypass_the_cache() {
    let alloc = heap_allocator();
    let cache = Mutex::new(MulCache::new(8, CachePolicy::SlotZero));
    let a = parse("0", &alloc).unwrap();
    let b = parse("21", &alloc).unwrap();
    assert!(multiply(&a, &b, 16, &cache, &alloc).unwrap().is_zero());
    assert!(cache.lock().is_empty());
}

#[test]
fn test_disabled_cache_is_bypassed() {
    let alloc = mapped_allocator(8);
    let cache = Mutex::new(MulCache::new(0, CachePolicy::Lru));
    assert!(!cache.lock().is_enabled());
    let a = parse(&"21".repeat(20), &alloc).unwrap();
    let b = parse(&format!("-{}", "1".repeat(40)), &alloc).unwrap();

    let before = alloc.stats().snapshot();
    let cached = multiply(&a, &b, 4, &cache, &alloc).unwrap();
    let between = alloc.stats().snapshot();
    let direct = product(&a, &b, 4, &alloc).unwrap();
    let after = alloc.stats().snapshot();

    assert_eq!(cached, direct);
    // No throwaway copy for the cache: both paths map exactly the same buffers.
    assert_eq!(
        between.mapping_events - before.mapping_events,
        after.mapping_events - between.mapping_events
    );
    assert_eq!(after.cache_hits + after.cache_misses, 0);
    assert!(MulCache::new(1, CachePolicy::Lru).is_enabled());
}

#[test]
fn test_slot_zero_replacement() {
    let alloc = heap_allocator();
    let mut cache = MulCache::new(2, CachePolicy::SlotZero);
    let v = |n| from_i64(n, &alloc).unwrap();
    cache.insert("a".into(), v(1));
    cache.insert("b".into(), v(2));
    // Reading "a" does not protect it under slot-zero replacement.
    assert!(cache.get("a").is_some());
    cache.insert("c".into(), v(3));
    assert!(!cache.contains("a"));
    assert!(cache.contains("b"));
    assert!(cache.contains("c"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_lru_replacement() {
    let alloc = heap_allocator();
    let mut cache = MulCache::new(2, CachePolicy::Lru);
    let v = |n| from_i64(n, &alloc).unwrap();
    cache.insert("a".into(), v(1));
    cache.insert("b".into(), v(2));
    assert!(cache.get("a").is_some());
    cache.insert("c".into(), v(3));
    assert!(cache.contains("a"));
    assert!(!cache.contains("b"));
    assert!(cache.contains("c"));
}

#[test]
fn test_one_entry_per_key() {
    let alloc = heap_allocator();
    let mut cache = MulCache::new(4, CachePolicy::SlotZero);
    cache.insert("k".into(), from_i64(1, &alloc).unwrap());
    cache.insert("k".into(), from_i64(2, &alloc).unwrap());
    assert_eq!(cache.len(), 1);
    assert_eq!(to_i64(cache.get("k").unwrap()).unwrap(), 2);

    let mut disabled = MulCache::new(0, CachePolicy::Lru);
    disabled.insert("k".into(), from_i64(1, &alloc).unwrap());
    assert!(disabled.is_empty());
}

#[test]
fn test_mapped_operands_multiply_correctly() {
    let alloc = mapped_allocator(32);
    let a = parse(&"21".repeat(40), &alloc).unwrap();
    let b = parse(&"12".repeat(40), &alloc).unwrap();
    let mapped = product(&a, &b, 16, &alloc).unwrap();
    assert_eq!(mapped.storage_kind(), crate::storage::StorageKind::Mapped);

    let heap = heap_allocator();
    let a = parse(&"21".repeat(40), &heap).unwrap();
    let b = parse(&"12".repeat(40), &heap).unwrap();
    assert_eq!(product(&a, &b, 16, &heap).unwrap(), mapped);
}
