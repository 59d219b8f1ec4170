// Path: crates/engine/src/div/tests/mod.rs
use super::*;
use crate::arith::add;
use crate::convert::{format, from_i64, parse, to_i64};
use crate::int::Sign;
use crate::mul::product;
use crate::test_support::heap_allocator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn div_text(a: &str, b: &str) -> (String, String) {
    let alloc = heap_allocator();
    let a = parse(a, &alloc).unwrap();
    let b = parse(b, &alloc).unwrap();
    let (q, r) = divide(&a, &b, &alloc).unwrap();
    (format(&q), format(&r))
}

#[test]
fn test_divide_small_values() {
    assert_eq!(div_text("1000", "2"), ("111".to_owned(), "1".to_owned()));
    assert_eq!(div_text("221", "12"), ("12".to_owned(), "0".to_owned()));
    assert_eq!(div_text("2", "1000"), ("0".to_owned(), "2".to_owned()));
    assert_eq!(div_text("0", "-21"), ("0".to_owned(), "0".to_owned()));
}

#[test]
fn test_divide_truncates_toward_zero() {
    let alloc = heap_allocator();
    for (x, y, q, r) in [(-7, 2, -3, -1), (7, -2, -3, 1), (-7, -2, 3, -1), (7, 2, 3, 1)] {
        let (qv, rv) = divide(
            &from_i64(x, &alloc).unwrap(),
            &from_i64(y, &alloc).unwrap(),
            &alloc,
        )
        .unwrap();
        assert_eq!(to_i64(&qv).unwrap(), q, "{x} / {y}");
        assert_eq!(to_i64(&rv).unwrap(), r, "{x} % {y}");
    }
}

#[test]
fn test_zero_results_are_positive() {
    let alloc = heap_allocator();
    let (q, r) = divide(
        &from_i64(-4, &alloc).unwrap(),
        &from_i64(-2, &alloc).unwrap(),
        &alloc,
    )
    .unwrap();
    assert_eq!(to_i64(&q).unwrap(), 2);
    assert!(r.is_zero());
    assert_eq!(r.sign(), Sign::Positive);

    let (q, _) = divide(
        &from_i64(-1, &alloc).unwrap(),
        &from_i64(5, &alloc).unwrap(),
        &alloc,
    )
    .unwrap();
    assert!(q.is_zero());
    assert_eq!(q.sign(), Sign::Positive);
}

#[test]
fn test_divide_by_zero() {
    let alloc = heap_allocator();
    let a = parse("12", &alloc).unwrap();
    let zero = parse("-0", &alloc).unwrap();
    assert!(matches!(
        divide(&a, &zero, &alloc),
        Err(TernaryError::DivideByZero)
    ));
}

#[test]
fn test_matches_native_division() {
    let alloc = heap_allocator();
    let mut rng = StdRng::seed_from_u64(81);
    for _ in 0..300 {
        let x: i64 = rng.gen_range(-1_000_000_000_000..1_000_000_000_000);
        let y: i64 = rng.gen_range(-5_000_000..5_000_000);
        if y == 0 {
            continue;
        }
        let (q, r) = divide(
            &from_i64(x, &alloc).unwrap(),
            &from_i64(y, &alloc).unwrap(),
            &alloc,
        )
        .unwrap();
        assert_eq!(to_i64(&q).unwrap(), x / y);
        assert_eq!(to_i64(&r).unwrap(), x % y);
    }
}

#[test]
fn test_reconstruction_for_wide_operands() {
    let alloc = heap_allocator();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let a_len = rng.gen_range(1..200);
        let b_len = rng.gen_range(1..60);
        let digits = |len: usize, rng: &mut StdRng| -> String {
            let sign = if rng.gen_bool(0.5) { "-" } else { "" };
            let body: String = (0..len)
                .map(|_| char::from(b'0' + rng.gen_range(0..3u8)))
                .collect();
            format!("{sign}1{body}")
        };
        let a = parse(&digits(a_len, &mut rng), &alloc).unwrap();
        let b = parse(&digits(b_len, &mut rng), &alloc).unwrap();
        let (q, r) = divide(&a, &b, &alloc).unwrap();

        let bq = product(&b, &q, 4, &alloc).unwrap();
        let back = add(bq.view(), r.view(), &alloc).unwrap();
        assert_eq!(back, a);
        assert_eq!(
            compare_magnitude(r.limbs(), b.limbs()),
            Ordering::Less
        );
    }
}
