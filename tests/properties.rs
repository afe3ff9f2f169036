use bigreg::{BigUnsigned, Status, Workspace};
use num_bigint::BigUint;
use proptest::prelude::*;

use std::cmp::Ordering;

fn big(limbs: &[u32]) -> BigUnsigned {
    limbs.into()
}

fn oracle(a: &BigUnsigned) -> BigUint {
    BigUint::from_slice(a.limbs())
}

fn from_oracle(n: &BigUint) -> BigUnsigned {
    n.to_u32_digits().as_slice().into()
}

fn popcount(n: &BigUint) -> u32 {
    n.to_u32_digits().iter().map(|d| d.count_ones()).sum()
}

/// Limbs biased towards all zero and all one words, so runs of ones and
/// carry chains turn up often
fn limbs(max: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(
        prop_oneof![Just(0u32), Just(u32::MAX), any::<u32>()],
        0..=max,
    )
}

fn nonzero_limbs(max: usize) -> impl Strategy<Value = Vec<u32>> {
    limbs(max).prop_filter("divisor must be non-zero", |v| v.iter().any(|&l| l != 0))
}

/// Bit positions with zero and the limb boundaries drawn often
fn bit_index() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), Just(31), Just(32), Just(64), Just(96), 0u32..300]
}

fn canonical(digits: &str) -> &str {
    match digits.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}

proptest! {
    #[test]
    fn prop_decimal_round_trip(s in "[0-9]{1,80}") {
        let mut a = BigUnsigned::new();
        a.set_decimal(&s);
        prop_assert_eq!(a.to_decimal_string(), canonical(&s));
        prop_assert_eq!(oracle(&a), s.parse::<BigUint>().unwrap());
    }

    #[test]
    fn prop_hex_round_trip(s in "[0-9A-F]{1,60}") {
        let mut a = BigUnsigned::new();
        a.set_hex(&s);
        prop_assert_eq!(a.to_hex_string(), canonical(&s));
        prop_assert_eq!(oracle(&a), BigUint::parse_bytes(s.as_bytes(), 16).unwrap());
    }

    #[test]
    fn prop_binary_matches_oracle(a in limbs(6)) {
        let a = big(&a);
        prop_assert_eq!(a.to_binary_string(), oracle(&a).to_str_radix(2));
        prop_assert_eq!(format!("{a}"), oracle(&a).to_string());
    }

    #[test]
    fn prop_power_of_two_is_a_single_bit(a in limbs(8)) {
        let a = big(&a);
        let ones = popcount(&oracle(&a));
        prop_assert_eq!(a.count_ones(), ones);
        prop_assert_eq!(a.is_power_of_two(), ones == 1);
    }

    #[test]
    fn prop_compare_pow2_matches_oracle(a in limbs(10), bit in bit_index()) {
        let a = big(&a);
        let one = BigUint::from(1u8);
        let pow = &one << bit;

        prop_assert_eq!(a.compare_pow2(bit), oracle(&a).cmp(&pow));
        prop_assert_eq!(a.compare_pow2_minus_one(bit), oracle(&a).cmp(&(&pow - &one)));
    }

    #[test]
    fn prop_compare_pow2_at_its_neighbours(bit in bit_index()) {
        let one = BigUint::from(1u8);
        let pow = &one << bit;
        let mask = &pow - &one;
        let below = if bit == 0 { BigUint::from(0u8) } else { &mask - &one };

        for n in [below, mask.clone(), pow.clone(), &pow + &one] {
            let a = from_oracle(&n);
            prop_assert_eq!(a.compare_pow2(bit), n.cmp(&pow), "n = {}", n);
            prop_assert_eq!(a.compare_pow2_minus_one(bit), n.cmp(&mask), "n = {}", n);
            prop_assert_eq!(a.is_power_of_two(), popcount(&n) == 1, "n = {}", n);
        }
    }

    #[test]
    fn prop_compare_small_matches_oracle(a in limbs(3), n in any::<u64>()) {
        let a = big(&a);

        prop_assert_eq!(a.compare_u64(n), oracle(&a).cmp(&BigUint::from(n)));
        prop_assert_eq!(a.compare_u32(n as u32), oracle(&a).cmp(&BigUint::from(n as u32)));

        // a value is equal to its own truncation only when nothing was cut off
        let wide = a.compare_u64(a.truncate_u64());
        prop_assert_eq!(wide == Ordering::Equal, a.limb_len() <= 2);
        prop_assert_ne!(wide, Ordering::Less);
        let narrow = a.compare_u32(a.truncate_u32());
        prop_assert_eq!(narrow == Ordering::Equal, a.limb_len() <= 1);
    }

    #[test]
    fn prop_add_commutes_and_associates(a in limbs(8), b in limbs(8), c in limbs(8)) {
        let (a, b, c) = (big(&a), big(&b), big(&c));

        prop_assert_eq!(&a + &b, &b + &a);
        prop_assert_eq!(&(&a + &b) + &c, &a + &(&b + &c));
        prop_assert_eq!(oracle(&(&a + &b)), oracle(&a) + oracle(&b));
    }

    #[test]
    fn prop_sub_wraps_to_wider_operand(a in limbs(8), b in limbs(8)) {
        let (a, b) = (big(&a), big(&b));
        let width = a.limb_len().max(b.limb_len()) as u32 * 32;
        let modulus = BigUint::from(1u8) << width;

        let mut diff = a.clone();
        let status = diff.sub_big(&b);
        prop_assert_eq!(status == Status::Wrapped, a < b);
        prop_assert_eq!(oracle(&diff), (oracle(&a) + &modulus - oracle(&b)) % &modulus);
    }

    #[test]
    fn prop_shifts_match_oracle(a in limbs(8), n in 0u32..300) {
        let a = big(&a);
        prop_assert_eq!(oracle(&(&a << n)), oracle(&a) << n);
        prop_assert_eq!(oracle(&(&a >> n)), oracle(&a) >> n);
    }

    #[test]
    fn prop_mul_fast_matches_mul(a in limbs(6), x in limbs(6)) {
        let (a, x) = (big(&a), big(&x));

        let mut slow = a.clone();
        slow.mul_big(&x);
        let mut fast = a.clone();
        fast.mul_big_fast(&x);

        prop_assert_eq!(&fast, &slow);
        prop_assert_eq!(oracle(&slow), oracle(&a) * oracle(&x));
    }

    #[test]
    fn prop_mul_small_matches_oracle(a in limbs(6), x in any::<u64>()) {
        let a = big(&a);

        let mut wide = a.clone();
        wide.mul_u64(x);
        prop_assert_eq!(oracle(&wide), oracle(&a) * x);

        let mut narrow = a.clone();
        narrow.mul_u32(x as u32);
        prop_assert_eq!(oracle(&narrow), oracle(&a) * (x as u32));
    }

    #[test]
    fn prop_division_identity(a in limbs(8), b in nonzero_limbs(5)) {
        let (a, b) = (big(&a), big(&b));
        let expected_q = oracle(&a) / oracle(&b);
        let expected_r = oracle(&a) % oracle(&b);

        let mut q = a.clone();
        let mut r = BigUnsigned::new();
        prop_assert_eq!(q.div_big(&b, &mut r), Status::Exact);
        prop_assert_eq!(oracle(&q), expected_q.clone());
        prop_assert_eq!(oracle(&r), expected_r.clone());
        prop_assert!(r < b);

        let mut ws = Workspace::default();
        let mut q_fast = a.clone();
        let mut r_fast = BigUnsigned::new();
        prop_assert_eq!(q_fast.div_big_fast_with(&b, &mut r_fast, &mut ws), Status::Exact);
        prop_assert_eq!(&q_fast, &q);
        prop_assert_eq!(&r_fast, &r);

        let mut m = a.clone();
        prop_assert_eq!(m.rem_with(&b, &mut ws), Status::Exact);
        prop_assert_eq!(&m, &r);
    }

    #[test]
    fn prop_div_small_matches_oracle(a in limbs(8), d in 1u64..) {
        let a = big(&a);

        let mut q = a.clone();
        let (r, status) = q.div_u64(d);
        prop_assert_eq!(status, Status::Exact);
        prop_assert_eq!(oracle(&q), oracle(&a) / d);
        prop_assert_eq!(BigUint::from(r), oracle(&a) % d);

        let d = (d as u32).max(1);
        let mut q = a.clone();
        let (r, _) = q.div_u32(d);
        prop_assert_eq!(oracle(&q), oracle(&a) / d);
        prop_assert_eq!(BigUint::from(r), oracle(&a) % d);
    }

    #[test]
    fn prop_mersenne_division_matches_long_division(a in limbs(8), k in 1u32..200) {
        let a = big(&a);
        let mut b = BigUnsigned::new();
        b.add_pow2(k);
        prop_assert!(b.decrement().is_exact());

        let mut q = a.clone();
        let mut r = BigUnsigned::new();
        prop_assert_eq!(q.div_big(&b, &mut r), Status::Exact);

        let mut q_mersenne = a.clone();
        let mut r_mersenne = BigUnsigned::new();
        prop_assert_eq!(q_mersenne.div_pow2_minus_one(k, &mut r_mersenne), Status::Exact);
        prop_assert_eq!(&q_mersenne, &q);
        prop_assert_eq!(&r_mersenne, &r);

        let mut m = a.clone();
        prop_assert_eq!(m.rem_pow2_minus_one(k), Status::Exact);
        prop_assert_eq!(&m, &r);
    }

    #[test]
    fn prop_pow_matches_repeated_mul(base in limbs(3), p in 0u32..=12) {
        let base = big(&base);

        let mut a = base.clone();
        a.pow(p);
        prop_assert_eq!(oracle(&a), oracle(&base).pow(p));
    }

    #[test]
    fn prop_sqrt_bound(a in limbs(8)) {
        let a = big(&a);
        let (root, rem) = a.isqrt();

        let (r, m) = (oracle(&root), oracle(&rem));
        prop_assert_eq!(&r * &r + &m, oracle(&a));
        prop_assert!(m <= &r * 2u32);
    }
}
