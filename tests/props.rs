//! Property suites backed by an independent oracle.

use bigratio::{Int, Rat, Round};
use num_bigint::BigInt;
use num_traits::Signed;
use proptest::prelude::*;

fn to_oracle(z: &Int) -> BigInt {
    let s = z.to_string();
    s.parse().expect("oracle parse")
}

fn from_decimal(s: &str) -> Int {
    s.parse().expect("decimal parse")
}

/// Arbitrary signed integers up to a few hundred bits.
fn int_strategy() -> impl Strategy<Value = Int> {
    (proptest::collection::vec(any::<u32>(), 1..12), any::<bool>()).prop_map(|(limbs, neg)| {
        let mut v = Int::zero();
        for limb in limbs {
            v = v.shift(32).add(&Int::from(limb));
        }
        if neg { v.negated() } else { v }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mul_matches_oracle(a in int_strategy(), b in int_strategy()) {
        let got = a.mul(&b);
        let want = to_oracle(&a) * to_oracle(&b);
        prop_assert_eq!(to_oracle(&got), want);
    }

    #[test]
    fn add_sub_match_oracle(a in int_strategy(), b in int_strategy()) {
        prop_assert_eq!(to_oracle(&a.add(&b)), to_oracle(&a) + to_oracle(&b));
        prop_assert_eq!(to_oracle(&a.sub(&b)), to_oracle(&a) - to_oracle(&b));
    }

    #[test]
    fn square_is_self_product(a in int_strategy()) {
        prop_assert_eq!(a.square(), a.mul(&a));
    }

    #[test]
    fn divmod_identity(a in int_strategy(), b in int_strategy()) {
        prop_assume!(!b.is_zero());
        for bits in [0i64, 1, 2, 3, 16, 24] {
            let rnd = Round::from_bits(bits).unwrap();
            let (q, r) = a.divmod(&b, rnd).unwrap();
            prop_assert_eq!(q.mul(&b).add(&r), a.clone());
            prop_assert!(r.cmp_abs(&b).is_lt());
        }
    }

    #[test]
    fn floor_division_matches_oracle(a in int_strategy(), b in int_strategy()) {
        prop_assume!(!b.is_zero());
        let (q, r) = a.divmod(&b, Round::DOWN).unwrap();
        // rounding down keeps the remainder the sign of the divisor
        let oa = to_oracle(&a);
        let ob = to_oracle(&b);
        let mut or = &oa % &ob;
        if !num_traits::Zero::is_zero(&or) && or.sign() != ob.sign() {
            or += &ob;
        }
        let oq = (&oa - &or) / &ob;
        prop_assert_eq!(to_oracle(&q), oq);
        prop_assert_eq!(to_oracle(&r), or);
    }

    #[test]
    fn gcd_divides_both(a in int_strategy(), b in int_strategy()) {
        prop_assume!(!a.is_zero() && !b.is_zero());
        let g = a.gcd(&b);
        prop_assert!(!g.is_zero());
        prop_assert!(a.divisible_by(&g));
        prop_assert!(b.divisible_by(&g));
        // and the cofactors are relatively prime
        let ca = a.divexact(&g).unwrap();
        let cb = b.divexact(&g).unwrap();
        prop_assert!(ca.gcd(&cb).is_unit());
    }

    #[test]
    fn isqrt_brackets(a in int_strategy()) {
        let v = a.abs();
        let r = v.isqrt().unwrap();
        prop_assert!(r.square().cmp(&v).is_le());
        prop_assert!(r.inc().square().cmp(&v).is_gt());
    }

    #[test]
    fn rational_canonical(an in int_strategy(), ad in int_strategy(),
                          bn in int_strategy(), bd in int_strategy()) {
        prop_assume!(!ad.is_zero() && !bd.is_zero());
        let a = Rat::new(an, ad).unwrap();
        let b = Rat::new(bn, bd).unwrap();
        for r in [a.add(&b), a.sub(&b), a.mul(&b)] {
            prop_assert!(r.den().is_positive());
            prop_assert!(r.num().gcd(r.den()).is_unit() || r.is_zero());
        }
    }

    #[test]
    fn rational_field_laws(an in -1000i64..1000, ad in 1i64..1000,
                           bn in -1000i64..1000, bd in 1i64..1000) {
        let a = Rat::ratio(an, ad).unwrap();
        let b = Rat::ratio(bn, bd).unwrap();
        prop_assert_eq!(a.add(&b), b.add(&a));
        prop_assert_eq!(a.mul(&b), b.mul(&a));
        prop_assert_eq!(a.add(&b).sub(&b), a.clone());
        if !b.is_zero() {
            prop_assert_eq!(a.div(&b).unwrap().mul(&b), a.clone());
        }
    }

    #[test]
    fn parse_emit_round_trip(n in -100_000i64..100_000, d in 1i64..100_000) {
        let v = Rat::ratio(n, d).unwrap();
        let s = bigratio::emit::to_string(&v, bigratio::emit::OutMode::Frac, 20);
        prop_assert_eq!(s.parse::<Rat>().unwrap(), v);
    }

    #[test]
    fn redc_round_trip(a in int_strategy(), m_odd in int_strategy()) {
        let m = m_odd.abs().bit_or(&Int::one());
        prop_assume!(!m.is_unit());
        let rp = bigratio::Redc::new(&m).unwrap();
        let enc = rp.encode(&a);
        let want = a.rem_round(&m, Round::DOWN).unwrap();
        prop_assert_eq!(rp.decode(&enc), want);
    }

    #[test]
    fn decimal_string_round_trip(a in int_strategy()) {
        let s = a.to_string();
        prop_assert_eq!(from_decimal(&s), a.clone());
        // oracle agrees on the text form
        prop_assert_eq!(s, to_oracle(&a).to_string());
    }

    #[test]
    fn oracle_modpow(a in 1u64..u64::MAX, e in 0u64..4096, m in 3u64..u64::MAX) {
        let m = m | 1; // odd keeps every strategy eligible
        let got = bigratio::modular::powermod(&Int::from(a), &Int::from(e), &Int::from(m)).unwrap();
        let want = to_oracle(&Int::from(a)).modpow(&to_oracle(&Int::from(e)), &to_oracle(&Int::from(m)));
        prop_assert_eq!(to_oracle(&got), want);
    }

    #[test]
    fn abs_sign_consistency(a in int_strategy()) {
        prop_assert!(!a.abs().is_negative());
        prop_assert_eq!(a.abs(), a.negated().abs());
        prop_assert!(to_oracle(&a).abs() == to_oracle(&a.abs()));
    }
}
