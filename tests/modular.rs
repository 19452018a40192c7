use bigratio::modular::{self, Redc, redc_for};
use bigratio::{Int, Round};

use std::str::FromStr;

#[test]
fn powermod_two_to_the_million() {
    let r = modular::powermod(
        &Int::two(),
        &Int::from(1_000_000u64),
        &Int::from(1_000_000_007u64),
    )
    .unwrap();
    assert_eq!(r.to_u64(), 235_042_059);
}

#[test]
fn powermod_strategies_agree() {
    // one modulus per strategy: small, odd REDC-sized, and large
    let base = Int::from_str("987654321987654321").unwrap();
    let e = Int::from(12345u64);
    let small = Int::from(96u64); // even, so the direct window path runs
    let redc_sized = Int::from_str("0xffffffffffffffc5").unwrap(); // odd
    let large = Int::bit_value(800).add(&Int::from(9u64));

    for m in [&small, &redc_sized, &large] {
        let got = modular::powermod(&base, &e, m).unwrap();
        // reference ladder with plain division
        let mut acc = Int::one();
        let b = base.rem_round(m, Round::DOWN).unwrap();
        for bit in (0..14).rev() {
            acc = acc.square().rem_round(m, Round::DOWN).unwrap();
            if (12345u64 >> bit) & 1 != 0 {
                acc = acc.mul(&b).rem_round(m, Round::DOWN).unwrap();
            }
        }
        assert_eq!(got, acc, "strategy mismatch for modulus {m}");
    }
}

#[test]
fn redc_round_trip_and_homomorphism() {
    let m = Int::from_str("170141183460469231731687303715884105727").unwrap(); // 2^127-1
    let rp = Redc::new(&m).unwrap();
    let a = Int::from_str("123456789012345678901234567890").unwrap();
    let b = Int::from_str("98765432109876543210987654321").unwrap();

    let ea = rp.encode(&a);
    assert_eq!(rp.decode(&ea), a.rem_round(&m, Round::DOWN).unwrap());

    let eb = rp.encode(&b);
    let prod = rp.decode(&rp.mul(&ea, &eb));
    let want = a.mul(&b).rem_round(&m, Round::DOWN).unwrap();
    assert_eq!(prod, want);
}

#[test]
fn redc_additive_compatibility() {
    // REDC values add and subtract like ordinary residues
    let m = Int::from(1_000_000_007u64);
    let rp = Redc::new(&m).unwrap();
    let a = Int::from(123_456u64);
    let b = Int::from(654_321u64);
    let sum = rp.encode(&a).add(&rp.encode(&b)).rem_round(&m, Round::DOWN).unwrap();
    assert_eq!(rp.decode(&sum), a.add(&b));
}

#[test]
fn redc_power_ladder() {
    let m = Int::from(2_147_483_659u64); // prime, odd
    let rp = Redc::new(&m).unwrap();
    let base = Int::from(5u64);
    let enc = rp.encode(&base);
    // Fermat: a^(p-1) = 1 mod p
    let pow = rp.power(&enc, &m.dec()).unwrap();
    assert!(rp.decode(&pow).is_one());
}

#[test]
fn cache_serves_repeat_moduli() {
    let m = Int::from(998_244_353u64);
    let a = redc_for(&m).unwrap();
    let b = redc_for(&m).unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    modular::clear_redc_cache();
    let c = redc_for(&m).unwrap();
    assert_eq!(c.modulus(), &m);
}

#[test]
fn min_mod_and_congruence() {
    let m = Int::from(100u64);
    let r = modular::min_mod(&Int::from(199u64), &m).unwrap();
    assert_eq!(r.to_i64(), -1);
    let r = modular::min_mod(&Int::from(150u64), &m).unwrap();
    assert_eq!(r.to_i64(), 50);
    assert!(modular::congruent(&Int::from(1234u64), &Int::from(34u64), &m).unwrap());
    assert!(!modular::congruent(&Int::from(1234u64), &Int::from(35u64), &m).unwrap());
}

#[test]
fn square_mod_power_of_two_fast_path() {
    let r = modular::square_mod(&Int::from(0x1_0001u64), &Int::from(65536u64)).unwrap();
    assert_eq!(r.to_u64(), (0x1_0001u64 * 0x1_0001) % 65536);
}
