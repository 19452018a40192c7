use bigratio::rng::{self, Rand};
use bigratio::{Int, MathError};

#[test]
fn global_generator_replays_after_reseed() {
    let seed = Int::from(0xfeed_beefu64);
    rng::srand(&seed).unwrap();
    let x1 = rng::rand_bits(513).unwrap();
    rng::srand(&seed).unwrap();
    let x2 = rng::rand_bits(513).unwrap();
    assert_eq!(x1, x2);
}

#[test]
fn snapshot_and_restore_round_trip() {
    rng::srand(&Int::from(777u64)).unwrap();
    let _ = rng::rand_bits(40).unwrap();
    let saved = rng::state();
    let a = rng::rand_bits(320).unwrap();
    rng::set_state(&saved);
    let b = rng::rand_bits(320).unwrap();
    assert_eq!(a, b);
}

#[test]
fn ranged_draw_confined() {
    let mut r = Rand::new();
    r.seed(&Int::from(2024u64)).unwrap();
    let lo = Int::from(1_000_000u64);
    let hi = Int::from(1_000_097u64);
    for _ in 0..500 {
        let v = r.range(&lo, &hi).unwrap();
        assert!(v.cmp(&lo).is_ge());
        assert!(v.cmp(&hi).is_lt());
    }
}

#[test]
fn draw_width_is_exact() {
    let mut r = Rand::new();
    r.seed(&Int::from(5u64)).unwrap();
    for width in [1u64, 2, 31, 32, 33, 63, 64, 65, 200] {
        let v = r.bits(width).unwrap();
        assert!(v.bit_len() <= width, "draw of {width} bits too wide");
    }
}

#[test]
fn big_seed_permutes_slots() {
    // seeds above 64 bits drive the factorial-base slot shuffle; the
    // stream must differ from the plain xor-seeded one
    let small = Int::from(42u64);
    let big = Int::from(42u64).add(&Int::bit_value(64).mul_small(9));
    let mut a = Rand::new();
    let mut b = Rand::new();
    a.seed(&small).unwrap();
    b.seed(&big).unwrap();
    assert_ne!(a.bits(256).unwrap(), b.bits(256).unwrap());
}

#[test]
fn unseeded_generators_agree() {
    // the built-in state is fully specified, so two fresh generators
    // produce the same stream
    let mut a = Rand::new();
    let mut b = Rand::default();
    assert_eq!(a.bits(1000).unwrap(), b.bits(1000).unwrap());
}

#[test]
fn skip_is_bit_exact() {
    let mut a = Rand::new();
    let mut b = Rand::new();
    a.seed(&Int::from(99u64)).unwrap();
    b.seed(&Int::from(99u64)).unwrap();
    let mut drawn = Int::zero();
    for chunk in [3u64, 64, 13, 129] {
        drawn = drawn.shift(chunk as i64).add(&a.bits(chunk).unwrap());
    }
    b.skip(3 + 64 + 13 + 129);
    assert_eq!(a.bits(64).unwrap(), b.bits(64).unwrap());
    assert!(drawn.bit_len() <= 209);
}

#[test]
fn pseudo_seed_feeds_srand() {
    let s = rng::pseudo_seed();
    assert!(!s.is_negative());
    // a sampled seed must be accepted by the generator
    let mut r = Rand::new();
    r.seed(&s).unwrap();
    let _ = r.bits(64).unwrap();
}

#[test]
fn bad_inputs() {
    let mut r = Rand::new();
    assert_eq!(r.seed(&Int::from(-5i64)), Err(MathError::NegativeSeed));
    assert!(r.range(&Int::from(5u64), &Int::from(5u64)).is_err());
    assert!(rng::irand(0).is_err());
    let v = rng::irand(10).unwrap();
    assert!((0..10).contains(&v));
}
