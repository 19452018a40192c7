use bigratio::{Int, Rat, Round};

fn q(n: i64, d: i64) -> Rat {
    Rat::ratio(n, d).unwrap()
}

#[test]
fn sevenths_add_up() {
    let r = q(1, 7).add(&q(2, 7));
    assert_eq!(r, q(3, 7));
    assert_eq!(r.num().to_u64(), 3);
    assert_eq!(r.den().to_u64(), 7);
}

#[test]
fn canonical_after_every_operation() {
    let samples = [
        q(4, 6),
        q(-9, 12),
        q(100, 8),
        q(1, 1000000),
        Rat::from(17i64),
        Rat::zero(),
    ];
    let check = |r: &Rat, what: &str| {
        assert!(r.den().is_positive(), "{what}: denominator not positive");
        assert!(
            r.num().gcd(r.den()).is_unit() || r.is_zero(),
            "{what}: not in lowest terms"
        );
        if r.is_zero() {
            assert!(r.den().is_one(), "{what}: zero not canonical");
        }
    };
    for a in &samples {
        for b in &samples {
            check(&a.add(b), "add");
            check(&a.sub(b), "sub");
            check(&a.mul(b), "mul");
            if !b.is_zero() {
                check(&a.div(b).unwrap(), "div");
            }
            check(&a.square(), "square");
            check(&a.scale(5), "scale up");
            check(&a.scale(-5), "scale down");
        }
    }
}

#[test]
fn harmonic_sum_is_exact() {
    // 1 + 1/2 + ... + 1/20 = 55835135/15519504
    let mut sum = Rat::zero();
    for i in 1..=20i64 {
        sum = sum.add(&Rat::one().div_int(i).unwrap());
    }
    assert_eq!(sum, q(55_835_135, 15_519_504));
}

#[test]
fn reduce_is_idempotent() {
    let r = Rat::new(Int::from(123_456i64), Int::from(-654_312i64)).unwrap();
    let again = Rat::new(r.num().clone(), r.den().clone()).unwrap();
    assert_eq!(r, again);
}

#[test]
fn rounding_family() {
    let v = q(22, 7);
    assert_eq!(v.round(3, Round::NEAREST_EVEN).unwrap(), q(3143, 1000));
    assert_eq!(v.trunc(3).unwrap(), "3.142".parse().unwrap());
    assert_eq!(v.btrunc(0).unwrap(), Rat::from(3i64));
    assert_eq!(v.negated().trunc(0).unwrap(), Rat::from(-3i64));
    // quantum rounding lands on multiples of the quantum
    let e = q(1, 16);
    let r = v.mappr(&e, Round::NEAREST_EVEN).unwrap();
    assert!(r.div(&e).unwrap().is_int());
}

#[test]
fn continued_fractions_find_pi_convergents() {
    let pi_ish: Rat = "3.14159265358979323846".parse().unwrap();
    let r = pi_ish.cfappr(&Rat::from(120i64), Round::DOWN).unwrap();
    assert_eq!(r, q(355, 113));
    let r = pi_ish.cfappr(&Rat::from(10i64), Round::DOWN).unwrap();
    assert_eq!(r, q(22, 7));
}

#[test]
fn comparisons_and_extremes() {
    let vals = [q(-5, 2), q(-1, 3), Rat::zero(), q(1, 10), q(99, 100), Rat::one()];
    for w in vals.windows(2) {
        assert!(w[0] < w[1]);
        assert_eq!(w[0].max_of(&w[1]), w[1]);
        assert_eq!(w[0].min_of(&w[1]), w[0]);
    }
}

#[test]
fn powers_and_modular_ops() {
    assert_eq!(q(3, 2).powi(&Rat::from(4i64)).unwrap(), q(81, 16));
    assert_eq!(
        Rat::from(7i64)
            .powermod(&Rat::from(5i64), &Rat::from(13i64))
            .unwrap(),
        Rat::from(11i64)
    );
    let inv = Rat::from(17i64).minv(&Rat::from(3120i64)).unwrap();
    assert_eq!(inv, Rat::from(2753i64));
}

#[test]
fn bernoulli_denominators_von_staudt() {
    // von Staudt-Clausen: denominator of B(2n) is the product of primes
    // p with (p-1) | 2n
    let b12 = bigratio::rational::bernoulli(&Int::from(12u64))
        .unwrap()
        .unwrap();
    assert_eq!(b12.den().to_u64(), 2730); // 2*3*5*7*13
    let b8 = bigratio::rational::bernoulli(&Int::from(8u64)).unwrap().unwrap();
    assert_eq!(b8.den().to_u64(), 30);
}
