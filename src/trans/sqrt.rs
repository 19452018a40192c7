//! Rational square root, powers, and roots
//!
//! `sqrt` tries the exact route first when asked (or when it is free):
//! if numerator and denominator are both perfect squares the result is
//! exact and no epsilon enters.  Otherwise the radicand is scaled by the
//! square of the epsilon denominator, one integer square root runs at
//! that precision, and the result is a multiple of epsilon.  For the
//! nearest mode the radicand is pre-scaled by four so the tie can be
//! decided from the low bit of the doubled root.
//!
//! `power` handles rational exponents by `exp(e ln q)` with an
//! intermediate epsilon tightened by the magnitude estimate of the
//! result; `root` is `power` with the reciprocal exponent.

use crate::config;
use crate::error::{MathError, Result};
use crate::global;
use crate::rational::Rat;
use crate::round::Round;

use super::{exp::log2_e, exprel, ln, require_epsilon};

/// Square root within a multiple of epsilon, rounding per the mask.
///
/// Bit 5 prefers exact roots of perfect squares, bit 6 selects the
/// negative root; the remaining bits round as in integer division.
pub fn sqrt(q: &Rat, epsilon: &Rat, rnd: Round) -> Result<Rat> {
    require_epsilon(epsilon, "sqrt")?;
    if q.is_negative() {
        return Err(MathError::SqrtOfNegative);
    }
    if q.is_zero() {
        return Ok(Rat::zero());
    }
    global::check_abort()?;
    let want_neg = rnd.negative_root();
    let rnd_bits = rnd.bits();

    let mut rs = rnd_bits & 25;
    if rnd_bits & 2 != 0 {
        rs ^= want_neg as u32;
    }
    let exact_int_mode = q.is_int() && epsilon.is_unit();
    if rnd_bits & 32 != 0 || exact_int_mode {
        let (root, s1) = q.num().isqrt_round(Round::from_bits(rs as i64)?)?;
        if exact_int_mode {
            if root.is_zero() {
                return Ok(Rat::zero());
            }
            return Ok(Rat::from_int(root.with_sign(want_neg)));
        }
        if s1 == 0 {
            let (droot, s2) = q.den().isqrt_round(Round::DOWN)?;
            if s2 == 0 {
                return Ok(Rat::from_parts_unchecked(root.with_sign(want_neg), droot));
            }
        }
    }

    // scale by epsilon^-2 and take one integer root
    let scaled = epsilon.den().square().mul(q.num());
    let divisor = epsilon.num().square().mul(q.den());
    let mut up: i32;
    let mut mul;
    if rnd.nearest() {
        let widened = scaled.shift(2);
        let (quo, s1) = widened.quo_sign(&divisor, Round::NEAREST)?;
        let root_rnd = if s1 != 0 {
            if s1 < 0 { Round::UP } else { Round::DOWN }
        } else {
            Round::NEAREST
        };
        let (doubled, s2) = quo.isqrt_round(root_rnd)?;
        mul = doubled.shift(-1);
        up = if doubled.is_odd() { s1 + s2 } else { -1 };
    } else {
        let (quo, s1) = scaled.quo_sign(&divisor, Round::DOWN)?;
        let (root, s2) = quo.isqrt_round(Round::DOWN)?;
        mul = root;
        up = if s1 + s2 != 0 { 0 } else { -1 };
    }
    if up == 0 {
        up = if rnd_bits & 8 != 0 {
            ((rs ^ if mul.is_odd() { 1 } else { 0 }) & 1) as i32
        } else {
            ((rs & 1) as i32) ^ (want_neg as i32)
        };
    }
    if up > 0 {
        mul = mul.inc();
    }
    if mul.is_zero() {
        return Ok(Rat::zero());
    }
    let (t, den) = crate::Int::reduce2(&mul, epsilon.den())?;
    let num = t.mul(epsilon.num()).with_sign(want_neg);
    Ok(Rat::from_parts_unchecked(num, den))
}

/// `q1 ^ q2` within epsilon for positive bases.
///
/// Integral exponents are exact; fractional ones evaluate
/// `exp(q2 ln q1)` with an intermediate epsilon shrunk by the size
/// estimate of the result.  `None` when the result would need more than
/// `2^30` working bits.
pub fn power(q1: &Rat, q2: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "power")?;
    if q1.is_zero() && q2.is_negative() {
        return Err(MathError::DivisionByZero);
    }
    if q2.is_zero() || q1.is_one() {
        return Ok(Some(Rat::one()));
    }
    if q1.is_zero() {
        return Ok(Some(Rat::zero()));
    }
    if q1.is_negative() {
        return Err(MathError::OutOfDomain("negative base for power"));
    }
    if q2.is_one() {
        return Ok(Some(q1.mappr(epsilon, config::triground())?));
    }

    // work with a base above one
    let (base, expo) = if q1.num().cmp_abs(q1.den()).is_lt() {
        (q1.inv()?, q2.negated())
    } else {
        (q1.clone(), q2.clone())
    };
    if expo.is_one() {
        return Ok(Some(base.mappr(epsilon, config::triground())?));
    }

    // m bounds log2 of the result
    let mut m = base.ilog2()?;
    let n = epsilon.ilog2()?;
    m = if m > 0 {
        let scale = if expo.is_negative() { m } else { m + 1 };
        Rat::from(scale).mul(&expo).to_i64()
    } else {
        let frac = base.dec().div(&base)?;
        let frac = if expo.is_negative() { frac } else { base.dec() };
        frac.mul(&expo).mul(&log2_e()).to_i64()
    };
    if m > 1 << 30 {
        return Ok(None);
    }
    m += 1;
    if m < n {
        return Ok(Some(Rat::zero()));
    }

    let eps2 = epsilon.div(&expo)?.scale(-m - 4).abs();
    let l = ln(&base, &eps2)?;
    let t = l.mul(&expo);
    let val = if t.is_negative() {
        match exprel(&t.negated(), m - n + 3)? {
            Some(v) => v.inv()?,
            None => return Ok(None),
        }
    } else {
        match exprel(&t, m - n + 3)? {
            Some(v) => v,
            None => return Ok(None),
        }
    };
    Ok(Some(val.mappr(epsilon, config::triground())?))
}

/// `q1 ^ (1/q2)` within epsilon; the index must be a positive integer.
pub fn root(q1: &Rat, q2: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "root")?;
    if q2.is_negative() || q2.is_zero() || q2.is_frac() {
        return Err(MathError::BadRoot);
    }
    if q1.is_zero() || q1.is_one() || q2.is_one() {
        return Ok(Some(q1.clone()));
    }
    if q2.is_two() {
        return Ok(Some(sqrt(q1, epsilon, config::triground())?));
    }
    let neg = q1.is_negative();
    if neg && q2.num().is_even() {
        return Err(MathError::EvenRootOfNegative);
    }
    let base = q1.abs();
    let r = power(&base, &q2.inv()?, epsilon)?;
    Ok(r.map(|v| if neg { v.negated() } else { v }))
}

/// `sqrt(q1^2 + q2^2)` within epsilon.
pub fn hypot(q1: &Rat, q2: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "hypot")?;
    if q1.is_zero() {
        return Ok(q2.abs());
    }
    if q2.is_zero() {
        return Ok(q1.abs());
    }
    let sum = q1.square().add(&q2.square());
    sqrt(&sum, epsilon, Round::NEAREST_EVEN)
}

/// The other leg of a unit-hypotenuse right triangle:
/// `sqrt(1 - q^2)`, negated on request.
pub fn leg_to_leg(q: &Rat, epsilon: &Rat, want_neg: bool) -> Result<Rat> {
    require_epsilon(epsilon, "legtoleg")?;
    if q.is_unit() {
        return Ok(Rat::zero());
    }
    if q.is_zero() {
        return Ok(if want_neg { Rat::neg_one() } else { Rat::one() });
    }
    if q.num().cmp_abs(q.den()).is_ge() {
        return Err(MathError::OutOfDomain("legtoleg"));
    }
    let t = Rat::one().sub(&q.square());
    let r = sqrt(&t, epsilon, Round::NEAREST_EVEN)?;
    Ok(if want_neg { r.negated() } else { r })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eps20() -> Rat {
        Rat::tenth_to(20)
    }

    #[test]
    fn exact_squares() {
        let eps = eps20();
        let r = sqrt(&Rat::from(49i64), &eps, Round::EXACT_SQUARES).unwrap();
        assert_eq!(r, Rat::from(7i64));
        let r = sqrt(&Rat::ratio(9, 16).unwrap(), &eps, Round::EXACT_SQUARES).unwrap();
        assert_eq!(r, Rat::ratio(3, 4).unwrap());
        let r = sqrt(&Rat::from(49i64), &eps, Round::EXACT_SQUARES.or(Round::NEGATIVE_ROOT))
            .unwrap();
        assert_eq!(r, Rat::from(-7i64));
    }

    #[test]
    fn sqrt_two_to_twenty_digits() {
        let eps = eps20();
        let r = sqrt(&Rat::two(), &eps, Round::NEAREST_EVEN).unwrap();
        // 1.41421356237309504880...
        let want = Rat::from_parts_unchecked(
            "141421356237309504880".parse().unwrap(),
            crate::Int::tenpow(20),
        );
        assert!(r.sub(&want).abs().cmp(&eps).is_le(), "sqrt(2) = {r}");
        // result is a multiple of epsilon
        assert!(r.den().cmp_abs(eps.den()).is_le());
    }

    #[test]
    fn integer_epsilon_takes_floor() {
        let r = sqrt(&Rat::from(8i64), &Rat::one(), Round::DOWN).unwrap();
        assert_eq!(r, Rat::two());
        let r = sqrt(&Rat::from(8i64), &Rat::one(), Round::UP).unwrap();
        assert_eq!(r, Rat::from(3i64));
    }

    #[test]
    fn negative_radicand() {
        assert_eq!(
            sqrt(&Rat::neg_one(), &eps20(), Round::DOWN),
            Err(MathError::SqrtOfNegative)
        );
    }

    #[test]
    fn rational_powers() {
        let eps = eps20();
        // 2^(1/2) agrees with sqrt
        let a = power(&Rat::two(), &Rat::half(), &eps).unwrap().unwrap();
        let b = sqrt(&Rat::two(), &eps, Round::NEAREST_EVEN).unwrap();
        assert!(a.sub(&b).abs().cmp(&eps.scale(2)).is_le());
        // 8^(2/3) = 4
        let r = power(&Rat::from(8i64), &Rat::ratio(2, 3).unwrap(), &eps)
            .unwrap()
            .unwrap();
        assert!(r.sub(&Rat::from(4i64)).abs().cmp(&eps.scale(2)).is_le());
        // 27^(1/3) = 3 via root
        let r = root(&Rat::from(27i64), &Rat::from(3i64), &eps).unwrap().unwrap();
        assert!(r.sub(&Rat::from(3i64)).abs().cmp(&eps.scale(2)).is_le());
        // cube root keeps the sign for odd indices
        let r = root(&Rat::from(-27i64), &Rat::from(3i64), &eps).unwrap().unwrap();
        assert!(r.add(&Rat::from(3i64)).abs().cmp(&eps.scale(2)).is_le());
        assert!(root(&Rat::from(-4i64), &Rat::two(), &eps).is_err());
    }

    #[test]
    fn hypotenuse() {
        let eps = eps20();
        let r = hypot(&Rat::from(3i64), &Rat::from(4i64), &eps).unwrap();
        assert_eq!(r, Rat::from(5i64));
        let r = leg_to_leg(&Rat::ratio(3, 5).unwrap(), &eps, false).unwrap();
        assert_eq!(r, Rat::ratio(4, 5).unwrap());
    }
}
