//! Arbitrary-precision rational numbers
//!
//! A [`Rat`] is a pair of integers in canonical reduced form:
//!
//! - the denominator is always positive;
//! - numerator and denominator share no factor beyond one;
//! - the numerator carries the sign;
//! - zero is `(0, 1)`.
//!
//! Every constructor and every operation restores these invariants, so
//! equality is plain structural equality and callers never reduce.
//! Values are cheap to clone; operations borrow and return new values.
//!
//! Submodules: `arith` (ring operations and the bitwise family), `cmp`
//! (ordering with the cross-product short-circuit), `round` (the
//! approximation family over a shared nearest-multiple kernel), `func`
//! (number-theoretic wrappers and the Bernoulli/Euler tables), `parse`
//! and `emit` glue lives at the crate root.

use std::fmt;

use crate::error::{MathError, Result};
use crate::integer::Int;
use crate::round::Round;

mod arith;
mod cmp;
mod func;
pub(crate) mod parse;
mod round;

pub use func::{bernoulli, euler, free_bernoulli, free_euler};
pub use parse::{ScanFlags, scan};

/// An arbitrary-precision rational in lowest terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rat {
    /// Numerator; carries the sign of the value.
    num: Int,
    /// Denominator; always positive, coprime to the numerator.
    den: Int,
}

/// Quotient of `a / b` when `b` is known to divide `a`.
pub(crate) fn exact_div(a: &Int, b: &Int) -> Int {
    match a.divexact(b) {
        Ok(v) => v,
        // b divides a by construction at every call site
        Err(_) => Int::zero(),
    }
}

impl Rat {
    /// Builds a rational from numerator and denominator, reducing to
    /// canonical form.
    pub fn new(num: Int, den: Int) -> Result<Rat> {
        if den.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        if num.is_zero() {
            return Ok(Rat::zero());
        }
        let neg = num.is_negative() ^ den.is_negative();
        let num = num.abs();
        let den = den.abs();
        let (num, den) = Int::reduce2(&num, &den)?;
        Ok(Rat { num: num.with_sign(neg), den })
    }

    /// Wraps parts that are already in canonical form.
    pub(crate) fn from_parts_unchecked(num: Int, den: Int) -> Rat {
        debug_assert!(den.is_positive());
        debug_assert!(num.gcd(&den).is_unit() || num.is_zero());
        Rat { num, den }
    }

    /// The value zero.
    pub fn zero() -> Rat {
        Rat { num: Int::zero(), den: Int::one() }
    }

    /// The value one.
    pub fn one() -> Rat {
        Rat { num: Int::one(), den: Int::one() }
    }

    /// The value two.
    pub fn two() -> Rat {
        Rat { num: Int::two(), den: Int::one() }
    }

    /// The value ten.
    pub fn ten() -> Rat {
        Rat { num: Int::ten(), den: Int::one() }
    }

    /// The value one half.
    pub fn half() -> Rat {
        Rat { num: Int::one(), den: Int::two() }
    }

    /// The value minus one.
    pub fn neg_one() -> Rat {
        Rat { num: Int::one().negated(), den: Int::one() }
    }

    /// An integer as a rational.
    pub fn from_int(num: Int) -> Rat {
        Rat { num, den: Int::one() }
    }

    /// `n / d` over machine integers.
    pub fn ratio(n: i64, d: i64) -> Result<Rat> {
        Rat::new(Int::from(n), Int::from(d))
    }

    /// `1 / 10^places` — the usual way to spell an epsilon.
    pub fn tenth_to(places: i64) -> Rat {
        if places <= 0 {
            return Rat::from_int(Int::tenpow(-places));
        }
        Rat { num: Int::one(), den: Int::tenpow(places) }
    }

    /// `2^n` as a rational, for either sign of `n`.
    pub fn power_of_two(n: i64) -> Rat {
        if n >= 0 {
            Rat::from_int(Int::bit_value(n as u64))
        } else {
            Rat { num: Int::one(), den: Int::bit_value(n.unsigned_abs()) }
        }
    }

    /// Numerator, with the sign of the value.
    pub fn num(&self) -> &Int {
        &self.num
    }

    /// Denominator; always positive.
    pub fn den(&self) -> &Int {
        &self.den
    }

    /// Splits into numerator and denominator.
    pub fn into_parts(self) -> (Int, Int) {
        (self.num, self.den)
    }

    /// The numerator as a rational.
    pub fn numerator(&self) -> Rat {
        Rat::from_int(self.num.clone())
    }

    /// The denominator as a rational.
    pub fn denominator(&self) -> Rat {
        Rat::from_int(self.den.clone())
    }

    /// True for zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// True for values below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    /// True for values above zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.num.is_positive()
    }

    /// True for integers.
    #[inline]
    pub fn is_int(&self) -> bool {
        self.den.is_unit()
    }

    /// True for proper fractions.
    #[inline]
    pub fn is_frac(&self) -> bool {
        !self.den.is_unit()
    }

    /// True for one.
    #[inline]
    pub fn is_one(&self) -> bool {
        self.num.is_one() && self.den.is_unit()
    }

    /// True for minus one.
    #[inline]
    pub fn is_neg_one(&self) -> bool {
        self.num.is_neg_one() && self.den.is_unit()
    }

    /// True for plus or minus one.
    #[inline]
    pub fn is_unit(&self) -> bool {
        self.num.is_unit() && self.den.is_unit()
    }

    /// True for two.
    #[inline]
    pub fn is_two(&self) -> bool {
        self.num.is_two() && self.den.is_unit()
    }

    /// True for even integers.
    #[inline]
    pub fn is_even(&self) -> bool {
        self.den.is_unit() && self.num.is_even()
    }

    /// True for odd integers.
    #[inline]
    pub fn is_odd(&self) -> bool {
        self.den.is_unit() && self.num.is_odd()
    }

    /// The sign: -1, 0 or 1.
    pub fn signum(&self) -> i32 {
        self.num.signum()
    }

    /// Absolute value.
    pub fn abs(&self) -> Rat {
        Rat { num: self.num.abs(), den: self.den.clone() }
    }

    /// Negation.
    pub fn negated(&self) -> Rat {
        Rat { num: self.num.negated(), den: self.den.clone() }
    }

    /// Reciprocal; the sign moves to the new numerator.
    pub fn inv(&self) -> Result<Rat> {
        if self.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(Rat {
            num: self.den.with_sign(self.num.is_negative()),
            den: self.num.abs(),
        })
    }

    /// Integer part, truncated towards zero.
    pub fn int_part(&self) -> Rat {
        if self.is_int() {
            return self.clone();
        }
        if self.num.cmp_abs(&self.den).is_lt() {
            return Rat::zero();
        }
        match self.num.quo(&self.den, Round::TO_ZERO) {
            Ok(q) => Rat::from_int(q),
            Err(_) => Rat::zero(),
        }
    }

    /// Fractional part; `self - int_part()`.
    pub fn frac_part(&self) -> Rat {
        if self.is_int() {
            return Rat::zero();
        }
        if self.num.cmp_abs(&self.den).is_lt() {
            return self.clone();
        }
        match self.num.rem_round(&self.den, Round::TO_ZERO) {
            Ok(r) => Rat { num: r, den: self.den.clone() },
            Err(_) => Rat::zero(),
        }
    }

    /// Truncation towards zero as a machine integer, saturating.
    pub fn to_i64(&self) -> i64 {
        if self.is_int() {
            return self.num.to_i64();
        }
        match self.num.quo(&self.den, Round::TO_ZERO) {
            Ok(q) => q.to_i64(),
            Err(_) => 0,
        }
    }
}

impl From<i64> for Rat {
    fn from(v: i64) -> Rat {
        Rat::from_int(Int::from(v))
    }
}

impl From<u64> for Rat {
    fn from(v: u64) -> Rat {
        Rat::from_int(Int::from(v))
    }
}

impl From<Int> for Rat {
    fn from(v: Int) -> Rat {
        Rat::from_int(v)
    }
}

impl fmt::Display for Rat {
    /// Fraction notation: `397/37`, or just the numerator for integers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_int() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_construction() {
        let q = Rat::new(Int::from(4u64), Int::from(6u64)).unwrap();
        assert_eq!(q.num().to_u64(), 2);
        assert_eq!(q.den().to_u64(), 3);

        let q = Rat::new(Int::from(3u64), Int::from(-6i64)).unwrap();
        assert!(q.is_negative());
        assert_eq!(q.num().to_i64(), -1);
        assert_eq!(q.den().to_u64(), 2);

        let q = Rat::new(Int::zero(), Int::from(-5i64)).unwrap();
        assert_eq!(q, Rat::zero());
        assert!(Rat::new(Int::one(), Int::zero()).is_err());
    }

    #[test]
    fn parts_and_predicates() {
        let q = Rat::ratio(-7, 2).unwrap();
        assert!(q.is_frac() && !q.is_int());
        assert_eq!(q.int_part(), Rat::from(-3i64));
        assert_eq!(q.frac_part(), Rat::ratio(-1, 2).unwrap());
        assert_eq!(q.abs(), Rat::ratio(7, 2).unwrap());
        assert_eq!(q.inv().unwrap(), Rat::ratio(-2, 7).unwrap());
        assert_eq!(q.to_i64(), -3);
        assert!(Rat::from(4i64).is_even());
        assert!(!Rat::half().is_even());
    }

    #[test]
    fn display_fraction() {
        assert_eq!(Rat::ratio(397, 37).unwrap().to_string(), "397/37");
        assert_eq!(Rat::from(42i64).to_string(), "42");
        assert_eq!(Rat::ratio(-1, 3).unwrap().to_string(), "-1/3");
    }
}
