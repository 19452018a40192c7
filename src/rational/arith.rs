//! Rational arithmetic
//!
//! Addition keeps intermediates small the classical way: with
//! `d1 = gcd(den1, den2)`, the sum is assembled from the cofactors and
//! only one more gcd (against `d1`) is needed to land in lowest terms.
//! Multiplication cross-cancels `gcd(n1, d2)` and `gcd(n2, d1)` before
//! multiplying, so the two big products are as small as they can be and
//! the result needs no reduction at all.
//!
//! The bitwise family treats negative values by the two's-complement
//! identity `comp(x) = -x - 1`, recursing on complements exactly like
//! machine integers would behave.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{MathError, Result};
use crate::integer::Int;
use crate::round::Round;

use super::{Rat, exact_div};

impl Rat {
    /// Adds two rationals.
    pub fn add(&self, other: &Rat) -> Rat {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        if self.is_int() && other.is_int() {
            return Rat::from_int(Int::add(&self.num, &other.num));
        }
        if other.is_int() {
            let num = Int::add(&self.num, &Int::mul(&self.den, &other.num));
            return Rat::from_parts_unchecked(num, self.den.clone());
        }
        if self.is_int() {
            let num = Int::add(&other.num, &Int::mul(&other.den, &self.num));
            return Rat::from_parts_unchecked(num, other.den.clone());
        }
        let d1 = self.den.gcd(&other.den);
        if d1.is_unit() {
            let num = Int::add(&Int::mul(&self.num, &other.den), &Int::mul(&self.den, &other.num));
            return Rat::from_parts_unchecked(num, Int::mul(&self.den, &other.den));
        }
        let vpd1 = exact_div(&other.den, &d1);
        let upd1 = exact_div(&self.den, &d1);
        let t = Int::add(&Int::mul(&self.num, &vpd1), &Int::mul(&other.num, &upd1));
        if t.is_zero() {
            return Rat::zero();
        }
        let d2 = t.gcd(&d1);
        if d2.is_unit() {
            return Rat::from_parts_unchecked(t, Int::mul(&upd1, &other.den));
        }
        let num = exact_div(&t, &d2);
        let den = Int::mul(&exact_div(&other.den, &d2), &upd1);
        Rat::from_parts_unchecked(num, den)
    }

    /// Subtracts `other` from `self`.
    pub fn sub(&self, other: &Rat) -> Rat {
        if self == other {
            return Rat::zero();
        }
        if other.is_zero() {
            return self.clone();
        }
        if self.is_int() && other.is_int() {
            return Rat::from_int(Int::sub(&self.num, &other.num));
        }
        self.add(&other.negated())
    }

    /// The value plus one.
    pub fn inc(&self) -> Rat {
        if self.is_int() {
            return Rat::from_int(self.num.inc());
        }
        Rat::from_parts_unchecked(Int::add(&self.num, &self.den), self.den.clone())
    }

    /// The value minus one.
    pub fn dec(&self) -> Rat {
        if self.is_int() {
            return Rat::from_int(self.num.dec());
        }
        Rat::from_parts_unchecked(Int::sub(&self.num, &self.den), self.den.clone())
    }

    /// Adds a machine integer.
    pub fn add_int(&self, n: i64) -> Rat {
        match n {
            0 => self.clone(),
            1 => self.inc(),
            -1 => self.dec(),
            _ => self.add(&Rat::from(n)),
        }
    }

    /// Multiplies two rationals, cross-cancelling first.
    pub fn mul(&self, other: &Rat) -> Rat {
        if self.is_zero() || other.is_zero() {
            return Rat::zero();
        }
        if self.is_one() {
            return other.clone();
        }
        if other.is_one() {
            return self.clone();
        }
        if self.is_int() && other.is_int() {
            return Rat::from_int(Int::mul(&self.num, &other.num));
        }
        let mut n1 = self.num.clone();
        let mut d2 = other.den.clone();
        if !n1.is_unit() && !d2.is_unit() {
            let g = n1.gcd(&d2);
            if !g.is_unit() {
                n1 = exact_div(&n1, &g);
                d2 = exact_div(&d2, &g);
            }
        }
        let mut n2 = other.num.clone();
        let mut d1 = self.den.clone();
        if !n2.is_unit() && !d1.is_unit() {
            let g = n2.gcd(&d1);
            if !g.is_unit() {
                n2 = exact_div(&n2, &g);
                d1 = exact_div(&d1, &g);
            }
        }
        Rat::from_parts_unchecked(Int::mul(&n1, &n2), Int::mul(&d1, &d2))
    }

    /// Multiplies by a machine integer.
    pub fn mul_int(&self, n: i64) -> Rat {
        if n == 0 || self.is_zero() {
            return Rat::zero();
        }
        if n == 1 {
            return self.clone();
        }
        if self.is_int() {
            return Rat::from_int(self.num.mul_small(n));
        }
        if n == i64::MIN {
            return self.mul(&Rat::from(n));
        }
        let sign = n < 0;
        let n = n.unsigned_abs();
        let d = crate::integer::gcd_of_mod(&self.den, n);
        let factor = (n / d) as i64;
        let num = self.num.mul_small(if sign { -factor } else { factor });
        let den = match self.den.div_small(d as i64) {
            Ok((q, _)) => q,
            Err(_) => self.den.clone(),
        };
        Rat::from_parts_unchecked(num, den)
    }

    /// Divides two rationals.
    pub fn div(&self, other: &Rat) -> Result<Rat> {
        if other.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        if self == other {
            return Ok(Rat::one());
        }
        if self.is_one() {
            return other.inv();
        }
        let flipped = Rat {
            num: other.den.with_sign(other.num.is_negative()),
            den: other.num.abs(),
        };
        Ok(self.mul(&flipped))
    }

    /// Divides by a machine integer.
    pub fn div_int(&self, n: i64) -> Result<Rat> {
        if n == 0 {
            return Err(MathError::DivisionByZero);
        }
        if n == 1 || self.is_zero() {
            return Ok(self.clone());
        }
        if n == i64::MIN {
            return self.div(&Rat::from(n));
        }
        let sign = n < 0;
        let n = n.unsigned_abs();
        let d = crate::integer::gcd_of_mod(&self.num, n);
        let (num, _) = self.num.div_small(if sign { -(d as i64) } else { d as i64 })?;
        let den = self.den.mul_small((n / d) as i64);
        Ok(Rat::from_parts_unchecked(num, den))
    }

    /// Integer quotient of two rationals under a rounding mode.
    pub fn quo(&self, other: &Rat, rnd: Round) -> Result<Rat> {
        if self.is_zero() || other.is_zero() {
            return Ok(Rat::zero());
        }
        let q = if self.is_int() && other.is_int() {
            self.num.quo(&other.num, rnd)?
        } else {
            let t1 = Int::mul(&self.num, &other.den);
            let t2 = Int::mul(&other.num, &self.den);
            t1.quo(&t2, rnd)?
        };
        Ok(Rat::from_int(q))
    }

    /// `self - quo(self, other, rnd) * other`; the remainder matching
    /// [`Rat::quo`].
    pub fn rem(&self, other: &Rat, rnd: Round) -> Result<Rat> {
        let q = self.quo(other, rnd)?;
        Ok(self.sub(&Rat::mul(&q, other)))
    }

    /// Both quotient and remainder.
    pub fn quo_rem(&self, other: &Rat, rnd: Round) -> Result<(Rat, Rat)> {
        let q = self.quo(other, rnd)?;
        let r = self.sub(&Rat::mul(&q, other));
        Ok((q, r))
    }

    /// Squares the value.
    pub fn square(&self) -> Rat {
        if self.is_zero() {
            return Rat::zero();
        }
        if self.is_unit() {
            return Rat::one();
        }
        Rat::from_parts_unchecked(self.num.square(), self.den.square())
    }

    /// Shifts an integer value by `n` bits; low bits fall off to the
    /// right.
    pub fn shift(&self, n: i64) -> Result<Rat> {
        if self.is_frac() {
            return Err(MathError::NonInteger("shift"));
        }
        if self.is_zero() || n == 0 {
            return Ok(self.clone());
        }
        Ok(Rat::from_int(self.num.shift(n)))
    }

    /// Multiplies by `2^n`, fractions included.
    ///
    /// Existing powers of two in numerator or denominator are moved
    /// rather than multiplied, so the parts stay coprime by construction.
    pub fn scale(&self, power: i64) -> Rat {
        if self.is_zero() || power == 0 {
            return self.clone();
        }
        let num_zeros = if self.num.is_odd() { 0 } else { self.num.lowbit() as i64 };
        let den_zeros = if self.den.is_odd() { 0 } else { self.den.lowbit() as i64 };
        let (num_shift, den_shift) = if power > 0 {
            let t = power.min(den_zeros);
            (power - t, -t)
        } else {
            let p = -power;
            let t = p.min(num_zeros);
            (-t, p - t)
        };
        Rat {
            num: self.num.shift(num_shift),
            den: self.den.shift(den_shift),
        }
    }

    /// The smaller of two values.
    pub fn min_of(&self, other: &Rat) -> Rat {
        if self.cmp(other).is_gt() { other.clone() } else { self.clone() }
    }

    /// The larger of two values.
    pub fn max_of(&self, other: &Rat) -> Rat {
        if self.cmp(other).is_lt() { other.clone() } else { self.clone() }
    }

    /// Bitwise complement: `-self - 1` for integers, `-self` otherwise.
    pub fn comp(&self) -> Rat {
        if self.is_zero() {
            return Rat::neg_one();
        }
        if self.is_neg_one() {
            return Rat::zero();
        }
        let neg = self.negated();
        if self.is_frac() { neg } else { neg.dec() }
    }

    /// Bitwise AND of two integers under the two's-complement convention.
    pub fn bit_and(&self, other: &Rat) -> Result<Rat> {
        if self.is_frac() || other.is_frac() {
            return Err(MathError::NonInteger("bitwise and"));
        }
        if self == other {
            return Ok(self.clone());
        }
        if self.is_zero() || other.is_zero() {
            return Ok(Rat::zero());
        }
        if self.is_negative() {
            let q1 = self.comp();
            if other.is_negative() {
                let q2 = other.comp();
                return Ok(q1.bit_or(&q2)?.comp());
            }
            return other.bit_and_not(&q1);
        }
        if other.is_negative() {
            let q2 = other.comp();
            return self.bit_and_not(&q2);
        }
        Ok(Rat::from_int(self.num.bit_and(&other.num)))
    }

    /// Bitwise OR of two integers.
    pub fn bit_or(&self, other: &Rat) -> Result<Rat> {
        if self.is_frac() || other.is_frac() {
            return Err(MathError::NonInteger("bitwise or"));
        }
        if self == other || other.is_zero() {
            return Ok(self.clone());
        }
        if self.is_zero() {
            return Ok(other.clone());
        }
        if self.is_negative() {
            let q1 = self.comp();
            if other.is_negative() {
                let q2 = other.comp();
                return Ok(q1.bit_and(&q2)?.comp());
            }
            return Ok(q1.bit_and_not(other)?.comp());
        }
        if other.is_negative() {
            let q2 = other.comp();
            return Ok(q2.bit_and_not(self)?.comp());
        }
        Ok(Rat::from_int(self.num.bit_or(&other.num)))
    }

    /// Bitwise XOR of two integers.
    pub fn bit_xor(&self, other: &Rat) -> Result<Rat> {
        if self.is_frac() || other.is_frac() {
            return Err(MathError::NonInteger("bitwise xor"));
        }
        if self == other {
            return Ok(Rat::zero());
        }
        if self.is_zero() {
            return Ok(other.clone());
        }
        if other.is_zero() {
            return Ok(self.clone());
        }
        if self.is_negative() {
            let q1 = self.comp();
            if other.is_negative() {
                let q2 = other.comp();
                return q1.bit_xor(&q2);
            }
            return Ok(q1.bit_xor(other)?.comp());
        }
        if other.is_negative() {
            let q2 = other.comp();
            return Ok(self.bit_xor(&q2)?.comp());
        }
        Ok(Rat::from_int(self.num.bit_xor(&other.num)))
    }

    /// Bits of `self` with the bits of `other` cleared.
    pub fn bit_and_not(&self, other: &Rat) -> Result<Rat> {
        if self.is_frac() || other.is_frac() {
            return Err(MathError::NonInteger("bitwise and-not"));
        }
        if self == other || self.is_zero() {
            return Ok(Rat::zero());
        }
        if other.is_zero() {
            return Ok(self.clone());
        }
        if self.is_negative() {
            let q1 = self.comp();
            if other.is_negative() {
                let q2 = other.comp();
                return q2.bit_and_not(&q1);
            }
            return Ok(q1.bit_or(other)?.comp());
        }
        if other.is_negative() {
            let q2 = other.comp();
            return self.bit_and(&q2);
        }
        Ok(Rat::from_int(self.num.bit_and_not(&other.num)))
    }
}

impl Add for &Rat {
    type Output = Rat;

    fn add(self, rhs: &Rat) -> Rat {
        Rat::add(self, rhs)
    }
}

impl Add for Rat {
    type Output = Rat;

    fn add(self, rhs: Rat) -> Rat {
        Rat::add(&self, &rhs)
    }
}

impl Sub for &Rat {
    type Output = Rat;

    fn sub(self, rhs: &Rat) -> Rat {
        Rat::sub(self, rhs)
    }
}

impl Sub for Rat {
    type Output = Rat;

    fn sub(self, rhs: Rat) -> Rat {
        Rat::sub(&self, &rhs)
    }
}

impl Mul for &Rat {
    type Output = Rat;

    fn mul(self, rhs: &Rat) -> Rat {
        Rat::mul(self, rhs)
    }
}

impl Mul for Rat {
    type Output = Rat;

    fn mul(self, rhs: Rat) -> Rat {
        Rat::mul(&self, &rhs)
    }
}

impl Div for &Rat {
    type Output = Rat;

    /// Panics on division by zero, like the primitive integer types;
    /// use [`Rat::div`] for a fallible version.
    fn div(self, rhs: &Rat) -> Rat {
        match Rat::div(self, rhs) {
            Ok(v) => v,
            Err(_) => panic!("division by zero"),
        }
    }
}

impl Div for Rat {
    type Output = Rat;

    fn div(self, rhs: Rat) -> Rat {
        &self / &rhs
    }
}

impl Neg for &Rat {
    type Output = Rat;

    fn neg(self) -> Rat {
        self.negated()
    }
}

impl Neg for Rat {
    type Output = Rat;

    fn neg(self) -> Rat {
        self.negated()
    }
}
