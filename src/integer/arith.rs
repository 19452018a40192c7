//! Addition, subtraction, and small-word multiply/divide
//!
//! The magnitude kernels work on raw limb slices; the public methods wrap
//! them with sign handling.  Subtraction computes `BASE1 - a + b + carry`
//! per limb so the borrow rides the same carry chain as addition.

use std::ops::{Add, Neg, Sub};

use crate::error::{MathError, Result};
use crate::limb::{BASE1, BASEB, Limb, Wide, hi, lo};
use crate::round::Round;

use super::{Int, cmp_limbs};
use std::cmp::Ordering;

/// Adds two magnitudes.
pub(crate) fn add_limbs(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let (big, small) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(big.len() + 1);
    let mut carry: Wide = 0;
    for i in 0..big.len() {
        let mut sum = big[i] as Wide + carry;
        if i < small.len() {
            sum += small[i] as Wide;
        }
        out.push(lo(sum));
        carry = hi(sum) as Wide;
    }
    if carry != 0 {
        out.push(carry as Limb);
    }
    out
}

/// Subtracts two magnitudes; `a` must not be smaller than `b`.
pub(crate) fn sub_limbs(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    debug_assert!(cmp_limbs(a, b) != Ordering::Less);
    let mut out = Vec::with_capacity(a.len());
    let mut carry: Wide = 0;
    for i in 0..a.len() {
        let bi = if i < b.len() { b[i] as Wide } else { 0 };
        let v = BASE1 - a[i] as Wide + bi + carry;
        out.push((BASE1 - lo(v) as Wide) as Limb);
        carry = hi(v) as Wide;
    }
    out
}

impl Int {
    /// Adds two integers.
    pub fn add(&self, other: &Int) -> Int {
        match (self.neg, other.neg) {
            (false, false) | (true, true) => {
                Int::from_raw(add_limbs(&self.limbs, &other.limbs), self.neg)
            }
            _ => match self.cmp_abs(other) {
                Ordering::Equal => Int::zero(),
                Ordering::Greater => {
                    Int::from_raw(sub_limbs(&self.limbs, &other.limbs), self.neg)
                }
                Ordering::Less => Int::from_raw(sub_limbs(&other.limbs, &self.limbs), other.neg),
            },
        }
    }

    /// Subtracts `other` from `self`.
    pub fn sub(&self, other: &Int) -> Int {
        match (self.neg, other.neg) {
            (false, true) | (true, false) => {
                Int::from_raw(add_limbs(&self.limbs, &other.limbs), self.neg)
            }
            _ => match self.cmp_abs(other) {
                Ordering::Equal => Int::zero(),
                Ordering::Greater => {
                    Int::from_raw(sub_limbs(&self.limbs, &other.limbs), self.neg)
                }
                Ordering::Less => Int::from_raw(sub_limbs(&other.limbs, &self.limbs), !other.neg),
            },
        }
    }

    /// The value plus one.
    pub fn inc(&self) -> Int {
        self.add(&Int::one())
    }

    /// The value minus one.
    pub fn dec(&self) -> Int {
        self.sub(&Int::one())
    }

    /// Multiplies by a machine integer.
    pub fn mul_small(&self, n: i64) -> Int {
        if n == 0 || self.is_zero() {
            return Int::zero();
        }
        let neg = self.neg ^ (n < 0);
        let mult = n.unsigned_abs();
        if mult == 1 {
            return self.with_sign(neg);
        }
        let mut out = Vec::with_capacity(self.limbs.len() + 2);
        let mut carry: u128 = 0;
        for &limb in &self.limbs {
            let prod = limb as u128 * mult as u128 + carry;
            out.push(prod as Limb);
            carry = prod >> BASEB;
        }
        while carry != 0 {
            out.push(carry as Limb);
            carry >>= BASEB;
        }
        Int::from_raw(out, neg)
    }

    /// Divides by a machine integer, truncating towards zero.
    ///
    /// Returns the quotient and the magnitude of the remainder.
    pub fn div_small(&self, n: i64) -> Result<(Int, u64)> {
        if n == 0 {
            return Err(MathError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok((Int::zero(), 0));
        }
        let neg = self.neg ^ (n < 0);
        let d = n.unsigned_abs();
        if d == 1 {
            return Ok((self.with_sign(neg), 0));
        }
        if d > BASE1 {
            // two-limb divisor, fall back to the general routine
            let (quo, rem) = self.abs().divmod(&Int::from(d), Round::DOWN)?;
            return Ok((quo.with_sign(neg), rem.to_u64()));
        }
        let mut out = vec![0 as Limb; self.limbs.len()];
        let mut acc: Wide = 0;
        for i in (0..self.limbs.len()).rev() {
            acc = (acc << BASEB) + self.limbs[i] as Wide;
            out[i] = (acc / d) as Limb;
            acc %= d;
        }
        Ok((Int::from_raw(out, neg), acc))
    }

    /// Reduces modulo a positive machine integer, yielding a value in
    /// `[0, n)`.
    pub fn mod_small(&self, n: i64) -> Result<u64> {
        if n == 0 {
            return Err(MathError::DivisionByZero);
        }
        if n < 0 {
            return Err(MathError::NonPositiveModulus);
        }
        if self.is_zero() || n == 1 {
            return Ok(0);
        }
        let d = n as u64;
        let val = if d > BASE1 {
            let (_, rem) = self.abs().divmod(&Int::from(d), Round::DOWN)?;
            rem.to_u64()
        } else {
            let mut acc: Wide = 0;
            for i in (0..self.limbs.len()).rev() {
                acc = ((acc << BASEB) + self.limbs[i] as Wide) % d;
            }
            acc
        };
        if self.neg && val != 0 { Ok(d - val) } else { Ok(val) }
    }
}

impl Add for &Int {
    type Output = Int;

    fn add(self, rhs: &Int) -> Int {
        Int::add(self, rhs)
    }
}

impl Add for Int {
    type Output = Int;

    fn add(self, rhs: Int) -> Int {
        Int::add(&self, &rhs)
    }
}

impl Sub for &Int {
    type Output = Int;

    fn sub(self, rhs: &Int) -> Int {
        Int::sub(self, rhs)
    }
}

impl Sub for Int {
    type Output = Int;

    fn sub(self, rhs: Int) -> Int {
        Int::sub(&self, &rhs)
    }
}

impl Neg for &Int {
    type Output = Int;

    fn neg(self) -> Int {
        self.negated()
    }
}

impl Neg for Int {
    type Output = Int;

    fn neg(self) -> Int {
        self.negated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_addition() {
        let a = Int::from(1_000_000_000_000i64);
        let b = Int::from(-999_999_999_999i64);
        assert_eq!(Int::add(&a, &b), Int::one());
        assert_eq!(Int::add(&b, &a), Int::one());
        assert_eq!(Int::sub(&a, &a), Int::zero());
        assert_eq!(Int::sub(&b, &a).to_i64(), -1_999_999_999_999);
    }

    #[test]
    fn carry_chains() {
        let a = Int::from(u64::MAX);
        let sum = Int::add(&a, &Int::one());
        assert_eq!(sum.limb_len(), 3);
        assert_eq!(Int::sub(&sum, &Int::one()), a);
    }

    #[test]
    fn small_multiply_divide() {
        let a = Int::from(123_456_789u64);
        let b = a.mul_small(1_000_003);
        let (q, r) = b.div_small(1_000_003).unwrap();
        assert_eq!(q, a);
        assert_eq!(r, 0);

        let (q, r) = Int::from(47i64).div_small(5).unwrap();
        assert_eq!(q.to_i64(), 9);
        assert_eq!(r, 2);
        let (q, r) = Int::from(-47i64).div_small(5).unwrap();
        assert_eq!(q.to_i64(), -9);
        assert_eq!(r, 2);
    }

    #[test]
    fn small_modulus() {
        assert_eq!(Int::from(-3i64).mod_small(7).unwrap(), 4);
        assert_eq!(Int::from(21i64).mod_small(7).unwrap(), 0);
        assert!(Int::from(21i64).mod_small(-7).is_err());
    }
}
