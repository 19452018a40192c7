//! Number-theoretic functions lifted to rationals
//!
//! Most of these validate that their arguments are integers and defer to
//! the integer engine; the genuinely rational ones are the integral
//! powers (numerator and denominator raised separately), the gcd/lcm
//! pair extended by `gcd(a/b, c/d) = gcd(a,c)/lcm(b,d)`, and the
//! Bernoulli / Euler numbers, whose recurrences fill process-wide tables
//! so each number is computed once.

use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::error::{MathError, Result};
use crate::global;
use crate::integer::Int;
use crate::round::Round;
use crate::{config, modular};

use super::Rat;

/// `bern_table[k]` holds `B(2k+2)`.
static BERN_TABLE: Lazy<Mutex<Vec<Rat>>> = Lazy::new(|| Mutex::new(Vec::new()));
/// `euler_table[k]` holds `E(2k+2)`.
static EULER_TABLE: Lazy<Mutex<Vec<Rat>>> = Lazy::new(|| Mutex::new(Vec::new()));

impl Rat {
    /// Raises to an integral (possibly negative) power.
    pub fn powi(&self, e: &Rat) -> Result<Rat> {
        if e.is_frac() {
            return Err(MathError::NonInteger("integral power"));
        }
        let sign = self.is_negative() && e.num().is_odd();
        let invert = e.is_negative();
        if self.is_zero() && !e.is_zero() {
            if invert {
                return Err(MathError::DivisionByZero);
            }
            return Ok(Rat::zero());
        }
        if self.is_unit() {
            return Ok(if sign { Rat::neg_one() } else { Rat::one() });
        }
        if e.is_zero() {
            return Ok(Rat::one());
        }
        if e.num().is_unit() {
            return if invert { self.inv() } else { Ok(self.clone()) };
        }
        let num = self.num.abs().pow(e.num())?;
        let den = self.den.pow(e.num())?;
        let (num, den) = if invert { (den, num) } else { (num, den) };
        Ok(Rat::from_parts_unchecked(num.with_sign(sign), den))
    }

    /// `self^e mod m` over integers, with the representative chosen by
    /// the configured remainder rounding.
    pub fn powermod(&self, e: &Rat, m: &Rat) -> Result<Rat> {
        if self.is_frac() || e.is_frac() || m.is_frac() {
            return Err(MathError::NonInteger("powermod"));
        }
        if e.is_negative() {
            return Err(MathError::OutOfDomain("negative power for powermod"));
        }
        if m.is_zero() {
            return self.powi(e);
        }
        if m.num().is_unit() {
            return Ok(Rat::zero());
        }
        let rnd = config::current().mod_round.bits();
        let modulus = m.num().abs();
        let z1 = modular::powermod(self.num(), e.num(), &modulus)?;
        if z1.is_zero() {
            return Ok(Rat::zero());
        }
        let z2 = modulus.sub(&z1);
        let mut s = if rnd & 4 != 0 { false } else { m.is_negative() };
        if rnd & 1 != 0 {
            s = !s;
        }
        if rnd & 16 != 0 {
            match z1.cmp(&z2) {
                std::cmp::Ordering::Less => s = false,
                std::cmp::Ordering::Greater => s = true,
                std::cmp::Ordering::Equal => {}
            }
        }
        Ok(if s {
            Rat::from_int(z2.negated())
        } else {
            Rat::from_int(z1)
        })
    }

    /// Modular inverse over integers, representative per the configured
    /// rounding; zero when the values are not coprime.
    pub fn minv(&self, m: &Rat) -> Result<Rat> {
        if self.is_frac() || m.is_frac() {
            return Err(MathError::NonInteger("minv"));
        }
        if m.is_zero() {
            return Ok(if self.is_unit() { self.clone() } else { Rat::zero() });
        }
        if m.num().is_unit() {
            return Ok(Rat::zero());
        }
        let modulus = m.num().abs();
        let z1 = match self.num().modinv(&modulus) {
            Some(v) => v,
            None => return Ok(Rat::zero()),
        };
        let rnd = config::current().mod_round.bits();
        let z2 = modulus.sub(&z1);
        let mut s = if rnd & 4 != 0 { false } else { m.is_negative() };
        if rnd & 1 != 0 {
            s = !s;
        }
        if rnd & 16 != 0 {
            match z1.cmp(&z2) {
                std::cmp::Ordering::Less => s = false,
                std::cmp::Ordering::Greater => s = true,
                std::cmp::Ordering::Equal => {}
            }
        }
        Ok(if s {
            Rat::from_int(z2.negated())
        } else {
            Rat::from_int(z1)
        })
    }

    /// Greatest common divisor, extended to fractions by
    /// `gcd(a/b, c/d) = gcd(a, c) / lcm(b, d)`.
    pub fn gcd(&self, other: &Rat) -> Rat {
        if self.is_frac() || other.is_frac() {
            let num = self.num.gcd(&other.num);
            let den = self.den.lcm(&other.den);
            return Rat::from_parts_unchecked(num, den);
        }
        if self.is_zero() {
            return other.abs();
        }
        if other.is_zero() {
            return self.abs();
        }
        if self.is_unit() || other.is_unit() {
            return Rat::one();
        }
        Rat::from_int(self.num.gcd(&other.num))
    }

    /// Least common multiple.
    pub fn lcm(&self, other: &Rat) -> Rat {
        if self.is_zero() || other.is_zero() {
            return Rat::zero();
        }
        if self.is_unit() {
            return other.abs();
        }
        if other.is_unit() {
            return self.abs();
        }
        let num = self.num.lcm(&other.num).abs();
        if self.is_frac() || other.is_frac() {
            Rat::from_parts_unchecked(num, self.den.gcd(&other.den))
        } else {
            Rat::from_int(num)
        }
    }

    /// Removes every occurrence of an integral factor.
    pub fn fac_rem(&self, factor: &Rat) -> Result<Rat> {
        if self.is_frac() || factor.is_frac() {
            return Err(MathError::NonInteger("factor removal"));
        }
        if factor.is_zero() {
            return Ok(self.abs());
        }
        if self.is_zero() {
            return Ok(Rat::zero());
        }
        let (_, rem) = self.num.fac_rem(&factor.num);
        Ok(Rat::from_int(rem))
    }

    /// Divides by the gcd with `other` until relatively prime.
    pub fn gcd_rem(&self, other: &Rat) -> Result<Rat> {
        if self.is_frac() || other.is_frac() {
            return Err(MathError::NonInteger("gcdrem"));
        }
        if other.is_zero() {
            return Ok(Rat::one());
        }
        if self.is_zero() {
            return Ok(Rat::zero());
        }
        let (count, rem) = self.num.gcd_rem(&other.num)?;
        if count == 0 {
            return Ok(self.abs());
        }
        Ok(Rat::from_int(rem))
    }

    /// Smallest prime factor among the first `count` primes, as a
    /// rational; one if none divides.
    pub fn low_factor(&self, count: &Rat) -> Result<Rat> {
        if self.is_frac() || count.is_frac() {
            return Err(MathError::NonInteger("lowfactor"));
        }
        Ok(Rat::from(self.num.low_factor(count.num().to_u64())))
    }

    /// Factorial of an integer.
    pub fn factorial(&self) -> Result<Rat> {
        if self.is_frac() {
            return Err(MathError::NonInteger("factorial"));
        }
        Ok(Rat::from_int(self.num.factorial()?))
    }

    /// Product of the primes up to an integer.
    pub fn primorial(&self) -> Result<Rat> {
        if self.is_frac() {
            return Err(MathError::NonInteger("primorial"));
        }
        Ok(Rat::from_int(self.num.primorial()?))
    }

    /// Least common multiple of one through an integer.
    pub fn lcm_range(&self) -> Result<Rat> {
        if self.is_frac() {
            return Err(MathError::NonInteger("lcmfact"));
        }
        Ok(Rat::from_int(self.num.lcm_range()?))
    }

    /// Falling factorial `self (self-1) ... (self-k+1)`; `k` must be an
    /// integer but `self` may be rational.
    pub fn permutation(&self, k: &Rat) -> Result<Rat> {
        if k.is_frac() {
            return Err(MathError::NonInteger("permutation"));
        }
        if k.is_zero() {
            return Ok(Rat::one());
        }
        if k.is_one() {
            return Ok(self.clone());
        }
        if self.is_int() && !self.is_negative() && !k.is_negative() {
            if k.cmp(self).is_gt() {
                return Ok(Rat::zero());
            }
            return Ok(Rat::from_int(self.num.permutation(k.num())?));
        }
        if k.num().ge_pow2(31) {
            return Err(MathError::TooLarge("Very large permutation"));
        }
        let steps = k.to_i64();
        if steps > 0 {
            let mut cur = self.clone();
            let mut r = self.clone();
            for _ in 1..steps {
                cur = cur.dec();
                r = r.mul(&cur);
            }
            return Ok(r);
        }
        // negative count divides upward instead
        let mut cur = self.inc();
        let mut r = cur.inv()?;
        for _ in 1..-steps {
            cur = cur.inc();
            r = r.div(&cur)?;
        }
        Ok(r)
    }

    /// Binomial coefficient with a rational upper argument.
    pub fn binomial(&self, k: &Rat) -> Result<Option<Rat>> {
        if k.is_frac() || k.is_negative() {
            return Err(MathError::OutOfDomain("binomial"));
        }
        if k.is_zero() {
            return Ok(Some(Rat::one()));
        }
        if self.is_int() {
            return Ok(self.num.binomial(k.num())?.map(Rat::from_int));
        }
        if k.num().ge_pow2(31) {
            return Ok(None);
        }
        let steps = k.to_i64();
        let mut cur = self.clone();
        let mut r = self.clone();
        let mut j = 1i64;
        for _ in 1..steps {
            cur = cur.dec();
            j += 1;
            r = r.mul(&cur).div_int(j)?;
        }
        Ok(Some(r))
    }

    /// Catalan number `comb(2n, n) / (n + 1)`.
    pub fn catalan(&self) -> Result<Option<Rat>> {
        if self.is_negative() {
            return Ok(Some(Rat::zero()));
        }
        let doubled = self.scale(1);
        let comb = match doubled.binomial(self)? {
            Some(v) => v,
            None => return Ok(None),
        };
        Ok(Some(comb.div(&self.inc())?))
    }

    /// Fibonacci number of an integer index.
    pub fn fibonacci(&self) -> Result<Rat> {
        if self.is_frac() {
            return Err(MathError::NonInteger("fibonacci"));
        }
        Ok(Rat::from_int(self.num.fibonacci()?))
    }

    /// Jacobi symbol of two integers.
    pub fn jacobi(&self, m: &Rat) -> Result<Rat> {
        if self.is_frac() || m.is_frac() {
            return Err(MathError::NonInteger("jacobi"));
        }
        Ok(Rat::from(self.num.jacobi(m.num()) as i64))
    }

    /// Integral part of the square root.
    pub fn isqrt(&self) -> Result<Rat> {
        if self.is_negative() {
            return Err(MathError::SqrtOfNegative);
        }
        if self.is_zero() {
            return Ok(Rat::zero());
        }
        let v = if self.is_int() {
            self.num.clone()
        } else {
            self.num.quo(&self.den, Round::DOWN)?
        };
        Ok(Rat::from_int(v.isqrt()?))
    }

    /// Greatest integer not above the k-th root.
    pub fn iroot(&self, k: &Rat) -> Result<Rat> {
        if k.is_frac() || k.is_negative() || k.is_zero() {
            return Err(MathError::BadRoot);
        }
        if self.is_zero() {
            return Ok(Rat::zero());
        }
        if self.is_one() || k.is_one() {
            return Ok(self.clone());
        }
        if k.is_two() {
            return self.isqrt();
        }
        let v = if self.is_int() {
            self.num.clone()
        } else {
            self.num.quo(&self.den, Round::DOWN)?
        };
        Ok(Rat::from_int(v.kth_root(k.num())?))
    }

    /// True for squares of rationals.
    pub fn is_square(&self) -> bool {
        if !self.num.is_square() {
            return false;
        }
        self.is_int() || self.den.is_square()
    }

    /// `Some(log2)` when the value is an integral power of two.
    pub fn power_of_two_log(&self) -> Option<i64> {
        if self.is_int() {
            return self.num.power_of_two_log().map(|v| v as i64);
        }
        if self.num.is_one() {
            return self.den.power_of_two_log().map(|v| -(v as i64));
        }
        None
    }

    /// Probabilistic primality of an integer.
    pub fn ptest(&self, count: i64, skip: &Rat) -> Result<bool> {
        if self.is_frac() || skip.is_frac() {
            return Err(MathError::NonInteger("ptest"));
        }
        self.num.ptest(count, skip.num())
    }
}

/// Bernoulli number `B(n)`; `None` when the index exceeds the size
/// ceiling.  Odd indices beyond one are zero, `B(1)` is minus one half.
pub fn bernoulli(n: &Int) -> Result<Option<Rat>> {
    if n.is_one() {
        return Ok(Some(Rat::ratio(-1, 2)?));
    }
    if n.is_odd() || n.is_negative() {
        return Ok(Some(Rat::zero()));
    }
    if n.ge_pow2(31) {
        return Ok(None);
    }
    let nv = n.to_u64();
    if nv == 0 {
        return Ok(Some(Rat::one()));
    }
    let m = (nv >> 1) as usize - 1;
    let mut table = global::lock(&BERN_TABLE);
    for k in table.len()..=m {
        let mut nn = 2 * k as i64 + 3;
        let mut dd = 1i64;
        let mut c = Rat::from(nn).inv()?;
        let mut s = Rat::half().sub(&c);
        for prev in table.iter().take(k) {
            c = c.mul_int(nn);
            nn -= 1;
            c = c.div_int(dd)?;
            dd += 1;
            c = c.mul_int(nn);
            nn -= 1;
            c = c.div_int(dd)?;
            dd += 1;
            s = s.sub(&c.mul(prev));
        }
        table.push(s);
    }
    Ok(Some(table[m].clone()))
}

/// Euler number `E(n)`; zero for odd indices.
pub fn euler(n: &Int) -> Result<Option<Rat>> {
    if n.is_zero() {
        return Ok(Some(Rat::one()));
    }
    if n.is_odd() || n.is_negative() {
        return Ok(Some(Rat::zero()));
    }
    if n.ge_pow2(31) {
        return Ok(None);
    }
    let m = (n.to_u64() >> 1) as usize - 1;
    let mut table = global::lock(&EULER_TABLE);
    for k in table.len()..=m {
        let mut nn = 2 * k as i64 + 2;
        let mut dd = 1i64;
        let mut c = Rat::one();
        let mut s = Rat::neg_one();
        for prev in table.iter().take(k) {
            c = c.mul_int(nn);
            nn -= 1;
            c = c.div_int(dd)?;
            dd += 1;
            c = c.mul_int(nn);
            nn -= 1;
            c = c.div_int(dd)?;
            dd += 1;
            s = s.sub(&c.mul(prev));
        }
        table.push(s);
    }
    Ok(Some(table[m].clone()))
}

/// Clears the Bernoulli table.
pub fn free_bernoulli() {
    global::lock(&BERN_TABLE).clear();
}

/// Clears the Euler table.
pub fn free_euler() {
    global::lock(&EULER_TABLE).clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Rat {
        Rat::ratio(n, d).unwrap()
    }

    #[test]
    fn integral_powers() {
        assert_eq!(q(2, 3).powi(&Rat::from(3i64)).unwrap(), q(8, 27));
        assert_eq!(q(2, 3).powi(&Rat::from(-2i64)).unwrap(), q(9, 4));
        assert_eq!(q(-2, 3).powi(&Rat::from(3i64)).unwrap(), q(-8, 27));
        assert_eq!(q(7, 9).powi(&Rat::zero()).unwrap(), Rat::one());
        assert!(Rat::zero().powi(&Rat::from(-1i64)).is_err());
        assert!(Rat::half().powi(&Rat::half()).is_err());
    }

    #[test]
    fn powermod_and_minv() {
        let r = Rat::from(2i64)
            .powermod(&Rat::from(10i64), &Rat::from(1000i64))
            .unwrap();
        assert_eq!(r, Rat::from(24i64));
        let inv = Rat::from(3i64).minv(&Rat::from(7i64)).unwrap();
        assert_eq!(inv, Rat::from(5i64));
        assert_eq!(Rat::from(2i64).minv(&Rat::from(4i64)).unwrap(), Rat::zero());
    }

    #[test]
    fn rational_gcd_lcm() {
        assert_eq!(Rat::from(12i64).gcd(&Rat::from(18i64)), Rat::from(6i64));
        assert_eq!(q(1, 6).gcd(&q(1, 10)), q(1, 30));
        assert_eq!(q(2, 3).lcm(&q(4, 9)), q(4, 3));
        assert_eq!(Rat::from(4i64).lcm(&Rat::from(6i64)), Rat::from(12i64));
    }

    #[test]
    fn bernoulli_numbers() {
        let cases = [
            (0i64, Rat::one()),
            (1, q(-1, 2)),
            (2, q(1, 6)),
            (4, q(-1, 30)),
            (6, q(1, 42)),
            (8, q(-1, 30)),
            (10, q(5, 66)),
            (12, q(-691, 2730)),
            (3, Rat::zero()),
        ];
        for (n, want) in cases {
            let got = bernoulli(&crate::Int::from(n)).unwrap().unwrap();
            assert_eq!(got, want, "B({n})");
        }
    }

    #[test]
    fn euler_numbers() {
        let cases = [
            (0i64, 1i64),
            (2, -1),
            (4, 5),
            (6, -61),
            (8, 1385),
            (10, -50521),
            (5, 0),
        ];
        for (n, want) in cases {
            let got = euler(&crate::Int::from(n)).unwrap().unwrap();
            assert_eq!(got, Rat::from(want), "E({n})");
        }
    }

    #[test]
    fn catalan_numbers() {
        let want = [1i64, 1, 2, 5, 14, 42, 132, 429];
        for (n, &c) in want.iter().enumerate() {
            let got = Rat::from(n as i64).catalan().unwrap().unwrap();
            assert_eq!(got, Rat::from(c), "catalan({n})");
        }
    }

    #[test]
    fn integer_roots() {
        assert_eq!(Rat::from(13i64).isqrt().unwrap(), Rat::from(3i64));
        assert_eq!(q(17, 2).isqrt().unwrap(), Rat::two());
        assert_eq!(Rat::from(85i64).iroot(&Rat::from(3i64)).unwrap(), Rat::from(4i64));
        assert!(q(9, 4).is_square());
        assert!(!q(9, 5).is_square());
        assert_eq!(q(1, 8).power_of_two_log(), Some(-3));
        assert_eq!(Rat::from(16i64).power_of_two_log(), Some(4));
        assert_eq!(q(3, 8).power_of_two_log(), None);
    }
}
