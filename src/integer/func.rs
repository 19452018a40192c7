//! Factorials, binomials, Fibonacci, Jacobi, and integer logarithms
//!
//! The factorial collects odd factors into a machine word until it would
//! overflow, multiplying into the big result only then, and shifts the
//! accumulated power of two back in at the end.  The logarithms walk a
//! table of repeated squares of the base, the same skeleton the factor
//! removal routines use for divisibility counting.

use crate::error::{MathError, Result};
use crate::round::Round;

use super::Int;

impl Int {
    /// Factorial of a non-negative value below 2^31.
    pub fn factorial(&self) -> Result<Int> {
        if self.neg {
            return Err(MathError::OutOfDomain("factorial"));
        }
        if self.ge_pow2(31) {
            return Err(MathError::TooLarge("Very large factorial"));
        }
        let n = self.to_u64();
        let mut twos: u64 = 0;
        let mut collected: u64 = 1;
        let mut res = Int::one();
        for i in (2..=n).rev() {
            let mut m = i;
            while m & 1 == 0 {
                m >>= 1;
                twos += 1;
            }
            if collected <= i64::MAX as u64 / m {
                collected *= m;
                continue;
            }
            res = res.mul_small(collected as i64);
            collected = m;
        }
        if collected > 1 {
            res = res.mul_small(collected as i64);
        }
        Ok(res.shift(twos as i64))
    }

    /// Falling factorial `self * (self-1) * ... * (self-k+1)`.
    pub fn permutation(&self, k: &Int) -> Result<Int> {
        if self.neg || k.neg {
            return Err(MathError::OutOfDomain("permutation"));
        }
        if k.cmp(self).is_gt() {
            return Err(MathError::OutOfDomain("permutation"));
        }
        if k.ge_pow2(31) {
            return Err(MathError::TooLarge("Very large permutation"));
        }
        let mut count = k.to_u64();
        let mut ans = self.clone();
        let mut cur = self.dec();
        while count > 1 {
            ans = ans.mul(&cur);
            cur = cur.dec();
            count -= 1;
        }
        Ok(ans)
    }

    /// Binomial coefficient `C(self, k)`.
    ///
    /// Negative upper arguments use the reflection
    /// `C(-n, k) = (-1)^k C(n+k-1, k)`.  Returns `None` when both `k`
    /// and `self - k` exceed the 31-bit ceiling.
    pub fn binomial(&self, k: &Int) -> Result<Option<Int>> {
        if k.neg {
            return Ok(Some(Int::zero()));
        }
        if self.neg {
            let upper = self.abs().dec().add(k);
            let flip = k.is_odd();
            return Ok(upper.binomial(k)?.map(|v| if flip { v.negated() } else { v }));
        }
        if k.cmp(self).is_gt() {
            return Ok(Some(Int::zero()));
        }
        let other = self.sub(k);
        if k.ge_pow2(31) && other.ge_pow2(31) {
            return Ok(None);
        }
        let count = if other.cmp(k).is_lt() { &other } else { k }.to_u64();
        if count == 0 {
            return Ok(Some(Int::one()));
        }
        if count == 1 {
            return Ok(Some(self.clone()));
        }
        let mut mul = self.clone();
        let mut ans = self.clone();
        for i in 2..=count {
            mul = mul.dec();
            let t = ans.mul(&mul);
            ans = t.quo(&Int::from(i), Round::DOWN)?;
        }
        Ok(Some(ans))
    }

    /// Jacobi symbol `(self / m)`; zero for invalid parameters
    /// (non-positive or even modulus, non-positive numerator).
    pub fn jacobi(&self, m: &Int) -> i32 {
        if self.is_zero() || self.neg || m.is_even() || m.neg || m.is_zero() {
            return 0;
        }
        if self.is_one() {
            return 1;
        }
        let mut val = 1;
        let mut p = self.clone();
        let mut q = m.clone();
        loop {
            p = match p.rem_round(&q, Round::DOWN) {
                Ok(r) => r,
                Err(_) => return 0,
            };
            if p.is_zero() {
                return 0;
            }
            if p.is_even() {
                let low = p.lowbit();
                p = p.shift(-(low as i64));
                if low & 1 != 0 && matches!(q.limbs[0] & 7, 3 | 5) {
                    val = -val;
                }
            }
            if p.is_unit() {
                return val;
            }
            if p.limbs[0] & q.limbs[0] & 3 == 3 {
                val = -val;
            }
            std::mem::swap(&mut p, &mut q);
        }
    }

    /// Fibonacci number `F(self)`; negative indices follow
    /// `F(-n) = (-1)^(n+1) F(n)`.
    pub fn fibonacci(&self) -> Result<Int> {
        if self.ge_pow2(31) {
            return Err(MathError::TooLarge("Very large Fibonacci number"));
        }
        let n = self.to_u64();
        if n == 0 {
            return Ok(Int::zero());
        }
        let sign = self.neg && n & 1 == 0;
        if n <= 2 {
            return Ok(Int::one().with_sign(sign));
        }
        let mut bit = 1u64 << 63;
        while bit & n == 0 {
            bit >>= 1;
        }
        bit >>= 1;
        let mut fnm1 = Int::zero();
        let mut fcur = Int::one();
        let mut fnp1 = Int::one();
        while bit != 0 {
            let t1 = fnm1.square();
            let t2 = fcur.square();
            let t3 = fnp1.square();
            fnp1 = t2.add(&t3);
            fcur = t3.sub(&t1);
            if bit & n != 0 {
                fnm1 = fcur;
                fcur = fnp1.clone();
                fnp1 = fnm1.add(&fcur);
            } else {
                fnm1 = fnp1.sub(&fcur);
            }
            bit >>= 1;
        }
        Ok(fcur.with_sign(sign))
    }

    /// Floor of the logarithm of `|self|` in base `|base|`.
    pub fn log_base(&self, base: &Int) -> Result<i64> {
        let z = self.abs();
        let b = base.abs();
        if z.is_zero() {
            return Err(MathError::LogOfNonPositive);
        }
        if b.is_zero() || b.is_one() {
            return Err(MathError::BadLogBase);
        }
        match z.cmp_abs(&b) {
            std::cmp::Ordering::Less => return Ok(0),
            std::cmp::Ordering::Equal => return Ok(1),
            std::cmp::Ordering::Greater => {}
        }
        if b.is_one_bit() {
            return Ok((z.highbit() / b.lowbit()) as i64);
        }
        Ok(log_squares(&z, &b)?.0)
    }

    /// Floor of the base-10 logarithm of `|self|`, plus whether the value
    /// is an exact power of ten.
    pub fn log10(&self) -> Result<(i64, bool)> {
        let z = self.abs();
        if z.is_zero() {
            return Err(MathError::LogOfNonPositive);
        }
        if !z.ge_pow2(16) {
            // single-word values count digits directly
            let v = z.to_u64();
            let mut count = 0i64;
            let mut p = 10u64;
            let mut exact = v == 1;
            while v >= p {
                count += 1;
                if v == p {
                    exact = true;
                }
                if p > u64::MAX / 10 {
                    break;
                }
                p *= 10;
            }
            return Ok((count, exact));
        }
        log_squares(&z, &Int::ten())
    }

    /// Number of decimal digits in the magnitude.
    pub fn digits(&self) -> u64 {
        match self.log10() {
            Ok((l, _)) => l as u64 + 1,
            Err(_) => 1,
        }
    }

    /// The decimal digit at place `n`, counting from zero at the low end.
    pub fn digit_at(&self, n: i64) -> u32 {
        let z = self.abs();
        if z.is_zero() || n < 0 {
            return 0;
        }
        let small = match n {
            0 => z.mod_small(10),
            1 => z.mod_small(100).map(|v| v / 10),
            2 => z.mod_small(1000).map(|v| v / 100),
            3 => z.mod_small(10000).map(|v| v / 1000),
            _ => {
                let pow = Int::tenpow(n);
                return match z.quo(&pow, Round::DOWN) {
                    Ok(q) => q.mod_small(10).unwrap_or(0) as u32,
                    Err(_) => 0,
                };
            }
        };
        small.unwrap_or(0) as u32
    }

    /// Number of times `factor` divides `self`.
    pub fn div_count(&self, factor: &Int) -> u64 {
        if self.is_zero() || factor.is_zero() || factor.is_unit() {
            return 0;
        }
        self.fac_rem(factor).0
    }

    /// Removes every occurrence of `factor`, returning the count removed
    /// and the remaining (non-negative) cofactor.
    pub fn fac_rem(&self, factor: &Int) -> (u64, Int) {
        let z = self.abs();
        let f = factor.abs();
        if z.limbs.len() < f.limbs.len()
            || (z.is_odd() && f.is_even())
            || f.is_zero()
            || f.is_one()
        {
            return (0, z);
        }
        if f.is_one_bit() {
            let unit = f.lowbit();
            let count = z.lowbit() / unit;
            return (count, z.shift(-((count * unit) as i64)));
        }
        let (quo, rem) = match z.divmod(&f, Round::DOWN) {
            Ok(v) => v,
            Err(_) => return (0, z),
        };
        if !rem.is_zero() {
            return (0, z);
        }
        let mut cur = quo;
        let mut count: u64 = 1;
        let mut worth: u64 = 1;
        let mut squares = vec![f];
        loop {
            let top = &squares[squares.len() - 1];
            if top.limbs.len() * 2 - 1 > cur.limbs.len() {
                break;
            }
            let sq = top.square();
            let (q, r) = match cur.divmod(&sq, Round::DOWN) {
                Ok(v) => v,
                Err(_) => break,
            };
            if !r.is_zero() {
                break;
            }
            cur = q;
            worth *= 2;
            count += worth;
            squares.push(sq);
        }
        for sq in squares.iter().rev() {
            if sq.limbs.len() <= cur.limbs.len() {
                if let Ok((q, r)) = cur.divmod(sq, Round::DOWN) {
                    if r.is_zero() {
                        cur = q;
                        count += worth;
                    }
                }
            }
            worth /= 2;
            if worth == 0 {
                break;
            }
        }
        (count, cur)
    }

    /// Divides by the gcd with `other` until relatively prime; returns the
    /// number of divisions and the remaining cofactor.
    pub fn gcd_rem(&self, other: &Int) -> Result<(u64, Int)> {
        let mut z1 = self.abs();
        let mut z2 = other.abs();
        if z1.is_zero() || z2.is_zero() {
            return Err(MathError::ZeroArgument("gcdrem"));
        }
        if z2.is_one() {
            return Ok((0, z1));
        }
        if z2.is_one_bit() {
            let sh = z1.lowbit();
            if sh == 0 {
                return Ok((0, z1));
            }
            let rem = z1.shift(-(sh as i64));
            return Ok((1 + (sh - 1) / z2.lowbit(), rem));
        }
        if z1.is_one_bit() {
            if z2.is_odd() {
                return Ok((0, z1));
            }
            return Ok((z1.lowbit(), Int::one()));
        }
        let g = z1.gcd(&z2);
        if g.is_unit() || g.is_zero() {
            return Ok((0, z1));
        }
        z1 = z1.divexact(&g)?;
        z2 = g;
        let mut count: u64 = 1;
        while !z2.is_unit() {
            let (c, rem) = z1.fac_rem(&z2);
            if c > 0 {
                count += c;
                z1 = rem;
            }
            z2 = z1.gcd(&z2);
        }
        Ok((count, z1))
    }
}

/// Floor log by repeated squaring, plus an exactness flag.
fn log_squares(z: &Int, base: &Int) -> Result<(i64, bool)> {
    let mut squares = vec![base.clone()];
    loop {
        let top = &squares[squares.len() - 1];
        if top.limbs.len() * 2 - 1 > z.limbs.len() || z.cmp_abs(top).is_le() {
            break;
        }
        let sq = top.square();
        squares.push(sq);
    }
    let mut power: i64 = 0;
    let mut cur = z.clone();
    for i in (1..squares.len()).rev() {
        if cur.cmp_abs(&squares[i]).is_ge() {
            cur = cur.quo(&squares[i], Round::DOWN)?;
            power += 1;
        }
        power <<= 1;
    }
    if cur.cmp_abs(&squares[0]).is_ge() {
        power += 1;
    }
    let exact = match squares[0].pow(&Int::from(power)) {
        Ok(p) => p == z.abs(),
        Err(_) => false,
    };
    Ok((power, exact))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factorials() {
        assert_eq!(Int::zero().factorial().unwrap(), Int::one());
        assert_eq!(Int::from(5u64).factorial().unwrap().to_u64(), 120);
        assert_eq!(
            Int::from(20u64).factorial().unwrap().to_u64(),
            2_432_902_008_176_640_000
        );
        assert!(Int::from(-1i64).factorial().is_err());
    }

    #[test]
    fn binomials() {
        let c = Int::from(10u64).binomial(&Int::from(3u64)).unwrap().unwrap();
        assert_eq!(c.to_u64(), 120);
        let c = Int::from(52u64).binomial(&Int::from(5u64)).unwrap().unwrap();
        assert_eq!(c.to_u64(), 2_598_960);
        let c = Int::from(5u64).binomial(&Int::from(7u64)).unwrap().unwrap();
        assert!(c.is_zero());
        // C(-4, 2) = C(5, 2) = 10
        let c = Int::from(-4i64).binomial(&Int::from(2u64)).unwrap().unwrap();
        assert_eq!(c.to_i64(), 10);
        let c = Int::from(-4i64).binomial(&Int::from(3u64)).unwrap().unwrap();
        assert_eq!(c.to_i64(), -20);
    }

    #[test]
    fn fibonacci_values() {
        let expect = [0u64, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144];
        for (i, &f) in expect.iter().enumerate() {
            assert_eq!(Int::from(i as u64).fibonacci().unwrap().to_u64(), f);
        }
        assert_eq!(Int::from(-6i64).fibonacci().unwrap().to_i64(), -8);
        assert_eq!(Int::from(-7i64).fibonacci().unwrap().to_i64(), 13);
        assert_eq!(Int::from(90u64).fibonacci().unwrap().to_u64(), 2_880_067_194_370_816_120);
    }

    #[test]
    fn jacobi_symbols() {
        // (a/7) over a residue system
        let m = Int::from(7u64);
        for (a, expect) in [(1i64, 1), (2, 1), (3, -1), (4, 1), (5, -1), (6, -1)] {
            assert_eq!(Int::from(a).jacobi(&m), expect, "jacobi({a}/7)");
        }
        assert_eq!(Int::from(5i64).jacobi(&Int::from(6u64)), 0);
        assert_eq!(Int::from(-5i64).jacobi(&m), 0);
        assert_eq!(Int::from(1001i64).jacobi(&Int::from(9907u64)), -1);
    }

    #[test]
    fn integer_logs() {
        assert_eq!(Int::from(123_456u64).log_base(&Int::ten()).unwrap(), 5);
        assert_eq!(Int::from(8u64).log_base(&Int::two()).unwrap(), 3);
        assert_eq!(Int::from(9u64).log_base(&Int::two()).unwrap(), 3);
        assert_eq!(Int::from(1_000_000u64).log10().unwrap(), (6, true));
        assert_eq!(Int::from(999_999u64).log10().unwrap(), (5, false));
        let big = Int::tenpow(50);
        assert_eq!(big.log10().unwrap(), (50, true));
        assert_eq!(big.digits(), 51);
    }

    #[test]
    fn digit_extraction() {
        let v = Int::from(123_456_789u64);
        assert_eq!(v.digit_at(0), 9);
        assert_eq!(v.digit_at(4), 5);
        assert_eq!(v.digit_at(8), 1);
        assert_eq!(v.digit_at(9), 0);
    }

    #[test]
    fn factor_removal() {
        let (count, rem) = Int::from(540u64).fac_rem(&Int::from(3u64));
        assert_eq!(count, 3);
        assert_eq!(rem.to_u64(), 20);
        assert_eq!(Int::from(540u64).div_count(&Int::from(3u64)), 3);
        let (count, rem) = Int::from(96u64).fac_rem(&Int::two());
        assert_eq!(count, 5);
        assert_eq!(rem.to_u64(), 3);
    }

    #[test]
    fn gcd_removal() {
        // 720 = 2^4 3^2 5; removing all factors shared with 6 leaves 5
        let (count, rem) = Int::from(720u64).gcd_rem(&Int::from(6u64)).unwrap();
        assert_eq!(rem.to_u64(), 5);
        assert!(count >= 2);
        let (count, rem) = Int::from(35u64).gcd_rem(&Int::from(4u64)).unwrap();
        assert_eq!(count, 0);
        assert_eq!(rem.to_u64(), 35);
    }
}
