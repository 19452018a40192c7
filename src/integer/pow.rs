//! Integer exponentiation and the power-of-ten table
//!
//! `pow` runs left-to-right binary exponentiation after shifting the
//! factors of two out of the base; the accumulated shift is applied once
//! at the end, keeping every intermediate multiply odd and as small as
//! possible.
//!
//! Powers of ten back the decimal printer and parser, so the squares
//! `10^(2^k)` are kept in a process-wide table and only ever extended.

use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::error::{MathError, Result};
use crate::global;

use super::Int;

static TENPOWERS: Lazy<Mutex<Vec<Int>>> = Lazy::new(|| Mutex::new(vec![Int::ten()]));

impl Int {
    /// 10 raised to `power`; clamped to one for non-positive exponents.
    pub fn tenpow(power: i64) -> Int {
        if power <= 0 {
            return Int::one();
        }
        let mut table = global::lock(&TENPOWERS);
        let mut ans = Int::one();
        let mut p = power as u64;
        let mut i = 0;
        while p != 0 {
            if i >= table.len() {
                let sq = table[table.len() - 1].square();
                table.push(sq);
            }
            if p & 1 != 0 {
                ans = ans.mul(&table[i]);
            }
            p >>= 1;
            i += 1;
        }
        ans
    }

    /// Raises to the power `|e|`.
    ///
    /// The exponent sign is ignored; inversion belongs to the rational
    /// layer.  Exponents of 2^31 or more are rejected.
    pub fn pow(&self, e: &Int) -> Result<Int> {
        let sign = self.neg && e.is_odd();
        if e.is_zero() && !self.is_zero() {
            return Ok(Int::one());
        }
        if self.is_abs_le_one() {
            // 0, 1 or -1 raised to anything
            return Ok(if self.is_zero() {
                Int::zero()
            } else {
                Int::one().with_sign(sign)
            });
        }
        if e.ge_pow2(31) {
            return Err(MathError::TooLarge("Raising to very large power"));
        }
        let power = e.to_u64();
        if self.is_abs_two() {
            return Ok(Int::bit_value(power).with_sign(sign));
        }
        if self.is_tiny() && self.limbs[0] == 10 {
            return Ok(Int::tenpow(power as i64).with_sign(sign));
        }
        match power {
            1 => return Ok(self.with_sign(sign)),
            2 => return Ok(self.square()),
            3 => return Ok(self.square().mul(self).with_sign(sign)),
            4 => return Ok(self.square().square()),
            _ => {}
        }

        // pull the factors of two out of the base
        let mut base = self.abs();
        let mut twos = 0u64;
        if base.is_even() {
            twos = base.lowbit();
            base = base.shift(-(twos as i64));
        }
        let total_shift = twos * power;

        let mut bit = 1u64 << 63;
        while bit & power == 0 {
            bit >>= 1;
        }
        bit >>= 1;
        let mut ans = base.square();
        if bit & power != 0 {
            ans = ans.mul(&base);
        }
        bit >>= 1;
        while bit != 0 {
            ans = ans.square();
            if bit & power != 0 {
                ans = ans.mul(&base);
            }
            bit >>= 1;
        }
        if total_shift > 0 {
            ans = ans.shift(total_shift as i64);
        }
        Ok(ans.with_sign(sign))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_powers() {
        assert_eq!(Int::from(3u64).pow(&Int::from(4u64)).unwrap().to_u64(), 81);
        assert_eq!(Int::from(-3i64).pow(&Int::from(3u64)).unwrap().to_i64(), -27);
        assert_eq!(Int::from(-3i64).pow(&Int::from(4u64)).unwrap().to_i64(), 81);
        assert_eq!(Int::from(7u64).pow(&Int::zero()).unwrap(), Int::one());
        assert_eq!(Int::zero().pow(&Int::from(9u64)).unwrap(), Int::zero());
    }

    #[test]
    fn even_base_shift_extraction() {
        let v = Int::from(12u64).pow(&Int::from(11u64)).unwrap();
        let mut expect = Int::one();
        for _ in 0..11 {
            expect = expect.mul_small(12);
        }
        assert_eq!(v, expect);
    }

    #[test]
    fn powers_of_ten() {
        assert_eq!(Int::tenpow(0), Int::one());
        assert_eq!(Int::tenpow(1).to_u64(), 10);
        assert_eq!(Int::tenpow(5).to_u64(), 100_000);
        let big = Int::tenpow(40);
        assert_eq!(big, Int::tenpow(20).mul(&Int::tenpow(20)));
    }

    #[test]
    fn huge_exponent_rejected() {
        let e = Int::bit_value(31);
        assert_eq!(
            Int::from(3u64).pow(&e),
            Err(MathError::TooLarge("Raising to very large power"))
        );
    }
}
