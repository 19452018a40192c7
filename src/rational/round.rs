//! Rounding, approximation and positional queries
//!
//! Everything in the rounding family funnels through [`Rat::mappr`]:
//! approximate to the nearest multiple of a given quantum, with the
//! direction controlled by the shared rounding mask.  `round`/`bround`
//! pick a decimal or binary quantum from a place count, the truncation
//! forms fix the mask to towards-zero, and the continued-fraction pair
//! walks the expansion of the value instead of scaling it.

use crate::error::{MathError, Result};
use crate::integer::Int;
use crate::round::Round;

use super::{Rat, exact_div};

impl Rat {
    /// Nearest multiple of `e` under the rounding mask; the workhorse of
    /// the family.
    pub fn mappr(&self, e: &Rat, rnd: Round) -> Result<Rat> {
        if e.is_zero() {
            return Ok(self.clone());
        }
        if self.is_zero() {
            return Ok(Rat::zero());
        }
        let t1 = self.num.mul(&e.den);
        let t2 = self.den.mul(&e.num);
        let mul = t1.quo(&t2, rnd)?;
        if mul.is_zero() {
            return Ok(Rat::zero());
        }
        let (k, den) = Int::reduce2(&mul, &e.den)?;
        Ok(Rat::from_parts_unchecked(k.mul(&e.num), den))
    }

    /// Rounds to `places` decimal digits.
    ///
    /// With the relative bit set, `places` counts significant digits
    /// instead of fractional ones.
    pub fn round(&self, places: i64, rnd: Round) -> Result<Rat> {
        if self.is_zero() {
            return Ok(Rat::zero());
        }
        let places = if rnd.relative() {
            places - (self.ilog10()? + 1)
        } else {
            places
        };
        let e = Rat::tenth_to(places);
        self.mappr(&e, rnd.masked(31))
    }

    /// Rounds to `places` binary digits.
    pub fn bround(&self, places: i64, rnd: Round) -> Result<Rat> {
        if self.is_zero() {
            return Ok(Rat::zero());
        }
        let places = if rnd.relative() {
            places - (self.ilog2()? + 1)
        } else {
            places
        };
        let e = Rat::power_of_two(-places);
        self.mappr(&e, rnd.masked(31))
    }

    /// Truncates to `places` decimal digits.
    pub fn trunc(&self, places: i64) -> Result<Rat> {
        self.mappr(&Rat::tenth_to(places), Round::TO_ZERO)
    }

    /// Truncates to `places` binary digits.
    pub fn btrunc(&self, places: i64) -> Result<Rat> {
        self.mappr(&Rat::power_of_two(-places), Round::TO_ZERO)
    }

    /// Floor of the base-two logarithm of `|self|`.
    pub fn ilog2(&self) -> Result<i64> {
        if self.is_zero() {
            return Err(MathError::ZeroArgument("ilog2"));
        }
        if self.is_int() {
            return Ok(self.num.highbit() as i64);
        }
        let num = self.num.abs();
        let n = num.highbit() as i64 - self.den.highbit() as i64;
        let c = match n.cmp(&0) {
            std::cmp::Ordering::Equal => num.cmp_abs(&self.den),
            std::cmp::Ordering::Greater => num.cmp_abs(&self.den.shift(n)),
            std::cmp::Ordering::Less => num.shift(-n).cmp_abs(&self.den),
        };
        Ok(if c.is_lt() { n - 1 } else { n })
    }

    /// Floor of the base-ten logarithm of `|self|`.
    pub fn ilog10(&self) -> Result<i64> {
        if self.is_zero() {
            return Err(MathError::ZeroArgument("ilog10"));
        }
        let num = self.num.abs();
        if self.is_int() {
            return Ok(num.log10()?.0);
        }
        if num.cmp_abs(&self.den).is_gt() {
            let q = num.quo(&self.den, Round::DOWN)?;
            return Ok(q.log10()?.0);
        }
        let t = if num.is_unit() {
            self.den.dec()
        } else {
            self.den.quo(&num, Round::DOWN)?
        };
        Ok(-(t.log10()?.0) - 1)
    }

    /// Floor of the logarithm of `|self|` in an integral base.
    pub fn ilog(&self, base: &Int) -> Result<i64> {
        if self.is_zero() {
            return Err(MathError::ZeroArgument("ilog"));
        }
        if self.is_unit() {
            return Ok(0);
        }
        let num = self.num.abs();
        if self.is_int() {
            return num.log_base(base);
        }
        if num.cmp_abs(&self.den).is_gt() {
            return num.quo(&self.den, Round::DOWN)?.log_base(base);
        }
        let t = if num.is_unit() {
            self.den.dec()
        } else {
            self.den.quo(&num, Round::DOWN)?
        };
        Ok(-t.log_base(base)? - 1)
    }

    /// Binary precision of a value in `(0, 1]`: the `p` with
    /// `self = 2^-p * f`, `1 <= f < 2`; zero for values of one or more.
    pub fn precision(&self) -> Result<i64> {
        if self.is_zero() || self.is_negative() {
            return Err(MathError::OutOfDomain("precision"));
        }
        Ok((-self.ilog2()?).max(0))
    }

    /// Decimal places needed to write the value exactly, or `None` for
    /// repeating expansions.
    pub fn dec_places(&self) -> Option<i64> {
        if self.is_int() {
            return Some(0);
        }
        // finite exactly when the denominator is 2^a * 5^b
        let (fivepow, rem) = self.den.fac_rem(&Int::from(5u64));
        if !rem.is_one_bit() && !rem.is_one() {
            return None;
        }
        let twopow = rem.lowbit() as i64;
        Some(twopow.max(fivepow as i64))
    }

    /// Places needed in an arbitrary integral base, or `None` when the
    /// expansion repeats.
    pub fn places(&self, base: &Int) -> Option<i64> {
        if self.is_int() {
            return Some(0);
        }
        let mut g = self.den.clone();
        let mut k = 0i64;
        loop {
            if g.is_unit() {
                return Some(k);
            }
            let d = g.gcd(base);
            if d.is_unit() {
                return None;
            }
            g = exact_div(&g, &d);
            k += 1;
        }
    }

    /// Digits in the given base of the integral part; at least one.
    pub fn digits(&self, base: &Int) -> Result<i64> {
        if self.num.cmp_abs(&self.den).is_lt() {
            return Ok(1);
        }
        if self.is_int() {
            return Ok(1 + self.num.log_base(base)?);
        }
        let t = self.num.quo(&self.den, Round::TO_ZERO)?;
        Ok(1 + t.log_base(base)?)
    }

    /// The digit at place `dpos` of the expansion in `base`; places count
    /// from zero at the units position, negative to the right of the
    /// point.  Signs of the value and base are ignored.
    pub fn digit(&self, dpos: i64, base: &Int) -> Result<Int> {
        let base = base.abs();
        if base.is_zero() || base.is_unit() {
            return Err(MathError::BadLogBase);
        }
        if self.is_zero() || (self.is_int() && dpos < 0) || dpos >= 1 << 31 {
            return Ok(Int::zero());
        }
        let num = self.num.abs();

        // express |self| = base^k * n / d with gcd(d, base) = 1
        let (k, n, d): (i64, Int, Int);
        let (kn, nn) = num.fac_rem(&base);
        if kn != 0 {
            k = kn as i64;
            n = nn;
            d = self.den.clone();
        } else {
            let (kd, dd) = self.den.gcd_rem(&base)?;
            if kd > 0 {
                let a = exact_div(&self.den, &dd);
                let b = base.pow(&Int::from(kd))?;
                let c = exact_div(&b, &a);
                k = -(kd as i64);
                n = c.mul(&num);
                d = dd;
            } else {
                k = 0;
                n = num.clone();
                d = self.den.clone();
            }
        }

        let b = if dpos >= k {
            let scale = base.pow(&Int::from(dpos - k))?;
            n.quo(&d.mul(&scale), Round::DOWN)?
        } else {
            if d.is_unit() {
                return Ok(Int::zero());
            }
            // digit of a purely periodic part via the inverse of d
            let c = crate::modular::powermod(&base, &Int::from(k - dpos), &d)?;
            let a = n.rem_round(&d, Round::DOWN)?;
            let a = c.mul(&a).rem_round(&d, Round::DOWN)?;
            let dinv = match d.modinv(&base) {
                Some(v) => v,
                None => return Ok(Int::zero()),
            };
            base.sub(&dinv).mul(&a)
        };
        b.rem_round(&base, Round::DOWN)
    }

    /// Tests the bit at position `n`, with negative positions to the
    /// right of the binary point.
    pub fn bit(&self, n: i64) -> bool {
        if self.is_zero() || (self.is_int() && n < 0) {
            return false;
        }
        if n >= 0 {
            if self.is_int() {
                return self.num.bit(n as u64);
            }
            return match self.num.quo(&self.den, Round::TO_ZERO) {
                Ok(q) => q.bit(n as u64),
                Err(_) => false,
            };
        }
        self.scale(-n).int_part().num.is_odd()
    }

    /// Best rational approximation within `epsilon` (or, for `epsilon`
    /// of one or more, under the denominator bound `epsilon`), walking
    /// the continued-fraction expansion.
    pub fn cfappr(&self, epsilon: &Rat, rnd: Round) -> Result<Rat> {
        if epsilon.is_zero() || self.is_int() {
            return Ok(self.clone());
        }
        let rnd_bits = rnd.bits();
        let esign = epsilon.is_negative();
        let e = epsilon.abs();
        let bnddencase = e.num.cmp_abs(&e.den).is_ge();

        let mut f = Int::zero();
        let mut g = Int::zero();
        let mut denbnd = Int::zero();
        if bnddencase {
            denbnd = e.num.quo(&e.den, Round::DOWN)?;
            if self.den.cmp(&denbnd).is_le() {
                return Ok(self.clone());
            }
        } else {
            let e1 = if rnd.nearest() { e.scale(-1) } else { e.clone() };
            let (t, gg) = Int::reduce2(&self.den, &e1.den)?;
            g = gg;
            f = e1.num.mul(&t).abs();
        }

        let mut s: i32 = if rnd.nearest() && !self.den.is_two() {
            0
        } else {
            let mut s = if esign { -1 } else { 1 };
            if rnd_bits & 1 != 0 {
                s = -s;
            }
            if rnd_bits & 2 != 0 && (self.is_negative() ^ esign) {
                s = -s;
            }
            if rnd_bits & 4 != 0 && esign {
                s = -s;
            }
            s
        };

        let mut oldnum = Int::one();
        let mut oldden = Int::zero();
        let mut oldrem = self.den.clone();
        let (mut num, mut rem) = self.num.divmod(&self.den, Round::DOWN)?;
        let mut den = Int::one();
        let mut last_cmp: Option<(Int, Int)> = None;
        loop {
            if !bnddencase {
                let t1 = f.mul(&den);
                let t2 = g.mul(&rem);
                let stop = rem.is_zero() || (s >= 0 && t1.cmp(&t2).is_ge());
                last_cmp = Some((t1, t2));
                if stop {
                    break;
                }
            }
            let (quot, nrem) = oldrem.divmod(&rem, Round::DOWN)?;
            oldrem = rem;
            rem = nrem;
            let nden = quot.mul(&den).add(&oldden);
            oldden = den;
            den = nden;
            let nnum = quot.mul(&num).add(&oldnum);
            oldnum = num;
            num = nnum;
            if bnddencase && den.cmp(&denbnd).is_ge() {
                break;
            }
            s = -s;
        }

        let mut useold = false;
        let mut k = Int::zero();
        if bnddencase {
            if s > 0 {
                useold = true;
            } else {
                let t = den.sub(&denbnd);
                k = t.quo(&oldden, Round::UP)?;
            }
        } else {
            if s < 0 {
                return Ok(self.clone());
            }
            let (t1, t2) = match last_cmp {
                Some(v) => v,
                None => return Ok(self.clone()),
            };
            let t3 = t1.sub(&t2);
            let t4 = f.mul(&oldden).add(&g.mul(&oldrem));
            k = t3.quo(&t4, Round::DOWN)?;
        }
        if !useold && !k.is_zero() {
            num = num.sub(&k.mul(&oldnum));
            den = den.sub(&k.mul(&oldden));
        }
        if bnddencase && s == 0 {
            rem = rem.add(&k.mul(&oldrem));
            useold = rem.mul(&oldden).cmp(&den.mul(&oldrem)).is_ge();
        }
        if useold {
            Rat::new(oldnum, oldden)
        } else {
            Rat::new(num, den)
        }
    }

    /// Nearest value (above, below, or either) with a smaller
    /// denominator; one continued-fraction step.
    pub fn cfsim(&self, rnd: Round) -> Result<Rat> {
        let rnd_bits = rnd.bits();
        if self.is_zero() && rnd_bits & 26 != 0 {
            return Ok(Rat::zero());
        }
        let mut up = if rnd_bits & 24 != 0 {
            self.is_negative()
        } else {
            let mut s = rnd_bits & 1 != 0;
            if rnd_bits & 2 != 0 {
                s ^= self.is_negative();
            }
            s
        };
        if self.is_int() {
            if rnd_bits & 8 != 0 && rnd_bits & 16 == 0 {
                return Ok(Rat::zero());
            }
            return Ok(if up { self.inc() } else { self.dec() });
        }
        if self.den.is_two() {
            if rnd_bits & 16 != 0 {
                up = !up;
            }
            let t = if up { self.num.inc() } else { self.num.dec() };
            return Ok(Rat::from_int(t.shift(-1)));
        }
        let s: i32 = if rnd_bits & 24 != 0 { 0 } else if up { 1 } else { -1 };
        let den1 = match self.num.modinv(&self.den) {
            Some(v) => v,
            None => return Err(MathError::OutOfDomain("cfsim")),
        };
        if s >= 0 {
            let den2 = self.den.sub(&den1);
            if s > 0 || (den1.cmp(&den2).is_lt() ^ (rnd_bits & 16 == 0)) {
                let num = exact_div(&den2.mul(&self.num).inc(), &self.den);
                return Rat::new(num, den2);
            }
        }
        let num = exact_div(&den1.mul(&self.num).dec(), &self.den);
        Rat::new(num, den1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Rat {
        Rat::ratio(n, d).unwrap()
    }

    #[test]
    fn nearest_multiple() {
        let e = q(1, 100);
        let v = q(1, 3);
        let r = v.mappr(&e, Round::NEAREST_EVEN).unwrap();
        assert_eq!(r, q(33, 100));
        let r = q(2, 3).mappr(&e, Round::NEAREST_EVEN).unwrap();
        assert_eq!(r, q(67, 100));
        let r = q(1, 3).mappr(&e, Round::TO_ZERO).unwrap();
        assert_eq!(r, q(33, 100));
        let r = q(-1, 3).mappr(&e, Round::TO_ZERO).unwrap();
        assert_eq!(r, q(-33, 100));
    }

    #[test]
    fn decimal_rounding() {
        let pi_ish = q(355, 113);
        assert_eq!(pi_ish.round(4, Round::NEAREST_EVEN).unwrap(), q(31416, 10000));
        assert_eq!(pi_ish.trunc(2).unwrap(), q(314, 100));
        assert_eq!(q(-355, 113).trunc(2).unwrap(), q(-314, 100));
        // relative rounding counts significant digits
        let r = q(355, 113)
            .round(3, Round::NEAREST_EVEN.or(Round::EXACT_SQUARES))
            .unwrap();
        assert_eq!(r, q(314, 100));
    }

    #[test]
    fn binary_rounding() {
        assert_eq!(q(5, 8).bround(2, Round::DOWN).unwrap(), Rat::half());
        assert_eq!(q(5, 8).bround(2, Round::UP).unwrap(), q(3, 4));
        assert_eq!(q(5, 8).btrunc(1).unwrap(), Rat::half());
        assert_eq!(q(22, 7).btrunc(0).unwrap(), Rat::from(3i64));
    }

    #[test]
    fn integer_logs() {
        assert_eq!(q(13, 10).ilog2().unwrap(), 0);
        assert_eq!(q(1, 7).ilog2().unwrap(), -3);
        assert_eq!(Rat::from(8i64).ilog2().unwrap(), 3);
        assert_eq!(q(123, 10).ilog10().unwrap(), 1);
        assert_eq!(q(23, 1000).ilog10().unwrap(), -2);
        assert_eq!(Rat::from(100i64).ilog10().unwrap(), 2);
        assert_eq!(q(1, 10).ilog10().unwrap(), -1);
        assert_eq!(q(1, 8).ilog(&Int::two()).unwrap(), -3);
    }

    #[test]
    fn precision_and_places() {
        assert_eq!(q(1, 64).precision().unwrap(), 6);
        assert_eq!(q(3, 100).dec_places(), Some(2));
        assert_eq!(q(1, 7).dec_places(), None);
        assert_eq!(q(123, 1).dec_places(), Some(0));
        assert_eq!(q(5, 16).dec_places(), Some(4));
        assert_eq!(q(1, 12).places(&Int::from(6u64)), Some(2));
        assert_eq!(q(1, 7).places(&Int::from(6u64)), None);
    }

    #[test]
    fn positional_digits() {
        let v = q(12345678, 10000); // 1234.5678
        assert_eq!(v.digit(1, &Int::ten()).unwrap().to_u64(), 3);
        assert_eq!(v.digit(0, &Int::ten()).unwrap().to_u64(), 4);
        assert_eq!(v.digit(-3, &Int::ten()).unwrap().to_u64(), 7);
        // 1/7 repeats 142857...
        let sevth = q(1, 7);
        let expect = [1u64, 4, 2, 8, 5, 7, 1, 4];
        for (i, &d) in expect.iter().enumerate() {
            let got = sevth.digit(-(i as i64) - 1, &Int::ten()).unwrap().to_u64();
            assert_eq!(got, d, "digit {} of 1/7", i + 1);
        }
    }

    #[test]
    fn bit_queries() {
        let v = q(171, 10); // 17.1
        assert!(v.bit(0));
        assert!(!v.bit(1));
        assert!(v.bit(4));
        assert!(!v.bit(-1));
        assert!(q(1, 2).bit(-1));
    }

    #[test]
    fn continued_fraction_approximation() {
        let pi_ish = q(314159265, 100000000);
        // denominator budget of 1000 should find 355/113
        let r = pi_ish.cfappr(&Rat::from(1000i64), Round::DOWN).unwrap();
        assert_eq!(r, q(355, 113));
        // small epsilon keeps the value within range
        let eps = q(1, 10000);
        let r = pi_ish.cfappr(&eps, Round::NEAREST).unwrap();
        assert!(r.sub(&pi_ish).abs().cmp(&eps).is_le());
        assert!(r.den().cmp_abs(pi_ish.den()).is_le());
    }

    #[test]
    fn continued_fraction_simplification() {
        let v = q(277, 642);
        let below = v.cfsim(Round::DOWN).unwrap();
        let above = v.cfsim(Round::UP).unwrap();
        assert!(below < v && v < above);
        assert!(below.den().cmp_abs(v.den()).is_lt());
        assert!(above.den().cmp_abs(v.den()).is_lt());
        // integers step by one
        assert_eq!(Rat::from(5i64).cfsim(Round::DOWN).unwrap(), Rat::from(4i64));
    }
}
