//! Greatest common divisor, lcm, and modular inverse
//!
//! The gcd first strips the common power of two (zero limbs plus trailing
//! zero bits, preserved as a factor of the result), then runs a hybrid
//! loop: while both operands span more than one limb, a Lehmer step
//! derives a small 2x2 transform `(A, B; C, D)` from the leading 64 bits
//! of each operand and applies it to the full arrays in one pass.  When
//! the transform degenerates (`B == 0`, meaning the true quotient was too
//! large to see in the leading bits) one full-precision Euclid step runs
//! instead.  Single-limb tails finish on machine words.
//!
//! The modular inverse is Algorithm X with the same single-precision
//! Lehmer refinement, tracking one cofactor column.

use crate::error::Result;
use crate::round::Round;

use super::Int;

/// One Lehmer round on the leading bits: returns `(a, b, c, d)`, with
/// `b == 0` when no progress could be certified.
fn lehmer_step(uh: u64, vh: u64) -> (i64, i64, i64, i64) {
    let mut a: i128 = 1;
    let mut b: i128 = 0;
    let mut c: i128 = 0;
    let mut d: i128 = 1;
    let mut uh = uh as i128;
    let mut vh = vh as i128;

    while vh + c != 0 && vh + d != 0 {
        let q1 = (uh + a) / (vh + c);
        let q2 = (uh + b) / (vh + d);
        if q1 != q2 {
            break;
        }
        let t = a - q1 * c;
        a = c;
        c = t;
        let t = b - q1 * d;
        b = d;
        d = t;
        let t = uh - q1 * vh;
        uh = vh;
        vh = t;
        if c.unsigned_abs() >= i64::MAX as u128 || d.unsigned_abs() >= i64::MAX as u128 {
            break;
        }
    }
    (a as i64, b as i64, c as i64, d as i64)
}

/// gcd of two machine words.
pub(crate) fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while a != 0 {
        let t = b % a;
        b = a;
        a = t;
    }
    b
}

/// `gcd(z mod n, n)`: the part of `n` that cancels against `z`.
pub(crate) fn gcd_of_mod(z: &Int, n: u64) -> u64 {
    debug_assert!(n >= 1 && n <= i64::MAX as u64);
    let r = z.mod_small(n as i64).unwrap_or(0);
    gcd_u64(r, n)
}

impl Int {
    /// Greatest common divisor; always non-negative.
    pub fn gcd(&self, other: &Int) -> Int {
        if self.is_unit() || other.is_unit() {
            return Int::one();
        }
        let a = self.abs();
        let b = other.abs();
        if a.is_zero() || a == b {
            return b;
        }
        if b.is_zero() {
            return a;
        }

        // common zero limbs and trailing zero bits factor out of the result
        let common = a.lowbit().min(b.lowbit());
        let mut u = a.shift(-(common as i64));
        let mut v = b.shift(-(common as i64));

        while u.limb_len() > 1 && v.limb_len() > 1 {
            if u.cmp_abs(&v).is_lt() {
                std::mem::swap(&mut u, &mut v);
            }
            let sh = u.bit_len().saturating_sub(64) as i64;
            let uh = u.shift(-sh).to_u64();
            let vh = v.shift(-sh).to_u64();
            let (ta, tb, tc, td) = lehmer_step(uh, vh);
            if tb == 0 {
                // leading bits could not certify a quotient
                let r = match u.rem_round(&v, Round::DOWN) {
                    Ok(r) => r,
                    Err(_) => break,
                };
                u = v;
                v = r;
            } else {
                let nu = u.mul_small(ta).add(&v.mul_small(tb)).abs();
                let nv = u.mul_small(tc).add(&v.mul_small(td)).abs();
                u = nu;
                v = nv;
            }
            if v.is_zero() {
                return u.shift(common as i64);
            }
        }

        // single-limb tail
        if u.limb_len() > 1 || v.limb_len() > 1 {
            let (big, small) = if u.limb_len() > 1 { (&u, &v) } else { (&v, &u) };
            let s = small.to_u64();
            if s == 0 {
                return big.shift(common as i64);
            }
            let r = match big.mod_small(s as i64) {
                Ok(r) => r,
                Err(_) => 0,
            };
            return Int::from(gcd_u64(r, s)).shift(common as i64);
        }
        Int::from(gcd_u64(u.to_u64(), v.to_u64())).shift(common as i64)
    }

    /// Least common multiple.
    pub fn lcm(&self, other: &Int) -> Int {
        if self.is_zero() || other.is_zero() {
            return Int::zero();
        }
        let g = self.gcd(other);
        match self.divexact(&g) {
            Ok(q) => q.mul(other),
            Err(_) => Int::zero(),
        }
    }

    /// Inverse of `self` modulo `|m|`, or `None` when not coprime.
    pub fn modinv(&self, m: &Int) -> Option<Int> {
        let v = m.abs();
        if v.is_zero() {
            return if self.is_unit() { Some(self.clone()) } else { None };
        }
        if v.is_unit() {
            return Some(Int::zero());
        }
        let mut v3 = if self.is_negative() || self.cmp_abs(&v).is_ge() {
            self.rem_round(&v, Round::DOWN).ok()?
        } else {
            self.clone()
        };
        let mut u3 = v.clone();
        let mut u2 = Int::zero();
        let mut v2 = Int::one();

        while u3.limb_len() > 1 && !v3.is_zero() {
            let n = u3.limb_len();
            let uh = ((u3.limbs[n - 1] as u64) << 32) | u3.limbs[n - 2] as u64;
            let mut vh: u64 = 0;
            if v3.limb_len() + 1 >= n {
                vh = v3.limbs[v3.limb_len() - 1] as u64;
            }
            if v3.limb_len() == n {
                vh = (vh << 32) | v3.limbs[v3.limb_len() - 2] as u64;
            }
            let (ta, tb, tc, td) = lehmer_step(uh, vh);
            if tb == 0 {
                // full-precision quotient step
                let q = u3.quo(&v3, Round::DOWN).ok()?;
                let t2 = u2.sub(&q.mul(&v2));
                u2 = v2;
                v2 = t2;
                let t3 = u3.sub(&q.mul(&v3));
                u3 = v3;
                v3 = t3;
            } else {
                let nu2 = u2.mul_small(ta).add(&v2.mul_small(tb));
                let nv2 = u2.mul_small(tc).add(&v2.mul_small(td));
                u2 = nu2;
                v2 = nv2;
                let nu3 = u3.mul_small(ta).add(&v3.mul_small(tb));
                let nv3 = u3.mul_small(tc).add(&v3.mul_small(td));
                u3 = nu3;
                v3 = nv3;
            }
        }

        if v3.is_zero() {
            if !u3.is_one() {
                return None;
            }
            // inverse already found in u2
            return Some(if u2.is_negative() { v.add(&u2) } else { u2 });
        }

        // single-precision finish
        let mut ui3 = u3.to_u64();
        let mut vi3 = v3.to_u64();
        while vi3 != 0 {
            let q1 = ui3 / vi3;
            let t2 = u2.sub(&v2.mul_small(q1 as i64));
            u2 = v2;
            v2 = t2;
            let t = ui3 - q1 * vi3;
            ui3 = vi3;
            vi3 = t;
        }
        if ui3 != 1 {
            return None;
        }
        if u2.is_negative() {
            return Some(v.add(&u2));
        }
        Some(u2)
    }

    /// True if the two values share no factor beyond one.
    pub fn rel_prime(&self, other: &Int) -> bool {
        let a = self.abs();
        let b = other.abs();
        if a.is_even() && b.is_even() {
            return false;
        }
        if a.is_unit() || b.is_unit() {
            return true;
        }
        if a.is_zero() || b.is_zero() {
            return false;
        }
        if a.is_two() || b.is_two() {
            return true;
        }
        // first batch of odd primes as one shared remainder each
        let r1 = match a.mod_small(3 * 5 * 7 * 11 * 13) {
            Ok(r) => r,
            Err(_) => return false,
        };
        let r2 = match b.mod_small(3 * 5 * 7 * 11 * 13) {
            Ok(r) => r,
            Err(_) => return false,
        };
        for p in [3u64, 5, 7, 11, 13] {
            if r1 % p == 0 && r2 % p == 0 {
                return false;
            }
        }
        let r1 = match a.mod_small(17 * 19 * 23) {
            Ok(r) => r,
            Err(_) => return false,
        };
        let r2 = match b.mod_small(17 * 19 * 23) {
            Ok(r) => r,
            Err(_) => return false,
        };
        for p in [17u64, 19, 23] {
            if r1 % p == 0 && r2 % p == 0 {
                return false;
            }
        }
        a.gcd(&b).is_unit()
    }

    /// Divides both values by their gcd.
    pub(crate) fn reduce2(a: &Int, b: &Int) -> Result<(Int, Int)> {
        if a.is_abs_le_one() || b.is_abs_le_one() {
            return Ok((a.clone(), b.clone()));
        }
        let g = a.gcd(b);
        if g.is_unit() {
            return Ok((a.clone(), b.clone()));
        }
        Ok((a.divexact(&g)?, b.divexact(&g)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_gcds() {
        assert_eq!(Int::from(12u64).gcd(&Int::from(18u64)).to_u64(), 6);
        assert_eq!(Int::from(-12i64).gcd(&Int::from(18u64)).to_u64(), 6);
        assert_eq!(Int::from(17u64).gcd(&Int::from(19u64)).to_u64(), 1);
        assert_eq!(Int::zero().gcd(&Int::from(5u64)).to_u64(), 5);
        assert_eq!(Int::from(5u64).gcd(&Int::zero()).to_u64(), 5);
    }

    #[test]
    fn common_twos_preserved() {
        let a = Int::from(48u64).shift(100);
        let b = Int::from(180u64).shift(100);
        let g = a.gcd(&b);
        assert_eq!(g, Int::from(12u64).shift(100));
    }

    #[test]
    fn large_gcd() {
        // gcd(f(n), f(n+1)) of consecutive values of a product chain is 1
        let mut a = Int::from(2u64);
        for i in 3..40u64 {
            a = a.mul_small(i as i64);
        }
        let b = a.add(&Int::one());
        assert!(a.gcd(&b).is_unit());
        // and gcd(k*a, a) = a
        let k = Int::from(987_654_321u64);
        assert_eq!(a.mul(&k).gcd(&a), a);
    }

    #[test]
    fn lcm_identity() {
        let a = Int::from(36u64);
        let b = Int::from(120u64);
        assert_eq!(a.lcm(&b).to_u64(), 360);
        assert_eq!(a.gcd(&b).mul(&a.lcm(&b)), a.mul(&b));
    }

    #[test]
    fn modular_inverse() {
        let m = Int::from(1_000_000_007u64);
        let a = Int::from(123_456_789u64);
        let inv = a.modinv(&m).unwrap();
        let prod = a.mul(&inv).rem_round(&m, Round::DOWN).unwrap();
        assert!(prod.is_one());
        assert!(Int::from(10u64).modinv(&Int::from(25u64)).is_none());
    }

    #[test]
    fn modular_inverse_large() {
        let m = Int::from(0xffff_ffff_ffff_fff1u64).mul(&Int::from(0xffff_fff1u64));
        let a = Int::from(0x1234_5678_9abc_defdu64);
        if let Some(inv) = a.modinv(&m) {
            let prod = a.mul(&inv).rem_round(&m, Round::DOWN).unwrap();
            assert!(prod.is_one());
        }
    }

    #[test]
    fn relative_primality() {
        assert!(Int::from(35u64).rel_prime(&Int::from(64u64)));
        assert!(!Int::from(35u64).rel_prime(&Int::from(49u64)));
        assert!(Int::from(1u64).rel_prime(&Int::from(0u64)));
    }
}
