//! Integer square root, k-th root, and perfect-square testing
//!
//! The square root processes the operand two limbs at a time in radix
//! 2^64: a bit-pair extraction phase produces the leading 64 bits of root
//! and remainder, then a division-like phase develops one root limb per
//! step, keeping the remainder window complemented while it is negative
//! (tracked by `u`, as in the divide).  The returned flag is the sign of
//! `exact_root - computed_root`, so callers can tell exactness without a
//! second multiply.
//!
//! `is_square` rejects most non-squares with a quadratic-residue table
//! indexed by the value mod 4096 before falling back to the full root.

use once_cell::sync::Lazy;

use crate::error::{MathError, Result};
use crate::limb::{BASE1, BASEB, Limb, TOPHALF, Wide};
use crate::round::Round;

use super::Int;

const TOPFULL: Wide = 1 << 63;

/// `SQUARE_MOD_4096[x]` is true when x can be a square modulo 4096.
static SQUARE_MOD_4096: Lazy<[bool; 4096]> = Lazy::new(|| {
    let mut table = [false; 4096];
    for i in 0..4096u64 {
        table[((i * i) % 4096) as usize] = true;
    }
    table
});

impl Int {
    /// Integer square root rounded down.
    pub fn isqrt(&self) -> Result<Int> {
        Ok(self.isqrt_round(Round::DOWN)?.0)
    }

    /// Integer square root with rounding control.
    ///
    /// Returns the root and the sign of `exact - computed`: zero means
    /// the value was a perfect square.  Rounding honors bits 0 (up),
    /// 3 (parity of the root) and 4 (nearest) of the mask.
    pub fn isqrt_round(&self, rnd: Round) -> Result<(Int, i32)> {
        if self.neg {
            return Err(MathError::SqrtOfNegative);
        }
        if self.is_zero() {
            return Ok((Int::zero(), 0));
        }
        let rnd_bits = rnd.bits();

        let m0 = self.limbs.len();
        let o = m0 & 1;
        let m_full = m0 + o; // smallest even length
        let n = m_full / 2;
        let mut n0 = n;

        // bit pairs in the leading radix-2^64 digit
        let mut top = self.limbs[m0 - 1] as Wide;
        let mut k: u32 = 1;
        loop {
            top >>= 2;
            if top == 0 {
                break;
            }
            k += 1;
        }
        if o == 0 {
            k += BASEB / 2;
        }
        let j = BASEB - k;
        let mut m1 = m_full;
        if k == BASEB {
            m1 += 2;
            n0 += 1;
        }

        let mut a = vec![0 as Limb; m1 + 1];
        a[..m0].copy_from_slice(&self.limbs);

        let mut f: Wide;
        let mut g: Wide;
        let mut d: Wide;
        let mut e: Wide;
        let topbit: Wide;
        if n == 1 {
            f = if j != 0 {
                ((a[1] as Wide) << j) | (a[0] >> k) as Wide
            } else {
                a[1] as Wide
            };
            g = (a[0] as Wide) << (j + BASEB);
            topbit = 1 << (k - 1);
        } else {
            f = if j != 0 {
                ((a[m_full - 1] as Wide) << (j + BASEB))
                    | ((a[m_full - 2] as Wide) << j)
                    | (a[m_full - 3] >> k) as Wide
            } else {
                ((a[m_full - 1] as Wide) << BASEB) | a[m_full - 2] as Wide
            };
            g = ((a[m_full - 3] as Wide) << (j + BASEB))
                | if m_full >= 4 { (a[m_full - 4] as Wide) << j } else { 0 };
            topbit = 1 << (BASEB + k - 1);
        }
        d = topbit;
        e = topbit;

        // leading 64 bits of root (e) and remainder (f), one bit pair per turn
        let mut s: Wide = f & topbit;
        f = f.wrapping_shl(1);
        if g & TOPFULL != 0 {
            f = f.wrapping_add(1);
        }
        g = g.wrapping_shl(1);
        if s != 0 {
            f = f.wrapping_sub(4u64.wrapping_mul(d));
            e = 2 * d - 1;
        } else {
            f = f.wrapping_sub(d);
        }
        loop {
            d >>= 1;
            if d == 0 {
                break;
            }
            if s | f | g == 0 {
                break;
            }
            while d != 0 && (f & topbit) == s {
                d >>= 1;
                f = f.wrapping_shl(1);
                if g & TOPFULL != 0 {
                    f = f.wrapping_add(1);
                }
                g = g.wrapping_shl(1);
            }
            if d == 0 {
                break;
            }
            if s != 0 {
                f = f.wrapping_add(e).wrapping_add(1);
            } else {
                f = f.wrapping_sub(e);
            }
            let mut t = f & topbit;
            f = f.wrapping_shl(1);
            if g & TOPFULL != 0 {
                f = f.wrapping_add(1);
            }
            g = g.wrapping_shl(1);
            if t == 0 && f < d {
                t = topbit;
            }
            f = f.wrapping_sub(d);
            if s != 0 {
                e = e.wrapping_sub(d.wrapping_sub((t == 0) as Wide));
            } else {
                e = e.wrapping_add(d.wrapping_sub((t != 0) as Wide));
            }
            s = t;
        }

        let mut rem_len: usize;
        if n0 == 1 {
            a[1] = e as Limb;
            a[0] = f as Limb;
            rem_len = 1;
        } else if n0 == 2 {
            a[3] = (e >> BASEB) as Limb;
            a[2] = e as Limb;
            a[1] = (f >> BASEB) as Limb;
            a[0] = f as Limb;
            rem_len = 2;
        } else {
            // develop one root limb per step, divide-style
            let mut u: Limb = if s != 0 { BASE1 as Limb } else { 0 };
            let k1: u32;
            let mut m_cur: usize;
            if k < BASEB {
                a[m1 - 1] = (e >> (BASEB - 1)) as Limb;
                a[m1 - 2] = ((e as Limb) << 1) | (s != 0) as Limb;
                a[m1 - 3] = (f >> BASEB) as Limb;
                a[m1 - 4] = f as Limb;
                m_cur = m1 - 2;
                k1 = k + 1;
            } else {
                a[m1 - 1] = 1;
                a[m1 - 2] = (e >> (BASEB - 1)) as Limb;
                a[m1 - 3] = ((e as Limb) << 1) | (s != 0) as Limb;
                a[m1 - 4] = u;
                a[m1 - 5] = (f >> BASEB) as Limb;
                a[m1 - 6] = f as Limb;
                m_cur = m1 - 3;
                k1 = 1;
            }
            let h = e >> k;
            let onebit = e & (1 << (k - 1)) != 0;
            let j2 = BASEB - k1;
            let j1 = BASEB + j2;

            while m_cur > n0 {
                let at = m_cur - 1;
                let mut f: Wide = if j2 != 0 {
                    ((a[at] as Wide) << j1) | ((a[at - 1] as Wide) << j2) | (a[at - 2] >> k1) as Wide
                } else {
                    ((a[at] as Wide) << BASEB) | a[at - 1] as Wide
                };
                if u != 0 {
                    f = !f;
                }
                let mut x = f / h;
                if x != 0 {
                    if onebit && x > 2 * (f % h) + 2 {
                        x -= 1;
                    }
                    let cnt = m1 - m_cur;
                    let mut ai = at - (cnt + 1);
                    let mut bi = at + 1;
                    if u != 0 {
                        let fl = (a[ai] as Wide).wrapping_add(x.wrapping_mul((1u64 << BASEB).wrapping_sub(x)));
                        a[ai] = fl as Limb;
                        ai += 1;
                        let mut carry = (fl >> BASEB) as Limb;
                        for _ in 0..cnt {
                            let fl = (a[ai] as Wide)
                                .wrapping_add(x.wrapping_mul(a[bi] as Wide))
                                .wrapping_add(carry as Wide);
                            a[ai] = fl as Limb;
                            ai += 1;
                            bi += 1;
                            carry = (fl >> BASEB) as Limb;
                        }
                        u = carry.wrapping_add(a[at]);
                        let mut xd = (!(x as Limb)).wrapping_add((u == 0) as Limb);
                        if xd & (TOPHALF as Limb) == 0 {
                            a[at + 1] = a[at + 1].wrapping_sub(1);
                        }
                        xd = (xd << 1) | (u > 0) as Limb;
                        a[at] = xd;
                    } else {
                        let fl = (a[ai] as Wide).wrapping_sub(x.wrapping_mul(x));
                        a[ai] = fl as Limb;
                        ai += 1;
                        let mut borrow = ((fl >> BASEB) as Limb).wrapping_neg();
                        for _ in 0..cnt {
                            let fl = (a[ai] as Wide)
                                .wrapping_sub(x.wrapping_mul(a[bi] as Wide))
                                .wrapping_sub(borrow as Wide);
                            a[ai] = fl as Limb;
                            ai += 1;
                            bi += 1;
                            borrow = ((fl >> BASEB) as Limb).wrapping_neg();
                        }
                        u = a[at].wrapping_sub(borrow);
                        let xd = (x as Limb).wrapping_add(u);
                        if xd & (TOPHALF as Limb) != 0 {
                            a[at + 1] |= 1;
                        }
                        a[at] = (xd << 1) | (u > 0) as Limb;
                    }
                } else {
                    a[at] = u;
                }
                m_cur -= 1;
                let mut ai = m_cur;
                if ai > 0 {
                    ai -= 1;
                    if a[ai] == u {
                        while m_cur > 1 && ai > 0 {
                            ai -= 1;
                            if a[ai] == u {
                                m_cur -= 1;
                            } else {
                                break;
                            }
                        }
                    }
                }
            }

            // the developed digits carry one extra low bit apiece
            for idx in 0..n {
                let next = a[n0 + idx + 1];
                a[n0 + idx] = (a[n0 + idx] >> 1) | ((next & 1) << (BASEB - 1));
            }
            s = u as Wide;
            rem_len = m_cur;
        }

        // rounding and exactness
        if s == 0 {
            while rem_len > 0 && a[rem_len - 1] == 0 {
                rem_len -= 1;
            }
            if rem_len == 0 {
                let root = Int::from_raw(a[n0..n0 + n].to_vec(), false);
                return Ok((root, 0));
            }
        }

        let up: bool;
        if rnd.nearest() {
            if s == 0 {
                if rem_len != n {
                    up = rem_len > n;
                } else {
                    let mut i = n;
                    let mut cmp = false;
                    while i > 0 {
                        i -= 1;
                        if a[i] != a[n0 + i] {
                            cmp = a[i] > a[n0 + i];
                            break;
                        }
                        if i == 0 {
                            cmp = false;
                        }
                    }
                    up = cmp;
                }
            } else {
                while rem_len > 1 && a[rem_len - 1] == BASE1 as Limb {
                    rem_len -= 1;
                }
                if rem_len != n {
                    up = rem_len < n;
                } else {
                    let mut i = n;
                    let mut cmp = false;
                    while i > 0 {
                        i -= 1;
                        let sum = a[i] as Wide + a[n0 + i] as Wide;
                        if sum != BASE1 {
                            cmp = sum >= 1 << BASEB;
                            break;
                        }
                        if i == 0 {
                            cmp = false;
                        }
                    }
                    up = cmp;
                }
            }
        } else if rnd.parity() {
            up = (rnd_bits as Limb ^ a[n0]) & 1 != 0;
        } else {
            up = rnd.up();
        }

        let mut root_len = n;
        let remsign;
        if up {
            remsign = -1;
            let mut idx = n0;
            let mut i = n;
            while i > 0 && a[idx] == Limb::MAX {
                a[idx] = 0;
                idx += 1;
                i -= 1;
            }
            if i > 0 {
                a[idx] = a[idx].wrapping_add(1);
            } else {
                root_len += 1;
                a[idx] = 1;
            }
        } else {
            remsign = 1;
        }
        let root = Int::from_raw(a[n0..n0 + root_len].to_vec(), false);
        Ok((root, remsign))
    }

    /// Greatest integer not above the k-th root.
    ///
    /// Uses the divide-and-average iteration
    /// `x <- ((k-1)*x + n/x^(k-1)) / k`.
    pub fn kth_root(&self, k: &Int) -> Result<Int> {
        let sign = self.neg;
        if sign && k.is_even() {
            return Err(MathError::EvenRootOfNegative);
        }
        if k.is_zero() || k.is_negative() {
            return Err(MathError::BadRoot);
        }
        if self.is_zero() {
            return Ok(Int::zero());
        }
        if k.is_unit() {
            return Ok(self.clone());
        }
        if k.ge_pow2(31) {
            return Ok(Int::one().with_sign(sign));
        }
        let kk = k.to_u64();
        let value = self.abs();
        let highbit = value.highbit();
        if highbit < kk {
            return Ok(Int::one().with_sign(sign));
        }
        let k1 = Int::from(kk - 1);

        // seed with the right bit length; low bits are irrelevant
        let top = highbit.div_ceil(kk);
        let mut try_val = Int::bit_value(top);
        let mut old = Int::zero();
        loop {
            let pow = try_val.pow(&k1)?;
            let quo = value.quo(&pow, Round::DOWN)?;
            let rel = try_val.cmp(&quo);
            if rel.is_le() {
                if rel.is_eq() || old == try_val {
                    return Ok(try_val.with_sign(sign));
                }
                old = try_val.clone();
            }
            let sum = quo.add(&try_val.mul(&k1));
            try_val = sum.quo(k, Round::DOWN)?;
        }
    }

    /// True for perfect squares.
    pub fn is_square(&self) -> bool {
        if self.neg {
            return false;
        }
        if self.is_abs_le_one() {
            return true;
        }
        // an odd number of trailing zero bits rules a square out, and the
        // residue table catches most of the rest
        let low = self.lowbit();
        if low & 1 != 0 {
            return false;
        }
        let shifted = self.shift(-(low as i64));
        if !SQUARE_MOD_4096[(shifted.limbs[0] & 0xfff) as usize] {
            return false;
        }
        matches!(shifted.isqrt_round(Round::DOWN), Ok((_, 0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_roots() {
        for v in 0u64..200 {
            let z = Int::from(v);
            let (r, flag) = z.isqrt_round(Round::DOWN).unwrap();
            let root = r.to_u64();
            assert!(root * root <= v, "root too large for {v}");
            assert!((root + 1) * (root + 1) > v, "root too small for {v}");
            assert_eq!(flag == 0, root * root == v);
        }
    }

    #[test]
    fn multi_limb_roots() {
        let v = Int::from(1_000_000_007u64).pow(&Int::from(6u64)).unwrap();
        let (r, flag) = v.isqrt_round(Round::DOWN).unwrap();
        assert_eq!(flag, 0);
        assert_eq!(r, Int::from(1_000_000_007u64).pow(&Int::from(3u64)).unwrap());

        let w = v.add(&Int::one());
        let (r2, flag2) = w.isqrt_round(Round::DOWN).unwrap();
        assert_eq!(r2, r);
        assert_eq!(flag2, 1);
    }

    #[test]
    fn rounded_roots() {
        // sqrt(8) = 2.828: down 2, up 3, nearest 3
        let v = Int::from(8u64);
        assert_eq!(v.isqrt_round(Round::DOWN).unwrap().0.to_u64(), 2);
        assert_eq!(v.isqrt_round(Round::UP).unwrap().0.to_u64(), 3);
        assert_eq!(v.isqrt_round(Round::NEAREST).unwrap().0.to_u64(), 3);
        // sqrt(6) = 2.449: nearest 2
        assert_eq!(Int::from(6u64).isqrt_round(Round::NEAREST).unwrap().0.to_u64(), 2);
    }

    #[test]
    fn negative_rejected() {
        assert_eq!(
            Int::from(-4i64).isqrt(),
            Err(MathError::SqrtOfNegative)
        );
    }

    #[test]
    fn kth_roots() {
        assert_eq!(
            Int::from(85u64).kth_root(&Int::from(3u64)).unwrap().to_u64(),
            4
        );
        assert_eq!(
            Int::from(-27i64).kth_root(&Int::from(3u64)).unwrap().to_i64(),
            -3
        );
        assert!(Int::from(-16i64).kth_root(&Int::from(4u64)).is_err());
        let v = Int::from(7u64).pow(&Int::from(20u64)).unwrap();
        assert_eq!(v.kth_root(&Int::from(5u64)).unwrap(), Int::from(7u64).pow(&Int::from(4u64)).unwrap());
    }

    #[test]
    fn square_detection() {
        for v in 0u64..500 {
            let z = Int::from(v * v);
            assert!(z.is_square(), "{} should be square", v * v);
        }
        for v in [2u64, 3, 5, 8, 12, 999, 1_000_001] {
            assert!(!Int::from(v).is_square(), "{v} is not square");
        }
        assert!(!Int::from(-4i64).is_square());
    }
}
