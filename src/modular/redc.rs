//! Montgomery (REDC) arithmetic
//!
//! A [`Redc`] holds the per-modulus precomputation: the word length `n`
//! (the number of limbs covering `bitlen(mod)+1`), the negated inverse of
//! the modulus over `2^(B*n)`, and the Montgomery image of one.  Values
//! in REDC form add, subtract and compare like ordinary residues; only
//! multiplication needs the fused reduce.
//!
//! Below the configured threshold, multiply and square run a single
//! doubly-nested loop that interleaves the partial products with the
//! reduction steps — only the low limb of the inverse ever enters the
//! loop, and partial products are not shifted between rows.  Above the
//! threshold the subdivision multiply plus a two-multiply decode is
//! cheaper.

use crate::config;
use crate::error::{MathError, Result};
use crate::integer::Int;
use crate::limb::{BASEB, Limb, Wide};
use crate::round::Round;

/// Per-modulus REDC state.
#[derive(Debug, Clone)]
pub struct Redc {
    modulus: Int,
    inv: Int,
    one: Int,
    wordlen: usize,
}

/// `minv(-m, 2^(B*n))` for odd positive `m` of `n` limbs.
fn redc_modinv(m: &Int) -> Int {
    let n = m.limb_len();
    let m0 = m.limbs[0];
    let mut tmp = vec![0 as Limb; n];
    tmp[0] = 1;

    // limb inverse by bit lifting
    let mut h = m0.wrapping_add(1);
    let mut bit: Limb = 1;
    let mut inv: Limb = 1;
    while h != 0 {
        bit = bit.wrapping_shl(1);
        if bit & h != 0 {
            inv |= bit;
            h = h.wrapping_add(bit.wrapping_mul(m0));
        }
    }

    // clear one limb of the product per round
    let mut j = n;
    let mut a0 = 0usize;
    while j > 0 {
        j -= 1;
        let v = inv.wrapping_mul(tmp[a0]);
        let mut f = (v as Wide) * (m.limbs[0] as Wide) + tmp[a0] as Wide;
        tmp[a0] = v;
        let mut ai = a0 + 1;
        let mut bi = 1;
        let mut i = j;
        while i > 0 {
            i -= 1;
            f = (v as Wide) * (m.limbs[bi] as Wide) + tmp[ai] as Wide + (f >> BASEB);
            tmp[ai] = f as Limb;
            ai += 1;
            bi += 1;
        }
        while j > 0 {
            a0 += 1;
            if tmp[a0] == 0 {
                j -= 1;
            } else {
                break;
            }
        }
    }
    Int::from_raw(tmp, false)
}

impl Redc {
    /// Precomputes REDC state for an odd positive modulus.
    pub fn new(m: &Int) -> Result<Redc> {
        if m.is_even() || m.is_negative() || m.is_zero() {
            return Err(MathError::OutOfDomain("REDC requires a positive odd modulus"));
        }
        let modulus = m.clone();
        let inv = redc_modinv(&modulus);
        let mut bit = modulus.highbit() + 1;
        if bit % BASEB as u64 != 0 {
            bit += BASEB as u64 - bit % BASEB as u64;
        }
        let one = Int::bit_value(bit).rem_round(&modulus, Round::DOWN)?;
        Ok(Redc {
            modulus,
            inv,
            one,
            wordlen: (bit / BASEB as u64) as usize,
        })
    }

    /// The modulus this state reduces by.
    pub fn modulus(&self) -> &Int {
        &self.modulus
    }

    /// The REDC image of one.
    pub fn one(&self) -> &Int {
        &self.one
    }

    /// Number of limbs in the binary modulus.
    pub fn wordlen(&self) -> usize {
        self.wordlen
    }

    /// Converts into REDC form: `(z * 2^(B*n)) mod m`.
    ///
    /// Zero, one, minus one and two come straight from the precomputed
    /// image of one, since REDC values add and subtract normally.
    pub fn encode(&self, z: &Int) -> Int {
        if z.is_zero() {
            return Int::zero();
        }
        if z.is_one() {
            return self.one.clone();
        }
        if z.is_unit() {
            return self.modulus.sub(&self.one);
        }
        if z.is_two() {
            let two = self.one.add(&self.one);
            return if two.cmp_abs(&self.modulus).is_lt() {
                two
            } else {
                two.sub(&self.modulus)
            };
        }
        let shifted = z.shift((self.wordlen as u64 * BASEB as u64) as i64);
        match shifted.rem_round(&self.modulus, Round::DOWN) {
            Ok(r) => r,
            Err(_) => Int::zero(),
        }
    }

    /// Converts out of REDC form; also the reduction step after an
    /// ordinary multiply of two REDC values.
    pub fn decode(&self, z: &Int) -> Int {
        if z.is_zero() {
            return Int::zero();
        }
        if *z == self.one {
            return Int::one();
        }
        let modlen = self.wordlen;
        let sign = z.is_negative();
        let mut z1 = z.abs();

        // fold anything above the binary modulus back in afterwards
        let mut ztop = Int::zero();
        if z1.limb_len() > modlen {
            let top = z1.shift(-((modlen as u64 * BASEB as u64) as i64));
            ztop = if top.cmp_abs(&self.modulus).is_ge() {
                match top.rem_round(&self.modulus, Round::DOWN) {
                    Ok(r) => r,
                    Err(_) => Int::zero(),
                }
            } else {
                top.clone()
            };
            let low = z1.sub(&top.shift((modlen as u64 * BASEB as u64) as i64));
            if low.is_zero() {
                return self.finish_decode(ztop, sign);
            }
            z1 = low;
        }

        let mut res = if self.modulus.limb_len() < config::pow_threshold() {
            // schoolbook REDC: one reduction row per modulus limb
            let ninv = self.inv.limbs[0];
            let mut res = vec![0 as Limb; modlen];
            for i in 0..modlen {
                let mut f = res[0] as Wide;
                if i < z1.limb_len() {
                    f += z1.limbs[i] as Wide;
                }
                let muln = (f as Limb).wrapping_mul(ninv) as Wide;
                f = (muln * self.modulus.limbs[0] as Wide + f) >> BASEB;
                for j in 1..modlen {
                    f += muln * self.modulus.limbs[j] as Wide + res[j] as Wide;
                    res[j - 1] = f as Limb;
                    f >>= BASEB;
                }
                res[modlen - 1] = f as Limb;
            }
            Int::from_raw(res, false)
        } else {
            // two-multiply form: res = (z + (z*inv mod 2^(B*n)) * m) / 2^(B*n)
            let prod = z1.mul(&self.inv);
            let low = truncate_limbs(&prod, modlen);
            let tmp1 = low.mul(&self.modulus);
            if tmp1.limb_len() > modlen {
                tmp1.shift(-((modlen as u64 * BASEB as u64) as i64)).inc()
            } else {
                Int::one()
            }
        };

        if !ztop.is_zero() {
            res = res.add(&ztop);
        }
        self.finish_decode(res, sign)
    }

    fn finish_decode(&self, mut res: Int, sign: bool) -> Int {
        if res.cmp_abs(&self.modulus).is_ge() {
            res = res.sub(&self.modulus);
        }
        if sign && !res.is_zero() {
            res = self.modulus.sub(&res);
        }
        res
    }

    /// Multiplies two REDC values, fusing the reduce below the threshold.
    pub fn mul(&self, z1: &Int, z2: &Int) -> Int {
        let sign = z1.is_negative() ^ z2.is_negative();
        let a = self.clamp(z1);
        let b = self.clamp(z2);
        if a.is_zero() || b.is_zero() {
            return Int::zero();
        }
        if a == self.one {
            return self.signed(b, sign);
        }
        if b == self.one {
            return self.signed(a, sign);
        }
        if self.modulus.limb_len() >= config::redc_threshold() {
            let res = self.decode(&a.mul(&b));
            return self.signed(res, sign);
        }

        let modlen = self.wordlen;
        let ninv = self.inv.limbs[0];
        let mv = &self.modulus.limbs;
        let mut res = vec![0 as Limb; modlen];
        let mut topdigit: Limb = 0;

        for &d1 in &a.limbs {
            let mulb = d1 as Wide;
            let s1 = mulb * b.limbs[0] as Wide + res[0] as Wide;
            let muln = ((s1 as Limb).wrapping_mul(ninv)) as Wide;
            let s2 = muln * mv[0] as Wide + (s1 as Limb) as Wide;
            let mut carry = (s1 >> BASEB) + (s2 >> BASEB);
            let mut hd = 1;
            for &d2 in &b.limbs[1..] {
                let s1 = mulb * d2 as Wide + res[hd] as Wide + (carry as Limb) as Wide;
                let s2 = muln * mv[hd] as Wide + (s1 as Limb) as Wide;
                carry = (s1 >> BASEB) + (s2 >> BASEB) + (carry >> BASEB);
                res[hd - 1] = s2 as Limb;
                hd += 1;
            }
            // act as if the rest of b were zero limbs
            while hd < modlen {
                let s2 = muln * mv[hd] as Wide + res[hd] as Wide + (carry as Limb) as Wide;
                carry = (s2 >> BASEB) + (carry >> BASEB);
                res[hd - 1] = s2 as Limb;
                hd += 1;
            }
            carry += topdigit as Wide;
            res[modlen - 1] = carry as Limb;
            topdigit = (carry >> BASEB) as Limb;
        }
        // and as if the rest of a were zero limbs
        for _ in a.limbs.len()..modlen {
            let muln = (res[0].wrapping_mul(ninv)) as Wide;
            let s2 = muln * mv[0] as Wide + res[0] as Wide;
            let mut carry = s2 >> BASEB;
            let mut hd = 1;
            while hd < modlen {
                let s2 = muln * mv[hd] as Wide + res[hd] as Wide + (carry as Limb) as Wide;
                carry = (s2 >> BASEB) + (carry >> BASEB);
                res[hd - 1] = s2 as Limb;
                hd += 1;
            }
            carry += topdigit as Wide;
            res[modlen - 1] = carry as Limb;
            topdigit = (carry >> BASEB) as Limb;
        }

        let out = self.final_subtract(res, topdigit);
        self.signed(out, sign)
    }

    /// Squares a REDC value.
    pub fn square(&self, z: &Int) -> Int {
        let a = self.clamp(z);
        if a.is_zero() {
            return Int::zero();
        }
        if a == self.one {
            return a;
        }
        // a thin operand gains nothing from the fused pass
        if self.modulus.limb_len() >= config::redc_threshold()
            || 3 * a.limb_len() < 2 * self.modulus.limb_len()
        {
            return self.decode(&a.square());
        }

        let modlen = self.wordlen;
        let ninv = self.inv.limbs[0];
        let mv = &self.modulus.limbs;
        let zlen = a.limbs.len();
        let mut res = vec![0 as Limb; modlen];
        let mut topdigit: Limb = 0;

        for i in 0..zlen {
            let mulb = a.limbs[i] as Wide;
            let muln: Wide;
            let mut carry: Wide;
            let mut hd: usize;
            let mut h3: usize;
            if i == 0 {
                let s1 = mulb * mulb;
                muln = ((s1 as Limb).wrapping_mul(ninv)) as Wide;
                let s2 = muln * mv[0] as Wide + (s1 as Limb) as Wide;
                carry = (s1 >> BASEB) + (s2 >> BASEB);
                hd = 1;
                h3 = 1;
            } else {
                muln = (res[0].wrapping_mul(ninv)) as Wide;
                let mut f = (muln * mv[0] as Wide + res[0] as Wide) >> BASEB;
                hd = 1;
                h3 = 1;
                for _ in 1..i {
                    f += muln * mv[h3] as Wide + res[hd] as Wide;
                    res[hd - 1] = f as Limb;
                    f >>= BASEB;
                    hd += 1;
                    h3 += 1;
                }
                carry = f;
                let s1 = mulb * mulb + (carry as Limb) as Wide;
                let s2 = muln * mv[h3] as Wide + res[hd] as Wide + (s1 as Limb) as Wide;
                carry = (s1 >> BASEB) + (s2 >> BASEB) + (carry >> BASEB);
                res[hd - 1] = s2 as Limb;
                hd += 1;
                h3 += 1;
            }
            for &d2 in &a.limbs[i + 1..] {
                let s1 = mulb * d2 as Wide;
                let s2 = (((s1 as Limb) as Wide) << 1) + muln * mv[h3] as Wide;
                let s3 = ((s2 as Limb) as Wide) + res[hd] as Wide + (carry as Limb) as Wide;
                carry = ((s1 >> BASEB) << 1) + (s2 >> BASEB) + (s3 >> BASEB) + (carry >> BASEB);
                res[hd - 1] = s3 as Limb;
                hd += 1;
                h3 += 1;
            }
            while hd < modlen {
                let s1 = muln * mv[h3] as Wide + res[hd] as Wide + (carry as Limb) as Wide;
                carry = (s1 >> BASEB) + (carry >> BASEB);
                res[hd - 1] = s1 as Limb;
                hd += 1;
                h3 += 1;
            }
            carry += topdigit as Wide;
            res[modlen - 1] = carry as Limb;
            topdigit = (carry >> BASEB) as Limb;
        }
        for _ in zlen..modlen {
            let muln = (res[0].wrapping_mul(ninv)) as Wide;
            let s1 = muln * mv[0] as Wide + res[0] as Wide;
            let mut carry = s1 >> BASEB;
            let mut hd = 1;
            while hd < modlen {
                let s1 = muln * mv[hd] as Wide + res[hd] as Wide + (carry as Limb) as Wide;
                carry = (s1 >> BASEB) + (carry >> BASEB);
                res[hd - 1] = s1 as Limb;
                hd += 1;
            }
            carry += topdigit as Wide;
            res[modlen - 1] = carry as Limb;
            topdigit = (carry >> BASEB) as Limb;
        }

        self.final_subtract(res, topdigit)
    }

    /// Raises a REDC value to a non-negative power with 4-bit windows.
    pub fn power(&self, z: &Int, e: &Int) -> Result<Int> {
        const POWBITS: u32 = 4;
        const POWNUMS: usize = 1 << POWBITS;

        if e.is_negative() {
            return Err(MathError::OutOfDomain("negative power for REDC"));
        }
        if self.modulus.is_unit() {
            return Ok(Int::zero());
        }
        let sign = e.is_odd() && z.is_negative();
        let base = self.clamp(z);
        if base.is_zero() {
            return Ok(if e.is_zero() { Int::one() } else { Int::zero() });
        }
        if base == self.one {
            return Ok(self.signed(self.one.clone(), sign));
        }
        // the REDC image of -1 short-circuits the whole ladder
        let minus_one = self.modulus.sub(&self.one);
        if base == minus_one {
            return Ok(if e.is_odd() ^ sign {
                minus_one
            } else {
                self.one.clone()
            });
        }

        let mut lowpowers: [Option<Int>; POWNUMS] = Default::default();
        lowpowers[0] = Some(self.one.clone());
        lowpowers[1] = Some(base.clone());
        let mut ans = self.one.clone();

        let mut limb_idx = e.limb_len() - 1;
        let mut cur = e.limbs[limb_idx];
        let mut shift = BASEB - POWBITS;
        while shift > 0 && (cur >> shift) == 0 {
            shift -= POWBITS;
        }
        loop {
            let curpow = ((cur >> shift) & (POWNUMS as u32 - 1)) as usize;
            if lowpowers[curpow].is_none() {
                let mut modpow = if curpow & 1 != 0 {
                    base.clone()
                } else {
                    self.one.clone()
                };
                let mut curbit = 2usize;
                while curbit <= curpow {
                    if lowpowers[curbit].is_none() {
                        let half = lowpowers[curbit / 2].clone().unwrap_or_else(|| self.one.clone());
                        lowpowers[curbit] = Some(self.square(&half));
                    }
                    if curbit & curpow != 0 {
                        let p = lowpowers[curbit].clone().unwrap_or_else(|| self.one.clone());
                        modpow = self.mul(&p, &modpow);
                    }
                    curbit *= 2;
                }
                lowpowers[curpow] = Some(modpow);
            }
            if curpow != 0 {
                let p = lowpowers[curpow].clone().unwrap_or_else(|| self.one.clone());
                ans = self.mul(&ans, &p);
            }
            if shift == 0 {
                if limb_idx == 0 {
                    break;
                }
                limb_idx -= 1;
                cur = e.limbs[limb_idx];
                shift = BASEB - POWBITS;
            } else {
                shift -= POWBITS;
            }
            for _ in 0..POWBITS {
                ans = self.square(&ans);
            }
        }
        Ok(self.signed(ans, sign))
    }

    /// Brings a value into `[0, m)`, dropping its sign.
    fn clamp(&self, z: &Int) -> Int {
        let v = z.abs();
        if v.cmp_abs(&self.modulus).is_ge() {
            match v.rem_round(&self.modulus, Round::DOWN) {
                Ok(r) => r,
                Err(_) => Int::zero(),
            }
        } else {
            v
        }
    }

    fn signed(&self, v: Int, sign: bool) -> Int {
        if sign && !v.is_zero() {
            self.modulus.sub(&v)
        } else {
            v
        }
    }

    /// One conditional subtraction brings the fused result below the
    /// modulus; any overflow digit is guaranteed to cancel.
    fn final_subtract(&self, mut res: Vec<Limb>, topdigit: Limb) -> Int {
        if topdigit == 0 {
            let out = Int::from_raw(res.clone(), false);
            if out.cmp_abs(&self.modulus).is_lt() {
                return out;
            }
        }
        let mut borrow: Wide = 0;
        for (slot, &mval) in res.iter_mut().zip(&self.modulus.limbs) {
            let f = (*slot as Wide)
                .wrapping_sub(mval as Wide)
                .wrapping_sub(borrow);
            *slot = f as Limb;
            borrow = (f >> BASEB) & 1;
        }
        Int::from_raw(res, false)
    }
}

/// Low `n` limbs of a value.
fn truncate_limbs(z: &Int, n: usize) -> Int {
    if z.limb_len() <= n {
        return z.abs();
    }
    Int::from_raw(z.limbs[..n].to_vec(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modular::powermod;

    #[test]
    fn round_trip() {
        let m = Int::from(1_000_000_007u64);
        let rp = Redc::new(&m).unwrap();
        for v in [0u64, 1, 2, 3, 12345, 999_999_999] {
            let z = Int::from(v);
            let enc = rp.encode(&z);
            assert_eq!(rp.decode(&enc).to_u64(), v, "round trip of {v}");
        }
    }

    #[test]
    fn multiplicative_homomorphism() {
        let m = Int::from(0xffff_ffff_ffff_fc43u64); // odd
        let rp = Redc::new(&m).unwrap();
        let a = Int::from(0x1234_5678_9abcu64);
        let b = Int::from(0xfeed_face_cafeu64);
        let prod = rp.decode(&rp.mul(&rp.encode(&a), &rp.encode(&b)));
        let want = a.mul(&b).rem_round(&m, Round::DOWN).unwrap();
        assert_eq!(prod, want);
        let sq = rp.decode(&rp.square(&rp.encode(&a)));
        let want = a.square().rem_round(&m, Round::DOWN).unwrap();
        assert_eq!(sq, want);
    }

    #[test]
    fn multi_limb_modulus() {
        let m = Int::bit_value(160).add(&Int::from(7u64)); // odd, 6 limbs
        let rp = Redc::new(&m).unwrap();
        let a = Int::bit_value(159).add(&Int::from(0x1234u64));
        let b = Int::bit_value(100).add(&Int::from(0x9999u64));
        let prod = rp.decode(&rp.mul(&rp.encode(&a), &rp.encode(&b)));
        let want = a.mul(&b).rem_round(&m, Round::DOWN).unwrap();
        assert_eq!(prod, want);
    }

    #[test]
    fn power_matches_powermod() {
        let m = Int::from(999_999_999_989u64); // prime, odd
        let rp = Redc::new(&m).unwrap();
        let a = Int::from(predictable(1));
        let e = Int::from(65_537u64);
        let enc = rp.encode(&a);
        let pow = rp.power(&enc, &e).unwrap();
        let got = rp.decode(&pow);
        let want = powermod(&a, &e, &m).unwrap();
        assert_eq!(got, want);
    }

    fn predictable(k: u64) -> u64 {
        0x1234_5678u64.wrapping_mul(k).wrapping_add(0x9abc_def0)
    }

    #[test]
    fn rejects_bad_moduli() {
        assert!(Redc::new(&Int::from(10u64)).is_err());
        assert!(Redc::new(&Int::from(-7i64)).is_err());
        assert!(Redc::new(&Int::zero()).is_err());
    }

    #[test]
    fn encode_fast_paths() {
        let m = Int::from(1_000_003u64);
        let rp = Redc::new(&m).unwrap();
        assert_eq!(rp.encode(&Int::zero()), Int::zero());
        assert_eq!(rp.encode(&Int::one()), *rp.one());
        assert_eq!(rp.decode(&rp.encode(&Int::from(-1i64))).to_u64(), 1_000_002);
        assert_eq!(rp.decode(&rp.encode(&Int::two())).to_u64(), 2);
    }
}
