//! Modular arithmetic
//!
//! Three reduction strategies serve three modulus shapes:
//!
//! - small moduli divide directly;
//! - odd moduli below the REDC threshold use Montgomery form
//!   ([`redc::Redc`], cached per modulus in [`cache`]);
//! - large moduli reduce by a precomputed reciprocal
//!   `inv = floor(2^(2*B*n) / mod)`: an estimate quotient comes from one
//!   multiply and shift, then a couple of correction subtractions finish
//!   the job.  The reciprocal of the most recent modulus is kept so
//!   repeated callers skip the setup division.
//!
//! [`powermod`] picks among the three per the configured thresholds and
//! runs 4-bit exponent windows over a 16-entry low-power table.

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::config;
use crate::error::{MathError, Result};
use crate::global;
use crate::integer::Int;
use crate::limb::BASEB;
use crate::round::Round;

pub(crate) mod cache;
pub(crate) mod redc;

pub use cache::{clear_redc_cache, redc_for};
pub use redc::Redc;

/// Reciprocal-based reduction state for one modulus.
pub(crate) struct ModReciprocal {
    modulus: Int,
    inv: Int,
}

static LAST_MOD: Lazy<Mutex<Option<Arc<ModReciprocal>>>> = Lazy::new(|| Mutex::new(None));

impl ModReciprocal {
    fn new(modulus: &Int) -> Result<ModReciprocal> {
        let n = modulus.limb_len() as u64;
        let scale = Int::bit_value(2 * n * BASEB as u64);
        let inv = scale.quo(modulus, Round::DOWN)?;
        Ok(ModReciprocal { modulus: modulus.clone(), inv })
    }

    /// Reduces a window of at most `2n` limbs.
    fn reduce_window(&self, v: Int) -> Result<Int> {
        let n = self.modulus.limb_len() as i64;
        if v.cmp_abs(&self.modulus).is_lt() {
            return Ok(v);
        }
        let top = v.shift(-(BASEB as i64 * (n - 1)));
        let est = top.mul(&self.inv).shift(-(BASEB as i64 * (n + 1)));
        let mut r = v.sub(&est.mul(&self.modulus));
        // the estimate is never high and misses by a bounded amount
        while r.cmp_abs(&self.modulus).is_ge() {
            r = r.sub(&self.modulus);
        }
        Ok(r)
    }

    /// Reduces an arbitrary non-negative value, window by window.
    fn reduce(&self, z: &Int) -> Result<Int> {
        let neg = z.is_negative();
        let n = self.modulus.limb_len() as i64;
        let mut v = z.abs();
        while v.cmp_abs(&self.modulus).is_ge() {
            if v.limb_len() as i64 > 2 * n {
                let split = BASEB as i64 * (v.limb_len() as i64 - 2 * n);
                let high = v.shift(-split);
                let low = v.sub(&high.shift(split));
                let reduced = self.reduce_window(high)?;
                v = reduced.shift(split).add(&low);
            } else {
                v = self.reduce_window(v)?;
            }
        }
        if neg && !v.is_zero() {
            v = self.modulus.sub(&v);
        }
        Ok(v)
    }
}

/// Reciprocal state for `m`, reusing the most recent one when it matches.
pub(crate) fn reciprocal_for(m: &Int) -> Result<Arc<ModReciprocal>> {
    let mut guard = global::lock(&LAST_MOD);
    if let Some(rp) = guard.as_ref() {
        if rp.modulus == *m {
            return Ok(Arc::clone(rp));
        }
    }
    tracing::debug!(limbs = m.limb_len(), "computing modulus reciprocal");
    let rp = Arc::new(ModReciprocal::new(m)?);
    *guard = Some(Arc::clone(&rp));
    Ok(rp)
}

/// Squares a value and reduces it modulo a positive modulus.
pub fn square_mod(z: &Int, m: &Int) -> Result<Int> {
    if m.is_zero() || m.is_negative() {
        return Err(MathError::NonPositiveModulus);
    }
    if z.is_zero() || m.is_unit() {
        return Ok(Int::zero());
    }
    if m.is_tiny() {
        let digit = m.limbs[0] as u64;
        let prod = if digit & digit.wrapping_neg() == digit {
            let v = z.limbs[0] as u64;
            (v * v) & (digit - 1)
        } else {
            let v = z.abs().mod_small(digit as i64)?;
            (v * v) % digit
        };
        return Ok(Int::from(prod));
    }
    let sq = z.square();
    if sq.cmp_abs(m).is_lt() {
        return Ok(sq);
    }
    sq.rem_round(m, Round::DOWN)
}

/// The residue of least absolute value, in
/// `[-floor((m-1)/2), floor(m/2)]`.
pub fn min_mod(z: &Int, m: &Int) -> Result<Int> {
    if m.is_zero() || m.is_negative() {
        return Err(MathError::NonPositiveModulus);
    }
    if z.is_zero() || m.is_unit() {
        return Ok(Int::zero());
    }
    if m.is_two() {
        return Ok(if z.is_odd() { Int::one() } else { Int::zero() });
    }
    if z.limb_len() + 1 < m.limb_len() {
        return Ok(z.clone());
    }
    let r = z.rem_round(m, Round::DOWN)?;
    let other = m.sub(&r);
    // ties go to the positive representative
    if r.cmp_abs(&other).is_le() {
        Ok(r)
    } else {
        Ok(other.negated())
    }
}

/// True when `a` and `b` are congruent modulo a positive modulus.
pub fn congruent(a: &Int, b: &Int, m: &Int) -> Result<bool> {
    if m.is_zero() || m.is_negative() {
        return Err(MathError::NonPositiveModulus);
    }
    if m.is_two() {
        return Ok((a.limbs[0] ^ b.limbs[0]) & 1 == 0);
    }
    if a == b {
        return Ok(true);
    }
    let diff = a.sub(b);
    if diff.cmp_abs(m).is_lt() {
        return Ok(diff.is_zero());
    }
    Ok(diff.rem_round(m, Round::DOWN)?.is_zero())
}

/// Raises `a` to the non-negative power `e` modulo the positive `m`.
pub fn powermod(a: &Int, e: &Int, m: &Int) -> Result<Int> {
    if m.is_zero() || m.is_negative() {
        return Err(MathError::NonPositiveModulus);
    }
    if e.is_negative() {
        return Err(MathError::OutOfDomain("negative power for powermod"));
    }
    global::check_abort()?;

    if (a.is_zero() && !e.is_zero()) || m.is_unit() {
        return Ok(Int::zero());
    }
    if e.is_zero() {
        return Ok(Int::one());
    }
    if m.is_two() {
        return Ok(if a.is_odd() { Int::one() } else { Int::zero() });
    }
    if a.is_unit() && (!a.is_negative() || e.is_even()) {
        return Ok(Int::one());
    }

    // bring the base into modulo range
    let base = if a.is_negative() || a.cmp_abs(m).is_ge() {
        a.rem_round(m, Round::DOWN)?
    } else {
        a.clone()
    };
    if base.is_zero() {
        return Ok(Int::zero());
    }
    if base.is_one() {
        return Ok(Int::one());
    }

    if m.limb_len() >= config::pow_threshold() {
        let rp = reciprocal_for(m)?;
        return window_pow(&base, e, &mut |v| rp.reduce(&v));
    }
    if m.limb_len() < config::redc_threshold() && m.is_odd() {
        let rp = redc_for(m)?;
        let enc = rp.encode(&base);
        let pow = rp.power(&enc, e)?;
        return Ok(rp.decode(&pow));
    }
    window_pow(&base, e, &mut |v| v.rem_round(m, Round::DOWN))
}

/// Left-to-right 4-bit window exponentiation over a caller reduction.
fn window_pow(
    base: &Int,
    e: &Int,
    reduce: &mut dyn FnMut(Int) -> Result<Int>,
) -> Result<Int> {
    const POWBITS: u32 = 4;
    const POWNUMS: usize = 1 << POWBITS;

    let mut lowpowers: [Option<Int>; POWNUMS] = Default::default();
    lowpowers[0] = Some(Int::one());
    lowpowers[1] = Some(base.clone());
    let mut ans = Int::one();

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
                Int::one()
            };
            let mut curbit = 2usize;
            while curbit <= curpow {
                if lowpowers[curbit].is_none() {
                    let half = lowpowers[curbit / 2].clone().unwrap_or_else(Int::one);
                    lowpowers[curbit] = Some(reduce(half.square())?);
                }
                if curbit & curpow != 0 {
                    let p = lowpowers[curbit].clone().unwrap_or_else(Int::one);
                    modpow = reduce(p.mul(&modpow))?;
                }
                curbit *= 2;
            }
            lowpowers[curpow] = Some(modpow);
        }
        if curpow != 0 {
            let p = lowpowers[curpow].clone().unwrap_or_else(Int::one);
            ans = reduce(ans.mul(&p))?;
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
            ans = reduce(ans.square())?;
        }
    }
    Ok(ans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slow_powermod(a: u64, mut e: u64, m: u64) -> u64 {
        let mut base = a % m;
        let mut acc = 1u128;
        while e > 0 {
            if e & 1 != 0 {
                acc = acc * base as u128 % m as u128;
            }
            base = (base as u128 * base as u128 % m as u128) as u64;
            e >>= 1;
        }
        acc as u64
    }

    #[test]
    fn powermod_small_cases() {
        for (a, e, m) in [(2u64, 10, 1000), (3, 0, 7), (0, 5, 7), (5, 1, 7), (7, 100, 13)] {
            let r = powermod(&Int::from(a), &Int::from(e), &Int::from(m)).unwrap();
            assert_eq!(r.to_u64(), slow_powermod(a, e, m), "{a}^{e} mod {m}");
        }
    }

    #[test]
    fn powermod_end_to_end() {
        let r = powermod(
            &Int::two(),
            &Int::from(1_000_000u64),
            &Int::from(1_000_000_007u64),
        )
        .unwrap();
        assert_eq!(r.to_u64(), 235_042_059);
    }

    #[test]
    fn powermod_big_modulus() {
        // force the reciprocal path with a modulus above the threshold
        let m = Int::bit_value(1024).sub(&Int::from(105u64));
        let r = powermod(&Int::from(3u64), &Int::from(65537u64), &m).unwrap();
        // verify against square-and-multiply with plain reduction
        let mut check = Int::one();
        let base = Int::from(3u64);
        for bit in (0..17).rev() {
            check = check.square().rem_round(&m, Round::DOWN).unwrap();
            if (65537u64 >> bit) & 1 != 0 {
                check = check.mul(&base).rem_round(&m, Round::DOWN).unwrap();
            }
        }
        assert_eq!(r, check);
    }

    #[test]
    fn reciprocal_reduction() {
        let m = Int::bit_value(700).add(&Int::from(12345u64));
        let rp = ModReciprocal::new(&m).unwrap();
        let x = Int::bit_value(1399).add(&Int::bit_value(698));
        let want = x.rem_round(&m, Round::DOWN).unwrap();
        assert_eq!(rp.reduce(&x).unwrap(), want);
        let neg = x.negated();
        let want = neg.rem_round(&m, Round::DOWN).unwrap();
        assert_eq!(rp.reduce(&neg).unwrap(), want);
    }

    #[test]
    fn min_mod_range() {
        let m = Int::from(7u64);
        let vals: Vec<i64> = (-10..=10)
            .map(|v| min_mod(&Int::from(v), &m).unwrap().to_i64())
            .collect();
        for (v, r) in (-10i64..=10).zip(&vals) {
            assert!((-3..=3).contains(r));
            assert_eq!((v - r).rem_euclid(7), 0, "{v} -> {r}");
        }
    }

    #[test]
    fn congruence() {
        let m = Int::from(12u64);
        assert!(congruent(&Int::from(14u64), &Int::from(2u64), &m).unwrap());
        assert!(congruent(&Int::from(-10i64), &Int::from(2u64), &m).unwrap());
        assert!(!congruent(&Int::from(5u64), &Int::from(6u64), &m).unwrap());
        assert!(congruent(&Int::from(5u64), &Int::from(7u64), &Int::two()).unwrap());
    }

    #[test]
    fn modulus_validation() {
        assert_eq!(
            powermod(&Int::two(), &Int::two(), &Int::zero()),
            Err(MathError::NonPositiveModulus)
        );
        assert_eq!(
            powermod(&Int::two(), &Int::from(-1i64), &Int::from(5u64)),
            Err(MathError::OutOfDomain("negative power for powermod"))
        );
    }
}
