//! Natural and based logarithms
//!
//! `ln` squeezes the argument into `(1/2, 2)` by repeated square roots —
//! each root halves the logarithm, so `n` of them divide it by `2^n` —
//! then sums the fast series `ln(x) = 2 * sum y^(2k+1)/(2k+1)` with
//! `y = (x - 1)/(x + 1)` in scaled integers, and multiplies the
//! reductions back in as one shift.
//!
//! The based logarithms divide two `ln` evaluations; the divisor
//! logarithms (`ln 2`, `ln 10`, and the last arbitrary base) are cached
//! keyed by the epsilon they were computed to.

use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::config;
use crate::error::{MathError, Result};
use crate::global;
use crate::integer::Int;
use crate::rational::Rat;

use super::require_epsilon;

/// Cached divisor logarithm: (base, epsilon, ln(base)).
type LnCache = Option<(Rat, Rat, Rat)>;

static LN_2: Lazy<Mutex<LnCache>> = Lazy::new(|| Mutex::new(None));
static LN_10: Lazy<Mutex<LnCache>> = Lazy::new(|| Mutex::new(None));
static LN_N: Lazy<Mutex<LnCache>> = Lazy::new(|| Mutex::new(None));

/// Natural logarithm of a positive value, within epsilon.
pub fn ln(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "ln")?;
    if q.is_zero() || q.is_negative() {
        return Err(MathError::LogOfNonPositive);
    }
    if q.is_one() {
        return Ok(Rat::zero());
    }
    global::check_abort()?;

    // work above one; the sign of the result restores the inversion
    let inverted = q.num().cmp_abs(q.den()).is_lt();
    let q = if inverted { q.inv()? } else { q.clone() };

    let mut k = q.ilog2()?;
    let mut m = -epsilon.ilog2()?;
    if m < 0 {
        m = 0;
    }
    let mut h = k;
    while h > 0 {
        h /= 2;
        m += 1; // one more bit per square root below
    }
    m += 18;

    let scaled = q.scale(m - k);
    let mut x = scaled.num().quo(scaled.den(), config::triground())?;

    let d = Int::bit_value(m as u64);
    let bound = d.add(&Int::bit_value(m as u64 - 8));

    let mut n: i64 = 1; // one more than the number of square roots
    while k > 0 || x.cmp_abs(&bound).is_gt() {
        n += 1;
        let widened = x.shift(m + (k & 1));
        x = widened.isqrt_round(config::triground())?.0;
        k /= 2;
    }

    // y = (x - 1) / (x + 1) in the scaled integers
    let num = x.sub(&d).shift(m);
    let den = x.add(&d);
    let mut pow = num.quo(&den, config::triground())?;
    let mut sum = pow.clone();
    let mul = pow.square().shift(-m);
    let mut dd: i64 = 1;
    loop {
        pow = pow.mul(&mul).shift(-m);
        dd += 2;
        let term = pow.div_small(dd)?.0;
        if term.is_zero() {
            break;
        }
        sum = sum.add(&term);
    }

    if sum.is_zero() {
        return Ok(Rat::zero());
    }
    let sum = sum.with_sign(inverted);
    let low = sum.lowbit() as i64;
    let val = if low + n >= m {
        Rat::from_int(sum.shift(n - m))
    } else {
        Rat::from_parts_unchecked(sum.shift(-low), Int::bit_value((m - low - n) as u64))
    };
    val.mappr(epsilon, config::triground())
}

/// Looks up or recomputes a cached divisor logarithm.
fn cached_ln(cache: &Mutex<LnCache>, base: &Rat, epsilon: &Rat) -> Result<Rat> {
    {
        let guard = global::lock(cache);
        if let Some((b, e, v)) = guard.as_ref() {
            if b == base && e == epsilon {
                return Ok(v.clone());
            }
        }
    }
    tracing::debug!(%base, "refreshing logarithm cache");
    let v = ln(base, epsilon)?;
    let mut guard = global::lock(cache);
    *guard = Some((base.clone(), epsilon.clone(), v.clone()));
    Ok(v)
}

/// Base-ten logarithm: `ln(q) / ln(10)`.
pub fn log(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "log")?;
    if q.is_zero() || q.is_negative() {
        return Err(MathError::LogOfNonPositive);
    }
    // exact powers of ten short-circuit
    if q.is_int() && q.is_positive() {
        let (l, exact) = q.num().log10()?;
        if exact {
            return Ok(Rat::from(l));
        }
    } else if q.num().is_one() {
        let (l, exact) = q.den().log10()?;
        if exact {
            return Ok(Rat::from(-l));
        }
    }
    let ln_q = ln(q, epsilon)?;
    if ln_q.is_zero() {
        return Ok(ln_q);
    }
    let ln_10 = cached_ln(&LN_10, &Rat::ten(), epsilon)?;
    ln_q.div(&ln_10)
}

/// Base-two logarithm: `ln(q) / ln(2)`.
pub fn log2(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "log2")?;
    if q.is_zero() || q.is_negative() {
        return Err(MathError::LogOfNonPositive);
    }
    if let Some(l) = q.power_of_two_log() {
        return Ok(Rat::from(l));
    }
    let ln_q = ln(q, epsilon)?;
    if ln_q.is_zero() {
        return Ok(ln_q);
    }
    let ln_2 = cached_ln(&LN_2, &Rat::two(), epsilon)?;
    ln_q.div(&ln_2)
}

/// Logarithm in an arbitrary base: `ln(q) / ln(n)`.
pub fn logn(q: &Rat, n: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "logn")?;
    if q.is_zero() || q.is_negative() {
        return Err(MathError::LogOfNonPositive);
    }
    if n.is_zero() || n.is_one() || n.is_negative() {
        return Err(MathError::BadLogBase);
    }
    let ln_q = ln(q, epsilon)?;
    if ln_q.is_zero() {
        return Ok(ln_q);
    }
    let ln_n = cached_ln(&LN_N, n, epsilon)?;
    ln_q.div(&ln_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eps20() -> Rat {
        Rat::tenth_to(20)
    }

    fn check(value: &Rat, reference: &str, eps: &Rat) {
        let want: Rat = reference.parse().unwrap();
        assert!(
            value.sub(&want).abs().cmp(&eps.scale(1)).is_le(),
            "got {value}, wanted about {want}"
        );
    }

    #[test]
    fn ln_known_values() {
        let eps = eps20();
        // ln(2) = 0.69314718055994530941...
        check(&ln(&Rat::two(), &eps).unwrap(), "0.69314718055994530941", &eps);
        // ln(10) = 2.30258509299404568401...
        check(&ln(&Rat::ten(), &eps).unwrap(), "2.30258509299404568401", &eps);
        // ln(1/2) = -ln(2)
        check(&ln(&Rat::half(), &eps).unwrap(), "-0.69314718055994530941", &eps);
        assert_eq!(ln(&Rat::one(), &eps).unwrap(), Rat::zero());
    }

    #[test]
    fn ln_exp_round_trip() {
        let eps = Rat::tenth_to(25);
        let q = Rat::ratio(7, 3).unwrap();
        let l = ln(&q, &eps).unwrap();
        let back = super::super::exp(&l, &eps).unwrap().unwrap();
        assert!(back.sub(&q).abs().cmp(&Rat::tenth_to(20)).is_lt());
    }

    #[test]
    fn domain_errors() {
        let eps = eps20();
        assert_eq!(ln(&Rat::zero(), &eps), Err(MathError::LogOfNonPositive));
        assert_eq!(ln(&Rat::neg_one(), &eps), Err(MathError::LogOfNonPositive));
        assert_eq!(logn(&Rat::two(), &Rat::one(), &eps), Err(MathError::BadLogBase));
    }

    #[test]
    fn based_logs() {
        let eps = eps20();
        assert_eq!(log(&Rat::from(1000i64), &eps).unwrap(), Rat::from(3i64));
        assert_eq!(log(&Rat::tenth_to(2), &eps).unwrap(), Rat::from(-2i64));
        assert_eq!(log2(&Rat::from(1024i64), &eps).unwrap(), Rat::from(10i64));
        assert_eq!(log2(&Rat::power_of_two(-5), &eps).unwrap(), Rat::from(-5i64));
        // log(2) = 0.30102999566398119521...
        check(&log(&Rat::two(), &eps).unwrap(), "0.30102999566398119521", &eps);
        // log base 3 of 81 is 4, up to epsilon
        let r = logn(&Rat::from(81i64), &Rat::from(3i64), &eps).unwrap();
        assert!(r.sub(&Rat::from(4i64)).abs().cmp(&Rat::tenth_to(18)).is_lt());
    }
}
