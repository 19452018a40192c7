//! Sine, cosine, and the four quotient functions
//!
//! [`sincos`] evaluates both series at once.  The argument is first cut
//! down by `n` halvings — `n` is chosen near the square root of the bit
//! budget, balancing series length against the double-angle unwinding —
//! then the Taylor sums for sine and cosine run in scaled integers at
//! `m` working bits, and finally the `n` double-angle steps
//! `cos <- cos^2 - sin^2`, `sin <- 2 cos sin` restore the argument.
//!
//! The quotient functions re-run `sincos` with a widened budget whenever
//! the divisor came out too close to zero to certify the error bound.

use crate::config;
use crate::error::{MathError, Result};
use crate::global;
use crate::integer::Int;
use crate::rational::Rat;

use super::{budget_sqrt, require_epsilon};

/// Sine and cosine of `q`, each within `2^-bitnum`.
pub fn sincos(q: &Rat, bitnum: i64) -> Result<(Rat, Rat)> {
    global::check_abort()?;
    if q.is_zero() {
        return Ok((Rat::zero(), Rat::one()));
    }
    let h = q.abs().ilog2()?;
    let k = bitnum + h + 1;
    if k < 0 {
        return Ok((Rat::zero(), Rat::one()));
    }
    let mut s = budget_sqrt(k) + 1;
    if s < -h {
        s = -h;
    }
    let n = h + s; // double-angle squarings to unwind
    let mut m = bitnum + n;
    while s > 0 {
        s >>= 1;
        m += 1;
    }

    let scaled = q.scale(m - n);
    let mut x = scaled.num().quo(scaled.den(), config::triground())?;
    if x.is_zero() {
        return Ok((Rat::zero(), Rat::one()));
    }

    let mut cossum = Int::bit_value(m as u64);
    let mut sinsum = x.clone();
    let mul = x.clone();
    let mut d: i64 = 1;
    loop {
        x = x.negated().mul(&mul).shift(-m);
        d += 1;
        x = x.div_small(d)?.0;
        if x.is_zero() {
            break;
        }
        cossum = cossum.add(&x);
        x = x.mul(&mul).shift(-m);
        d += 1;
        x = x.div_small(d)?.0;
        if x.is_zero() {
            break;
        }
        sinsum = sinsum.add(&x);
    }

    for _ in 0..n {
        let c2 = cossum.square();
        let s2 = sinsum.square();
        let prod = cossum.mul(&sinsum);
        cossum = c2.sub(&s2).shift(-m);
        sinsum = prod.shift(1 - m);
    }

    let to_rat = |v: Int| -> Rat {
        if v.is_zero() {
            return Rat::zero();
        }
        let low = v.lowbit() as i64;
        if m > low {
            Rat::from_parts_unchecked(v.shift(-low), Int::bit_value((m - low) as u64))
        } else {
            Rat::from_int(v.shift(-m))
        }
    };
    Ok((to_rat(sinsum), to_rat(cossum)))
}

/// Sine within epsilon.
pub fn sin(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "sine")?;
    let n = -epsilon.ilog2()?;
    if q.is_zero() || n < 0 {
        return Ok(Rat::zero());
    }
    let (sin, _) = sincos(q, n + 2)?;
    sin.mappr(epsilon, config::triground())
}

/// Cosine within epsilon.
pub fn cos(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "cosine")?;
    if q.is_zero() {
        return Ok(Rat::one());
    }
    let n = -epsilon.ilog2()?;
    if n < 0 {
        return Ok(Rat::zero());
    }
    let (_, cos) = sincos(q, n + 2)?;
    cos.mappr(epsilon, config::triground())
}

/// Tangent within epsilon.
pub fn tan(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "tangent")?;
    if q.is_zero() {
        return Ok(Rat::zero());
    }
    let n = epsilon.ilog2()?;
    let mut k = if n > 0 { 4 + n / 2 } else { 4 };
    loop {
        let (sin, cos) = sincos(q, 2 * k - n)?;
        if cos.is_zero() {
            k = 2 * k - n + 4;
            continue;
        }
        let m = -cos.ilog2()?;
        if m < k {
            let t = sin.div(&cos)?;
            return t.mappr(epsilon, config::triground());
        }
        k = m + 1;
    }
}

/// Cotangent within epsilon; the argument must be nonzero.
pub fn cot(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "cotangent")?;
    if q.is_zero() {
        return Err(MathError::ZeroArgument("cotangent"));
    }
    let mut k = -q.ilog2()?;
    let n = epsilon.ilog2()?;
    if k < 0 {
        k = if n > 0 { n / 2 } else { 0 };
    }
    k += 4;
    loop {
        let (sin, cos) = sincos(q, 2 * k - n)?;
        if sin.is_zero() {
            k = 2 * k - n + 4;
            continue;
        }
        let m = -sin.ilog2()?;
        if m < k {
            let t = cos.div(&sin)?;
            return t.mappr(epsilon, config::triground());
        }
        k = m + 1;
    }
}

/// Secant within epsilon.
pub fn sec(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "secant")?;
    if q.is_zero() {
        return Ok(Rat::one());
    }
    let n = epsilon.ilog2()?;
    let mut k = if n > 0 { 4 + n / 2 } else { 4 };
    loop {
        let (_, cos) = sincos(q, 2 * k - n)?;
        if cos.is_zero() {
            k = 2 * k - n + 4;
            continue;
        }
        let m = -cos.ilog2()?;
        if m < k {
            let t = cos.inv()?;
            return t.mappr(epsilon, config::triground());
        }
        k = m + 1;
    }
}

/// Cosecant within epsilon; the argument must be nonzero.
pub fn csc(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "cosecant")?;
    if q.is_zero() {
        return Err(MathError::ZeroArgument("cosecant"));
    }
    let mut k = -q.ilog2()?;
    let n = epsilon.ilog2()?;
    if k < 0 {
        k = if n > 0 { n / 2 } else { 0 };
    }
    k += 4;
    loop {
        let (sin, _) = sincos(q, 2 * k - n)?;
        if sin.is_zero() {
            k = 2 * k - n + 4;
            continue;
        }
        let m = -sin.ilog2()?;
        if m < k {
            let t = sin.inv()?;
            return t.mappr(epsilon, config::triground());
        }
        k = m + 1;
    }
}
