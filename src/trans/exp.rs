//! Exponential and hyperbolic functions
//!
//! [`exprel`] is the shared core: a scaled-integer Taylor sum for
//! `exp(x)` on a reduced argument, followed by repeated squaring to undo
//! the reduction.  The squaring phase tracks an extra power of two (`k`)
//! whenever a square crosses `2^(2m+1)`, keeping every intermediate
//! within one limb of the working precision.  A request that would need
//! more than `2^30` working bits reports "not expressible" by returning
//! `None`.
//!
//! The hyperbolic family is built on `exprel` through the usual
//! identities, with early outs for arguments so large that the result is
//! flat at the target precision.

use crate::config;
use crate::error::{MathError, Result};
use crate::global;
use crate::integer::Int;
use crate::rational::Rat;

use super::require_epsilon;

/// `log2(e)` to a few more digits than any budget estimate needs.
pub(crate) fn log2_e() -> Rat {
    Rat::from_parts_unchecked(Int::from(36744u64), Int::from(25469u64))
}

/// `exp(q)` with a relative error of `2^-bitnum`; requires `q >= 0`.
///
/// Returns `None` when more than `2^30` working bits would be needed.
pub(crate) fn exprel(q: &Rat, bitnum: i64) -> Result<Option<Rat>> {
    global::check_abort()?;
    if q.is_zero() {
        return Ok(Some(Rat::one()));
    }
    let h = q.ilog2()?;
    let k = bitnum + h + 1;
    if k < 0 {
        return Ok(Some(Rat::one()));
    }
    let mut s = super::budget_sqrt(k) + 1;
    if s < -h {
        s = -h;
    }
    let n = h + s;
    let mut m = bitnum + n;
    if m > 1 << 30 {
        return Ok(None);
    }
    while s > 0 {
        s >>= 1;
        m += 1;
    }

    let scaled = q.scale(m - n);
    let x = scaled.num().quo(scaled.den(), config::triground())?;
    if x.is_zero() {
        return Ok(Some(Rat::one()));
    }

    let mut sum = Int::bit_value(m as u64);
    let mut term = x.clone();
    let mut d: i64 = 1;
    loop {
        sum = sum.add(&term);
        term = term.mul(&x).shift(-m);
        d += 1;
        term = term.div_small(d)?.0;
        if term.is_zero() {
            break;
        }
    }

    let mut extra: i64 = 0;
    let bound = Int::bit_value(2 * m as u64 + 1);
    for _ in 0..n {
        extra *= 2;
        let sq = sum.square();
        if sq.cmp_abs(&bound).is_ge() {
            sum = sq.shift(-(m + 1));
            extra += 1;
        } else {
            sum = sq.shift(-m);
        }
    }

    let low = sum.lowbit() as i64;
    Ok(Some(if m > low + extra {
        Rat::from_parts_unchecked(sum.shift(-low), Int::bit_value((m - low - extra) as u64))
    } else {
        Rat::from_int(sum.shift(extra - m))
    }))
}

/// `e^q` within epsilon; `None` past the working-precision ceiling.
pub fn exp(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "exp")?;
    if q.is_zero() {
        return Ok(Some(Rat::one()));
    }
    let m = q.mul(&log2_e()).to_i64(); // exp(q) < 2^(m+1)
    if m > 1 << 30 {
        return Ok(None);
    }
    let n = epsilon.ilog2()?;
    if m < n {
        return Ok(Some(Rat::zero()));
    }
    let t = match exprel(&q.abs(), m - n + 1)? {
        Some(v) => v,
        None => return Ok(None),
    };
    let t = if q.is_negative() { t.inv()? } else { t };
    Ok(Some(t.mappr(epsilon, config::triground())?))
}

/// Hyperbolic cosine within epsilon.
pub fn cosh(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "cosh")?;
    let eps1 = epsilon.scale(-2);
    let t = match exp(&q.abs(), &eps1)? {
        Some(v) => v,
        None => return Ok(None),
    };
    if t.is_zero() {
        return Ok(None);
    }
    let sum = t.inv()?.add(&t).scale(-1);
    Ok(Some(sum.mappr(epsilon, config::triground())?))
}

/// Hyperbolic sine within epsilon.
pub fn sinh(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "sinh")?;
    if q.is_zero() {
        return Ok(Some(Rat::zero()));
    }
    let eps1 = epsilon.scale(-3);
    let t = match exp(&q.abs(), &eps1)? {
        Some(v) => v,
        None => return Ok(None),
    };
    if t.is_zero() {
        return Ok(None);
    }
    let inv = t.inv()?;
    let diff = if q.is_positive() { t.sub(&inv) } else { inv.sub(&t) };
    Ok(Some(diff.scale(-1).mappr(epsilon, config::triground())?))
}

/// Hyperbolic tangent within epsilon.
pub fn tanh(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "tanh")?;
    let n = epsilon.ilog2()?;
    if n > 0 || q.is_zero() {
        return Ok(Rat::zero());
    }
    let n = -n;
    let aq = q.abs();
    let m = aq.mul(&log2_e()).to_i64();
    if m > 1 + n / 2 {
        // saturated at this precision
        return Ok(if q.is_negative() { Rat::neg_one() } else { Rat::one() });
    }
    let doubled = aq.scale(1);
    let t = match exprel(&doubled, 2 + n)? {
        Some(v) => v,
        None => return Ok(if q.is_negative() { Rat::neg_one() } else { Rat::one() }),
    };
    let val = if m > 1 + n / 4 {
        Rat::one().sub(&Rat::two().div(&t)?)
    } else {
        t.dec().div(&t.inc())?
    };
    let val = val.mappr(epsilon, config::triground())?;
    Ok(if q.is_negative() { val.negated() } else { val })
}

/// Hyperbolic cotangent within epsilon; the argument must be nonzero.
pub fn coth(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "coth")?;
    if q.is_zero() {
        return Err(MathError::ZeroArgument("coth"));
    }
    let doubled = q.scale(1).abs();
    let mut k = doubled.ilog2()?;
    let n = epsilon.ilog2()?;
    if k > 0 {
        k = log2_e().mul(&doubled).to_i64();
    } else {
        k *= 2;
    }
    let mut bits = 4 - k - n;
    if bits < 4 {
        bits = 4;
    }
    let t = match exprel(&doubled, bits)? {
        Some(v) => v,
        None => return Ok(if q.is_negative() { Rat::neg_one() } else { Rat::one() }),
    };
    let denom = t.dec();
    if denom.is_zero() {
        return Err(MathError::OutOfDomain("coth"));
    }
    let val = denom.inv()?.scale(1).inc();
    let val = if q.is_negative() { val.negated() } else { val };
    val.mappr(epsilon, config::triground())
}

/// Hyperbolic secant within epsilon.
pub fn sech(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "sech")?;
    if q.is_zero() {
        return Ok(Rat::one());
    }
    let aq = q.abs();
    let mut k: i64 = 0;
    if aq.num().cmp_abs(aq.den()).is_ge() {
        k = log2_e().mul(&aq).to_i64();
    }
    let n = epsilon.ilog2()?;
    if k + n > 1 {
        return Ok(Rat::zero());
    }
    let t = match exprel(&aq, 4 - k - n)? {
        Some(v) => v,
        None => return Ok(Rat::zero()),
    };
    let val = t.inv()?.add(&t).inv()?.scale(1);
    val.mappr(epsilon, config::triground())
}

/// Hyperbolic cosecant within epsilon; the argument must be nonzero.
pub fn csch(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "csch")?;
    if q.is_zero() {
        return Err(MathError::ZeroArgument("csch"));
    }
    let n = epsilon.ilog2()?;
    let aq = q.abs();
    let k = if aq.num().cmp_abs(aq.den()).is_ge() {
        log2_e().mul(&aq).to_i64()
    } else {
        2 * aq.ilog2()?
    };
    if k + n >= 1 {
        return Ok(Rat::zero());
    }
    let t = match exprel(&aq, 4 - k - n)? {
        Some(v) => v,
        None => return Ok(Rat::zero()),
    };
    let inv = t.inv()?;
    let diff = if q.is_negative() { inv.sub(&t) } else { t.sub(&inv) };
    if diff.is_zero() {
        return Err(MathError::OutOfDomain("csch"));
    }
    let val = diff.inv()?.scale(1);
    val.mappr(epsilon, config::triground())
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
    fn exp_known_values() {
        let eps = eps20();
        // e = 2.71828182845904523536...
        check(&exp(&Rat::one(), &eps).unwrap().unwrap(), "2.71828182845904523536", &eps);
        // e^2 = 7.38905609893065022723...
        check(&exp(&Rat::two(), &eps).unwrap().unwrap(), "7.38905609893065022723", &eps);
        // e^-1 = 0.36787944117144232160...
        check(
            &exp(&Rat::neg_one(), &eps).unwrap().unwrap(),
            "0.36787944117144232160",
            &eps,
        );
        assert_eq!(exp(&Rat::zero(), &eps).unwrap().unwrap(), Rat::one());
    }

    #[test]
    fn exp_of_tiny_value_vanishes() {
        // exp(-100) is far below 1e-20
        let r = exp(&Rat::from(-100i64), &eps20()).unwrap().unwrap();
        assert_eq!(r, Rat::zero());
    }

    #[test]
    fn exp_identity() {
        let eps = Rat::tenth_to(25);
        let a = exp(&Rat::half(), &eps).unwrap().unwrap();
        let b = exp(&Rat::one(), &eps).unwrap().unwrap();
        // exp(1/2)^2 is close to exp(1)
        assert!(a.square().sub(&b).abs().cmp(&Rat::tenth_to(20)).is_lt());
    }

    #[test]
    fn hyperbolics() {
        let eps = eps20();
        // cosh(1) = 1.54308063481524377848...
        check(
            &cosh(&Rat::one(), &eps).unwrap().unwrap(),
            "1.54308063481524377848",
            &eps,
        );
        // sinh(1) = 1.17520119364380145688...
        check(
            &sinh(&Rat::one(), &eps).unwrap().unwrap(),
            "1.17520119364380145688",
            &eps,
        );
        // tanh(1) = 0.76159415595576488812...
        check(&tanh(&Rat::one(), &eps).unwrap(), "0.76159415595576488812", &eps);
        // coth(1) = 1.31303528549933130364...
        check(&coth(&Rat::one(), &eps).unwrap(), "1.31303528549933130364", &eps);
        // sech(1) = 0.64805427366388539958...
        check(&sech(&Rat::one(), &eps).unwrap(), "0.64805427366388539958", &eps);
        // csch(1) = 0.85091812823932154513...
        check(&csch(&Rat::one(), &eps).unwrap(), "0.85091812823932154513", &eps);
    }

    #[test]
    fn hyperbolic_symmetry() {
        let eps = eps20();
        let q = Rat::ratio(3, 7).unwrap();
        assert_eq!(
            sinh(&q.negated(), &eps).unwrap().unwrap(),
            sinh(&q, &eps).unwrap().unwrap().negated()
        );
        assert_eq!(
            cosh(&q.negated(), &eps).unwrap().unwrap(),
            cosh(&q, &eps).unwrap().unwrap()
        );
        assert_eq!(
            tanh(&q.negated(), &eps).unwrap(),
            tanh(&q, &eps).unwrap().negated()
        );
    }

    #[test]
    fn cosh_sinh_identity() {
        // cosh^2 - sinh^2 = 1
        let eps = Rat::tenth_to(30);
        let q = Rat::ratio(5, 4).unwrap();
        let c = cosh(&q, &eps).unwrap().unwrap();
        let s = sinh(&q, &eps).unwrap().unwrap();
        let diff = c.square().sub(&s.square()).sub(&Rat::one());
        assert!(diff.abs().cmp(&Rat::tenth_to(27)).is_lt());
    }
}
