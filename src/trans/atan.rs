//! Inverse trigonometric and inverse hyperbolic functions
//!
//! `atan` trades range for precision with four applications of
//! `atan(x) = 2 atan(x / (1 + sqrt(1 + x^2)))`, then sums the
//! alternating series `x - x^3/3 + x^5/5 - ...` in scaled integers.
//! `asin` and `acos` reduce to `atan` through the right-triangle
//! identities; they return `None` outside `[-1, 1]`, where the value is
//! complex.  The inverse hyperbolics ride on `ln` and `sqrt`.

use crate::config;
use crate::error::{MathError, Result};
use crate::global;
use crate::integer::Int;
use crate::limb::BASE;
use crate::rational::Rat;

use super::{ln, pi, require_epsilon, sqrt};

/// Arctangent within epsilon.
pub fn atan(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "arctangent")?;
    if q.is_zero() {
        return Ok(Rat::zero());
    }
    global::check_abort()?;

    let mut m = 12 - epsilon.ilog2()?; // 4 bits for 4 doublings, 8 for rounding
    if m < 8 {
        m = 8;
    }
    let scaled = q.scale(m);
    let mut x = scaled.num().quo(scaled.den(), config::triground())?;
    let d = Int::bit_value(m as u64);
    let dd = d.square();

    // halve the angle four times
    for _ in 0..4 {
        if x.is_zero() {
            break;
        }
        let hyp = x.square().add(&dd).isqrt_round(config::triground())?.0;
        let den = hyp.add(&d);
        x = x.shift(m).quo(&den, config::triground())?;
    }
    if x.is_zero() {
        return Ok(Rat::zero());
    }

    let mut sum = x.clone();
    let mul = x.square().shift(-m);
    let mut dterm: u64 = 3;
    let mut sign = !x.is_negative();
    loop {
        if dterm > BASE {
            return Err(MathError::TooLarge("Too many terms required for atan"));
        }
        x = x.mul(&mul).shift(-m);
        let term = x.div_small(dterm as i64)?.0;
        if term.is_zero() {
            break;
        }
        let term = term.abs().with_sign(sign);
        sum = sum.add(&term);
        sign = !sign;
        dterm += 2;
    }

    let low = sum.lowbit() as i64;
    let num = if low != 0 { sum.shift(-low) } else { sum };
    let val = Rat::from_parts_unchecked(num, Int::bit_value((m - 4 - low).max(0) as u64));
    val.mappr(epsilon, config::triground())
}

/// Arcsine within epsilon; `None` outside `[-1, 1]`.
pub fn asin(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "asin")?;
    if q.is_zero() {
        return Ok(Some(Rat::zero()));
    }
    let neg = q.is_negative();
    match q.num().cmp_abs(q.den()) {
        std::cmp::Ordering::Greater => Ok(None),
        std::cmp::Ordering::Equal => {
            // asin(+-1) = +-pi/2
            let eps1 = epsilon.scale(1);
            let half_pi = pi(&eps1)?.scale(-1);
            Ok(Some(if neg { half_pi.negated() } else { half_pi }))
        }
        std::cmp::Ordering::Less => {
            // atan(q / sqrt(1 - q^2))
            let eps1 = epsilon.scale(-2);
            let num = q.num().square();
            let den = q.den().square().sub(&num);
            let ratio = Rat::from_parts_unchecked(num, den);
            let leg = sqrt(&ratio, &eps1, config::triground())?;
            let val = atan(&leg, epsilon)?;
            Ok(Some(if neg { val.negated() } else { val }))
        }
    }
}

/// Arccosine within epsilon; `None` outside `[-1, 1]`.
pub fn acos(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "acos")?;
    if q.is_one() {
        return Ok(Some(Rat::zero()));
    }
    if q.is_neg_one() {
        return Ok(Some(pi(epsilon)?));
    }
    if q.num().cmp_abs(q.den()).is_gt() {
        return Ok(None);
    }
    // acos(x) = 2 atan(sqrt((1 - x) / (1 + x)))
    let eps1 = epsilon.scale(-3);
    let num = q.den().sub(q.num());
    let den = q.den().add(q.num());
    let arg = Rat::new(num, den)?;
    let leg = sqrt(&arg, &eps1, config::triground())?;
    let eps1 = epsilon.scale(-1);
    let val = atan(&leg, &eps1)?;
    Ok(Some(val.scale(1)))
}

/// Inverse secant; `None` for arguments inside `(-1, 1)`.
pub fn asec(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "asec")?;
    if q.is_zero() {
        return Ok(None);
    }
    acos(&q.inv()?, epsilon)
}

/// Inverse cosecant; `None` for arguments inside `(-1, 1)`.
pub fn acsc(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "acsc")?;
    if q.is_zero() {
        return Ok(None);
    }
    asin(&q.inv()?, epsilon)
}

/// Inverse cotangent, continuous and positive on all of the reals.
pub fn acot(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "acot")?;
    if q.is_zero() {
        let eps1 = epsilon.scale(1);
        return Ok(pi(&eps1)?.scale(-1));
    }
    let inv = q.inv()?;
    if !q.is_negative() {
        return atan(&inv, epsilon);
    }
    let eps1 = epsilon.scale(-2);
    let t = atan(&inv, &eps1)?;
    let p = pi(&eps1)?;
    p.add(&t).mappr(epsilon, config::triground())
}

/// The angle of the point `(x, y)`, in `(-pi, pi]`.
pub fn atan2(y: &Rat, x: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "atan2")?;
    if y.is_zero() && x.is_zero() {
        return Ok(Rat::zero());
    }
    if y.is_zero() && x.is_negative() {
        return pi(epsilon);
    }
    if x.is_positive() {
        if y.is_zero() {
            return Ok(Rat::zero());
        }
        return atan(&y.div(x)?, epsilon);
    }
    // left half plane: atan2(y, x) = 2 atan(sgn(y) sqrt((x/y)^2 + 1) - x/y)
    let eps2 = epsilon.scale(-4);
    let ratio = x.div(y)?;
    let hyp_arg = ratio.square().add(&Rat::one());
    let rnd = crate::round::Round::NEAREST_EVEN.or(if y.is_negative() {
        crate::round::Round::NEGATIVE_ROOT
    } else {
        crate::round::Round::DOWN
    });
    let hyp = sqrt(&hyp_arg, &eps2, rnd)?;
    let arg = hyp.sub(&ratio);
    let eps2 = epsilon.scale(-1);
    Ok(atan(&arg, &eps2)?.scale(1))
}

/// Inverse hyperbolic cosine; `None` below one.
pub fn acosh(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "acosh")?;
    if q.is_one() {
        return Ok(Some(Rat::zero()));
    }
    if q.num().cmp_abs(q.den()).is_lt() || q.is_negative() {
        return Ok(None);
    }
    let n = epsilon.ilog2()?;
    let eps1 = Rat::power_of_two(n - 3);
    let t = q.square().dec();
    let root = sqrt(&t, &eps1, config::triground())?;
    let val = ln(&root.add(q), &eps1)?;
    Ok(Some(val.mappr(epsilon, config::triground())?))
}

/// Inverse hyperbolic sine.
pub fn asinh(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "asinh")?;
    if q.is_zero() {
        return Ok(Rat::zero());
    }
    let neg = q.is_negative();
    let aq = q.abs();
    let n = epsilon.ilog2()?;
    let eps1 = Rat::power_of_two(n - 3);
    let t = aq.square().inc();
    let root = sqrt(&t, &eps1, config::triground())?;
    let val = ln(&root.add(&aq), &eps1)?;
    let val = val.mappr(epsilon, config::triground())?;
    Ok(if neg { val.negated() } else { val })
}

/// Inverse hyperbolic tangent; `None` outside `(-1, 1)`.
pub fn atanh(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "atanh")?;
    if q.is_zero() {
        return Ok(Some(Rat::zero()));
    }
    if q.num().cmp_abs(q.den()).is_ge() {
        return Ok(None);
    }
    let num = q.inc();
    let den = Rat::one().sub(q);
    let ratio = num.div(&den)?;
    let eps1 = epsilon.scale(1);
    Ok(Some(ln(&ratio, &eps1)?.scale(-1)))
}

/// Inverse hyperbolic secant; `None` outside `(0, 1]`.
pub fn asech(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "asech")?;
    if q.is_zero() {
        return Ok(None);
    }
    acosh(&q.inv()?, epsilon)
}

/// Inverse hyperbolic cosecant; zero has no value.
pub fn acsch(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "acsch")?;
    if q.is_zero() {
        return Ok(None);
    }
    Ok(Some(asinh(&q.inv()?, epsilon)?))
}

/// Inverse hyperbolic cotangent; `None` inside `[-1, 1]`.
pub fn acoth(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "acoth")?;
    if q.is_zero() {
        return Ok(None);
    }
    atanh(&q.inv()?, epsilon)
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
            value.sub(&want).abs().cmp(&eps.scale(2)).is_le(),
            "got {value}, wanted about {want}"
        );
    }

    #[test]
    fn atan_known_values() {
        let eps = eps20();
        // atan(1) = pi/4 = 0.78539816339744830961...
        check(&atan(&Rat::one(), &eps).unwrap(), "0.78539816339744830961", &eps);
        // atan(1/2) = 0.46364760900080611621...
        check(&atan(&Rat::half(), &eps).unwrap(), "0.46364760900080611621", &eps);
        assert_eq!(
            atan(&Rat::neg_one(), &eps).unwrap(),
            atan(&Rat::one(), &eps).unwrap().negated()
        );
    }

    #[test]
    fn asin_acos_domain() {
        let eps = eps20();
        assert!(asin(&Rat::two(), &eps).unwrap().is_none());
        assert!(acos(&Rat::from(-2i64), &eps).unwrap().is_none());
        // asin(1/2) = pi/6 = 0.52359877559829887307...
        check(
            &asin(&Rat::half(), &eps).unwrap().unwrap(),
            "0.52359877559829887307",
            &eps,
        );
        // acos(1/2) = pi/3 = 1.04719755119659774615...
        check(
            &acos(&Rat::half(), &eps).unwrap().unwrap(),
            "1.04719755119659774615",
            &eps,
        );
        assert_eq!(acos(&Rat::one(), &eps).unwrap().unwrap(), Rat::zero());
    }

    #[test]
    fn atan2_quadrants() {
        let eps = eps20();
        // atan2(1, 1) = pi/4
        check(
            &atan2(&Rat::one(), &Rat::one(), &eps).unwrap(),
            "0.78539816339744830961",
            &eps,
        );
        // atan2(1, -1) = 3 pi/4 = 2.35619449019234492884...
        check(
            &atan2(&Rat::one(), &Rat::neg_one(), &eps).unwrap(),
            "2.35619449019234492884",
            &eps,
        );
        // atan2(-1, -1) = -3 pi/4
        check(
            &atan2(&Rat::neg_one(), &Rat::neg_one(), &eps).unwrap(),
            "-2.35619449019234492884",
            &eps,
        );
        // on the negative real axis the angle is pi
        check(
            &atan2(&Rat::zero(), &Rat::neg_one(), &eps).unwrap(),
            "3.14159265358979323846",
            &eps,
        );
        assert_eq!(atan2(&Rat::zero(), &Rat::zero(), &eps).unwrap(), Rat::zero());
    }

    #[test]
    fn inverse_hyperbolics() {
        let eps = eps20();
        // acosh(2) = 1.31695789692481670862...
        check(
            &acosh(&Rat::two(), &eps).unwrap().unwrap(),
            "1.31695789692481670862",
            &eps,
        );
        assert!(acosh(&Rat::half(), &eps).unwrap().is_none());
        // asinh(1) = 0.88137358701954302523...
        check(&asinh(&Rat::one(), &eps).unwrap(), "0.88137358701954302523", &eps);
        // atanh(1/2) = 0.54930614433405484570...
        check(
            &atanh(&Rat::half(), &eps).unwrap().unwrap(),
            "0.54930614433405484570",
            &eps,
        );
        assert!(atanh(&Rat::one(), &eps).unwrap().is_none());
        assert!(acoth(&Rat::half(), &eps).unwrap().is_none());
    }
}
