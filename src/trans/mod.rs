//! Transcendental functions to a caller-supplied error bound
//!
//! Every routine here takes a positive rational `epsilon` and returns a
//! rational within `epsilon` of the true value (the configured
//! `triground` tightens several of them to half that).  Internally each
//! function picks a working precision in bits, evaluates a scaled
//! integer series, and hands the result to the nearest-multiple
//! approximation for the final rounding.
//!
//! Functions whose true value exists but is not a real rational — the
//! inverse trigonometric functions outside `[-1, 1]`, exponentials past
//! the working-precision ceiling — return `Ok(None)`; the complex layer
//! above this crate picks those up.

use crate::error::{MathError, Result};
use crate::rational::Rat;

mod atan;
mod exp;
mod hist;
mod ln;
mod pi;
mod sincos;
mod sqrt;

pub use atan::{
    acos, acosh, acot, acoth, acsc, acsch, asec, asech, asin, asinh, atan, atan2, atanh,
};
pub use exp::{cosh, coth, csch, exp, sech, sinh, tanh};
pub use hist::{
    acoversin, acoversin_or_none, acovercos, acovercos_or_none, acrd, acrd_or_none, aexcsc,
    aexcsc_or_none, aexsec, aexsec_or_none, ahacoversin, ahacoversin_or_none, ahacovercos,
    ahacovercos_or_none, ahaversin, ahaversin_or_none, ahavercos, ahavercos_or_none, aversin,
    aversin_or_none, avercos, avercos_or_none, cas, covercos, coversin, crd, excsc, exsec,
    hacovercos, hacoversin, havercos, haversin, vercos, versin,
};
pub use ln::{ln, log, log2, logn};
pub use pi::{pi, pi_div_180, pi_div_200};
pub use sincos::{cos, cot, csc, sec, sin, sincos, tan};
pub use sqrt::{hypot, leg_to_leg, power, root, sqrt};

pub(crate) use exp::exprel;

/// Rejects non-positive error bounds.
pub(crate) fn require_epsilon(eps: &Rat, what: &'static str) -> Result<()> {
    if eps.is_zero() || eps.is_negative() {
        return Err(MathError::InvalidEpsilon(what));
    }
    Ok(())
}

/// Integer square root of a bit budget; used to balance reduction steps
/// against series length.
pub(crate) fn budget_sqrt(k: i64) -> i64 {
    if k <= 0 {
        return 0;
    }
    let mut s = k;
    loop {
        let t = s;
        s = (s + k / s) / 2;
        if t <= s {
            return t;
        }
    }
}
