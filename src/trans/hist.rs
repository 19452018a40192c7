//! Historical trigonometric functions
//!
//! The versed, coversed, half-versed, exsecant and chord functions, with
//! their inverses.  Each is a one-identity composition of the core six:
//!
//! | function | identity | inverse |
//! |---|---|---|
//! | `versin` | `1 - cos x` | `acos(1 - x)` |
//! | `coversin` | `1 - sin x` | `asin(1 - x)` |
//! | `vercos` | `1 + cos x` | `acos(x - 1)` |
//! | `covercos` | `1 + sin x` | `asin(x - 1)` |
//! | `haversin` | `versin(x)/2` | `acos(1 - 2x)` |
//! | `hacoversin` | `coversin(x)/2` | `asin(1 - 2x)` |
//! | `havercos` | `vercos(x)/2` | `acos(2x - 1)` |
//! | `hacovercos` | `covercos(x)/2` | `asin(2x - 1)` |
//! | `exsec` | `sec(x) - 1` | `asec(x + 1)` |
//! | `excsc` | `csc(x) - 1` | `acsc(x + 1)` |
//! | `crd` | `2 sin(x/2)` | `2 asin(x/2)` |
//! | `cas` | `cos x + sin x` | — |
//!
//! The `_or_none` inverse forms return `Ok(None)` where the value leaves
//! the real domain; the plain forms turn that into a domain error.

use crate::error::{MathError, Result};
use crate::rational::Rat;

use super::{acos, acsc, asec, asin, cos, csc, require_epsilon, sec, sin, sincos};
use crate::config;

fn demand(v: Option<Rat>, what: &'static str) -> Result<Rat> {
    v.ok_or(MathError::OutOfDomain(what))
}

/// Versed sine: `1 - cos(q)`.
pub fn versin(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "versin")?;
    Ok(Rat::one().sub(&cos(q, epsilon)?))
}

/// Inverse versed sine, or `None` outside the real domain.
pub fn aversin_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "aversin")?;
    acos(&Rat::one().sub(q), epsilon)
}

/// Inverse versed sine.
pub fn aversin(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(aversin_or_none(q, epsilon)?, "aversin")
}

/// Coversed sine: `1 - sin(q)`.
pub fn coversin(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "coversin")?;
    Ok(Rat::one().sub(&sin(q, epsilon)?))
}

/// Inverse coversed sine, or `None` outside the real domain.
pub fn acoversin_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "acoversin")?;
    asin(&Rat::one().sub(q), epsilon)
}

/// Inverse coversed sine.
pub fn acoversin(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(acoversin_or_none(q, epsilon)?, "acoversin")
}

/// Versed cosine: `1 + cos(q)`.
pub fn vercos(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "vercos")?;
    Ok(Rat::one().add(&cos(q, epsilon)?))
}

/// Inverse versed cosine, or `None` outside the real domain.
pub fn avercos_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "avercos")?;
    acos(&q.sub(&Rat::one()), epsilon)
}

/// Inverse versed cosine.
pub fn avercos(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(avercos_or_none(q, epsilon)?, "avercos")
}

/// Coversed cosine: `1 + sin(q)`.
pub fn covercos(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "covercos")?;
    Ok(Rat::one().add(&sin(q, epsilon)?))
}

/// Inverse coversed cosine, or `None` outside the real domain.
pub fn acovercos_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "acovercos")?;
    asin(&q.sub(&Rat::one()), epsilon)
}

/// Inverse coversed cosine.
pub fn acovercos(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(acovercos_or_none(q, epsilon)?, "acovercos")
}

/// Half versed sine: `(1 - cos(q)) / 2`.
pub fn haversin(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "haversin")?;
    Ok(versin(q, epsilon)?.scale(-1))
}

/// Inverse half versed sine, or `None` outside the real domain.
pub fn ahaversin_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "ahaversin")?;
    acos(&Rat::one().sub(&q.scale(1)), epsilon)
}

/// Inverse half versed sine.
pub fn ahaversin(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(ahaversin_or_none(q, epsilon)?, "ahaversin")
}

/// Half coversed sine: `(1 - sin(q)) / 2`.
pub fn hacoversin(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "hacoversin")?;
    Ok(coversin(q, epsilon)?.scale(-1))
}

/// Inverse half coversed sine, or `None` outside the real domain.
pub fn ahacoversin_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "ahacoversin")?;
    asin(&Rat::one().sub(&q.scale(1)), epsilon)
}

/// Inverse half coversed sine.
pub fn ahacoversin(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(ahacoversin_or_none(q, epsilon)?, "ahacoversin")
}

/// Half versed cosine: `(1 + cos(q)) / 2`.
pub fn havercos(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "havercos")?;
    Ok(vercos(q, epsilon)?.scale(-1))
}

/// Inverse half versed cosine, or `None` outside the real domain.
pub fn ahavercos_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "ahavercos")?;
    acos(&q.scale(1).sub(&Rat::one()), epsilon)
}

/// Inverse half versed cosine.
pub fn ahavercos(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(ahavercos_or_none(q, epsilon)?, "ahavercos")
}

/// Half coversed cosine: `(1 + sin(q)) / 2`.
pub fn hacovercos(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "hacovercos")?;
    Ok(covercos(q, epsilon)?.scale(-1))
}

/// Inverse half coversed cosine, or `None` outside the real domain.
pub fn ahacovercos_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "ahacovercos")?;
    asin(&q.scale(1).sub(&Rat::one()), epsilon)
}

/// Inverse half coversed cosine.
pub fn ahacovercos(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(ahacovercos_or_none(q, epsilon)?, "ahacovercos")
}

/// Exsecant: `sec(q) - 1`.
pub fn exsec(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "exsec")?;
    Ok(sec(q, epsilon)?.sub(&Rat::one()))
}

/// Inverse exsecant, or `None` outside the real domain.
pub fn aexsec_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "aexsec")?;
    asec(&q.add(&Rat::one()), epsilon)
}

/// Inverse exsecant.
pub fn aexsec(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(aexsec_or_none(q, epsilon)?, "aexsec")
}

/// Excosecant: `csc(q) - 1`.
pub fn excsc(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "excsc")?;
    Ok(csc(q, epsilon)?.sub(&Rat::one()))
}

/// Inverse excosecant, or `None` outside the real domain.
pub fn aexcsc_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "aexcsc")?;
    acsc(&q.add(&Rat::one()), epsilon)
}

/// Inverse excosecant.
pub fn aexcsc(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(aexcsc_or_none(q, epsilon)?, "aexcsc")
}

/// Chord of an angle: `2 sin(q / 2)`.
pub fn crd(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "crd")?;
    Ok(sin(&q.scale(-1), epsilon)?.scale(1))
}

/// Inverse chord, or `None` outside the real domain.
pub fn acrd_or_none(q: &Rat, epsilon: &Rat) -> Result<Option<Rat>> {
    require_epsilon(epsilon, "acrd")?;
    Ok(asin(&q.scale(-1), epsilon)?.map(|v| v.scale(1)))
}

/// Inverse chord.
pub fn acrd(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    demand(acrd_or_none(q, epsilon)?, "acrd")
}

/// Cosine-and-sine: `cos(q) + sin(q)`.
pub fn cas(q: &Rat, epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "cas")?;
    let n = -epsilon.ilog2()?;
    if n < 0 {
        return Ok(Rat::zero());
    }
    let (s, c) = sincos(q, n + 2)?;
    c.add(&s).mappr(epsilon, config::triground())
}
