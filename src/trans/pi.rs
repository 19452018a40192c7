//! The constant pi and its degree / gradian quotients
//!
//! Computed from the Ramanujan-style sum
//!
//! ```text
//! pi = 1 / sum( comb(2N, N)^3 * (42N + 5) / 2^(12N + 4) )
//! ```
//!
//! Every term adds about six bits, the denominators are powers of two so
//! the partial sums are a shift and an add, and the combinatorials grow
//! by the recurrence `comb(2(N+1), N+1) = 2 comb(2N, N) (2N+1) / N`.
//! The last epsilon/value pair is cached, as are pi/180 and pi/200 for
//! the degree and gradian conversions.

use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::config;
use crate::error::Result;
use crate::global;
use crate::integer::Int;
use crate::rational::Rat;

use super::require_epsilon;

type PiCache = Option<(Rat, Rat)>;

static PI: Lazy<Mutex<PiCache>> = Lazy::new(|| Mutex::new(None));
static PI_DIV_180: Lazy<Mutex<PiCache>> = Lazy::new(|| Mutex::new(None));
static PI_DIV_200: Lazy<Mutex<PiCache>> = Lazy::new(|| Mutex::new(None));

fn cache_get(cache: &Mutex<PiCache>, eps: &Rat) -> Option<Rat> {
    let guard = global::lock(cache);
    match guard.as_ref() {
        Some((e, v)) if e == eps => Some(v.clone()),
        _ => None,
    }
}

fn cache_put(cache: &Mutex<PiCache>, eps: &Rat, v: &Rat) {
    let mut guard = global::lock(cache);
    *guard = Some((eps.clone(), v.clone()));
}

/// Pi within epsilon.
pub fn pi(epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "pi")?;
    if let Some(v) = cache_get(&PI, epsilon) {
        return Ok(v);
    }
    global::check_abort()?;
    tracing::debug!("recomputing pi for a new epsilon");

    let mut bits = -epsilon.ilog2()? + 4;
    if bits < 4 {
        bits = 4;
    }
    let mut comb = Int::one();
    let mut sum = Int::from(5u64);
    let mut n: i64 = 0;
    let mut shift: i64 = 4;
    loop {
        n += 1;
        let t = 1 + (n & 1);
        comb = comb.div_small(n / (3 - t))?.0;
        comb = comb.mul_small(t * (2 * n - 1));
        let cubed = comb.square().mul(&comb);
        let term = cubed.mul_small(42 * n + 5);
        sum = sum.shift(12).add(&term);
        shift += 12;
        let top = term.highbit() as i64;
        if shift - top >= bits {
            break;
        }
    }

    let inv = Rat::new(Int::bit_value(shift as u64), sum)?;
    let r = inv.mappr(epsilon, config::triground())?;
    cache_put(&PI, epsilon, &r);
    Ok(r)
}

/// Pi over 180, the degree-to-radian factor.
pub fn pi_div_180(epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "pi/180")?;
    if let Some(v) = cache_get(&PI_DIV_180, epsilon) {
        return Ok(v);
    }
    let v = pi(epsilon)?.div_int(180)?;
    cache_put(&PI_DIV_180, epsilon, &v);
    Ok(v)
}

/// Pi over 200, the gradian-to-radian factor.
pub fn pi_div_200(epsilon: &Rat) -> Result<Rat> {
    require_epsilon(epsilon, "pi/200")?;
    if let Some(v) = cache_get(&PI_DIV_200, epsilon) {
        return Ok(v);
    }
    let v = pi(epsilon)?.div_int(200)?;
    cache_put(&PI_DIV_200, epsilon, &v);
    Ok(v)
}
