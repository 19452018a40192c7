//! Small-prime tables and probabilistic primality testing
//!
//! Three layers cooperate here:
//!
//! - a bitmap of the odd numbers below 2^16, sieved once at first use,
//!   answering primality below 65536 in one lookup and supplying the
//!   6541 odd trial-division primes;
//! - a jump table over the wheel modulo 2·3·5·7·11, stepping search
//!   candidates straight to the next value with no trivial factor;
//! - Miller–Rabin rounds with three witness policies (random, successive
//!   primes, consecutive integers), run in Montgomery form when the
//!   modulus is small enough for the fused REDC primitives.
//!
//! Primality below 2^32 is decided exactly: bitmap below 2^16, trial
//! division by the mapped primes above.

use once_cell::sync::Lazy;

use crate::error::{MathError, Result};
use crate::global;
use crate::modular::redc::Redc;
use crate::round::Round;
use crate::{config, rng};

use super::Int;

/// Largest prime covered by the odd bitmap.
pub const MAX_MAP_PRIME: u64 = 65_521;
/// Largest value covered by the odd bitmap.
pub const MAX_MAP_VAL: u64 = 65_535;
/// Largest 32-bit prime.
pub const MAX_SM_PRIME: u64 = 0xffff_fffb;
/// Smallest prime above the bitmap.
pub const NXT_MAP_PRIME: u64 = 65_537;

/// Trial-divide up to this bound before running probabilistic rounds.
const PTEST_PRECHECK: u64 = 101;

/// Product of the odd trivial primes; the wheel the jump table lives on.
const JMPMOD: u64 = 3 * 5 * 7 * 11;
/// Number of wheel residues with no trivial factor.
const JMPSIZE: usize = 2 * 4 * 6 * 10;

struct PrimeTables {
    /// Bit per odd value below 2^16.
    map: [u8; 4096],
    /// The odd primes 3..=65521.
    primes: Vec<u32>,
    /// Offset to the next wheel value with no trivial factor (positive),
    /// or minus the jump index for values already on the wheel.
    jmpindx: [i16; JMPMOD as usize],
    /// Gaps between successive wheel values.
    jmp: [u8; JMPSIZE],
}

static TABLES: Lazy<PrimeTables> = Lazy::new(|| {
    // sieve the odds below 2^16
    let mut map = [0u8; 4096];
    let mut is_prime = vec![true; 65536 / 2]; // index i is the odd 2i+1
    is_prime[0] = false; // 1
    let mut p = 3u64;
    while p * p <= MAX_MAP_VAL {
        if is_prime[(p >> 1) as usize] {
            let mut q = p * p;
            while q <= MAX_MAP_VAL {
                is_prime[(q >> 1) as usize] = false;
                q += 2 * p;
            }
        }
        p += 2;
    }
    let mut primes = Vec::with_capacity(6541);
    for i in 1..is_prime.len() {
        if is_prime[i] {
            let n = (2 * i + 1) as u64;
            map[(n >> 4) as usize] |= 1 << ((n >> 1) & 7);
            primes.push(n as u32);
        }
    }

    // wheel residues coprime to 3*5*7*11, and the gaps between them
    let mut wheel = Vec::with_capacity(JMPSIZE);
    for x in (1..2 * JMPMOD).step_by(2) {
        if x % 3 != 0 && x % 5 != 0 && x % 7 != 0 && x % 11 != 0 {
            wheel.push(x);
        }
    }
    let mut jmp = [0u8; JMPSIZE];
    for i in 0..JMPSIZE {
        let next = if i + 1 < JMPSIZE { wheel[i + 1] } else { wheel[0] + 2 * JMPMOD };
        jmp[i] = (next - wheel[i]) as u8;
    }
    let mut jmpindx = [0i16; JMPMOD as usize];
    for x in (1..2 * JMPMOD).step_by(2) {
        let y = (x >> 1) as usize;
        match wheel.binary_search(&x) {
            Ok(i) => jmpindx[y] = -(i as i16),
            Err(i) => {
                let next = if i < JMPSIZE { wheel[i] } else { wheel[0] + 2 * JMPMOD };
                jmpindx[y] = (next - x) as i16;
            }
        }
    }
    tracing::debug!(primes = primes.len(), "sieved small prime tables");
    PrimeTables { map, primes, jmpindx, jmp }
});

impl PrimeTables {
    /// Bitmap test; `n` must be odd and within the map.
    #[inline]
    fn map_bit(&self, n: u64) -> bool {
        self.map[(n >> 4) as usize] & (1 << ((n >> 1) & 7)) != 0
    }
}

/// Cursor into the wheel gap table.
struct JumpWalk {
    pos: usize,
}

impl JumpWalk {
    /// Positions the cursor at `x`, which must have no trivial factor.
    fn at(tables: &PrimeTables, x: u64) -> JumpWalk {
        JumpWalk { pos: (-tables.jmpindx[((x >> 1) % JMPMOD) as usize]) as usize }
    }

    fn next_gap(&mut self, tables: &PrimeTables) -> u64 {
        let g = tables.jmp[self.pos];
        self.pos = if self.pos + 1 < JMPSIZE { self.pos + 1 } else { 0 };
        g as u64
    }

    fn prev_gap(&mut self, tables: &PrimeTables) -> u64 {
        self.pos = if self.pos == 0 { JMPSIZE - 1 } else { self.pos - 1 };
        tables.jmp[self.pos] as u64
    }
}

/// Smallest wheel value at or above `x` (x odd).
fn first_jump(tables: &PrimeTables, x: u64) -> u64 {
    let t = tables.jmpindx[((x >> 1) % JMPMOD) as usize];
    if t > 0 { x + t as u64 } else { x }
}

/// Integer square root of a machine word.
pub(crate) fn fsqrt(v: u64) -> u64 {
    if v == 0 {
        return 0;
    }
    let bits = 64 - v.leading_zeros() as u64;
    let mut x = 1u64 << bits.div_ceil(2);
    loop {
        let y = (x + v / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Exact primality for a 32-bit value.
fn is_prime32(n: u64) -> bool {
    debug_assert!(n < 1 << 32);
    let t = &*TABLES;
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    if n <= MAX_MAP_VAL {
        return t.map_bit(n);
    }
    let isqr = fsqrt(n);
    for &p in &t.primes {
        if p as u64 > isqr {
            return true;
        }
        if n % p as u64 == 0 {
            return false;
        }
    }
    true
}

/// Smallest prime above `n`; assumes `2 <= n < 2^32 - 5`.
pub fn next_prime32(n: u64) -> u64 {
    let t = &*TABLES;
    let mut n = if n & 1 != 0 { n + 2 } else { n + 1 };
    if n <= MAX_MAP_PRIME {
        while !t.map_bit(n) {
            n += 2;
        }
        return n;
    }
    let mut isqr = fsqrt(n) + 1;
    if isqr & 1 == 0 {
        isqr -= 1;
    }
    n = first_jump(t, n);
    let mut walk = JumpWalk::at(t, n);
    loop {
        let mut composite = false;
        for &p in &t.primes[4..] {
            if p as u64 > isqr {
                break;
            }
            if n % p as u64 == 0 {
                composite = true;
                break;
            }
        }
        if !composite {
            return n;
        }
        n += walk.next_gap(t);
    }
}

/// Number of primes at or below `x`, for `x` below 2^32.
pub fn pix(x: u64) -> Option<u64> {
    if x >= 1 << 32 {
        return None;
    }
    if x < 2 {
        return Some(0);
    }
    let t = &*TABLES;
    let mut count: u64 = 1; // the prime 2
    for &p in &t.primes {
        if p as u64 > x {
            return Some(count);
        }
        count += 1;
    }
    if x < NXT_MAP_PRIME {
        return Some(count);
    }
    // segmented sieve over the odd values above the bitmap
    let mut lo = MAX_MAP_VAL + 2; // odd
    let mut flags = vec![true; 1 << 15];
    while lo <= x {
        let mut hi = (lo + (1 << 16) - 1).min(x);
        if hi & 1 == 0 {
            hi -= 1;
        }
        let span = ((hi - lo) / 2 + 1) as usize;
        for f in flags.iter_mut().take(span) {
            *f = true;
        }
        let limit = fsqrt(hi);
        for &p in &t.primes {
            let p = p as u64;
            if p > limit {
                break;
            }
            let mut start = lo.next_multiple_of(p);
            if start & 1 == 0 {
                start += p;
            }
            let mut q = start.max(p * p);
            if q & 1 == 0 {
                q += p;
            }
            while q <= hi {
                flags[((q - lo) / 2) as usize] = false;
                q += 2 * p;
            }
        }
        count += flags[..span].iter().filter(|&&f| f).count() as u64;
        lo = hi + 2;
    }
    Some(count)
}

impl Int {
    /// Exact primality for values below 2^32; `None` for larger values.
    pub fn is_small_prime(&self) -> Option<bool> {
        let z = self.abs();
        if z.is_abs_le_one() {
            return Some(false);
        }
        if z.is_even() {
            return Some(z.is_abs_two());
        }
        if z.ge_pow2(32) {
            return None;
        }
        Some(is_prime32(z.to_u64()))
    }

    /// Smallest 32-bit prime above `|self|`, or `None` when the search
    /// point or the answer leaves the 32-bit range.
    pub fn next_small_prime(&self) -> Option<u64> {
        let z = self.abs();
        if z.ge_pow2(32) {
            return None;
        }
        if z.is_abs_le_one() {
            return Some(2);
        }
        let n = z.to_u64();
        if n >= MAX_SM_PRIME {
            return None;
        }
        Some(next_prime32(n))
    }

    /// Greatest prime below `|self|`, or `None` when out of range.
    pub fn prev_small_prime(&self) -> Option<u64> {
        let z = self.abs();
        if z.ge_pow2(32) {
            return None;
        }
        let n = z.to_u64();
        match n {
            0..=2 => return None,
            3 => return Some(2),
            _ => {}
        }
        let t = &*TABLES;
        if n > NXT_MAP_PRIME {
            let mut n = if n & 1 != 0 { n - 2 } else { n - 1 };
            let mut isqr = fsqrt(n) + 1;
            if isqr & 1 == 0 {
                isqr -= 1;
            }
            let indx = t.jmpindx[((n >> 1) % JMPMOD) as usize];
            let mut walk;
            if indx >= 0 {
                // step up onto the wheel, then back one gap
                let up = n + indx as u64;
                walk = JumpWalk::at(t, up);
                n = up - walk.prev_gap(t);
            } else {
                walk = JumpWalk::at(t, n);
            }
            loop {
                let mut composite = false;
                for &p in &t.primes {
                    if p as u64 > isqr {
                        break;
                    }
                    if n % p as u64 == 0 {
                        composite = true;
                        break;
                    }
                }
                if !composite {
                    return Some(n);
                }
                n -= walk.prev_gap(t);
            }
        } else if n <= MAX_MAP_PRIME {
            let mut n = if n & 1 != 0 { n - 2 } else { n - 1 };
            while !t.map_bit(n) {
                n -= 2;
            }
            Some(n)
        } else {
            Some(MAX_MAP_PRIME)
        }
    }

    /// Smallest prime factor of `|self|` not above `limit`, if any.
    ///
    /// The value itself is never reported as its own factor.
    pub fn small_factor(&self, limit: u64) -> Option<u64> {
        let z = self.abs();
        if limit < 2 || limit >= 1 << 32 {
            return None;
        }
        if z.is_even() {
            return if z.is_abs_two() { None } else { Some(2) };
        }
        if limit == 2 {
            return None;
        }
        let mut limit = if limit & 1 == 0 { limit - 1 } else { limit };
        let t = &*TABLES;

        if z.limb_len() <= 2 {
            let val = z.to_u64();
            if val <= MAX_MAP_PRIME && t.map_bit(val) {
                return None;
            }
            let isqr = fsqrt(val);
            if limit > isqr {
                limit = if isqr & 1 != 0 { isqr } else { isqr.saturating_sub(1) };
            }
            for &p in &t.primes {
                if p as u64 > limit {
                    return None;
                }
                if val % p as u64 == 0 {
                    return Some(p as u64);
                }
            }
            let mut f = NXT_MAP_PRIME;
            let mut walk = JumpWalk::at(t, f);
            while f <= limit {
                if val % f == 0 {
                    return Some(f);
                }
                f += walk.next_gap(t);
            }
            return None;
        }

        // large value: bound the search by its square root when that is
        // small enough to know
        let mut factlim = if z.ge_pow2(64) {
            MAX_SM_PRIME - 1
        } else {
            fsqrt(z.to_u64()).min(MAX_SM_PRIME - 1)
        };
        if factlim > limit {
            factlim = limit;
        }
        for &p in &t.primes {
            if p as u64 > factlim {
                return None;
            }
            if z.mod_small(p as i64).unwrap_or(1) == 0 {
                return Some(p as u64);
            }
        }
        let mut f = NXT_MAP_PRIME;
        let mut walk = JumpWalk::at(t, f);
        while f <= factlim {
            if z.mod_small(f as i64).unwrap_or(1) == 0 {
                return Some(f);
            }
            f += walk.next_gap(t);
        }
        None
    }

    /// Smallest prime factor among the first `count` primes; one if none
    /// divides.
    pub fn low_factor(&self, count: u64) -> u64 {
        let z = self.abs();
        if count == 0 || z.is_abs_le_one() || z.is_abs_two() {
            return 1;
        }
        if z.is_even() {
            return 2;
        }
        if count <= 1 {
            return 1;
        }
        let t = &*TABLES;
        let factlim = if z.ge_pow2(64) {
            MAX_SM_PRIME - 1
        } else {
            fsqrt(z.to_u64()).min(MAX_SM_PRIME - 1)
        };
        let mut remaining = count - 1;
        for &p in &t.primes {
            if remaining == 0 || p as u64 > factlim {
                return 1;
            }
            if z.mod_small(p as i64).unwrap_or(1) == 0 {
                return p as u64;
            }
            remaining -= 1;
        }
        let mut f = NXT_MAP_PRIME;
        let mut walk = JumpWalk::at(t, f);
        while remaining > 0 && f <= factlim {
            if z.mod_small(f as i64).unwrap_or(1) == 0 {
                return f;
            }
            f += walk.next_gap(t);
            remaining -= 1;
        }
        1
    }

    /// Probabilistic primality test (Miller–Rabin).
    ///
    /// `|count|` rounds are run; a negative `count` skips the
    /// trial-division precheck.  Witness selection follows `skip`:
    /// zero draws uniformly from the generator, one walks the primes
    /// 2, 3, 5, …, anything else walks consecutive integers starting at
    /// `skip mod self`.  A false return is conclusive; a true return
    /// means no round found a witness.
    pub fn ptest(&self, count: i64, skip: &Int) -> Result<bool> {
        global::check_abort()?;
        let z = self.abs();
        if z.is_abs_le_one() {
            return Ok(false);
        }
        if z.is_even() {
            return Ok(z.is_abs_two());
        }
        if z.is_tiny() && z.limbs[0] == 3 {
            return Ok(true);
        }
        let mut count = count;
        if count >= 0 {
            if !z.ge_pow2(32) {
                return Ok(is_prime32(z.to_u64()));
            }
            if z.small_factor(PTEST_PRECHECK).is_some() {
                return Ok(false);
            }
            if count == 0 {
                return Ok(true);
            }
        } else {
            count = -count;
        }
        if z.limb_len() < config::redc_threshold() {
            return z.redc_ptest(count as u64, skip);
        }

        let zm1 = z.dec();
        let ik = zm1.lowbit();
        let z1 = zm1.shift(-(ik as i64));
        let witnesses = WitnessIter::new(&z, skip)?;
        let mut iter = witnesses;
        for _ in 0..count {
            let base = match iter.next(&z, &zm1)? {
                Some(b) => b,
                None => return Ok(true), // prime table exhausted
            };
            let mut x = crate::modular::powermod(&base, &z1, &z)?;
            let mut ij = 0;
            loop {
                if x.is_one() {
                    if ij != 0 {
                        return Ok(false);
                    }
                    break;
                }
                if x == zm1 {
                    break;
                }
                ij += 1;
                if ij >= ik {
                    return Ok(false);
                }
                x = x.square().rem_round(&z, Round::DOWN)?;
            }
        }
        Ok(true)
    }

    /// Miller–Rabin rounds carried out in Montgomery form.
    fn redc_ptest(&self, count: u64, skip: &Int) -> Result<bool> {
        let z = self.abs();
        let rp = Redc::new(&z)?;
        let redc_m1 = z.sub(rp.one());
        let zm1 = z.dec();
        let ik = zm1.lowbit();
        let z1 = zm1.shift(-(ik as i64));

        enum Mode {
            Random,
            Primes(usize),
            Consecutive(Int),
        }
        let mut mode = if skip.is_zero() {
            Mode::Random
        } else if skip.is_one() {
            Mode::Primes(0)
        } else {
            Mode::Consecutive(rp.encode(skip))
        };

        for i in 0..count {
            let base = match &mut mode {
                Mode::Random => loop {
                    let b = rng::rand_range(&Int::one(), &z)?;
                    if b != *rp.one() && b != redc_m1 {
                        break b;
                    }
                },
                Mode::Primes(next) => {
                    if i == 0 {
                        rp.encode(&Int::two())
                    } else {
                        let t = &*TABLES;
                        if *next >= t.primes.len() || t.primes[*next] as u64 >= 1 << 16 {
                            return Ok(true);
                        }
                        let p = Int::from(t.primes[*next]);
                        *next += 1;
                        rp.encode(&p)
                    }
                }
                Mode::Consecutive(b) => {
                    if i != 0 {
                        let mut nb = b.add(rp.one());
                        if nb.cmp_abs(&z).is_ge() {
                            nb = nb.sub(&z);
                        }
                        *b = nb;
                    }
                    b.clone()
                }
            };
            let mut x = rp.power(&base, &z1)?;
            let mut ij = 0;
            loop {
                if x == *rp.one() {
                    if ij != 0 {
                        return Ok(false);
                    }
                    break;
                }
                if x == redc_m1 {
                    break;
                }
                ij += 1;
                if ij >= ik {
                    return Ok(false);
                }
                x = rp.square(&x);
            }
        }
        Ok(true)
    }

    /// Least value above `|self|` congruent to `res` modulo `|modulus|`
    /// that passes the probabilistic test, or `None` when no such value
    /// can exist.
    pub fn next_cand(&self, count: i64, skip: &Int, res: &Int, modulus: &Int) -> Result<Option<Int>> {
        let z = self.abs();
        let m = modulus.abs();
        if m.is_zero() {
            if res.cmp(&z).is_gt() && res.ptest(count, skip)? {
                return Ok(Some(res.clone()));
            }
            return Ok(None);
        }
        if z.is_zero() && m.is_one() {
            return Ok(Some(Int::two()));
        }
        let diff = res.sub(&z);
        let rem = diff.rem_round(&m, Round::DOWN)?;
        let mut cand = if rem.is_zero() { z.add(&m) } else { z.add(&rem) };
        if cand.ptest(count, skip)? {
            return Ok(Some(cand));
        }
        if !cand.gcd(&m).is_one() {
            return Ok(None);
        }
        if cand.is_even() {
            cand = cand.add(&m);
            if cand.ptest(count, skip)? {
                return Ok(Some(cand));
            }
        }
        let step = if m.is_odd() { m.shift(1) } else { m.clone() };
        loop {
            cand = cand.add(&step);
            if cand.ptest(count, skip)? {
                return Ok(Some(cand));
            }
        }
    }

    /// Greatest positive value below `|self|` congruent to `res` modulo
    /// `|modulus|` that passes the probabilistic test.
    pub fn prev_cand(&self, count: i64, skip: &Int, res: &Int, modulus: &Int) -> Result<Option<Int>> {
        let z = self.abs();
        let m = modulus.abs();
        if m.is_zero() {
            if res.is_positive() && res.cmp(&z).is_lt() && res.ptest(count, skip)? {
                return Ok(Some(res.clone()));
            }
            return Ok(None);
        }
        let diff = z.sub(res);
        let rem = diff.rem_round(&m, Round::DOWN)?;
        let mut cand = if rem.is_zero() { z.sub(&m) } else { z.sub(&rem) };
        if cand.is_negative() {
            return Ok(None);
        }
        if cand.ptest(count, skip)? {
            return Ok(Some(cand));
        }
        if !cand.gcd(&m).is_one() {
            let cand = cand.rem_round(&m, Round::DOWN)?;
            if cand.ptest(count, skip)? {
                return Ok(Some(cand));
            }
            if cand.is_zero() && m.ptest(count, skip)? {
                return Ok(Some(m));
            }
            return Ok(None);
        }
        if cand.is_even() {
            cand = cand.sub(&m);
            if cand.is_negative() {
                return Ok(None);
            }
            if cand.ptest(count, skip)? {
                return Ok(Some(cand));
            }
        }
        let step = if m.is_odd() { m.shift(1) } else { m.clone() };
        loop {
            cand = cand.sub(&step);
            if cand.is_negative() {
                let cand = cand.add(&m);
                if cand.is_two() {
                    return Ok(Some(cand));
                }
                return Ok(None);
            }
            if cand.ptest(count, skip)? {
                return Ok(Some(cand));
            }
        }
    }

    /// Product of the primes not above `|self|`.
    pub fn primorial(&self) -> Result<Int> {
        if self.neg {
            return Err(MathError::OutOfDomain("primorial"));
        }
        if self.ge_pow2(24) {
            return Err(MathError::TooLarge("Very large primorial"));
        }
        let n = self.to_u64();
        if n < 2 {
            return Ok(Int::one());
        }
        let t = &*TABLES;
        let mut res = Int::two();
        for &p in &t.primes {
            if p as u64 > n {
                return Ok(res);
            }
            res = res.mul_small(p as i64);
        }
        let mut p = NXT_MAP_PRIME;
        while p <= n {
            res = res.mul_small(p as i64);
            p = next_prime32(p);
        }
        Ok(res)
    }

    /// Least common multiple of every value from one to `|self|`.
    pub fn lcm_range(&self) -> Result<Int> {
        if self.neg || self.is_zero() {
            return Err(MathError::OutOfDomain("lcm of range"));
        }
        if self.ge_pow2(24) {
            return Err(MathError::TooLarge("Very large range lcm"));
        }
        let n = self.to_u64();
        let t = &*TABLES;
        let mut res = Int::one();
        let mut apply = |res: &mut Int, p: u64| {
            let mut pp = p;
            while pp <= n / p {
                pp *= p;
            }
            *res = res.mul_small(pp as i64);
        };
        for &p in &t.primes {
            if p as u64 > n {
                break;
            }
            apply(&mut res, p as u64);
        }
        if n >= NXT_MAP_PRIME {
            let mut p = NXT_MAP_PRIME;
            while p <= n {
                apply(&mut res, p);
                p = next_prime32(p);
            }
        }
        // the power of two comes in as one shift
        Ok(res.shift(self.highbit() as i64))
    }
}

/// Witness source for the plain (non-REDC) Miller–Rabin loop.
struct WitnessIter {
    mode: u8,
    prime_index: usize,
    limit: u64,
    base: Int,
    first: bool,
}

impl WitnessIter {
    fn new(z: &Int, skip: &Int) -> Result<WitnessIter> {
        if skip.is_zero() {
            Ok(WitnessIter { mode: 0, prime_index: 0, limit: 0, base: Int::zero(), first: true })
        } else if skip.is_one() {
            let limit = if !z.ge_pow2(16) { z.to_u64() } else { 1 << 16 };
            Ok(WitnessIter { mode: 1, prime_index: 0, limit, base: Int::two(), first: true })
        } else {
            let base = if skip.is_negative() || skip.cmp_abs(z).is_ge() {
                skip.rem_round(z, Round::DOWN)?
            } else {
                skip.clone()
            };
            Ok(WitnessIter { mode: 2, prime_index: 0, limit: 0, base, first: true })
        }
    }

    fn next(&mut self, z: &Int, zm1: &Int) -> Result<Option<Int>> {
        match self.mode {
            0 => Ok(Some(rng::rand_range(&Int::two(), zm1)?)),
            1 => {
                if self.first {
                    self.first = false;
                    return Ok(Some(self.base.clone()));
                }
                let t = &*TABLES;
                if self.prime_index >= t.primes.len()
                    || t.primes[self.prime_index] as u64 >= self.limit
                {
                    return Ok(None);
                }
                let p = Int::from(t.primes[self.prime_index]);
                self.prime_index += 1;
                Ok(Some(p))
            }
            _ => {
                if self.first {
                    self.first = false;
                } else {
                    self.base = self.base.inc();
                    if self.base.cmp_abs(z).is_ge() {
                        self.base = self.base.sub(z);
                    }
                }
                Ok(Some(self.base.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_agrees_with_trial_division() {
        fn slow(n: u64) -> bool {
            if n < 2 {
                return false;
            }
            let mut d = 2;
            while d * d <= n {
                if n % d == 0 {
                    return false;
                }
                d += 1;
            }
            true
        }
        for n in 0u64..2000 {
            assert_eq!(is_prime32(n), slow(n), "mismatch at {n}");
        }
        for n in [65521u64, 65519, 65497, 65535, 65533] {
            assert_eq!(is_prime32(n), slow(n), "mismatch at {n}");
        }
    }

    #[test]
    fn prime_walking() {
        assert_eq!(next_prime32(2), 3);
        assert_eq!(next_prime32(7919), 7927);
        assert_eq!(next_prime32(65519), 65521);
        assert_eq!(next_prime32(65521), 65537);
        assert_eq!(next_prime32(1_000_000_000), 1_000_000_007);
        assert_eq!(Int::from(1_000_000_000u64).next_small_prime(), Some(1_000_000_007));
        assert_eq!(Int::from(1_000_000_007u64).prev_small_prime(), Some(999_999_937));
        assert_eq!(Int::from(10u64).prev_small_prime(), Some(7));
        assert_eq!(Int::from(65540u64).prev_small_prime(), Some(65537));
    }

    #[test]
    fn pix_counts() {
        assert_eq!(pix(1), Some(0));
        assert_eq!(pix(2), Some(1));
        assert_eq!(pix(100), Some(25));
        assert_eq!(pix(1_000), Some(168));
        assert_eq!(pix(65_536), Some(6_542));
        assert_eq!(pix(100_000), Some(9_592));
    }

    #[test]
    fn small_factors() {
        assert_eq!(Int::from(91u64).small_factor(100), Some(7));
        assert_eq!(Int::from(97u64).small_factor(100), None);
        let v = Int::from(65537u64).mul(&Int::from(65539u64));
        assert_eq!(v.small_factor(1 << 17), Some(65537));
        assert_eq!(Int::from(15u64).low_factor(1), 1);
        assert_eq!(Int::from(15u64).low_factor(2), 3);
    }

    #[test]
    fn miller_rabin() {
        // 2^61 - 1 is prime, 2^67 - 1 is not
        let m61 = Int::bit_value(61).dec();
        assert!(m61.ptest(20, &Int::one()).unwrap());
        let m67 = Int::bit_value(67).dec();
        assert!(!m67.ptest(20, &Int::one()).unwrap());
        // Carmichael number 561 is rejected exactly (32-bit path)
        assert!(!Int::from(561u64).ptest(5, &Int::one()).unwrap());
        // consecutive-integer witnesses
        assert!(m61.ptest(10, &Int::from(5u64)).unwrap());
        assert!(!m67.ptest(10, &Int::from(5u64)).unwrap());
    }

    #[test]
    fn candidates() {
        let c = Int::from(1_000_000_000u64)
            .next_cand(10, &Int::one(), &Int::zero(), &Int::one())
            .unwrap()
            .unwrap();
        assert_eq!(c.to_u64(), 1_000_000_007);
        // next prime congruent to 1 mod 4 above 100
        let c = Int::from(100u64)
            .next_cand(10, &Int::one(), &Int::one(), &Int::from(4u64))
            .unwrap()
            .unwrap();
        assert_eq!(c.to_u64(), 101);
        let c = Int::from(100u64)
            .prev_cand(10, &Int::one(), &Int::one(), &Int::from(4u64))
            .unwrap()
            .unwrap();
        assert_eq!(c.to_u64(), 97);
    }

    #[test]
    fn primorials() {
        assert_eq!(Int::from(10u64).primorial().unwrap().to_u64(), 210);
        assert_eq!(Int::from(20u64).primorial().unwrap().to_u64(), 9_699_690);
        assert_eq!(Int::one().primorial().unwrap(), Int::one());
    }

    #[test]
    fn range_lcm() {
        assert_eq!(Int::from(10u64).lcm_range().unwrap().to_u64(), 2520);
        assert_eq!(Int::from(20u64).lcm_range().unwrap().to_u64(), 232_792_560);
    }
}
