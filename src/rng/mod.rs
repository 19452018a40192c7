//! Subtractive-100 shuffle generator
//!
//! A lag-100 subtractive recurrence feeds a 256-entry shuffle table.
//! One 64-bit draw advances both cursors, subtracts `slot[j]` from
//! `slot[k]`, selects a shuffle entry from the **high** byte of the new
//! slot value (so every bit of the word influences the selection),
//! outputs that entry, and writes the slot value in its place.
//!
//! Only the first 100 of every 1009 subtractive values are used: a
//! countdown tracks the remaining consecutive uses and discards 909
//! updates when it runs out.  Bit draws that do not consume whole words
//! keep the leftover bits left-aligned in a carry buffer, so the stream
//! is reproducible bit for bit regardless of how it is chunked.
//!
//! Seeding restores the built-in table, folds the scrambled low 64 seed
//! bits into every slot, permutes the slots with the remaining seed in
//! factorial base, and regenerates the shuffle table.  The whole state
//! can be snapshotted and restored.
//!
//! This generator is deterministic and **not cryptographically strong**;
//! callers needing that must use a dedicated strong generator.

use std::fmt;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::error::{MathError, Result};
use crate::global;
use crate::integer::Int;
use crate::limb::{BASEB, Limb};

mod seed;
mod tables;

pub use seed::pseudo_seed;

/// Number of subtractive slots.
pub const SLOT_COUNT: usize = 100;
/// Number of shuffle entries.
pub const SHUF_COUNT: usize = 256;

const INIT_J: usize = 36;
const INIT_K: usize = 99;
/// Consecutive uses before a discard burst.
const CONSEQ_USE: i32 = 100;
/// Values discarded per burst: the other 909 of every 1009.
const SKIP_COUNT: u32 = 909;

/// Complete generator state; snapshot by cloning.
#[derive(Clone, PartialEq, Eq)]
pub struct Rand {
    seeded: bool,
    /// Number of valid bits in `buffer`.
    bits: u32,
    /// Carry-over bits, left-aligned.
    buffer: u64,
    j: usize,
    k: usize,
    /// Draws remaining before the next discard burst.
    need_to_skip: i32,
    slot: [u64; SLOT_COUNT],
    shuf: [u64; SHUF_COUNT],
}

impl Default for Rand {
    fn default() -> Rand {
        Rand {
            seeded: true,
            bits: 0,
            buffer: 0,
            j: INIT_J,
            k: INIT_K,
            need_to_skip: CONSEQ_USE,
            slot: tables::INIT_SLOT,
            shuf: tables::INIT_SHUF,
        }
    }
}

impl fmt::Debug for Rand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rand")
            .field("j", &self.j)
            .field("k", &self.k)
            .field("bits", &self.bits)
            .field("need_to_skip", &self.need_to_skip)
            .finish_non_exhaustive()
    }
}

impl Rand {
    /// A generator in the built-in initial state.
    pub fn new() -> Rand {
        Rand::default()
    }

    /// One subtractive update.
    #[inline]
    fn step(&mut self) {
        self.j += 1;
        if self.j >= SLOT_COUNT {
            self.j = 0;
        }
        self.k += 1;
        if self.k >= SLOT_COUNT {
            self.k = 0;
        }
        self.slot[self.k] = self.slot[self.k].wrapping_sub(self.slot[self.j]);
    }

    /// Shuffle index selected by the freshly updated slot.
    #[inline]
    fn index(&self) -> usize {
        (self.slot[self.k] >> 56) as usize
    }

    /// Runs the discard burst when the use budget is exhausted.
    ///
    /// During seeding the shuffle table does not exist yet, so the burst
    /// skips the table writes.
    fn pay_skip_debt(&mut self, with_shuffle: bool) {
        if self.need_to_skip <= 0 {
            for _ in 0..SKIP_COUNT {
                self.step();
                if with_shuffle {
                    let idx = self.index();
                    self.shuf[idx] = self.slot[self.k];
                }
            }
            self.need_to_skip = CONSEQ_USE;
            tracing::trace!(skipped = SKIP_COUNT, "discarded subtractive values");
        } else {
            self.need_to_skip -= 1;
        }
    }

    /// Draws one full 64-bit word.
    fn next_word(&mut self) -> u64 {
        self.pay_skip_debt(true);
        self.step();
        let idx = self.index();
        let out = self.shuf[idx];
        self.shuf[idx] = self.slot[self.k];
        out
    }

    /// Draws exactly `cnt` random bits as a non-negative integer.
    pub fn bits(&mut self, cnt: u64) -> Result<Int> {
        if cnt == 0 {
            return Ok(Int::zero());
        }
        if cnt > 1 << 31 {
            return Err(MathError::TooLarge("Very large random bit count"));
        }
        let limb_count = cnt.div_ceil(BASEB as u64) as usize;
        let mut out = vec![0 as Limb; limb_count];
        let mut pos = cnt; // next unwritten bit position, counting down

        // writes the low `width` bits of `val` at [pos - width, pos)
        fn put(out: &mut [Limb], pos: &mut u64, val: u64, width: u32) {
            *pos -= width as u64;
            let limb = (*pos / BASEB as u64) as usize;
            let offset = (*pos % BASEB as u64) as u32;
            let v = (val as u128) << offset;
            out[limb] |= v as Limb;
            if limb + 1 < out.len() {
                out[limb + 1] |= (v >> BASEB) as Limb;
            }
            if limb + 2 < out.len() {
                out[limb + 2] |= (v >> (2 * BASEB)) as Limb;
            }
        }

        let mut remaining = cnt;
        if self.bits > 0 {
            let take = (self.bits as u64).min(remaining) as u32;
            let chunk = self.buffer >> (64 - take);
            put(&mut out, &mut pos, chunk, take);
            self.buffer = if take == 64 { 0 } else { self.buffer << take };
            self.bits -= take;
            remaining -= take as u64;
        }
        while remaining >= 64 {
            let word = self.next_word();
            put(&mut out, &mut pos, word, 64);
            remaining -= 64;
        }
        if remaining > 0 {
            let word = self.next_word();
            let take = remaining as u32;
            put(&mut out, &mut pos, word >> (64 - take), take);
            self.buffer = word << take;
            self.bits = 64 - take;
        }
        Ok(Int::from_raw(out, false))
    }

    /// Advances the stream by `cnt` bits without producing output.
    pub fn skip(&mut self, cnt: u64) {
        let mut cnt = cnt;
        if self.bits > 0 {
            if (self.bits as u64) <= cnt {
                cnt -= self.bits as u64;
                self.bits = 0;
                self.buffer = 0;
            } else {
                self.buffer <<= cnt;
                self.bits -= cnt as u32;
                return;
            }
        }
        while cnt >= 64 {
            self.pay_skip_debt(true);
            self.step();
            let idx = self.index();
            self.shuf[idx] = self.slot[self.k];
            cnt -= 64;
        }
        if cnt > 0 {
            self.pay_skip_debt(true);
            self.step();
            let idx = self.index();
            self.buffer = self.shuf[idx] << cnt;
            self.bits = 64 - cnt as u32;
            self.shuf[idx] = self.slot[self.k];
        }
    }

    /// Uniform draw on `[low, beyond)` by rejection.
    pub fn range(&mut self, low: &Int, beyond: &Int) -> Result<Int> {
        if low.cmp(beyond).is_ge() {
            return Err(MathError::OutOfDomain("empty random range"));
        }
        let range = beyond.sub(low);
        if range.is_one() {
            return Ok(low.clone());
        }
        let bitlen = range.dec().bit_len();
        // modulo would skew the tail, so reject and redraw
        loop {
            let draw = self.bits(bitlen)?;
            if draw.cmp_abs(&range).is_lt() {
                return Ok(draw.add(low));
            }
        }
    }

    /// Seeds the generator.
    ///
    /// Zero restores the built-in initial state.  Any other seed is
    /// scrambled 64 bits at a time, xor-folded into the default slots,
    /// and its remaining high part permutes the slots in factorial base.
    /// Negative seeds are reserved.
    pub fn seed(&mut self, seed: &Int) -> Result<()> {
        if seed.is_negative() {
            return Err(MathError::NegativeSeed);
        }
        if seed.is_zero() {
            *self = Rand::default();
            return Ok(());
        }
        tracing::debug!(bits = seed.bit_len(), "seeding generator");
        self.seeded = false;
        self.j = INIT_J;
        self.k = INIT_K;
        self.bits = 0;
        self.buffer = 0;
        self.slot = tables::INIT_SLOT;

        let scram = seed::reseed64(seed);
        if !scram.is_zero() {
            let xor = low_word(&scram);
            for slot in self.slot.iter_mut() {
                *slot ^= xor;
            }
            if scram.bit_len() > 64 {
                let mut z = scram.shift(-64);
                for i in (1..SLOT_COUNT).rev() {
                    if z.is_zero() || z.is_negative() {
                        break;
                    }
                    let (q, r) = z.div_small(i as i64 + 1)?;
                    z = q;
                    let r = r as usize;
                    if r != i {
                        self.slot.swap(i, r);
                    }
                }
            }
        }
        self.reload_shuffle();
        self.seeded = true;
        Ok(())
    }

    /// Seeds from a caller-supplied table of at least 100 slot values.
    pub fn seed_matrix(&mut self, slots: &[u64]) -> Result<()> {
        if slots.len() < SLOT_COUNT {
            return Err(MathError::ShortSeedMatrix);
        }
        self.seeded = false;
        self.j = INIT_J;
        self.k = INIT_K;
        self.bits = 0;
        self.buffer = 0;
        self.slot.copy_from_slice(&slots[..SLOT_COUNT]);
        self.reload_shuffle();
        self.seeded = true;
        Ok(())
    }

    /// Fills the shuffle table with fresh subtractive values.
    fn reload_shuffle(&mut self) {
        for i in 0..SHUF_COUNT {
            self.pay_skip_debt(false);
            self.step();
            self.shuf[i] = self.slot[self.k];
        }
    }
}

/// Low 64 bits of a non-negative value.
fn low_word(z: &Int) -> u64 {
    let lo = z.limbs[0] as u64;
    let hi = if z.limb_len() > 1 { z.limbs[1] as u64 } else { 0 };
    lo | (hi << BASEB)
}

static GENERATOR: Lazy<Mutex<Rand>> = Lazy::new(|| Mutex::new(Rand::new()));

/// Draws `cnt` bits from the process-wide generator.
pub fn rand_bits(cnt: u64) -> Result<Int> {
    global::lock(&GENERATOR).bits(cnt)
}

/// Uniform draw on `[low, beyond)` from the process-wide generator.
pub fn rand_range(low: &Int, beyond: &Int) -> Result<Int> {
    global::lock(&GENERATOR).range(low, beyond)
}

/// Skips `cnt` bits of the process-wide stream.
pub fn rand_skip(cnt: u64) {
    global::lock(&GENERATOR).skip(cnt)
}

/// A small uniform draw on `[0, s)`.
pub fn irand(s: i64) -> Result<i64> {
    if s <= 0 {
        return Err(MathError::OutOfDomain("non-positive random bound"));
    }
    if s == 1 {
        return Ok(0);
    }
    let v = rand_range(&Int::zero(), &Int::from(s))?;
    Ok(v.to_i64())
}

/// Seeds the process-wide generator, returning the previous state.
pub fn srand(seed: &Int) -> Result<Rand> {
    let mut guard = global::lock(&GENERATOR);
    let prev = guard.clone();
    guard.seed(seed)?;
    Ok(prev)
}

/// Seeds the process-wide generator from a slot table.
pub fn srand_matrix(slots: &[u64]) -> Result<Rand> {
    let mut guard = global::lock(&GENERATOR);
    let prev = guard.clone();
    guard.seed_matrix(slots)?;
    Ok(prev)
}

/// Snapshot of the process-wide generator state.
pub fn state() -> Rand {
    global::lock(&GENERATOR).clone()
}

/// Restores a previously saved state, returning the replaced one.
pub fn set_state(state: &Rand) -> Rand {
    let mut guard = global::lock(&GENERATOR);
    std::mem::replace(&mut *guard, state.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_after_seed() {
        let mut a = Rand::new();
        let mut b = Rand::new();
        a.seed(&Int::from(12345u64)).unwrap();
        b.seed(&Int::from(12345u64)).unwrap();
        for cnt in [1u64, 7, 32, 64, 65, 128, 13] {
            assert_eq!(a.bits(cnt).unwrap(), b.bits(cnt).unwrap(), "draw of {cnt}");
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = Rand::new();
        let mut b = Rand::new();
        a.seed(&Int::from(1u64)).unwrap();
        b.seed(&Int::from(2u64)).unwrap();
        assert_ne!(a.bits(256).unwrap(), b.bits(256).unwrap());
    }

    #[test]
    fn chunking_does_not_change_the_stream() {
        let mut a = Rand::new();
        let mut b = Rand::new();
        a.seed(&Int::from(99u64)).unwrap();
        b.seed(&Int::from(99u64)).unwrap();
        // 96 bits all at once vs three uneven pieces
        let whole = a.bits(96).unwrap();
        let p1 = b.bits(5).unwrap();
        let p2 = b.bits(60).unwrap();
        let p3 = b.bits(31).unwrap();
        let stitched = p1.shift(91).add(&p2.shift(31)).add(&p3);
        assert_eq!(whole, stitched);
    }

    #[test]
    fn skip_matches_draw() {
        let mut a = Rand::new();
        let mut b = Rand::new();
        a.seed(&Int::from(7u64)).unwrap();
        b.seed(&Int::from(7u64)).unwrap();
        let _ = a.bits(77).unwrap();
        b.skip(77);
        assert_eq!(a.bits(64).unwrap(), b.bits(64).unwrap());
    }

    #[test]
    fn snapshot_restore() {
        let mut a = Rand::new();
        a.seed(&Int::from(31337u64)).unwrap();
        let _ = a.bits(100).unwrap();
        let saved = a.clone();
        let x1 = a.bits(200).unwrap();
        let mut restored = saved.clone();
        let x2 = restored.bits(200).unwrap();
        assert_eq!(x1, x2);
    }

    #[test]
    fn zero_seed_restores_default() {
        let mut a = Rand::new();
        a.seed(&Int::from(42u64)).unwrap();
        a.seed(&Int::zero()).unwrap();
        assert_eq!(a, Rand::default());
    }

    #[test]
    fn ranged_draws_stay_in_range() {
        let mut a = Rand::new();
        a.seed(&Int::from(5u64)).unwrap();
        let lo = Int::from(100u64);
        let hi = Int::from(117u64);
        for _ in 0..200 {
            let v = a.range(&lo, &hi).unwrap();
            assert!(v.cmp(&lo).is_ge() && v.cmp(&hi).is_lt(), "{v} out of range");
        }
        // a singleton range needs no draw at all
        let v = a.range(&lo, &Int::from(101u64)).unwrap();
        assert_eq!(v, lo);
    }

    #[test]
    fn negative_seed_reserved() {
        let mut a = Rand::new();
        assert_eq!(a.seed(&Int::from(-1i64)), Err(MathError::NegativeSeed));
    }

    #[test]
    fn matrix_seeding() {
        let mut slots = [0u64; SLOT_COUNT];
        for (i, s) in slots.iter_mut().enumerate() {
            *s = (i as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15).wrapping_add(1);
        }
        let mut a = Rand::new();
        let mut b = Rand::new();
        a.seed_matrix(&slots).unwrap();
        b.seed_matrix(&slots).unwrap();
        assert_eq!(a.bits(128).unwrap(), b.bits(128).unwrap());
        assert!(a.seed_matrix(&slots[..50]).is_err());
    }

    #[test]
    fn discard_policy_runs() {
        let mut a = Rand::new();
        a.seed(&Int::from(1u64)).unwrap();
        // push well past the 100-use budget; determinism must survive
        let mut b = a.clone();
        for _ in 0..300 {
            let x = a.bits(64).unwrap();
            let y = b.bits(64).unwrap();
            assert_eq!(x, y);
        }
    }
}
