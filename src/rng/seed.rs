//! Seed scrambling and environmental seed sampling
//!
//! [`reseed64`] maps seeds one-to-one onto seeds so that humans picking
//! small or successive values still land on unrelated generator states.
//! Each 64-bit chunk goes through the linear congruence
//! `chunk <- a*chunk + c mod 2^64`; zero chunks stay zero (so a zero
//! seed keeps its reset meaning), and the one chunk the congruence would
//! send to zero is re-routed to `c` to keep the map a bijection.
//!
//! [`pseudo_seed`] samples whatever cheap entropy the environment offers
//! — wall clock, process id, filesystem timestamps, OS randomness — and
//! folds it through the same scrambler.  Sources that are unavailable
//! are silently skipped; with nothing available the result degrades to a
//! fixed, well-defined seed.  None of this is cryptographic.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::integer::Int;
use crate::limb::{BASEB, Limb};
use crate::os;

/// Multiplier of the scrambling congruence.
const SCRAMBLE_A: u64 = 0x57aa_0ff4_73c0_ccbd;
/// Addend of the scrambling congruence.
const SCRAMBLE_C: u64 = 0x12ea_8057_18e0_9865;

/// Scrambles a non-negative seed in independent 64-bit chunks.
pub(crate) fn reseed64(seed: &Int) -> Int {
    if seed.is_zero() || seed.is_negative() {
        return Int::zero();
    }
    let mut limbs = seed.limbs.clone();
    if limbs.len() % 2 != 0 {
        limbs.push(0);
    }
    let mut out = Vec::with_capacity(limbs.len());
    for pair in limbs.chunks(2) {
        let chunk = pair[0] as u64 | ((pair[1] as u64) << BASEB);
        let scrambled = if chunk == 0 {
            0
        } else {
            let v = chunk.wrapping_mul(SCRAMBLE_A).wrapping_add(SCRAMBLE_C);
            if v == 0 { SCRAMBLE_C } else { v }
        };
        out.push(scrambled as Limb);
        out.push((scrambled >> BASEB) as Limb);
    }
    Int::from_raw(out, false)
}

/// One scrambling round over an accumulator.
fn fold(acc: u64, sample: u64) -> u64 {
    (acc ^ sample)
        .wrapping_mul(SCRAMBLE_A)
        .wrapping_add(SCRAMBLE_C)
}

/// Builds a seed from environmental noise.
///
/// The sampled sources are only noise for seeding; their absence
/// degrades silently.  The result is 128 bits wide.
pub fn pseudo_seed() -> Int {
    let mut acc: u64 = 0xb7e1_5162_8aed_2a6b;

    if let Ok(elapsed) = SystemTime::now().duration_since(UNIX_EPOCH) {
        acc = fold(acc, elapsed.as_nanos() as u64);
        acc = fold(acc, (elapsed.as_nanos() >> 64) as u64);
    }
    acc = fold(acc, std::process::id() as u64);

    // filesystem timestamps wander independently of the clock samples
    for path in [std::env::temp_dir(), std::path::PathBuf::from(".")] {
        if let Ok(meta) = std::fs::metadata(&path) {
            if let Ok(modified) = meta.modified() {
                if let Ok(d) = modified.duration_since(UNIX_EPOCH) {
                    acc = fold(acc, d.as_nanos() as u64);
                }
            }
        }
    }

    let mut noise = [0u8; 16];
    if os::try_fill_entropy(&mut noise) {
        acc = fold(acc, u64::from_le_bytes(noise[..8].try_into().unwrap_or([0; 8])));
        acc = fold(acc, u64::from_le_bytes(noise[8..].try_into().unwrap_or([0; 8])));
    }

    let lo = fold(acc, 0x5bf0_3635);
    let hi = fold(lo, 0x2aab_10b6_b4cc_5c34);
    let limbs = vec![
        lo as Limb,
        (lo >> BASEB) as Limb,
        hi as Limb,
        (hi >> BASEB) as Limb,
    ];
    Int::from_raw(limbs, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scramble_fixed_points() {
        assert_eq!(reseed64(&Int::zero()), Int::zero());
        // the scramble is a bijection on 64-bit chunks: distinct seeds
        // must stay distinct
        let a = reseed64(&Int::from(1u64));
        let b = reseed64(&Int::from(2u64));
        assert_ne!(a, b);
        assert!(!a.is_zero());
    }

    #[test]
    fn scramble_known_chunk() {
        // 1 -> a + c mod 2^64
        let want = SCRAMBLE_A.wrapping_add(SCRAMBLE_C);
        assert_eq!(reseed64(&Int::from(1u64)).to_u64(), want);
    }

    #[test]
    fn chunks_are_independent() {
        // a zero low chunk stays zero while the high chunk scrambles
        let seed = Int::bit_value(64).mul(&Int::from(5u64));
        let scrambled = reseed64(&seed);
        assert_eq!(scrambled.bit_and(&Int::from(u64::MAX)), Int::zero());
    }

    #[test]
    fn pseudo_seed_is_positive() {
        let s = pseudo_seed();
        assert!(!s.is_negative());
        assert!(!s.is_zero());
    }
}
