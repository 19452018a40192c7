//! Per-modulus REDC state cache
//!
//! Setting up REDC state costs an inverse and a division, so the states
//! are cached keyed by modulus value.  The table holds up to 256 entries
//! and evicts by age: every lookup stamps its entry with a monotonically
//! increasing tick, and the stalest entry goes first.  Entries are
//! self-contained, so the cache can be cleared at any time without
//! invalidating handles already given out.

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::global;
use crate::integer::Int;

use super::redc::Redc;

/// Capacity of the cache.
const MAX_REDC: usize = 256;

struct Slot {
    redc: Arc<Redc>,
    age: u64,
}

struct RedcCache {
    slots: Vec<Slot>,
    tick: u64,
}

static CACHE: Lazy<Mutex<RedcCache>> =
    Lazy::new(|| Mutex::new(RedcCache { slots: Vec::new(), tick: 0 }));

/// Fetches (or computes and caches) the REDC state for `m`.
pub fn redc_for(m: &Int) -> Result<Arc<Redc>> {
    let mut cache = global::lock(&CACHE);
    cache.tick += 1;
    let tick = cache.tick;

    for slot in cache.slots.iter_mut() {
        let cand = slot.redc.modulus();
        // cheap rejects before the full value compare
        if cand.limb_len() != m.limb_len() || cand.limbs[0] != m.limbs[0] {
            continue;
        }
        if cand == m {
            slot.age = tick;
            return Ok(Arc::clone(&slot.redc));
        }
    }

    tracing::debug!(limbs = m.limb_len(), "REDC cache miss");
    let redc = Arc::new(Redc::new(m)?);
    if cache.slots.len() >= MAX_REDC {
        let mut oldest = 0;
        for (i, slot) in cache.slots.iter().enumerate() {
            if slot.age < cache.slots[oldest].age {
                oldest = i;
            }
        }
        tracing::debug!(slot = oldest, "evicting stalest REDC state");
        cache.slots.swap_remove(oldest);
    }
    cache.slots.push(Slot { redc: Arc::clone(&redc), age: tick });
    Ok(redc)
}

/// Drops every cached state.
pub fn clear_redc_cache() {
    let mut cache = global::lock(&CACHE);
    cache.slots.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_reuses_state() {
        let m = Int::from(1_000_000_007u64);
        let a = redc_for(&m).unwrap();
        let b = redc_for(&m).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn clear_is_safe_with_live_handles() {
        let m = Int::from(998_244_353u64);
        let rp = redc_for(&m).unwrap();
        clear_redc_cache();
        // the handle stays valid after the cache is emptied
        let enc = rp.encode(&Int::from(42u64));
        assert_eq!(rp.decode(&enc).to_u64(), 42);
    }

    #[test]
    fn rejects_even_modulus() {
        assert!(redc_for(&Int::from(10u64)).is_err());
    }
}
