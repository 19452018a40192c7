//! Process-wide state helpers
//!
//! The core keeps a handful of lazily-filled arenas (REDC cache, power-of-
//! ten table, transcendental caches, generator state).  All of them live
//! behind mutexes so that accidental concurrent use is safe; the crate is
//! single-threaded by contract and never holds two arena locks at once.
//!
//! A coarse abort flag lets an embedding interpreter cancel a long-running
//! computation: expensive entry points test the flag and bail out with
//! [`MathError::Aborted`](crate::MathError::Aborted).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::{MathError, Result};

static ABORT: AtomicBool = AtomicBool::new(false);

/// Requests cancellation of the computation in progress.
///
/// The flag is tested at the entry of the expensive operations (multiply,
/// divide, modular power, primality testing, transcendental evaluation).
/// It stays set until [`clear_abort`] is called.
pub fn request_abort() {
    ABORT.store(true, Ordering::Relaxed);
}

/// Clears a previously requested abort.
pub fn clear_abort() {
    ABORT.store(false, Ordering::Relaxed);
}

/// Fails with [`MathError::Aborted`] if an abort has been requested.
#[inline]
pub(crate) fn check_abort() -> Result<()> {
    if ABORT.load(Ordering::Relaxed) {
        Err(MathError::Aborted)
    } else {
        Ok(())
    }
}

/// Locks a mutex, recovering the value if a previous holder panicked.
///
/// Arena contents are always left in a consistent state between mutations,
/// so poisoning carries no information here.
#[inline]
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
