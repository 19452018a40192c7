//! Operating system abstraction layer (Linux)
//!
//! On Linux, entropy comes from the `getrandom` system call, which reads
//! the kernel pool directly.  Partial reads are retried; any error makes
//! the whole request report failure so the caller can fall back to its
//! fixed seed.

use libc::{c_void, getrandom};

/// Fills a buffer with random bytes from the kernel.
///
/// Returns false when the system call is unavailable or fails; the
/// buffer contents are unspecified in that case.
pub(crate) fn try_fill_entropy(buf: &mut [u8]) -> bool {
    let mut filled = 0;
    while filled < buf.len() {
        let ret = unsafe {
            getrandom(
                buf[filled..].as_mut_ptr() as *mut c_void,
                buf.len() - filled,
                0,
            )
        };
        if ret <= 0 {
            return false;
        }
        filled += ret as usize;
    }
    true
}
