//! Operating system abstraction layer (macOS)
//!
//! On macOS, entropy comes from `arc4random_buf`, which is backed by the
//! operating system and never fails.

use libc::arc4random_buf;

/// Fills a buffer with random bytes from the system.
pub(crate) fn try_fill_entropy(buf: &mut [u8]) -> bool {
    unsafe {
        arc4random_buf(buf.as_mut_ptr() as *mut libc::c_void, buf.len());
    }
    true
}
