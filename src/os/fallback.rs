//! Operating system abstraction layer (other platforms)
//!
//! No entropy source is wired up here; reporting failure makes the
//! seeding path degrade to its fixed seed, as required.

/// Always reports failure.
pub(crate) fn try_fill_entropy(_buf: &mut [u8]) -> bool {
    false
}
