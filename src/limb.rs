//! Storage unit of the big-integer engine
//!
//! Numbers are stored as little-endian arrays of 32-bit limbs; products
//! and carry chains are computed in a 64-bit wide type.  The limb width is
//! fixed — all shift counts, word lengths and radix constants in the crate
//! derive from [`BASEB`].

/// Unit of number storage.
pub type Limb = u32;

/// Double-width type holding the product of two limbs.
pub type Wide = u64;

/// Number of bits in a [`Limb`].
pub const BASEB: u32 = 32;

/// The radix: 2^32.
pub const BASE: Wide = 1 << BASEB;

/// One less than the radix.
pub const BASE1: Wide = BASE - 1;

/// The highest bit of a limb, as a [`Wide`].
pub const TOPHALF: Wide = 1 << (BASEB - 1);

/// Low limb of a wide value.
#[inline(always)]
pub const fn lo(w: Wide) -> Limb {
    w as Limb
}

/// High limb of a wide value.
#[inline(always)]
pub const fn hi(w: Wide) -> Limb {
    (w >> BASEB) as Limb
}
