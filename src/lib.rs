//! Arbitrary-precision rational arithmetic for the Meridian calculator
//!
//! This crate is the numeric core of the Meridian ecosystem: exact
//! integers and rationals of unbounded size, modular arithmetic with
//! Montgomery reduction, and transcendental functions evaluated to any
//! caller-supplied error bound.
//!
//! The focus is on **exactness, predictability, and auditability**.
//! Values are plain owned data, every operation states its rounding, and
//! approximate results are always a multiple of the epsilon the caller
//! passed in — never a hidden binary float.
//!
//! # Module overview
//!
//! - `limb`
//!   The storage unit of the engine: 32-bit limbs with 64-bit carry
//!   arithmetic, and the radix constants everything else derives from.
//!
//! - `integer`
//!   [`Int`], the big-integer workhorse: schoolbook and subdivision
//!   multiply, division with a six-bit rounding mask, hybrid
//!   Lehmer/Euclid gcd, integer roots, bit operations, factorials and
//!   the rest of the combinatorial family, and the prime stack — sieve
//!   bitmap, trial division, Miller–Rabin.
//!
//! - `rational`
//!   [`Rat`], canonically reduced fractions.  Arithmetic keeps the
//!   invariants `den > 0` and `gcd(|num|, den) = 1` at every step; the
//!   rounding family approximates to multiples of any quantum; the
//!   continued-fraction pair finds best approximations under an error
//!   or denominator budget.
//!
//! - `modular`
//!   Modular arithmetic in three gears: direct division for small
//!   moduli, cached Montgomery (REDC) state for odd moduli — with fused
//!   multiply-reduce loops — and a cached-reciprocal reduction for
//!   large ones.
//!
//! - `trans`
//!   The epsilon-driven layer: trigonometric, exponential, logarithmic,
//!   hyperbolic and historical functions, plus pi.  Each takes a
//!   positive rational epsilon and returns a result within it, or
//!   `None` when the true value leaves the real line.
//!
//! - `rng`
//!   A deterministic subtractive-100 shuffle generator producing big
//!   integers, with seeding, bit-exact skip, and snapshot/restore.  It
//!   feeds the probabilistic primality tests and is explicitly **not**
//!   cryptographic.
//!
//! - `emit`
//!   Formatted output of rationals — fraction, fixed point, scientific,
//!   and the power-of-two radices — through a caller-supplied byte
//!   sink, so the core never owns an output stream.
//!
//! - `config`
//!   The read-only knobs an embedding calculator sets: algorithm
//!   crossover thresholds, default rounding modes, output formatting.
//!
//! # Concurrency
//!
//! The core is single-threaded by contract.  Its process-wide state —
//! the REDC cache, the power-of-ten table, the transcendental caches,
//! the generator — lives behind mutexes, so concurrent use is safe but
//! serialized.
//!
//! # Errors
//!
//! Fallible operations return [`Result`] with a [`MathError`] naming the
//! domain, size, seed or rounding-mode violation.  No partial results
//! accompany an error.

pub mod config;
pub mod emit;
mod error;
mod global;
pub mod integer;
pub mod limb;
pub mod modular;
mod os;
pub mod rational;
pub mod rng;
mod round;
pub mod trans;

pub use error::{MathError, Result};
pub use global::{clear_abort, request_abort};
pub use integer::Int;
pub use modular::Redc;
pub use rational::Rat;
pub use round::Round;
