//! Error taxonomy for the arithmetic core
//!
//! Every fallible operation in this crate reports failure through a single
//! [`MathError`] channel.  The variants group into:
//! - domain errors (division by zero, roots and logs of out-of-range
//!   values, fractional operands where an integer is required),
//! - size errors (arguments whose result would exceed the internal
//!   31-bit exponent / bit-width ceiling),
//! - an abort marker (a long computation was cancelled from outside),
//! - seed and rounding-mode validation errors.
//!
//! Operations that are mathematically well-defined but not expressible as
//! a real rational (for example `asin(2)`) do **not** use this channel;
//! they return `Ok(None)` so a higher layer can route the request to a
//! complex-number implementation.
//!
//! No partial result is ever produced alongside an error.

use thiserror::Error;

/// Errors reported by the arithmetic core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// Division or modular reduction by zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// A modulus argument that must be positive was zero or negative.
    #[error("Mod of non-positive integer")]
    NonPositiveModulus,

    /// Square root of a negative value requested in the real domain.
    #[error("Square root of negative number")]
    SqrtOfNegative,

    /// Even root of a negative value requested in the real domain.
    #[error("Even root of negative number")]
    EvenRootOfNegative,

    /// A root index that was zero, negative or fractional.
    #[error("Taking bad root of number")]
    BadRoot,

    /// Logarithm of zero or a negative value.
    #[error("Logarithm of non-positive number")]
    LogOfNonPositive,

    /// Logarithm base that was 0 or 1.
    #[error("Invalid logarithm base")]
    BadLogBase,

    /// An operation that requires integers received a fraction.
    #[error("Non-integer argument for {0}")]
    NonInteger(&'static str),

    /// An argument outside the function's real domain.
    #[error("Argument out of domain for {0}")]
    OutOfDomain(&'static str),

    /// A function that is undefined at zero received zero.
    #[error("Zero argument for {0}")]
    ZeroArgument(&'static str),

    /// An epsilon error bound that was zero or negative.
    #[error("Zero epsilon value for {0}")]
    InvalidEpsilon(&'static str),

    /// An argument exceeded the internal 31-bit size ceiling.
    #[error("{0}")]
    TooLarge(&'static str),

    /// The computation was cancelled via [`crate::global::request_abort`].
    #[error("Calculation aborted")]
    Aborted,

    /// Negative seeds are reserved for future use.
    #[error("Negative seed for srand reserved for future use")]
    NegativeSeed,

    /// A seed matrix with fewer than 100 entries.
    #[error("Seed matrix must contain 100 elements")]
    ShortSeedMatrix,

    /// Rounding-mode bits outside the defined mask.
    #[error("Invalid rounding mode")]
    InvalidRounding,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, MathError>;
