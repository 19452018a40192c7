//! Runtime configuration consulted by the arithmetic core
//!
//! The embedding calculator owns a configuration object; the core only
//! reads it.  It covers the algorithm crossover thresholds, the default
//! rounding modes of the individual operation families, the default error
//! bound for transcendental evaluation, and the output formatting knobs.
//!
//! A process-wide instance is kept behind a lock; [`current`] snapshots
//! it and [`set`] replaces it.  Individual helpers exist for the values
//! read on hot paths.

use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::emit::OutMode;
use crate::error::{MathError, Result};
use crate::rational::Rat;
use crate::round::Round;

/// Configuration parameters read by the core.
#[derive(Debug, Clone)]
pub struct Config {
    /// Limb count above which multiply switches to the subdivision algorithm.
    pub mul2: usize,
    /// Limb count above which squaring switches to the subdivision algorithm.
    pub sq2: usize,
    /// Modulus limb count above which modular powers use the cached-reciprocal reduction.
    pub pow2: usize,
    /// Modulus limb count below which modular powers use REDC.
    pub redc2: usize,
    /// Default error bound for transcendental evaluation.
    pub epsilon: Rat,
    /// Rounding used by the trigonometric and exponential family.
    pub triground: Round,
    /// Rounding used when printing real values.
    pub outround: Round,
    /// Default rounding for integer quotients.
    pub quo_round: Round,
    /// Default rounding for remainders.
    pub mod_round: Round,
    /// Default rounding for `sqrt`.
    pub sqrt_round: Round,
    /// Default rounding for `appr`.
    pub appr_round: Round,
    /// Default rounding for continued-fraction approximation.
    pub cfappr_round: Round,
    /// Default rounding for continued-fraction simplification.
    pub cfsim_round: Round,
    /// Default rounding for `round`/`bround`.
    pub round_round: Round,
    /// Output mode used when the caller requests the default.
    pub outmode: OutMode,
    /// Secondary output mode appended as a comment, if any.
    pub outmode2: Option<OutMode>,
    /// Fractional digits for real and exponential output.
    pub outdigits: u32,
    /// Print a `~` before approximated real output.
    pub tilde_ok: bool,
    /// Print a leading `0` before a decimal point.
    pub leadzero: bool,
    /// Pad real output with trailing zeroes to the full digit count.
    pub fullzero: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            mul2: 28,
            sq2: 28,
            pow2: 20,
            redc2: 25,
            epsilon: Rat::from_parts_unchecked(crate::Int::one(), crate::Int::tenpow(20)),
            triground: Round::NEAREST_EVEN,
            outround: Round::NEAREST_EVEN,
            quo_round: Round::TO_ZERO,
            mod_round: Round::DOWN,
            sqrt_round: Round::NEAREST_EVEN,
            appr_round: Round::NEAREST_EVEN,
            cfappr_round: Round::DOWN,
            cfsim_round: Round::TO_EVEN,
            round_round: Round::NEAREST_EVEN,
            outmode: OutMode::Real,
            outmode2: None,
            outdigits: 20,
            tilde_ok: true,
            leadzero: true,
            fullzero: false,
        }
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

/// Snapshot of the current configuration.
pub fn current() -> Config {
    CONFIG
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Replaces the process-wide configuration.
///
/// The epsilon must be positive.
pub fn set(cfg: Config) -> Result<()> {
    if !cfg.epsilon.is_positive() {
        return Err(MathError::InvalidEpsilon("configuration"));
    }
    let mut guard = CONFIG
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = cfg;
    Ok(())
}

fn read<T>(f: impl FnOnce(&Config) -> T) -> T {
    let guard = CONFIG
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&guard)
}

/// Multiply crossover threshold, in limbs.
pub(crate) fn mul_threshold() -> usize {
    read(|c| c.mul2)
}

/// Square crossover threshold, in limbs.
pub(crate) fn square_threshold() -> usize {
    read(|c| c.sq2)
}

/// Cached-reciprocal modulus threshold, in limbs.
pub(crate) fn pow_threshold() -> usize {
    read(|c| c.pow2)
}

/// REDC modulus threshold, in limbs.
pub(crate) fn redc_threshold() -> usize {
    read(|c| c.redc2)
}

/// Rounding used by the transcendental layer.
pub(crate) fn triground() -> Round {
    read(|c| c.triground)
}
