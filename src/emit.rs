//! Formatted emission of rational values
//!
//! The core does not own an output stream; it walks a value and hands
//! bytes to a [`Sink`] supplied by the caller.  Printing is driven by an
//! output mode:
//!
//! - `Frac` prints `num/den` (just `num` for integers);
//! - `Int` prints the rounded integer, marked with `~` when inexact;
//! - `Real` prints a fixed number of fractional digits, marked with `~`
//!   when the value does not terminate within them;
//! - `Exp` prints `d.ddd...e±n`;
//! - `RealAuto` picks `Real` while the exponent is within the digit
//!   budget and falls back to `Exp` outside it;
//! - `Hex`, `Octal` and `Binary` print numerator and denominator in that
//!   radix.
//!
//! A configured secondary mode is appended as a comment, the way an
//! interactive session shows both views of a value.

use crate::config::{self, Config};
use crate::integer::Int;
use crate::rational::Rat;

/// Byte-at-a-time output target for the emission routines.
pub trait Sink {
    /// Emits one character.
    fn put_char(&mut self, ch: char);

    /// Emits a string.
    fn put_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.put_char(ch);
        }
    }

    /// Emits `s` padded with spaces to `width` columns: leading spaces
    /// for positive widths, trailing for negative ones.
    fn fill(&mut self, s: &str, width: i64) {
        if width > 0 {
            let pad = (width as usize).saturating_sub(s.chars().count());
            for _ in 0..pad {
                self.put_char(' ');
            }
            self.put_str(s);
        } else {
            self.put_str(s);
            let pad = (width.unsigned_abs() as usize).saturating_sub(s.chars().count());
            for _ in 0..pad {
                self.put_char(' ');
            }
        }
    }
}

impl Sink for String {
    fn put_char(&mut self, ch: char) {
        self.push(ch);
    }

    fn put_str(&mut self, s: &str) {
        self.push_str(s);
    }
}

/// Output notation for [`emit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutMode {
    /// Whatever the configuration says.
    Default,
    /// `num/den` fraction notation.
    Frac,
    /// Rounded integer.
    Int,
    /// Fixed fractional digits.
    Real,
    /// `Real` while small, `Exp` when the exponent runs away.
    RealAuto,
    /// Scientific notation.
    Exp,
    /// Hexadecimal numerator and denominator.
    Hex,
    /// Octal numerator and denominator.
    Octal,
    /// Binary numerator and denominator.
    Binary,
}

/// Emits `q` under the current process configuration.
pub fn emit(q: &Rat, mode: OutMode, digits: u32, sink: &mut dyn Sink) {
    let cfg = config::current();
    emit_with(q, mode, digits, sink, &cfg);
}

/// Formats `q` into a fresh string.
pub fn to_string(q: &Rat, mode: OutMode, digits: u32) -> String {
    let mut s = String::new();
    emit(q, mode, digits, &mut s);
    s
}

/// Emits `q` under an explicit configuration.
pub fn emit_with(q: &Rat, mode: OutMode, digits: u32, sink: &mut dyn Sink, cfg: &Config) {
    let (mode, second) = match mode {
        OutMode::Default => (cfg.outmode, cfg.outmode2),
        other => (other, None),
    };
    emit_mode(q, mode, digits, sink, cfg);
    if let Some(second) = second {
        sink.put_str(" /* ");
        emit_mode(q, second, digits, sink, cfg);
        sink.put_str(" */");
    }
}

fn emit_mode(q: &Rat, mode: OutMode, digits: u32, sink: &mut dyn Sink, cfg: &Config) {
    match mode {
        OutMode::Default | OutMode::Frac => {
            q.num().write_decimal(0, 0, cfg.leadzero, sink);
            if q.is_frac() {
                sink.put_char('/');
                q.den().write_decimal(0, 0, cfg.leadzero, sink);
            }
        }
        OutMode::Int => {
            if cfg.tilde_ok && q.is_frac() {
                sink.put_char('~');
            }
            print_int(q, 0, sink, cfg);
        }
        OutMode::Real => {
            let prec = q.dec_places();
            let inexact = prec.is_none() || prec.unwrap_or(0) > digits as i64;
            if inexact && cfg.tilde_ok {
                sink.put_char('~');
            }
            let prec = if cfg.fullzero || inexact {
                digits as i64
            } else {
                prec.unwrap_or(0)
            };
            print_real(q, 0, prec, sink, cfg);
        }
        OutMode::Exp => {
            if q.is_zero() {
                sink.put_char('0');
                return;
            }
            let exp = match q.abs().ilog10() {
                Ok(v) => v,
                Err(_) => 0,
            };
            if exp == 0 {
                emit_mode(q, OutMode::Real, digits, sink, cfg);
                return;
            }
            let scaled = q.mul(&Rat::tenth_to(exp));
            emit_mode(&scaled, OutMode::Real, digits, sink, cfg);
            sink.put_str(&format!("e{exp}"));
        }
        OutMode::RealAuto => {
            if q.is_zero() {
                emit_mode(q, OutMode::Real, digits, sink, cfg);
                return;
            }
            let p = if cfg.outdigits != 0 { cfg.outdigits as i64 } else { 1 };
            let exp = match q.abs().ilog10() {
                Ok(v) => v,
                Err(_) => 0,
            };
            if p > exp && exp >= -p {
                emit_mode(q, OutMode::Real, (p - 1 - exp).max(0) as u32, sink, cfg);
            } else {
                emit_mode(q, OutMode::Exp, (p - 1).max(0) as u32, sink, cfg);
            }
        }
        OutMode::Hex => {
            q.num().write_hex(0, sink);
            if q.is_frac() {
                sink.put_char('/');
                q.den().write_hex(0, sink);
            }
        }
        OutMode::Octal => {
            q.num().write_octal(0, sink);
            if q.is_frac() {
                sink.put_char('/');
                q.den().write_octal(0, sink);
            }
        }
        OutMode::Binary => {
            q.num().write_binary(0, sink);
            if q.is_frac() {
                sink.put_char('/');
                q.den().write_binary(0, sink);
            }
        }
    }
}

/// Fixed-point form: `precision` digits after the point.
fn print_real(q: &Rat, width: i64, precision: i64, sink: &mut dyn Sink, cfg: &Config) {
    let scale = Int::tenpow(precision);
    let z = q.num().mul(&scale);
    let z = if q.is_frac() {
        match z.quo(q.den(), cfg.outround) {
            Ok(v) => v,
            Err(_) => return,
        }
    } else {
        z
    };
    if q.is_negative() && z.is_zero() {
        sink.put_char('-');
    }
    z.write_decimal(precision, width, cfg.leadzero, sink);
}

/// Rounded integer form.
fn print_int(q: &Rat, width: i64, sink: &mut dyn Sink, cfg: &Config) {
    if q.is_frac() {
        if let Ok(z) = q.num().quo(q.den(), cfg.outround) {
            z.write_decimal(0, width, cfg.leadzero, sink);
        }
    } else {
        q.num().write_decimal(0, width, cfg.leadzero, sink);
    }
}
