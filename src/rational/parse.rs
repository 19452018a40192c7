//! Scanning and parsing of rational literals
//!
//! Accepted forms, with an optional leading sign:
//!
//! ```text
//! 0x1f          hexadecimal integer
//! 0b101         binary integer
//! 017           octal integer
//! 123           decimal integer
//! 123/456       fraction (with the slash flag)
//! 1.25          real notation
//! 1.25e-3       exponential notation
//! 2i            imaginary suffix (with the imag flag; consumed, not kept)
//! ```
//!
//! [`scan`] validates and returns the number of bytes consumed, without
//! building a value — the expression parser uses it to find the end of a
//! literal.  [`Rat::from_text`] then builds the reduced value from a
//! scanned slice.

use std::str::FromStr;

use crate::error::{MathError, Result};
use crate::integer::Int;

use super::Rat;

/// Grammar switches for [`scan`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanFlags {
    /// Accept `num/den` fractions.
    pub slash: bool,
    /// Accept (and consume) a trailing `i`.
    pub imag: bool,
}

impl ScanFlags {
    /// Fractions allowed, imaginary suffix not.
    pub fn slash() -> ScanFlags {
        ScanFlags { slash: true, imag: false }
    }
}

/// True for any character that would extend or invalidate a number.
fn breaks_number(b: u8, flags: ScanFlags) -> bool {
    b == b'.'
        || (b == b'/' && flags.slash)
        || b.is_ascii_alphanumeric()
}

/// Scans one numeric literal, returning the bytes consumed, or `None`
/// when the text is not a number.
pub fn scan(s: &str, flags: ScanFlags) -> Option<usize> {
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        return None;
    }

    // an unsigned radix-prefixed integer, for numerator or denominator
    let scan_radix = |mut i: usize| -> Option<usize> {
        if i + 1 < b.len() && b[i] == b'0' && (b[i + 1] == b'x' || b[i + 1] == b'X') {
            i += 2;
            let start = i;
            while i < b.len() && b[i].is_ascii_hexdigit() {
                i += 1;
            }
            if i == start { None } else { Some(i) }
        } else if i + 1 < b.len() && b[i] == b'0' && (b[i + 1] == b'b' || b[i + 1] == b'B') {
            i += 2;
            let start = i;
            while i < b.len() && (b[i] == b'0' || b[i] == b'1') {
                i += 1;
            }
            if i == start { None } else { Some(i) }
        } else if i + 1 < b.len() && b[i] == b'0' && b[i + 1].is_ascii_digit() {
            while i < b.len() && (b'0'..=b'7').contains(&b[i]) {
                i += 1;
            }
            Some(i)
        } else {
            None
        }
    };
    if let Some(end) = scan_radix(i) {
        i = end;
        if flags.slash && i < b.len() && b[i] == b'/' {
            let den_start = i + 1;
            i = match scan_radix(den_start) {
                Some(end) => end,
                None => {
                    let mut j = den_start;
                    while j < b.len() && b[j].is_ascii_digit() {
                        j += 1;
                    }
                    if j == den_start {
                        return None;
                    }
                    j
                }
            };
        }
        if flags.imag && i < b.len() && (b[i] == b'i' || b[i] == b'I') {
            i += 1;
        }
        if i < b.len() && breaks_number(b[i], flags) {
            return None;
        }
        return Some(i);
    }

    // decimal, possibly a fraction, real, or exponential
    let digits_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    if flags.slash && i < b.len() && b[i] == b'/' {
        if i == digits_start {
            return None;
        }
        i += 1;
        let den_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == den_start {
            return None;
        }
        if flags.imag && i < b.len() && (b[i] == b'i' || b[i] == b'I') {
            i += 1;
        }
        if i < b.len() && breaks_number(b[i], flags) {
            return None;
        }
        return Some(i);
    }
    let mut any = i > digits_start;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        any = any || i > frac_start;
    }
    if !any {
        return None;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            return None;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }
    if flags.imag && i < b.len() && (b[i] == b'i' || b[i] == b'I') {
        i += 1;
    }
    if i < b.len() && breaks_number(b[i], flags) {
        return None;
    }
    Some(i)
}

impl Rat {
    /// Builds a rational from scanned text.
    ///
    /// The text must have passed [`scan`]; stray characters after a
    /// valid prefix are ignored here.
    pub(crate) fn from_text(s: &str) -> Result<Rat> {
        let bytes = s.as_bytes();
        let mut i = 0;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        // step over the numerator body in its own radix
        if i + 1 < bytes.len() && bytes[i] == b'0' && (bytes[i + 1] | 0x20) == b'x' {
            i += 2;
            while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                i += 1;
            }
        } else if i + 1 < bytes.len() && bytes[i] == b'0' && (bytes[i + 1] | 0x20) == b'b' {
            i += 2;
            while i < bytes.len() && (bytes[i] == b'0' || bytes[i] == b'1') {
                i += 1;
            }
        } else {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }

        let num = Int::scan(s);
        let mut den = Int::one();
        let mut exponent: i64 = 0;

        if i < bytes.len() && bytes[i] == b'/' {
            den = Int::scan(&s[i + 1..]);
        } else if i < bytes.len() && (bytes[i] == b'.' || (bytes[i] | 0x20) == b'e') {
            let mut decimals: i64 = 0;
            if bytes[i] == b'.' {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                    decimals += 1;
                }
            }
            if i < bytes.len() && (bytes[i] | 0x20) == b'e' {
                i += 1;
                let mut neg_exp = false;
                if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
                    neg_exp = bytes[i] == b'-';
                    i += 1;
                }
                let mut e: i64 = 0;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    e = e
                        .checked_mul(10)
                        .and_then(|v| v.checked_add((bytes[i] - b'0') as i64))
                        .ok_or(MathError::TooLarge("Exponent too large"))?;
                    i += 1;
                }
                exponent = if neg_exp { -e } else { e };
            }
            den = Int::tenpow(decimals);
        }

        let (num, den) = match exponent.cmp(&0) {
            std::cmp::Ordering::Greater => (num.mul(&Int::tenpow(exponent)), den),
            std::cmp::Ordering::Less => (num, den.mul(&Int::tenpow(-exponent))),
            std::cmp::Ordering::Equal => (num, den),
        };
        Rat::new(num, den)
    }
}

impl FromStr for Rat {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Rat> {
        match scan(s, ScanFlags::slash()) {
            Some(n) if n == s.len() => Rat::from_text(s),
            _ => Err(MathError::OutOfDomain("numeric literal")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Rat {
        Rat::ratio(n, d).unwrap()
    }

    #[test]
    fn scanning_lengths() {
        let f = ScanFlags::slash();
        assert_eq!(scan("123", f), Some(3));
        assert_eq!(scan("123/456", f), Some(7));
        assert_eq!(scan("1.25e-3", f), Some(7));
        assert_eq!(scan("0xff", f), Some(4));
        assert_eq!(scan("0b101", f), Some(5));
        assert_eq!(scan("017", f), Some(3));
        assert_eq!(scan("-42 + 1", f), Some(3));
        assert_eq!(scan("3.14)", f), Some(4));
        assert_eq!(scan("++1", f), None);
        assert_eq!(scan("abc", f), None);
        assert_eq!(scan("12ab", f), None);
        assert_eq!(scan("1.2.3", f), None);
        // without the slash flag the fraction stops at the slash
        let nf = ScanFlags::default();
        assert_eq!(scan("123/456", nf), Some(3));
    }

    #[test]
    fn imaginary_suffix() {
        let f = ScanFlags { slash: true, imag: true };
        assert_eq!(scan("2i", f), Some(2));
        assert_eq!(scan("3.5i", f), Some(4));
        assert_eq!(scan("2i", ScanFlags::slash()), None);
    }

    #[test]
    fn parsed_values() {
        assert_eq!("123".parse::<Rat>().unwrap(), Rat::from(123i64));
        assert_eq!("-123".parse::<Rat>().unwrap(), Rat::from(-123i64));
        assert_eq!("3/6".parse::<Rat>().unwrap(), Rat::half());
        assert_eq!("1.25".parse::<Rat>().unwrap(), q(5, 4));
        assert_eq!("-0.5".parse::<Rat>().unwrap(), q(-1, 2));
        assert_eq!("2.5e2".parse::<Rat>().unwrap(), Rat::from(250i64));
        assert_eq!("2.5e-2".parse::<Rat>().unwrap(), q(1, 40));
        assert_eq!("0x10".parse::<Rat>().unwrap(), Rat::from(16i64));
        assert_eq!("0b110".parse::<Rat>().unwrap(), Rat::from(6i64));
        assert_eq!("010".parse::<Rat>().unwrap(), Rat::from(8i64));
        assert_eq!(".5".parse::<Rat>().unwrap(), Rat::half());
        assert!("1/0".parse::<Rat>().is_err());
        assert!("".parse::<Rat>().is_err());
    }

    #[test]
    fn emission_round_trips() {
        use crate::emit::{OutMode, to_string};
        for text in ["397/37", "-5/3", "42", "1/1000000007"] {
            let v: Rat = text.parse().unwrap();
            let s = to_string(&v, OutMode::Frac, 20);
            assert_eq!(s.parse::<Rat>().unwrap(), v, "frac round trip of {text}");
        }
        let v: Rat = "22/7".parse().unwrap();
        for mode in [OutMode::Hex, OutMode::Octal, OutMode::Binary] {
            let s = to_string(&v, mode, 20);
            assert_eq!(s.parse::<Rat>().unwrap(), v, "radix round trip via {s}");
        }
    }
}
