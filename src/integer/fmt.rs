//! Radix conversion for integers
//!
//! Decimal output works by splitting the value at powers `10^(2^k)` and
//! walking the resulting tree left to right, so each digit costs a small
//! division rather than one against the whole value.  The power-of-two
//! radices read bit groups straight out of the limbs.
//!
//! Parsing accepts an optional sign and auto-detects `0x` hex, `0b`
//! binary and leading-zero octal; embedded periods are skipped so the
//! rational layer can reuse the scanner for its real notation.

use std::fmt;
use std::str::FromStr;

use crate::emit::Sink;
use crate::error::MathError;
use crate::round::Round;

use super::Int;

impl Int {
    /// Writes the value in decimal with `decimals` fractional places and
    /// right-aligned into `width` columns when positive.
    ///
    /// With `decimals = 2` the value 345 prints as `3.45`; `leadzero`
    /// controls the `0` before a leading decimal point.
    pub fn write_decimal(&self, decimals: i64, width: i64, leadzero: bool, sink: &mut dyn Sink) {
        let decimals = decimals.max(0);
        let width = width.max(0);
        let neg = self.neg;
        let z = self.abs();

        // depth of the 10^(2^k) splitting tree
        let mut depth = 0usize;
        loop {
            let p = Int::tenpow(1i64 << depth);
            if p.limb_len() > z.limb_len() || p.cmp_abs(&z).is_gt() {
                break;
            }
            depth += 1;
        }

        let mut left: Vec<Int> = vec![Int::zero(); depth + 1];
        let mut right: Vec<Option<Int>> = vec![None; depth + 1];
        left[0] = z;
        let mut n = 0usize;
        let mut digits: i64 = 1;
        let mut output = false;
        let mut putpoint: i64 = 0;
        let mut leadspaces = width - neg as i64 - (decimals > 0) as i64;

        loop {
            while n < depth {
                let i = depth - n - 1;
                let p = Int::tenpow(1i64 << i);
                let (quo, rem) = match left[n].divmod(&p, Round::DOWN) {
                    Ok(v) => v,
                    Err(_) => return,
                };
                if !quo.is_zero() {
                    digits += 1 << i;
                }
                n += 1;
                left[n] = quo;
                right[n] = Some(rem);
            }
            let digit = left[n].limbs[0] as i64;
            if output || digit != 0 || n == 0 {
                if !output {
                    output = true;
                    if decimals < digits {
                        leadspaces -= digits;
                    } else {
                        leadspaces -= decimals + leadzero as i64;
                    }
                    while leadspaces > 0 {
                        sink.put_char(' ');
                        leadspaces -= 1;
                    }
                    if neg {
                        sink.put_char('-');
                    }
                    if decimals > 0 {
                        putpoint = digits - decimals;
                        if putpoint <= 0 {
                            if leadzero {
                                sink.put_char('0');
                            }
                            sink.put_char('.');
                            while putpoint < 0 {
                                sink.put_char('0');
                                putpoint += 1;
                            }
                            putpoint = 0;
                        }
                    }
                }
                sink.put_char((b'0' + digit as u8) as char);
                putpoint -= 1;
                if putpoint == 0 {
                    sink.put_char('.');
                }
            }
            loop {
                match right[n].take() {
                    Some(rem) => {
                        left[n] = rem;
                        break;
                    }
                    None => {
                        if n == 0 {
                            return;
                        }
                        n -= 1;
                    }
                }
            }
        }
    }

    /// Writes the magnitude in a power-of-two radix with `2^group` digit
    /// values, after the given prefix.
    fn write_pow2(&self, group: u32, prefix: &str, small: u32, sink: &mut dyn Sink) {
        if self.neg {
            sink.put_char('-');
        }
        if self.is_tiny() && self.limbs[0] <= small {
            sink.put_char((b'0' + self.limbs[0] as u8) as char);
            return;
        }
        sink.put_str(prefix);
        let bits = self.bit_len();
        let ndigits = bits.div_ceil(group as u64);
        for i in (0..ndigits).rev() {
            let mut digit = 0u32;
            for b in (0..group).rev() {
                let pos = i * group as u64 + b as u64;
                digit = (digit << 1) | self.bit(pos) as u32;
            }
            let ch = char::from_digit(digit, 16).unwrap_or('0');
            sink.put_char(ch);
        }
    }

    /// Writes the value in hexadecimal with a `0x` prefix.
    pub fn write_hex(&self, width: i64, sink: &mut dyn Sink) {
        if width != 0 {
            let mut s = String::new();
            self.write_hex(0, &mut s);
            sink.fill(&s, width);
            return;
        }
        self.write_pow2(4, "0x", 9, sink);
    }

    /// Writes the value in octal with a leading zero.
    pub fn write_octal(&self, width: i64, sink: &mut dyn Sink) {
        if width != 0 {
            let mut s = String::new();
            self.write_octal(0, &mut s);
            sink.fill(&s, width);
            return;
        }
        self.write_pow2(3, "0", 7, sink);
    }

    /// Writes the value in binary with a `0b` prefix.
    pub fn write_binary(&self, width: i64, sink: &mut dyn Sink) {
        if width != 0 {
            let mut s = String::new();
            self.write_binary(0, &mut s);
            sink.fill(&s, width);
            return;
        }
        self.write_pow2(1, "0b", 1, sink);
    }

    /// Scans an integer, auto-detecting the radix and skipping periods.
    ///
    /// Scanning stops at the first character that cannot extend the
    /// value; the digits consumed so far form the result.
    pub(crate) fn scan(s: &str) -> Int {
        let bytes = s.as_bytes();
        let mut i = 0;
        let mut minus = false;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            minus = bytes[i] == b'-';
            i += 1;
        }
        let mut shift = 0i64;
        if i < bytes.len() && bytes[i] == b'0' {
            i += 1;
            if i < bytes.len() {
                match bytes[i] {
                    b'0'..=b'7' => shift = 3,
                    b'x' | b'X' => {
                        shift = 4;
                        i += 1;
                    }
                    b'b' | b'B' => {
                        shift = 1;
                        i += 1;
                    }
                    _ => {}
                }
            }
        }
        let mut z = Int::zero();
        while i < bytes.len() {
            let c = bytes[i];
            let digit = match c {
                b'0'..=b'9' => (c - b'0') as u32,
                b'a'..=b'f' if shift == 4 => (c - b'a' + 10) as u32,
                b'A'..=b'F' if shift == 4 => (c - b'A' + 10) as u32,
                b'.' => {
                    i += 1;
                    continue;
                }
                _ => break,
            };
            if shift != 0 {
                if digit >= 1 << shift {
                    break;
                }
                z = z.shift(shift);
            } else {
                z = z.mul_small(10);
            }
            z = z.add(&Int::from(digit));
            i += 1;
        }
        if minus { z.negated() } else { z }
    }
}

impl FromStr for Int {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Int, MathError> {
        let body = s.strip_prefix(['+', '-']).unwrap_or(s);
        let valid = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
            !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit())
        } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
            !bin.is_empty() && bin.bytes().all(|b| b == b'0' || b == b'1')
        } else if body.starts_with('0') && body.len() > 1 {
            body.bytes().all(|b| (b'0'..=b'7').contains(&b))
        } else {
            !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
        };
        if !valid {
            return Err(MathError::OutOfDomain("integer literal"));
        }
        Ok(Int::scan(s))
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        self.write_decimal(0, 0, true, &mut s);
        f.pad_integral(!self.neg, "", s.trim_start_matches('-'))
    }
}

impl fmt::LowerHex for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        self.write_hex(0, &mut s);
        f.write_str(&s)
    }
}

impl fmt::Octal for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        self.write_octal(0, &mut s);
        f.write_str(&s)
    }
}

impl fmt::Binary for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        self.write_binary(0, &mut s);
        f.write_str(&s)
    }
}
