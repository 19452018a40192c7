//! Rational comparison
//!
//! Ordering short-circuits three times before doing real work: on the
//! signs, on zero, and on the limb counts of the two cross products —
//! if the counts differ by two or more the larger product wins without
//! being computed.  Only then does the full cross multiply run, and each
//! side skips its multiply when a factor is one.

use std::cmp::Ordering;

use crate::integer::Int;

use super::Rat;

impl Rat {
    /// Three-way comparison against a machine integer.
    pub fn cmp_int(&self, n: i64) -> Ordering {
        if self.is_zero() {
            return 0.cmp(&n);
        }
        if n == 0 {
            return if self.is_negative() { Ordering::Less } else { Ordering::Greater };
        }
        if self.is_negative() != (n < 0) {
            return if n < 0 { Ordering::Greater } else { Ordering::Less };
        }
        let z = Int::from(n);
        if self.is_frac() {
            self.num.cmp(&self.den.mul(&z))
        } else {
            self.num.cmp(&z)
        }
    }

    /// True when the value equals a machine integer.
    pub fn eq_int(&self, n: i64) -> bool {
        self.is_int() && self.num.to_i64() == n && !self.num.ge_pow2(63)
    }

    /// Sign of `|self - other| - epsilon`: negative when the two values
    /// agree within epsilon, zero when the difference is exactly epsilon.
    pub fn near(&self, other: &Rat, epsilon: &Rat) -> i32 {
        let eps = epsilon.abs();
        if self == other {
            return if eps.is_zero() { 0 } else { -1 };
        }
        if eps.is_zero() {
            return 1;
        }
        let diff = self.sub(other).abs();
        match diff.cmp(&eps) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    /// True when `other` divides `self` to an integer multiple.
    pub fn divides(&self, other: &Rat) -> bool {
        if self.is_zero() {
            return true;
        }
        if other.is_zero() {
            return false;
        }
        if self.is_int() && other.is_int() {
            if other.is_unit() {
                return true;
            }
            return self.num.divisible_by(&other.num);
        }
        self.num.divisible_by(&other.num) && other.den.divisible_by(&self.den)
    }
}

impl PartialOrd for Rat {
    fn partial_cmp(&self, other: &Rat) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rat {
    fn cmp(&self, other: &Rat) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => return Ordering::Greater,
            (true, false) => return Ordering::Less,
            _ => {}
        }
        if other.is_zero() {
            return if self.is_zero() { Ordering::Equal } else if self.is_negative() { Ordering::Less } else { Ordering::Greater };
        }
        if self.is_zero() {
            return if other.is_negative() { Ordering::Greater } else { Ordering::Less };
        }

        // limb counts of the cross products decide all lopsided cases
        let flip = self.is_negative();
        let wc1 = self.num.limb_len() + other.den.limb_len();
        let wc2 = other.num.limb_len() + self.den.limb_len();
        if wc1 + 1 < wc2 {
            return if flip { Ordering::Greater } else { Ordering::Less };
        }
        if wc2 + 1 < wc1 {
            return if flip { Ordering::Less } else { Ordering::Greater };
        }

        let left = if other.den.is_unit() {
            self.num.clone()
        } else if self.num.is_unit() && !self.num.is_negative() {
            other.den.clone()
        } else {
            self.num.mul(&other.den)
        };
        let right = if self.den.is_unit() {
            other.num.clone()
        } else if other.num.is_unit() && !other.num.is_negative() {
            self.den.clone()
        } else {
            other.num.mul(&self.den)
        };
        left.cmp(&right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Rat {
        Rat::ratio(n, d).unwrap()
    }

    #[test]
    fn total_order() {
        let mut vals = [
            q(-7, 2),
            Rat::from(-1i64),
            q(-1, 3),
            Rat::zero(),
            q(1, 1000),
            Rat::half(),
            q(2, 3),
            Rat::one(),
            q(22, 7),
        ];
        let sorted = vals.to_vec();
        vals.reverse();
        vals.sort();
        assert_eq!(vals.to_vec(), sorted);
    }

    #[test]
    fn lopsided_shortcut() {
        // hugely different magnitudes resolve without a cross multiply
        let big = Rat::from_int(crate::Int::tenpow(50));
        let small = q(1, 7);
        assert!(small < big);
        assert!(big.negated() < small);
    }

    #[test]
    fn integer_comparison() {
        assert_eq!(q(7, 2).cmp_int(3), Ordering::Greater);
        assert_eq!(q(7, 2).cmp_int(4), Ordering::Less);
        assert_eq!(Rat::from(5i64).cmp_int(5), Ordering::Equal);
        assert!(Rat::from(5i64).eq_int(5));
        assert!(!Rat::half().eq_int(0));
    }

    #[test]
    fn nearness() {
        let eps = q(1, 100);
        assert_eq!(q(1, 3).near(&q(1, 3), &eps), -1);
        assert_eq!(q(1, 3).near(&q(1, 2), &eps), 1);
        assert_eq!(Rat::zero().near(&eps, &eps), 0);
    }

    #[test]
    fn divisibility() {
        assert!(Rat::from(12i64).divides(&Rat::from(3i64)));
        assert!(!Rat::from(12i64).divides(&Rat::from(5i64)));
        assert!(q(3, 2).divides(&q(1, 2)));
        assert!(!q(1, 2).divides(&q(1, 3)));
    }
}
