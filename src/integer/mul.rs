//! Full multiply and square
//!
//! Small operands use the schoolbook inner loop.  Above the configured
//! crossover the routines split each operand at `S = ceil(len/2)` limbs
//! and recurse on three half-size products:
//!
//! ```text
//! (A*S + B) * (C*S + D) = (S^2+S)*A*C + S*(A-B)*(D-C) + (S+1)*B*D
//! (A*S + B)^2           = (S^2+S)*A^2 + (S+1)*B^2     - S*(A-B)^2
//! ```
//!
//! The combination runs as in-place add/sub passes over the answer array.
//! Each routine owns a thread-local scratch buffer for the intermediate
//! products; it grows ~100 limbs beyond the largest request and never
//! shrinks.  All sub-product bookkeeping is done with index offsets so the
//! answer buffer is only ever borrowed once.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::ops::Mul;

use crate::config;
use crate::limb::{BASE1, BASEB, Limb, Wide};

use super::{Int, cmp_limbs};

thread_local! {
    static MUL_SCRATCH: RefCell<Vec<Limb>> = const { RefCell::new(Vec::new()) };
    static SQUARE_SCRATCH: RefCell<Vec<Limb>> = const { RefCell::new(Vec::new()) };
}

/// Grows a scratch buffer to at least `need` limbs, with headroom.
fn reserve_scratch(buf: &mut Vec<Limb>, need: usize) {
    if buf.len() < need {
        let need = need + 100;
        tracing::trace!(limbs = need, "growing multiply scratch buffer");
        buf.resize(need, 0);
    }
}

impl Int {
    /// Multiplies two integers.
    pub fn mul(&self, other: &Int) -> Int {
        if self.is_zero() || other.is_zero() {
            return Int::zero();
        }
        let neg = self.neg != other.neg;
        if self.is_unit() {
            return other.with_sign(neg);
        }
        if other.is_unit() {
            return self.with_sign(neg);
        }
        let len = self.limbs.len().max(other.limbs.len()) * 2 + 64;
        let mut ans = vec![0 as Limb; self.limbs.len() + other.limbs.len() + 2];
        let used = MUL_SCRATCH.with(|cell| {
            let mut scratch = cell.borrow_mut();
            reserve_scratch(&mut scratch, len);
            domul(&self.limbs, &other.limbs, &mut ans, &mut scratch)
        });
        ans.truncate(used);
        Int::from_raw(ans, neg)
    }

    /// Squares an integer.
    pub fn square(&self) -> Int {
        if self.is_zero() {
            return Int::zero();
        }
        if self.is_unit() {
            return Int::one();
        }
        let len = 3 * self.limbs.len() + 32;
        let mut ans = vec![0 as Limb; (self.limbs.len() + 2) * 2];
        let used = SQUARE_SCRATCH.with(|cell| {
            let mut scratch = cell.borrow_mut();
            reserve_scratch(&mut scratch, len);
            dosquare(&self.limbs, &mut ans, &mut scratch)
        });
        ans.truncate(used);
        Int::from_raw(ans, false)
    }
}

impl Mul for &Int {
    type Output = Int;

    fn mul(self, rhs: &Int) -> Int {
        Int::mul(self, rhs)
    }
}

impl Mul for Int {
    type Output = Int;

    fn mul(self, rhs: Int) -> Int {
        Int::mul(&self, &rhs)
    }
}

/// Effective length of a limb slice with top zeroes ignored.
fn trimmed_len(v: &[Limb]) -> usize {
    let mut n = v.len();
    while n > 1 && v[n - 1] == 0 {
        n -= 1;
    }
    n
}

/// Adds `src` into `dst[at..]`, propagating the carry.
fn add_at(dst: &mut [Limb], at: usize, src: &[Limb]) {
    let mut carry: Wide = 0;
    let mut i = at;
    for &s in src {
        let sum = dst[i] as Wide + s as Wide + carry;
        dst[i] = sum as Limb;
        carry = sum >> BASEB;
        i += 1;
    }
    while carry != 0 && i < dst.len() {
        let sum = dst[i] as Wide + carry;
        dst[i] = sum as Limb;
        carry = sum >> BASEB;
        i += 1;
    }
}

/// Subtracts `src` from `dst[at..]`; the running value never goes negative.
fn sub_at(dst: &mut [Limb], at: usize, src: &[Limb]) {
    let mut carry: Wide = 0;
    let mut i = at;
    for &s in src {
        let v = BASE1 - dst[i] as Wide + s as Wide + carry;
        dst[i] = (BASE1 - (v as Limb as Wide)) as Limb;
        carry = v >> BASEB;
        i += 1;
    }
    while carry != 0 && i < dst.len() {
        let v = BASE1 - dst[i] as Wide + carry;
        dst[i] = (BASE1 - (v as Limb as Wide)) as Limb;
        carry = v >> BASEB;
        i += 1;
    }
}

/// Writes `|a - b|` into `out`, returning its trimmed length and whether
/// the difference was negative.
fn abs_diff_into(a: &[Limb], b: &[Limb], out: &mut [Limb]) -> (usize, bool) {
    let an = trimmed_len(a);
    let bn = trimmed_len(b);
    let neg = match cmp_limbs(&a[..an], &b[..bn]) {
        Ordering::Less => true,
        Ordering::Equal => {
            out[0] = 0;
            return (1, false);
        }
        Ordering::Greater => false,
    };
    let (big, small) = if neg { (&b[..bn], &a[..an]) } else { (&a[..an], &b[..bn]) };
    let mut carry: Wide = 0;
    for i in 0..big.len() {
        let s = if i < small.len() { small[i] as Wide } else { 0 };
        let v = BASE1 - big[i] as Wide + s + carry;
        out[i] = (BASE1 - (v as Limb as Wide)) as Limb;
        carry = v >> BASEB;
    }
    (trimmed_len(&out[..big.len()]), neg)
}

/// Schoolbook product of `v1` and `v2` into `ans`.
///
/// `ans` must hold at least `size1 + size2` limbs; returns the trimmed
/// result length.
fn schoolbook(v1: &[Limb], v2: &[Limb], ans: &mut [Limb]) -> usize {
    let size1 = v1.len();
    let size2 = v2.len();
    let total = size1 + size2;
    ans[size1..total].fill(0);

    // first partial product initializes the low words
    let digit = v2[0] as Wide;
    let mut carry: Wide = 0;
    for i in 0..size1 {
        let p = v1[i] as Wide * digit + carry;
        ans[i] = p as Limb;
        carry = p >> BASEB;
    }
    ans[size1] = carry as Limb;

    // remaining digits accumulate into place
    for (j, &d2) in v2.iter().enumerate().skip(1) {
        if d2 == 0 {
            continue;
        }
        let digit = d2 as Wide;
        let mut carry: Wide = 0;
        let mut k = j;
        for &d1 in v1 {
            let p = d1 as Wide * digit + ans[k] as Wide + carry;
            ans[k] = p as Limb;
            carry = p >> BASEB;
            k += 1;
        }
        while carry != 0 {
            let p = ans[k] as Wide + carry;
            ans[k] = p as Limb;
            carry = p >> BASEB;
            k += 1;
        }
    }
    trimmed_len(&ans[..total])
}

/// Recursive multiply; `ans` needs `size1 + size2 + 1` limbs of room.
fn domul(v1: &[Limb], v2: &[Limb], ans: &mut [Limb], temp: &mut [Limb]) -> usize {
    let size1 = trimmed_len(v1);
    let size2 = trimmed_len(v2);
    let v1 = &v1[..size1];
    let v2 = &v2[..size2];
    if (size1 == 1 && v1[0] == 0) || (size2 == 1 && v2[0] == 0) {
        ans[0] = 0;
        return 1;
    }
    let (v1, v2, size1, size2) = if size1 < size2 {
        (v2, v1, size2, size1)
    } else {
        (v1, v2, size1, size2)
    };
    if size2 < config::mul_threshold() {
        return schoolbook(v1, v2, ans);
    }

    let total = size1 + size2;
    let shift = size1.div_ceil(2);
    let (mine, rest) = temp.split_at_mut(2 * shift + 1);

    // If the smaller operand has no high half, use (A*S + B)*D directly.
    if size2 <= shift {
        let len = domul(&v1[..shift], v2, ans, rest);
        ans[len..total].fill(0);
        let len = domul(&v1[shift..], v2, mine, rest);
        add_at(ans, shift, &mine[..len]);
        return trimmed_len(&ans[..total]);
    }

    // abs(A - B) at position 0, abs(D - C) at position shift
    let (ab_len, mut neg) = abs_diff_into(&v1[shift..], &v1[..shift], ans);
    let ab_end = ab_len;
    let (dc_len, dc_neg) = abs_diff_into(&v2[..shift], &v2[shift..], &mut ans[shift..]);
    if dc_neg {
        neg = !neg;
    }

    // (A-B)*(D-C) into the scratch region
    let abdc_len = {
        let (ab, dc) = ans.split_at(shift);
        domul(&ab[..ab_end], &dc[..dc_len], mine, rest)
    };

    // B*D and A*C into their final positions, zero padding between
    let len = domul(&v1[..shift], &v2[..shift], ans, rest);
    ans[len..2 * shift].fill(0);
    let len = {
        let region = &mut ans[2 * shift..];
        domul(&v1[shift..], &v2[shift..], region, rest)
    };
    ans[2 * shift + len..total + 1].fill(0);

    // Fold the high half of B*D and the low half of A*C into both of the
    // other positions they are needed at.  The two additions share their
    // sources and destinations, so one pass writes the identical sum to
    // both places; the final carry is applied to A*C later.
    let mut carry_acbd: Wide = 0;
    for i in 0..shift {
        let sum = ans[shift + i] as Wide + ans[2 * shift + i] as Wide + carry_acbd;
        ans[shift + i] = sum as Limb;
        ans[2 * shift + i] = sum as Limb;
        carry_acbd = sum >> BASEB;
    }

    // high half of A*C into A*C's low position
    let mut carry: Wide = carry_acbd;
    let mut i = 2 * shift;
    let hi_len = total - 3 * shift;
    for k in 0..hi_len {
        let sum = ans[3 * shift + k] as Wide + ans[i] as Wide + carry;
        ans[i] = sum as Limb;
        carry = sum >> BASEB;
        i += 1;
    }
    while carry != 0 && i < ans.len() {
        let sum = ans[i] as Wide + carry;
        ans[i] = sum as Limb;
        carry = sum >> BASEB;
        i += 1;
    }

    // low half of B*D into position shift
    let mut carry: Wide = 0;
    for k in 0..shift {
        let sum = ans[k] as Wide + ans[shift + k] as Wide + carry;
        ans[shift + k] = sum as Limb;
        carry = sum >> BASEB;
    }
    let mut i = 2 * shift;
    while carry != 0 && i < ans.len() {
        let sum = ans[i] as Wide + carry;
        ans[i] = sum as Limb;
        carry = sum >> BASEB;
        i += 1;
    }

    // delayed carry from the shared pass
    let mut carry = carry_acbd;
    let mut i = 3 * shift;
    while carry != 0 && i < ans.len() {
        let sum = ans[i] as Wide + carry;
        ans[i] = sum as Limb;
        carry = sum >> BASEB;
        i += 1;
    }

    // finally add or subtract (A-B)*(D-C) at position shift
    if neg {
        sub_at(ans, shift, &mine[..abdc_len]);
    } else {
        add_at(ans, shift, &mine[..abdc_len]);
    }

    trimmed_len(&ans[..total])
}

/// Schoolbook square: cross products once, doubled, plus the diagonal.
fn schoolbook_square(v: &[Limb], ans: &mut [Limb]) -> usize {
    let size = v.len();
    let total = 2 * size;
    ans[..total].fill(0);

    for i in 0..size {
        let digit = v[i] as Wide;
        if digit == 0 {
            continue;
        }
        let mut carry: Wide = 0;
        let mut k = 2 * i + 1;
        for &other in &v[i + 1..] {
            let p = digit * other as Wide + ans[k] as Wide + carry;
            ans[k] = p as Limb;
            carry = p >> BASEB;
            k += 1;
        }
        while carry != 0 {
            let p = ans[k] as Wide + carry;
            ans[k] = p as Limb;
            carry = p >> BASEB;
            k += 1;
        }
    }

    // double the cross products
    let mut carry: Wide = 0;
    for slot in ans[..total].iter_mut() {
        let d = *slot as Wide;
        let sum = d + d + carry;
        *slot = sum as Limb;
        carry = sum >> BASEB;
    }

    // add the squares of each limb
    let mut carry: Wide = 0;
    for (i, &digit) in v.iter().enumerate() {
        let d = digit as Wide;
        let p = d * d + ans[2 * i] as Wide + carry;
        ans[2 * i] = p as Limb;
        carry = p >> BASEB;
        let p = ans[2 * i + 1] as Wide + carry;
        ans[2 * i + 1] = p as Limb;
        carry = p >> BASEB;
    }
    let mut k = total;
    while carry != 0 && k < ans.len() {
        let p = ans[k] as Wide + carry;
        ans[k] = p as Limb;
        carry = p >> BASEB;
        k += 1;
    }
    trimmed_len(&ans[..total])
}

/// Recursive square; `ans` needs `2 * size + 1` limbs of room.
fn dosquare(v: &[Limb], ans: &mut [Limb], temp: &mut [Limb]) -> usize {
    let size = trimmed_len(v);
    let v = &v[..size];
    if size < config::square_threshold() {
        return schoolbook_square(v, ans);
    }

    let total = 2 * size;
    let size_a = size / 2;
    let size_b = size - size_a;
    let shift = size_b;
    let (mine, rest) = temp.split_at_mut(3 * (size + 1) / 2);

    // B^2 low, A^2 high
    let len = dosquare(&v[..size_b], ans, rest);
    ans[len..2 * shift].fill(0);
    let len = {
        let region = &mut ans[2 * shift..];
        dosquare(&v[size_b..], region, rest)
    };
    ans[2 * shift + len..total + 1].fill(0);

    // A^2 + B^2 into scratch, then added back at position shift
    let mut sum_len = {
        let aa = &ans[2 * shift..total];
        let bb = &ans[..2 * shift];
        let aa_len = trimmed_len(aa);
        let bb_len = trimmed_len(bb);
        let (big, small) = if aa_len >= bb_len { (&aa[..aa_len], &bb[..bb_len]) } else { (&bb[..bb_len], &aa[..aa_len]) };
        let mut carry: Wide = 0;
        for i in 0..big.len() {
            let s = if i < small.len() { small[i] as Wide } else { 0 };
            let sum = big[i] as Wide + s + carry;
            mine[i] = sum as Limb;
            carry = sum >> BASEB;
        }
        let mut n = big.len();
        if carry != 0 {
            mine[n] = carry as Limb;
            n += 1;
        }
        n
    };
    sum_len = trimmed_len(&mine[..sum_len]);
    add_at(ans, shift, &mine[..sum_len]);

    // (A - B)^2 subtracted at position shift
    let (ab, abab) = mine.split_at_mut(shift);
    let (ab_len, _) = abs_diff_into(&v[size_b..], &v[..size_b], ab);
    let abab_len = dosquare(&ab[..ab_len], abab, rest);
    sub_at(ans, shift, &abab[..abab_len]);

    trimmed_len(&ans[..total])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factorial(n: u64) -> Int {
        let mut r = Int::one();
        for i in 2..=n {
            r = r.mul_small(i as i64);
        }
        r
    }

    #[test]
    fn small_products() {
        let a = Int::from(0xffff_ffffu64);
        assert_eq!(Int::mul(&a, &a).to_u64(), 0xffff_ffff * 0xffff_ffffu64);
        assert_eq!(Int::mul(&Int::from(-7i64), &Int::from(6i64)).to_i64(), -42);
        assert_eq!(Int::mul(&Int::zero(), &a), Int::zero());
    }

    #[test]
    fn square_matches_mul() {
        let mut v = Int::from(0x1234_5678_9abc_def0u64);
        for _ in 0..6 {
            assert_eq!(v.square(), Int::mul(&v, &v));
            v = Int::mul(&v, &v.add(&Int::one()));
        }
    }

    #[test]
    fn subdivision_agrees_with_schoolbook() {
        // 20!^16 is large enough to push the recursive path
        let mut a = factorial(20);
        for _ in 0..4 {
            a = a.square();
        }
        let b = a.add(&Int::one());
        let prod = Int::mul(&a, &b);
        assert_eq!(prod.sub(&a.square()), a);
    }

    #[test]
    fn distributivity_across_sizes() {
        let a = factorial(40);
        let b = factorial(30);
        let c = Int::from(987_654_321u64);
        let left = Int::mul(&a.add(&b), &c);
        let right = Int::mul(&a, &c).add(&Int::mul(&b, &c));
        assert_eq!(left, right);
    }
}
