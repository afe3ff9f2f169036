use std::cmp::Ordering;

use crate::bignum::arith::carrying_add;
use crate::bignum::{BigUnsigned, Limb, Workspace, LIMB_BITS};
use crate::error::Status;

/// Limb `i` of `limbs >> bits`, where `bits < LIMB_BITS`
fn shifted_limb(limbs: &[Limb], i: usize, bits: u32) -> Limb {
    let lo = limbs.get(i).copied().unwrap_or(0);
    if bits == 0 {
        return lo;
    }
    let hi = limbs.get(i + 1).copied().unwrap_or(0);
    lo >> bits | hi << (LIMB_BITS - bits)
}

/// Division and remainders
///
/// Dividing by zero saturates: the quotient becomes [`BigUnsigned::set_max`]
/// and the remainder zero, reported as [`Status::Saturated`].
impl BigUnsigned {
    /// Divide in place, returning the remainder
    pub fn div_u32(&mut self, divisor: u32) -> (u32, Status) {
        if divisor == 0 {
            self.saturate();
            return (0, Status::Saturated);
        }

        let divisor = divisor as u64;
        let mut rem = 0u64;
        for i in (0..self.len).rev() {
            let cur = rem << LIMB_BITS | self.limbs[i] as u64;
            self.limbs[i] = (cur / divisor) as Limb;
            rem = cur % divisor;
        }
        self.normalize();

        (rem as u32, Status::Exact)
    }

    /// Divide in place, returning the remainder
    pub fn div_u64(&mut self, divisor: u64) -> (u64, Status) {
        if divisor == 0 {
            self.saturate();
            return (0, Status::Saturated);
        }

        let divisor = divisor as u128;
        let mut rem = 0u128;
        for i in (0..self.len).rev() {
            let cur = rem << LIMB_BITS | self.limbs[i] as u128;
            self.limbs[i] = (cur / divisor) as Limb;
            rem = cur % divisor;
        }
        self.normalize();

        (rem as u64, Status::Exact)
    }

    /// Divide by `2^k`
    pub fn div_pow2(&mut self, k: u32) {
        self.shift_right(k);
    }

    /// Binary restoring long division, leaving the quotient in `self`
    pub fn div_big(&mut self, divisor: &Self, rem: &mut Self) -> Status {
        if let Some(status) = self.div_policy(divisor, rem) {
            return status;
        }

        // the first bit_length(divisor) - 1 bits can never reach the divisor
        let top = self.bit_length();
        let preload = divisor.bit_length() - 1;
        let start = top - preload;

        rem.copy_from(self);
        rem.shift_right(start);
        self.rem_pow2(start);
        self.len = start.div_ceil(LIMB_BITS) as usize;

        // quotient bit i only depends on dividend bits >= i, so it overwrites in place
        for bit in (0..start).rev() {
            let word = (bit / LIMB_BITS) as usize;
            let mask = 1 << (bit % LIMB_BITS);

            rem.shift_left(1);
            if self.limbs[word] & mask != 0 {
                rem.set_lowest_bit();
            }

            if *rem >= *divisor {
                let status = rem.sub_big(divisor);
                debug_assert!(status.is_exact());
                self.limbs[word] |= mask;
            } else {
                self.limbs[word] &= !mask;
            }
        }

        self.normalize();
        Status::Exact
    }

    /// Division by reduction against the nearest power of two above `divisor`.
    ///
    /// Fast when `divisor` sits just below a power of two; gives the same
    /// results as [`BigUnsigned::div_big`] for every input.
    pub fn div_big_fast(&mut self, divisor: &Self, rem: &mut Self) -> Status {
        let mut ws = Workspace::with_capacity(self.len + 1);
        self.div_big_fast_with(divisor, rem, &mut ws)
    }

    pub fn div_big_fast_with(
        &mut self,
        divisor: &Self,
        rem: &mut Self,
        ws: &mut Workspace,
    ) -> Status {
        if let Some(status) = self.div_policy(divisor, rem) {
            return status;
        }

        rem.copy_from(self);
        self.set_zero();

        let [high, delta, scratch, _] = ws.regs();
        rem.reduce_near_pow2(divisor, Some(self), high, delta, scratch);
        Status::Exact
    }

    /// Division by `2^k - 1` through repeated folding of the high bits
    pub fn div_pow2_minus_one(&mut self, k: u32, rem: &mut Self) -> Status {
        if k == 0 {
            self.saturate();
            rem.set_zero();
            return Status::Saturated;
        }

        rem.copy_from(self);
        self.set_zero();

        while rem.compare_pow2(k) != Ordering::Less {
            self.add_shifted_right(rem, k);
            rem.fold_pow2(k);
        }

        // the fold stops one short when the value is a multiple of the divisor
        if rem.compare_pow2_minus_one(k) == Ordering::Equal {
            self.increment();
            rem.set_zero();
        }

        Status::Exact
    }

    /// Keep the low `k` bits
    pub fn rem_pow2(&mut self, k: u32) {
        let words = (k / LIMB_BITS) as usize;
        let bits = k % LIMB_BITS;
        if words >= self.len {
            return;
        }

        let keep = if bits == 0 { words } else { words + 1 };
        if bits > 0 {
            self.limbs[words] &= (1 << bits) - 1;
        }
        self.limbs[keep..self.len].fill(0);
        self.len = keep;
        self.normalize();
    }

    /// Remainder modulo `2^k - 1`
    pub fn rem_pow2_minus_one(&mut self, k: u32) -> Status {
        if k == 0 {
            tracing::debug!("remainder by zero saturated");
            self.set_zero();
            return Status::Saturated;
        }

        while self.compare_pow2(k) != Ordering::Less {
            self.fold_pow2(k);
        }
        if self.compare_pow2_minus_one(k) == Ordering::Equal {
            self.set_zero();
        }

        Status::Exact
    }

    /// Remainder by power of two proximity reduction
    pub fn rem_big(&mut self, divisor: &Self) -> Status {
        let mut ws = Workspace::with_capacity(self.len + 1);
        self.rem_with(divisor, &mut ws)
    }

    pub fn rem_with(&mut self, divisor: &Self, ws: &mut Workspace) -> Status {
        if divisor.is_zero() {
            tracing::debug!("remainder by zero saturated");
            self.set_zero();
            return Status::Saturated;
        }
        if *self < *divisor {
            return Status::Exact;
        }

        let [high, delta, scratch, _] = ws.regs();
        self.reduce_near_pow2(divisor, None, high, delta, scratch);
        Status::Exact
    }

    /// Replace `self` with the quotient, discarding the remainder
    pub fn quotient(&mut self, divisor: &Self) -> Status {
        let mut rem = Self::with_capacity(divisor.len + 1);
        self.div_big(divisor, &mut rem)
    }

    fn saturate(&mut self) {
        tracing::debug!(limbs = self.capacity(), "division by zero saturated");
        self.set_max();
    }

    /// Settle the cases that need no arithmetic, `None` means divide for real
    fn div_policy(&mut self, divisor: &Self, rem: &mut Self) -> Option<Status> {
        if divisor.is_zero() {
            self.saturate();
            rem.set_zero();
            return Some(Status::Saturated);
        }

        match (*self).cmp(divisor) {
            Ordering::Less => {
                rem.copy_from(self);
                self.set_zero();
                Some(Status::Exact)
            }
            Ordering::Equal => {
                rem.set_zero();
                self.set_u32(1);
                Some(Status::Exact)
            }
            Ordering::Greater => None,
        }
    }

    /// Reduce `self` modulo `divisor` with `n = ceil_log2(divisor)`.
    ///
    /// Each round splits off `H = self >> n` and replaces `self` with
    /// `H * (2^n - divisor) + (self mod 2^n)`, adding `H` to `quotient`.
    fn reduce_near_pow2(
        &mut self,
        divisor: &Self,
        mut quotient: Option<&mut Self>,
        high: &mut Self,
        delta: &mut Self,
        scratch: &mut Self,
    ) {
        let n = divisor.ceil_log2();
        delta.set_zero();
        delta.add_pow2(n);
        let status = delta.sub_big(divisor);
        debug_assert!(status.is_exact());

        while self.compare_pow2(n) != Ordering::Less && *self > *divisor {
            high.copy_from(self);
            high.shift_right(n);
            if let Some(q) = quotient.as_deref_mut() {
                q.add_big(high);
            }

            high.mul_shift_add(delta, scratch);
            self.rem_pow2(n);
            self.add_big(high);
        }

        if *self >= *divisor {
            let status = self.sub_big(divisor);
            debug_assert!(status.is_exact());
            if let Some(q) = quotient {
                q.increment();
            }
        }
    }

    /// Add `src >> k` without materializing the shift
    fn add_shifted_right(&mut self, src: &Self, k: u32) {
        let words = (k / LIMB_BITS) as usize;
        let bits = k % LIMB_BITS;
        if words >= src.len {
            return;
        }

        let n = src.len - words;
        self.ensure_capacity(self.len.max(n) + 1);

        let mut carry = 0;
        for i in 0..n {
            let word = shifted_limb(&src.limbs, words + i, bits);
            (self.limbs[i], carry) = carrying_add(self.limbs[i], word, carry);
        }

        let mut i = n;
        while carry != 0 {
            if i == self.capacity() {
                self.ensure_capacity(i + 1);
            }
            (self.limbs[i], carry) = carrying_add(self.limbs[i], 0, carry);
            i += 1;
        }

        self.len = self.len.max(i);
        self.normalize();
    }

    /// `self = (self >> k) + (self mod 2^k)`, which keeps the value modulo `2^k - 1`
    fn fold_pow2(&mut self, k: u32) {
        let words = (k / LIMB_BITS) as usize;
        let bits = k % LIMB_BITS;
        let len = self.len;

        // limb i of the result reads limbs at or above i, so it is written in place
        let mut carry = 0;
        for i in 0..len {
            let high = shifted_limb(&self.limbs, words + i, bits);
            let low = match i.cmp(&words) {
                Ordering::Less => self.limbs[i],
                Ordering::Equal => self.limbs[i] & ((1 << bits) - 1),
                Ordering::Greater => 0,
            };
            let (sum, c1) = carrying_add(low, high, carry);
            self.limbs[i] = sum;
            carry = c1;
        }

        if carry != 0 {
            self.ensure_capacity(len + 1);
            self.limbs[len] = carry;
            self.len = len + 1;
        }
        self.normalize();
    }
}
