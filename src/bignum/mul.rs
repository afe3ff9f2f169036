use crate::bignum::{BigUnsigned, Workspace, LIMB_BITS};

/// Runs of ones up to this length are added bit by bit, longer ones are
/// handled as a single `2^q - 1` multiple.
const SHORT_RUN: u32 = 6;

/// Multiplication
impl BigUnsigned {
    pub fn mul_u32(&mut self, x: u32) {
        let mut init = Self::with_capacity(self.len + 1);
        self.mul_small(x.into(), &mut init);
    }

    pub fn mul_u32_with(&mut self, x: u32, ws: &mut Workspace) {
        let [init, ..] = ws.regs();
        self.mul_small(x.into(), init);
    }

    pub fn mul_u64(&mut self, x: u64) {
        let mut init = Self::with_capacity(self.len + 2);
        self.mul_small(x, &mut init);
    }

    pub fn mul_u64_with(&mut self, x: u64, ws: &mut Workspace) {
        let [init, ..] = ws.regs();
        self.mul_small(x, init);
    }

    /// Multiply by `2^k`
    pub fn mul_pow2(&mut self, k: u32) {
        self.shift_left(k);
    }

    /// Shift and add over the set bits of `x`
    pub fn mul_big(&mut self, x: &Self) {
        let mut shifted = Self::with_capacity(self.len + x.len);
        self.mul_shift_add(x, &mut shifted);
    }

    pub fn mul_big_with(&mut self, x: &Self, ws: &mut Workspace) {
        let [shifted, ..] = ws.regs();
        self.mul_shift_add(x, shifted);
    }

    /// Same product as [`BigUnsigned::mul_big`], cheaper when `x` has long runs of ones
    pub fn mul_big_fast(&mut self, x: &Self) {
        let mut ws = Workspace::with_capacity(self.len + x.len + 1);
        self.mul_big_fast_with(x, &mut ws);
    }

    pub fn mul_big_fast_with(&mut self, x: &Self, ws: &mut Workspace) {
        let [acc, term, run, _] = ws.regs();
        self.mul_runs(x, acc, term, run);
    }

    /// Multiply by a native integer, one shifted copy added per set bit
    fn mul_small(&mut self, x: u64, init: &mut Self) {
        if self.is_zero() {
            return;
        }
        if x == 0 {
            self.set_zero();
            return;
        }

        init.copy_from(self);
        if x & 1 == 0 {
            self.set_zero();
        }

        let mut shifted = 0;
        for i in 1..u64::BITS - x.leading_zeros() {
            if (x >> i) & 1 == 1 {
                init.shift_left(i - shifted);
                shifted = i;
                self.add_big(init);
            }
        }
    }

    pub(crate) fn mul_shift_add(&mut self, x: &Self, shifted: &mut Self) {
        if self.is_zero() {
            return;
        }
        let Some(lowest) = x.lowest_set_bit() else {
            self.set_zero();
            return;
        };

        shifted.copy_from(self);
        self.shift_left(lowest);

        // `shifted` walks through self * 2^bit for each bit position inside a
        // limb, and every limb of x with that bit set adds it at its own offset
        let mut applied = 0;
        for bit in 0..LIMB_BITS {
            let mask = 1 << bit;
            for (w, &limb) in x.limbs().iter().enumerate() {
                if limb & mask == 0 || w as u32 * LIMB_BITS + bit <= lowest {
                    continue;
                }
                if applied != bit {
                    shifted.shift_left(bit - applied);
                    applied = bit;
                }
                self.add_limbs_at(shifted.limbs(), w);
            }
        }
    }

    pub(crate) fn mul_runs(
        &mut self,
        x: &Self,
        acc: &mut Self,
        term: &mut Self,
        run: &mut Self,
    ) {
        if self.is_zero() {
            return;
        }
        if x.is_zero() {
            self.set_zero();
            return;
        }

        acc.set_zero();
        for (start, len) in OneRuns::new(x) {
            if len <= SHORT_RUN {
                for bit in start..start + len {
                    term.copy_from(self);
                    term.shift_left(bit % LIMB_BITS);
                    acc.add_limbs_at(term.limbs(), (bit / LIMB_BITS) as usize);
                }
            } else {
                // ones at bits start..start+len sum to 2^start * (2^len - 1)
                term.copy_from(self);
                term.shift_left(start % LIMB_BITS);
                run.copy_from(term);
                run.shift_left(len);
                let status = run.sub_big(term);
                debug_assert!(status.is_exact());
                acc.add_limbs_at(run.limbs(), (start / LIMB_BITS) as usize);
            }
        }

        self.copy_from(acc);
    }
}

/// Maximal runs of consecutive set bits as `(lowest bit, length)` pairs
struct OneRuns<'a> {
    x: &'a BigUnsigned,
    pos: u32,
    end: u32,
}

impl<'a> OneRuns<'a> {
    fn new(x: &'a BigUnsigned) -> Self {
        Self {
            x,
            pos: 0,
            end: x.bit_length(),
        }
    }

    /// First bit at or after `from` equal to `set`, or `end`
    fn seek(&self, from: u32, set: bool) -> u32 {
        let mut pos = from;
        while pos < self.end {
            let limb = self.x.limbs()[(pos / LIMB_BITS) as usize];
            let word = (if set { limb } else { !limb }) >> (pos % LIMB_BITS);
            if word != 0 {
                return (pos + word.trailing_zeros()).min(self.end);
            }
            pos = (pos / LIMB_BITS + 1) * LIMB_BITS;
        }
        self.end
    }
}

impl Iterator for OneRuns<'_> {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.seek(self.pos, true);
        if start >= self.end {
            return None;
        }
        self.pos = self.seek(start, false);
        Some((start, self.pos - start))
    }
}
