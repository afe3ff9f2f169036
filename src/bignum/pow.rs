use crate::bignum::{BigUnsigned, Workspace};

macro_rules! impl_isqrt {
    ($name:ident, $uX:ty) => {
        /// Integer square root and remainder, two input bits per round
        pub(crate) const fn $name(n: $uX) -> ($uX, $uX) {
            let mut rem = n;
            let mut root = 0;
            let mut bit: $uX = 1 << (<$uX>::BITS - 2);
            while bit > n {
                bit >>= 2;
            }

            while bit != 0 {
                if rem >= root + bit {
                    rem -= root + bit;
                    root = (root >> 1) + bit;
                } else {
                    root >>= 1;
                }
                bit >>= 2;
            }

            (root, rem)
        }
    };
}

impl_isqrt!(sqrt_u32, u32);
impl_isqrt!(sqrt_u64, u64);

/// Powers and roots
impl BigUnsigned {
    /// Raise to the power `p`
    ///
    /// Exponents 4, 6, 8 and 9 go through short chains of squares and cubes,
    /// every other exponent multiplies by the base `p - 1` times.
    pub fn pow(&mut self, p: u32) {
        let mut ws = Workspace::with_capacity(self.len + 1);
        self.pow_with(p, &mut ws);
    }

    pub fn pow_with(&mut self, p: u32, ws: &mut Workspace) {
        match p {
            0 => self.set_u32(1),
            1 => {}
            4 => self.raise_chain(&[2, 2], ws),
            6 => self.raise_chain(&[3, 2], ws),
            8 => self.raise_chain(&[2, 2, 2], ws),
            9 => self.raise_chain(&[3, 3], ws),
            _ => {
                let [base, shifted, ..] = ws.regs();
                base.copy_from(self);
                for _ in 1..p {
                    self.mul_shift_add(base, shifted);
                }
            }
        }
    }

    /// Raise to each power in `steps` in turn
    fn raise_chain(&mut self, steps: &[u32], ws: &mut Workspace) {
        let [base, acc, term, run] = ws.regs();
        for &step in steps {
            base.copy_from(self);
            for _ in 1..step {
                self.mul_runs(base, acc, term, run);
            }
        }
    }

    /// Replace `self` with its integer square root, leaving `self - root^2` in `rem`
    pub fn sqrt(&mut self, rem: &mut Self) {
        match self.len {
            0 | 1 => {
                let (root, r) = sqrt_u32(self.truncate_u32());
                self.set_u32(root);
                rem.set_u32(r);
            }
            2 => {
                let (root, r) = sqrt_u64(self.truncate_u64());
                self.set_u64(root);
                rem.set_u64(r);
            }
            _ => self.sqrt_wide(rem),
        }
    }

    /// The integer square root and remainder as new registers
    pub fn isqrt(&self) -> (Self, Self) {
        let mut root = self.clone();
        let mut rem = Self::with_capacity(self.len);
        root.sqrt(&mut rem);
        (root, rem)
    }

    fn sqrt_wide(&mut self, rem: &mut Self) {
        rem.copy_from(self);
        self.set_zero();

        let Some(top) = rem.highest_set_bit() else {
            return;
        };

        // self holds the partial root, scaled the same way as the u32 version
        let mut bit = top - top % 2;
        loop {
            self.add_pow2(bit);
            let fits = *rem >= *self;
            if fits {
                let status = rem.sub_big(self);
                debug_assert!(status.is_exact());
            }

            // bit was just added, so taking it back is exact
            let status = self.sub_pow2(bit);
            debug_assert!(status.is_exact());
            self.shift_right(1);
            if fits {
                self.add_pow2(bit);
            }

            if bit < 2 {
                break;
            }
            bit -= 2;
        }
    }
}
