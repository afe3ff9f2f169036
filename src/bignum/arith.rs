use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Rem, RemAssign, Shl, ShlAssign, Shr,
    ShrAssign, Sub, SubAssign,
};

use crate::bignum::{BigUnsigned, Limb, LIMB_BITS};
use crate::error::Status;

#[inline]
pub(crate) const fn carrying_add(x: Limb, y: Limb, carry: Limb) -> (Limb, Limb) {
    let wide = x as u64 + y as u64 + carry as u64;
    (wide as Limb, (wide >> LIMB_BITS) as Limb)
}

#[inline]
pub(crate) const fn borrowing_sub(x: Limb, y: Limb, borrow: Limb) -> (Limb, Limb) {
    let wide = (x as u64).wrapping_sub(y as u64).wrapping_sub(borrow as u64);
    (wide as Limb, ((wide >> LIMB_BITS) & 1) as Limb)
}

/// Length of `limbs` once zero limbs at the top are ignored
pub(crate) fn significant_len(limbs: &[Limb]) -> usize {
    limbs.iter().rposition(|&limb| limb != 0).map_or(0, |i| i + 1)
}

/// Addition, subtraction and shifts
impl BigUnsigned {
    /// Add `rhs * 2^(32 * offset)`, starting the carry chain at limb `offset`
    pub(crate) fn add_limbs_at(&mut self, rhs: &[Limb], offset: usize) {
        let rhs = &rhs[..significant_len(rhs)];
        if rhs.is_empty() {
            return;
        }

        let top = self.len.max(offset + rhs.len());
        self.ensure_capacity(top);

        let mut carry = 0;
        for (i, r) in rhs.iter().enumerate() {
            (self.limbs[offset + i], carry) = carrying_add(self.limbs[offset + i], *r, carry);
        }

        let mut i = offset + rhs.len();
        while carry != 0 {
            if i == self.capacity() {
                self.ensure_capacity(i + 1);
            }
            (self.limbs[i], carry) = carrying_add(self.limbs[i], 0, carry);
            i += 1;
        }

        self.len = top.max(i);
    }

    /// Subtract `rhs * 2^(32 * offset)`.
    ///
    /// When `rhs` is the larger value the result wraps modulo `2^(32 * w)`,
    /// `w` being the wider of the two limb lengths.
    pub(crate) fn sub_limbs_at(&mut self, rhs: &[Limb], offset: usize) -> Status {
        let rhs = &rhs[..significant_len(rhs)];
        if rhs.is_empty() {
            return Status::Exact;
        }

        let width = self.len.max(offset + rhs.len());
        self.ensure_capacity(width);

        let mut borrow = 0;
        for (i, r) in rhs.iter().enumerate() {
            (self.limbs[offset + i], borrow) = borrowing_sub(self.limbs[offset + i], *r, borrow);
        }

        let mut i = offset + rhs.len();
        while borrow != 0 && i < width {
            (self.limbs[i], borrow) = borrowing_sub(self.limbs[i], 0, borrow);
            i += 1;
        }

        self.len = width;
        self.normalize();

        if borrow == 0 {
            Status::Exact
        } else {
            tracing::trace!(width, "subtraction wrapped");
            Status::Wrapped
        }
    }

    pub fn add_big(&mut self, rhs: &Self) {
        self.add_limbs_at(rhs.limbs(), 0);
    }

    pub fn add_u32(&mut self, rhs: u32) {
        self.add_limbs_at(&[rhs], 0);
    }

    pub fn add_u64(&mut self, rhs: u64) {
        self.add_limbs_at(&[rhs as Limb, (rhs >> LIMB_BITS) as Limb], 0);
    }

    /// Add `2^bit` without building it
    pub fn add_pow2(&mut self, bit: u32) {
        self.add_limbs_at(&[1 << (bit % LIMB_BITS)], (bit / LIMB_BITS) as usize);
    }

    pub fn increment(&mut self) {
        self.add_u32(1);
    }

    pub fn sub_big(&mut self, rhs: &Self) -> Status {
        self.sub_limbs_at(rhs.limbs(), 0)
    }

    pub fn sub_u32(&mut self, rhs: u32) -> Status {
        self.sub_limbs_at(&[rhs], 0)
    }

    pub fn sub_u64(&mut self, rhs: u64) -> Status {
        self.sub_limbs_at(&[rhs as Limb, (rhs >> LIMB_BITS) as Limb], 0)
    }

    /// Subtract `2^bit` without building it
    pub fn sub_pow2(&mut self, bit: u32) -> Status {
        self.sub_limbs_at(&[1 << (bit % LIMB_BITS)], (bit / LIMB_BITS) as usize)
    }

    /// Decrementing zero wraps to `u32::MAX`
    pub fn decrement(&mut self) -> Status {
        self.sub_u32(1)
    }

    pub fn shift_left(&mut self, n: u32) {
        if n == 0 || self.is_zero() {
            return;
        }

        let words = (n / LIMB_BITS) as usize;
        let bits = n % LIMB_BITS;
        let len = self.len + words;
        self.ensure_capacity(len + 1);

        // whole limbs are a block move
        if words > 0 {
            self.limbs.copy_within(0..self.len, words);
            self.limbs[..words].fill(0);
        }

        // limbs[len] is zero so it can take the bits pushed out of the top
        if bits > 0 {
            for i in (words + 1..=len).rev() {
                let upper = self.limbs[i] << bits;
                let lower = self.limbs[i - 1] >> (LIMB_BITS - bits);
                self.limbs[i] = upper | lower;
            }
            self.limbs[words] <<= bits;
        }

        self.len = len + 1;
        self.normalize();
    }

    pub fn shift_right(&mut self, n: u32) {
        if n == 0 || self.is_zero() {
            return;
        }

        let words = (n / LIMB_BITS) as usize;
        let bits = n % LIMB_BITS;
        if words >= self.len {
            self.set_zero();
            return;
        }

        let len = self.len - words;
        if words > 0 {
            self.limbs.copy_within(words..self.len, 0);
            self.limbs[len..self.len].fill(0);
        }

        if bits > 0 {
            for i in 0..len - 1 {
                let upper = self.limbs[i + 1] << (LIMB_BITS - bits);
                let lower = self.limbs[i] >> bits;
                self.limbs[i] = upper | lower;
            }
            self.limbs[len - 1] >>= bits;
        }

        self.len = len;
        self.normalize();
    }
}

macro_rules! big_unsigned_arith_impls {
    (u32, $trait:ident, $op:ident, $trait_assign:ident, $op_assign:ident, $method:ident) => {
        impl $trait<u32> for BigUnsigned {
            type Output = Self;

            fn $op(mut self, rhs: u32) -> Self::Output {
                self.$method(rhs);
                self
            }
        }

        impl $trait<u32> for &BigUnsigned {
            type Output = BigUnsigned;

            fn $op(self, rhs: u32) -> Self::Output {
                let mut out = self.clone();
                out.$method(rhs);
                out
            }
        }

        impl $trait_assign<u32> for BigUnsigned {
            fn $op_assign(&mut self, rhs: u32) {
                self.$method(rhs);
            }
        }
    };

    ($trait:ident, $op:ident, $trait_assign:ident, $op_assign:ident, $method:ident, $overflow_message:literal) => {
        impl $trait<BigUnsigned> for BigUnsigned {
            type Output = Self;

            fn $op(mut self, rhs: BigUnsigned) -> Self::Output {
                let status = self.$method(&rhs);
                debug_assert!(status.is_exact(), $overflow_message);
                self
            }
        }

        impl $trait<&BigUnsigned> for BigUnsigned {
            type Output = Self;

            fn $op(mut self, rhs: &BigUnsigned) -> Self::Output {
                let status = self.$method(rhs);
                debug_assert!(status.is_exact(), $overflow_message);
                self
            }
        }

        impl $trait<BigUnsigned> for &BigUnsigned {
            type Output = BigUnsigned;

            fn $op(self, rhs: BigUnsigned) -> Self::Output {
                let mut out = self.clone();
                let status = out.$method(&rhs);
                debug_assert!(status.is_exact(), $overflow_message);
                out
            }
        }

        impl $trait<&BigUnsigned> for &BigUnsigned {
            type Output = BigUnsigned;

            fn $op(self, rhs: &BigUnsigned) -> Self::Output {
                let mut out = self.clone();
                let status = out.$method(rhs);
                debug_assert!(status.is_exact(), $overflow_message);
                out
            }
        }

        impl $trait_assign<BigUnsigned> for BigUnsigned {
            fn $op_assign(&mut self, rhs: BigUnsigned) {
                let status = self.$method(&rhs);
                debug_assert!(status.is_exact(), $overflow_message);
            }
        }

        impl $trait_assign<&BigUnsigned> for BigUnsigned {
            fn $op_assign(&mut self, rhs: &BigUnsigned) {
                let status = self.$method(rhs);
                debug_assert!(status.is_exact(), $overflow_message);
            }
        }
    };

    ($trait:ident, $op:ident, $trait_assign:ident, $op_assign:ident, $method:ident, no_overflow) => {
        impl $trait<BigUnsigned> for BigUnsigned {
            type Output = Self;

            fn $op(mut self, rhs: BigUnsigned) -> Self::Output {
                self.$method(&rhs);
                self
            }
        }

        impl $trait<&BigUnsigned> for BigUnsigned {
            type Output = Self;

            fn $op(mut self, rhs: &BigUnsigned) -> Self::Output {
                self.$method(rhs);
                self
            }
        }

        impl $trait<BigUnsigned> for &BigUnsigned {
            type Output = BigUnsigned;

            fn $op(self, rhs: BigUnsigned) -> Self::Output {
                let mut out = self.clone();
                out.$method(&rhs);
                out
            }
        }

        impl $trait<&BigUnsigned> for &BigUnsigned {
            type Output = BigUnsigned;

            fn $op(self, rhs: &BigUnsigned) -> Self::Output {
                let mut out = self.clone();
                out.$method(rhs);
                out
            }
        }

        impl $trait_assign<BigUnsigned> for BigUnsigned {
            fn $op_assign(&mut self, rhs: BigUnsigned) {
                self.$method(&rhs);
            }
        }

        impl $trait_assign<&BigUnsigned> for BigUnsigned {
            fn $op_assign(&mut self, rhs: &BigUnsigned) {
                self.$method(rhs);
            }
        }
    };

    ($trait:ident, $op:ident, $trait_assign:ident, $op_assign:ident, $method:ident, saturating) => {
        // a zero divisor saturates, which the operators pass through like any other value
        impl $trait<BigUnsigned> for BigUnsigned {
            type Output = Self;

            fn $op(mut self, rhs: BigUnsigned) -> Self::Output {
                let _ = self.$method(&rhs);
                self
            }
        }

        impl $trait<&BigUnsigned> for BigUnsigned {
            type Output = Self;

            fn $op(mut self, rhs: &BigUnsigned) -> Self::Output {
                let _ = self.$method(rhs);
                self
            }
        }

        impl $trait<BigUnsigned> for &BigUnsigned {
            type Output = BigUnsigned;

            fn $op(self, rhs: BigUnsigned) -> Self::Output {
                let mut out = self.clone();
                let _ = out.$method(&rhs);
                out
            }
        }

        impl $trait<&BigUnsigned> for &BigUnsigned {
            type Output = BigUnsigned;

            fn $op(self, rhs: &BigUnsigned) -> Self::Output {
                let mut out = self.clone();
                let _ = out.$method(rhs);
                out
            }
        }

        impl $trait_assign<BigUnsigned> for BigUnsigned {
            fn $op_assign(&mut self, rhs: BigUnsigned) {
                let _ = self.$method(&rhs);
            }
        }

        impl $trait_assign<&BigUnsigned> for BigUnsigned {
            fn $op_assign(&mut self, rhs: &BigUnsigned) {
                let _ = self.$method(rhs);
            }
        }
    };
}

big_unsigned_arith_impls!(Add, add, AddAssign, add_assign, add_big, no_overflow);

big_unsigned_arith_impls!(
    Sub,
    sub,
    SubAssign,
    sub_assign,
    sub_big,
    "attempt to subtract with overflow"
);

big_unsigned_arith_impls!(Mul, mul, MulAssign, mul_assign, mul_big_fast, no_overflow);

big_unsigned_arith_impls!(Div, div, DivAssign, div_assign, quotient, saturating);

big_unsigned_arith_impls!(Rem, rem, RemAssign, rem_assign, rem_big, saturating);

big_unsigned_arith_impls!(u32, Shl, shl, ShlAssign, shl_assign, shift_left);

big_unsigned_arith_impls!(u32, Shr, shr, ShrAssign, shr_assign, shift_right);

#[cfg(test)]
mod tests {
    use super::*;

    fn big(limbs: &[Limb]) -> BigUnsigned {
        limbs.into()
    }

    #[test]
    fn test_add_big_unsigneds() {
        let mut a: BigUnsigned = 5u8.into();
        a.add_big(&6u8.into());
        assert_eq!(a, 11u8.into());

        let mut a: BigUnsigned = u32::MAX.into();
        a.add_big(&1u8.into());
        assert_eq!(a.limbs(), &[0, 1]);

        let mut a: BigUnsigned = u64::MAX.into();
        a.add_big(&u64::MAX.into());
        assert_eq!(a.limbs(), &[u32::MAX - 1, u32::MAX, 1]);
    }

    #[test]
    fn test_add_grows_full_register() {
        let mut a = big(&[u32::MAX; 4]);
        assert_eq!(a.capacity(), 4);
        a.add_u32(1);
        assert_eq!(a.limbs(), &[0, 0, 0, 0, 1]);
        assert_eq!(a.capacity(), 8);
    }

    #[test]
    fn test_add_shorter_operand_carries_through() {
        let mut a = big(&[u32::MAX, u32::MAX, 7]);
        a.add_big(&big(&[1]));
        assert_eq!(a.limbs(), &[0, 0, 8]);

        let mut b = big(&[1]);
        b.add_big(&big(&[u32::MAX, u32::MAX, 7]));
        assert_eq!(b.limbs(), &[0, 0, 8]);
    }

    #[test]
    fn test_add_limbs_at_offset() {
        let mut a = big(&[1]);
        a.add_limbs_at(&[2, 3], 3);
        assert_eq!(a.limbs(), &[1, 0, 0, 2, 3]);

        let mut a = big(&[0, u32::MAX]);
        a.add_limbs_at(&[1], 1);
        assert_eq!(a.limbs(), &[0, 0, 1]);

        let mut a = big(&[9]);
        a.add_limbs_at(&[0, 0], 2);
        assert_eq!(a.limbs(), &[9]);
    }

    #[test]
    fn test_add_u64_and_pow2() {
        let mut a = big(&[u32::MAX]);
        a.add_u64(1 << 32 | 1);
        assert_eq!(a.limbs(), &[0, 2]);

        let mut b = BigUnsigned::new();
        b.add_pow2(128);
        assert_eq!(b.limbs(), &[0, 0, 0, 0, 1]);
        b.add_pow2(1);
        assert_eq!(b.limbs(), &[2, 0, 0, 0, 1]);
        b.add_pow2(33);
        assert_eq!(b.limbs(), &[2, 2, 0, 0, 1]);
    }

    #[test]
    fn test_sub_big_unsigneds() {
        let mut a: BigUnsigned = 6u8.into();
        assert_eq!(a.sub_big(&5u8.into()), Status::Exact);
        assert_eq!(a, 1u8.into());

        let mut a = big(&[0, 1]);
        assert_eq!(a.sub_u32(1), Status::Exact);
        assert_eq!(a, u32::MAX.into());

        let mut a = big(&[u32::MAX / 2, 1]);
        assert_eq!(a.sub_big(&u32::MAX.into()), Status::Exact);
        assert_eq!(a, (1u32 << 31).into());

        let mut a: BigUnsigned = u64::MAX.into();
        assert_eq!(a.sub_u64(u64::MAX), Status::Exact);
        assert!(a.is_zero());
    }

    #[test]
    fn test_sub_underflow_wraps() {
        let mut a: BigUnsigned = 5u8.into();
        assert_eq!(a.sub_u32(6), Status::Wrapped);
        assert_eq!(a, u32::MAX.into());

        // the wrap width follows the wider operand
        let mut a: BigUnsigned = 1u8.into();
        assert_eq!(a.sub_big(&big(&[2, 1])), Status::Wrapped);
        assert_eq!(a.limbs(), &[u32::MAX, u32::MAX - 1]);
    }

    #[test]
    fn test_sub_pow2() {
        let mut a = big(&[0, 0, 0, 0, 1]);
        assert_eq!(a.sub_pow2(128), Status::Exact);
        assert!(a.is_zero());

        let mut b = big(&[0, 0, 1]);
        assert_eq!(b.sub_pow2(0), Status::Exact);
        assert_eq!(b.limbs(), &[u32::MAX, u32::MAX]);

        let mut c = big(&[4]);
        assert_eq!(c.sub_pow2(40), Status::Wrapped);
    }

    #[test]
    fn test_increment_decrement() {
        let mut a = big(&[u32::MAX, u32::MAX]);
        a.increment();
        assert_eq!(a.limbs(), &[0, 0, 1]);
        assert_eq!(a.decrement(), Status::Exact);
        assert_eq!(a.limbs(), &[u32::MAX, u32::MAX]);

        let mut one: BigUnsigned = 1u8.into();
        assert_eq!(one.decrement(), Status::Exact);
        assert!(one.is_zero());
        assert_eq!(one.decrement(), Status::Wrapped);
        assert_eq!(one, u32::MAX.into());
    }

    #[test]
    fn test_shift_left() {
        let mut a: BigUnsigned = 1u8.into();
        a.shift_left(128);
        assert_eq!(a.limbs(), &[0, 0, 0, 0, 1]);

        let mut a: BigUnsigned = u32::MAX.into();
        a.shift_left(4);
        assert_eq!(a.limbs(), &[0xFFFF_FFF0, 0xF]);

        let mut a = big(&[0x8000_0001, 0x8000_0000]);
        a.shift_left(33);
        assert_eq!(a.limbs(), &[0, 2, 1, 1]);

        let mut zero = BigUnsigned::new();
        zero.shift_left(1000);
        assert!(zero.is_zero());
        assert_eq!(zero.capacity(), 4);
    }

    #[test]
    fn test_shift_right() {
        let mut a = big(&[0, 0, 0, 0, 1]);
        a.shift_right(128);
        assert_eq!(a, 1u8.into());

        let mut a = big(&[0, 2, 1, 1]);
        a.shift_right(33);
        assert_eq!(a.limbs(), &[0x8000_0001, 0x8000_0000]);

        let mut a = big(&[0xFFFF_FFF0, 0xF]);
        a.shift_right(4);
        assert_eq!(a, u32::MAX.into());
        // vacated limbs are cleared
        assert_eq!(a.limbs, vec![u32::MAX, 0, 0, 0]);

        let mut a = big(&[1, 2, 3]);
        a.shift_right(96);
        assert!(a.is_zero());
        a.set_u32(1);
        a.shift_right(1);
        assert!(a.is_zero());
    }

    #[test]
    fn test_operators() {
        let a: BigUnsigned = 1000u16.into();
        let b: BigUnsigned = 7u8.into();

        assert_eq!(&a + &b, 1007u16.into());
        assert_eq!(&a - &b, 993u16.into());
        assert_eq!(&a * &b, 7000u16.into());
        assert_eq!(&a / &b, 142u8.into());
        assert_eq!(&a % &b, 6u8.into());
        assert_eq!(&a << 3, 8000u16.into());
        assert_eq!(&a >> 3, 125u8.into());

        let mut c = a.clone();
        c += &b;
        c -= b.clone();
        c <<= 40;
        c >>= 40;
        assert_eq!(c, a);
    }

    #[test]
    #[should_panic(expected = "attempt to subtract with overflow")]
    #[cfg(debug_assertions)]
    fn test_sub_operator_underflow_panics() {
        let a: BigUnsigned = 1u8.into();
        let b: BigUnsigned = 2u8.into();
        let _ = a - b;
    }

    #[test]
    fn test_div_rem_operators_by_zero_saturate() {
        let a = big(&[7, 0, 9]);
        let zero = BigUnsigned::new();

        let q = &a / &zero;
        assert_eq!(q.limb_len(), q.capacity());
        assert!(q.limbs().iter().all(|&l| l == Limb::MAX));
        assert!((&a % &zero).is_zero());

        let mut c = a.clone();
        c /= zero.clone();
        assert_eq!(c, q);
        c %= &zero;
        assert!(c.is_zero());
    }
}
