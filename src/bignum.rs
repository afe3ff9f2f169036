use crate::rand::Rng32;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

mod arith;
mod codec;
mod div;
mod mul;
mod pow;

pub(crate) type Limb = u32;
pub(crate) const LIMB_BITS: u32 = Limb::BITS;

/// Registers never hold fewer limbs than this.
pub const MIN_LIMBS: usize = 4;

/// An arbitrary precision unsigned integer that is mutated in place.
///
/// `limbs` is the allocated buffer (its length is the capacity) stored least
/// significant limb first, `len` counts the significant limbs. The top
/// significant limb is never zero, zero is `len == 0`, and every limb at or
/// above `len` is kept zeroed so arithmetic can read past the top freely.
#[derive(Debug, Clone)]
pub struct BigUnsigned {
    limbs: Vec<Limb>,
    len: usize,
}

/// Scratch registers for operations that need working storage.
///
/// Passing one of these to the `*_with` methods avoids allocating on every
/// call; the plain methods build a fresh one each time.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    regs: [BigUnsigned; 4],
}

impl Workspace {
    pub fn with_capacity(limbs: usize) -> Self {
        Self {
            regs: std::array::from_fn(|_| BigUnsigned::with_capacity(limbs)),
        }
    }

    pub(crate) fn regs(&mut self) -> &mut [BigUnsigned; 4] {
        &mut self.regs
    }
}

/// Lifecycle and limb storage
impl BigUnsigned {
    /// A zero register with room for at least `min_limbs` limbs
    pub fn with_capacity(min_limbs: usize) -> Self {
        Self {
            limbs: vec![0; min_limbs.max(MIN_LIMBS)],
            len: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(MIN_LIMBS)
    }

    /// Number of allocated limbs
    pub fn capacity(&self) -> usize {
        self.limbs.len()
    }

    /// Number of significant limbs
    pub fn limb_len(&self) -> usize {
        self.len
    }

    /// The significant limbs, least significant first
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs[..self.len]
    }

    /// Grow the buffer by doubling until it holds `min_limbs` limbs
    pub fn ensure_capacity(&mut self, min_limbs: usize) {
        let old = self.capacity();
        if min_limbs <= old {
            return;
        }

        let mut new = old.max(1) * 2;
        while new < min_limbs {
            new *= 2;
        }

        tracing::trace!(from = old, to = new, "growing limb buffer");
        self.limbs.resize(new, 0);
    }

    /// Drop zero limbs from the top of the significant length
    pub(crate) fn normalize(&mut self) {
        while self.len > 0 && self.limbs[self.len - 1] == 0 {
            self.len -= 1;
        }
    }

    /// The limb at index `i`, or `None` past the significant length
    pub fn get_word(&self, i: usize) -> Option<Limb> {
        self.limbs().get(i).copied()
    }

    /// Overwrite the limb at index `i`, growing the buffer if needed
    pub fn set_word(&mut self, i: usize, word: Limb) {
        self.ensure_capacity(i + 1);
        self.limbs[i] = word;

        if word != 0 {
            self.len = self.len.max(i + 1);
        } else if i + 1 == self.len {
            self.normalize();
        }
    }
}

/// Assignment
impl BigUnsigned {
    pub fn set_zero(&mut self) {
        self.limbs[..self.len].fill(0);
        self.len = 0;
    }

    pub fn set_u32(&mut self, value: u32) {
        self.set_zero();
        self.limbs[0] = value;
        self.normalize_from(1);
    }

    pub fn set_u64(&mut self, value: u64) {
        self.set_zero();
        self.limbs[0] = value as Limb;
        self.limbs[1] = (value >> LIMB_BITS) as Limb;
        self.normalize_from(2);
    }

    /// Make this register hold the same value as `src`
    pub fn copy_from(&mut self, src: &Self) {
        self.ensure_capacity(src.len);
        self.limbs[src.len..self.len.max(src.len)].fill(0);
        self.limbs[..src.len].copy_from_slice(src.limbs());
        self.len = src.len;
    }

    /// Set every allocated bit
    pub fn set_max(&mut self) {
        self.limbs.fill(Limb::MAX);
        self.len = self.capacity();
    }

    pub fn set_lowest_bit(&mut self) {
        self.limbs[0] |= 1;
        self.len = self.len.max(1);
    }

    /// Overwrite with `limbs` random limbs
    pub fn set_random(&mut self, mut rng: impl Rng32, limbs: usize) {
        self.set_zero();
        self.ensure_capacity(limbs);
        rng.fill_limbs(&mut self.limbs[..limbs]);
        self.normalize_from(limbs);
    }

    /// Generate a uniformly random value of at most `limbs` limbs
    pub fn random(rng: impl Rng32, limbs: usize) -> Self {
        let mut out = Self::with_capacity(limbs);
        out.set_random(rng, limbs);
        out
    }

    fn normalize_from(&mut self, len: usize) {
        self.len = len;
        self.normalize();
    }
}

/// Bit queries
impl BigUnsigned {
    pub fn is_zero(&self) -> bool {
        self.len == 0
    }

    pub fn is_odd(&self) -> bool {
        self.limbs[0] & 1 == 1
    }

    pub fn count_ones(&self) -> u32 {
        self.limbs().iter().map(|limb| limb.count_ones()).sum()
    }

    /// The number of bits required to represent this number
    pub fn bit_length(&self) -> u32 {
        match self.limbs().last() {
            Some(top) => self.len as u32 * LIMB_BITS - top.leading_zeros(),
            None => 0,
        }
    }

    /// Index of the most significant set bit
    pub fn highest_set_bit(&self) -> Option<u32> {
        self.bit_length().checked_sub(1)
    }

    /// Index of the least significant set bit
    pub fn lowest_set_bit(&self) -> Option<u32> {
        let zero_limbs = self.limbs().iter().take_while(|&&limb| limb == 0).count();
        let limb = self.limbs().get(zero_limbs)?;
        Some(zero_limbs as u32 * LIMB_BITS + limb.trailing_zeros())
    }

    /// Test if bit N is set
    pub fn test_bit(&self, bit: u32) -> bool {
        let limb = self.limbs[..self.len]
            .get((bit / LIMB_BITS) as usize)
            .unwrap_or(&0);
        (limb >> (bit % LIMB_BITS)) & 1 == 1
    }

    /// Exactly one bit set, so zero does not count
    pub fn is_power_of_two(&self) -> bool {
        let mut ones = 0;
        for limb in self.limbs() {
            ones += limb.count_ones();
            if ones > 1 {
                return false;
            }
        }
        ones == 1
    }

    /// The smallest `n` with `2^n >= self`
    pub fn ceil_log2(&self) -> u32 {
        match self.highest_set_bit() {
            Some(top) if !self.is_power_of_two() => top + 1,
            Some(top) => top,
            None => 0,
        }
    }

    pub fn truncate_u32(&self) -> u32 {
        self.limbs[0]
    }

    pub fn truncate_u64(&self) -> u64 {
        (self.limbs[1] as u64) << LIMB_BITS | self.limbs[0] as u64
    }

    pub fn compare_u32(&self, n: u32) -> Ordering {
        if self.len > 1 {
            Ordering::Greater
        } else {
            self.limbs[0].cmp(&n)
        }
    }

    pub fn compare_u64(&self, n: u64) -> Ordering {
        if self.len > 2 {
            Ordering::Greater
        } else {
            self.truncate_u64().cmp(&n)
        }
    }

    /// Compare against `2^bit` without building it
    pub fn compare_pow2(&self, bit: u32) -> Ordering {
        let Some(top) = self.highest_set_bit() else {
            return Ordering::Less;
        };

        match top.cmp(&bit) {
            Ordering::Equal if self.is_power_of_two() => Ordering::Equal,
            Ordering::Equal => Ordering::Greater,
            ordering => ordering,
        }
    }

    /// Compare against `2^k - 1` without building it
    pub fn compare_pow2_minus_one(&self, k: u32) -> Ordering {
        if k == 0 {
            return if self.is_zero() {
                Ordering::Equal
            } else {
                Ordering::Greater
            };
        }

        let Some(top) = self.highest_set_bit() else {
            return Ordering::Less;
        };

        match top.cmp(&(k - 1)) {
            // an all ones value has no clear bit below its top
            Ordering::Equal if self.count_ones() == k => Ordering::Equal,
            Ordering::Equal => Ordering::Less,
            ordering => ordering,
        }
    }
}

impl Default for BigUnsigned {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BigUnsigned {
    fn eq(&self, other: &Self) -> bool {
        self.limbs() == other.limbs()
    }
}

impl Eq for BigUnsigned {}

impl Hash for BigUnsigned {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.limbs().hash(state);
    }
}

impl PartialOrd for BigUnsigned {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigUnsigned {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len.cmp(&other.len).then_with(|| {
            self.limbs()
                .iter()
                .rev()
                .zip(other.limbs().iter().rev())
                .map(|(a, b)| a.cmp(b))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
    }
}

macro_rules! impl_from_for_big_unsigned {
    ($uX:ty) => {
        impl From<$uX> for BigUnsigned {
            fn from(value: $uX) -> Self {
                let mut out = Self::new();
                out.set_u64(value.into());
                out
            }
        }
    };
}

impl_from_for_big_unsigned!(u64);
impl_from_for_big_unsigned!(u32);
impl_from_for_big_unsigned!(u16);
impl_from_for_big_unsigned!(u8);

impl From<&[Limb]> for BigUnsigned {
    fn from(limbs: &[Limb]) -> Self {
        let mut out = Self::with_capacity(limbs.len());
        out.limbs[..limbs.len()].copy_from_slice(limbs);
        out.normalize_from(limbs.len());
        out
    }
}
