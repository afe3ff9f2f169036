pub mod xorshift32;
pub use xorshift32::XorShift32;

pub trait Rng32 {
    /// Generate a 32 bit random value
    fn gen(&mut self) -> u32;

    /// Fill a slice of limbs with random values
    fn fill_limbs(&mut self, limbs: &mut [u32]) {
        for limb in limbs.iter_mut() {
            *limb = self.gen();
        }
    }
}

impl<T: Rng32 + ?Sized> Rng32 for &mut T {
    fn gen(&mut self) -> u32 {
        (**self).gen()
    }
}
