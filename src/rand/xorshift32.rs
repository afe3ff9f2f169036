use crate::rand::Rng32;

#[derive(Debug, Copy, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn from_seed(seed: u32) -> Self {
        assert!(seed != 0, "XorShift32 cannot be seeded with zero.");
        Self { state: seed }
    }
}

impl Rng32 for XorShift32 {
    fn gen(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }
}
