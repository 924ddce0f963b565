//! Seedable Xorshift64 generator used to scatter particles. The same seed
//! always yields the same particle layout.

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// A zero seed is replaced with a fixed non-zero constant, since zero is a
/// fixed point of the recurrence.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const ZERO_SEED_REPLACEMENT: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 {
                Self::ZERO_SEED_REPLACEMENT
            } else {
                seed
            },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform `f32` in [0, 1) built from the top 24 bits.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u32 << 24) as f32
    }

    /// Uniform `f32` in [min, max).
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform `f32` in [-extent/2, extent/2).
    pub fn next_centered(&mut self, extent: f32) -> f32 {
        (self.next_f32() - 0.5) * extent
    }
}
