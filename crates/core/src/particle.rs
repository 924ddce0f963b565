//! Struct-of-arrays particle storage.
//!
//! Buffers are laid out the way a point-cloud renderer consumes them:
//! `positions` and `colors` hold three floats per particle, `sizes` one.
//! The ground-plane coordinates a particle was scattered to live in a
//! separate `ground` buffer that nothing mutates after construction.

use crate::error::FieldError;
use crate::prng::Xorshift64;

/// Largest particle count a set can be scattered with.
pub const MAX_PARTICLE_COUNT: usize = 1_000_000;

/// A fixed-size set of particles over the ground plane.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    /// `[x0, z0, x1, z1, ...]`, immutable after construction.
    ground: Vec<f32>,
    /// `[x0, y0, z0, ...]`; only the y components are animated.
    positions: Vec<f32>,
    /// Linear RGB, `[r0, g0, b0, ...]`.
    colors: Vec<f32>,
    sizes: Vec<f32>,
}

impl ParticleSet {
    /// Scatters `count` particles uniformly over a `spread × spread` square
    /// centered at the origin, at height 0, with sizes in `size_range`.
    ///
    /// Returns `FieldError::InvalidParticleCount` if `count` is zero, above
    /// [`MAX_PARTICLE_COUNT`], or if the buffer lengths overflow `usize`.
    pub fn scatter(
        count: usize,
        spread: f32,
        size_range: [f32; 2],
        rng: &mut Xorshift64,
    ) -> Result<Self, FieldError> {
        if count == 0 || count > MAX_PARTICLE_COUNT {
            return Err(FieldError::InvalidParticleCount);
        }
        let xyz_len = count
            .checked_mul(3)
            .ok_or(FieldError::InvalidParticleCount)?;
        let mut ground = Vec::with_capacity(count * 2);
        let mut positions = Vec::with_capacity(xyz_len);
        let mut sizes = Vec::with_capacity(count);
        for _ in 0..count {
            let x = rng.next_centered(spread);
            let z = rng.next_centered(spread);
            ground.extend_from_slice(&[x, z]);
            positions.extend_from_slice(&[x, 0.0, z]);
            sizes.push(rng.next_range(size_range[0], size_range[1]));
        }
        Ok(Self {
            ground,
            positions,
            colors: vec![0.0; xyz_len],
            sizes,
        })
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Always false: construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Ground-plane coordinates `(x, z)` particle `i` was scattered to.
    pub fn ground(&self, i: usize) -> (f32, f32) {
        (self.ground[i * 2], self.ground[i * 2 + 1])
    }

    /// Current rendered height of particle `i`.
    pub fn height(&self, i: usize) -> f32 {
        self.positions[i * 3 + 1]
    }

    pub fn color(&self, i: usize) -> [f32; 3] {
        let c = &self.colors[i * 3..i * 3 + 3];
        [c[0], c[1], c[2]]
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Visits every particle with its ground coordinates and mutable
    /// `(height, color)` slots. Ground x/z cannot be reached from here.
    pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(f32, f32, &mut f32, &mut [f32])) {
        let ground = self.ground.chunks_exact(2);
        let positions = self.positions.chunks_exact_mut(3);
        let colors = self.colors.chunks_exact_mut(3);
        for ((g, p), c) in ground.zip(positions).zip(colors) {
            f(g[0], g[1], &mut p[1], c);
        }
    }
}
