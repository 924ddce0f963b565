//! Soft circular glow used as the point sprite.
//!
//! A small square alpha mask with a radial falloff: opaque in the middle,
//! half transparent at 40% of the radius, fully transparent at the edge and
//! beyond. Each particle is drawn as this mask instead of a hard square.

/// Side of the sprite texture in texels.
pub const SPRITE_SIZE: usize = 32;

/// Radial alpha stops `(radius fraction, alpha)`, increasing in radius.
const GLOW_STOPS: [(f32, f32); 3] = [(0.0, 1.0), (0.4, 0.5), (1.0, 0.0)];

/// Alpha at normalized distance `r` from the center (1.0 = texture edge).
pub fn glow_alpha(r: f32) -> f32 {
    if r.is_nan() || r >= 1.0 {
        return 0.0;
    }
    let r = r.max(0.0);
    GLOW_STOPS
        .windows(2)
        .find(|w| r <= w[1].0)
        .map(|w| {
            let (r0, a0) = w[0];
            let (r1, a1) = w[1];
            a0 + (a1 - a0) * (r - r0) / (r1 - r0)
        })
        .unwrap_or(0.0)
}

/// Precomputed square alpha texture.
#[derive(Debug, Clone)]
pub struct GlowSprite {
    size: usize,
    alpha: Vec<f32>,
}

impl GlowSprite {
    /// Rasterizes the glow at texel centers.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let half = size as f32 / 2.0;
        let alpha = (0..size * size)
            .map(|i| {
                let x = (i % size) as f32 + 0.5 - half;
                let y = (i / size) as f32 + 0.5 - half;
                glow_alpha((x * x + y * y).sqrt() / half)
            })
            .collect();
        Self { size, alpha }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Nearest-texel lookup at texture coordinates in [0, 1]. Outside the
    /// texture the alpha is zero.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return 0.0;
        }
        let x = (u * self.size as f32) as usize;
        let y = (v * self.size as f32) as usize;
        self.alpha[y.min(self.size - 1) * self.size + x.min(self.size - 1)]
    }
}

impl Default for GlowSprite {
    fn default() -> Self {
        Self::new(SPRITE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glow_alpha_follows_stops() {
        assert_eq!(glow_alpha(0.0), 1.0);
        assert!((glow_alpha(0.4) - 0.5).abs() < 1e-6);
        assert!((glow_alpha(0.2) - 0.75).abs() < 1e-6);
        assert!((glow_alpha(0.7) - 0.25).abs() < 1e-6);
        assert_eq!(glow_alpha(1.0), 0.0);
        assert_eq!(glow_alpha(3.0), 0.0);
        assert_eq!(glow_alpha(f32::NAN), 0.0);
    }

    #[test]
    fn sprite_is_bright_in_the_middle() {
        let s = GlowSprite::default();
        assert!(s.sample(0.5, 0.5) > 0.9);
    }

    #[test]
    fn sprite_edges_and_corners_are_transparent() {
        let s = GlowSprite::default();
        assert_eq!(s.sample(0.0, 0.0), 0.0);
        assert_eq!(s.sample(0.99, 0.99), 0.0);
        assert!(s.sample(0.0, 0.5) < 0.05);
        assert_eq!(s.sample(-0.1, 0.5), 0.0);
        assert_eq!(s.sample(0.5, 1.0), 0.0);
    }

    #[test]
    fn sprite_is_radially_symmetric() {
        let s = GlowSprite::default();
        assert_eq!(s.sample(0.2, 0.5), s.sample(0.8, 0.5));
        assert_eq!(s.sample(0.5, 0.2), s.sample(0.5, 0.8));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn glow_alpha_is_non_increasing(a in 0.0_f32..1.5, b in 0.0_f32..1.5) {
                let (near, far) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(glow_alpha(near) >= glow_alpha(far));
                prop_assert!((0.0..=1.0).contains(&glow_alpha(near)));
            }
        }
    }
}
