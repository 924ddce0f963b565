//! The per-frame field update.
//!
//! [`FieldAnimator::advance`] is the only code that reads both the cursor and
//! the particle set, and the only writer of particle heights and colors.
//! Cursor and theme arrive as plain values in [`FrameInput`]; the animator
//! holds no reference to host state.

use crate::color::LinearRgb;
use crate::config::FieldConfig;
use crate::cursor::Cursor;
use crate::error::FieldError;
use crate::particle::ParticleSet;
use crate::prng::Xorshift64;
use crate::surface::FrameView;
use crate::theme::Theme;
use crate::wave::{displaced_height, height_mix, smooth_toward};

/// Everything one frame depends on besides the animator's own state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Seconds since the animation started.
    pub elapsed: f32,
    pub cursor: Cursor,
    pub theme: Theme,
}

/// Owns the particle set and the eased scene state (fog, rotation).
#[derive(Debug, Clone)]
pub struct FieldAnimator {
    config: FieldConfig,
    particles: ParticleSet,
    fog: LinearRgb,
    rotation_y: f32,
    theme: Theme,
    frames: u64,
}

impl FieldAnimator {
    /// Validates `config` and scatters the particles from `seed`.
    ///
    /// The fog starts at `theme`'s fog color and particles are colored for a
    /// flat surface, so the first frame is already consistent.
    pub fn new(config: FieldConfig, seed: u64, theme: Theme) -> Result<Self, FieldError> {
        config.validate()?;
        let mut rng = Xorshift64::new(seed);
        let particles = ParticleSet::scatter(
            config.particle_count,
            config.spread,
            config.size_range,
            &mut rng,
        )?;
        let mut animator = Self {
            fog: theme.palette().fog.to_linear(),
            config,
            particles,
            rotation_y: 0.0,
            theme,
            frames: 0,
        };
        animator.recolor(theme);
        Ok(animator)
    }

    /// Advances every particle by one frame.
    ///
    /// Per particle: wave height plus cursor repulsion gives the target,
    /// the rendered height eases toward it, and the color follows the eased
    /// height along the theme's deep-to-peak ramp. The fog eases toward the
    /// theme's fog color and the cloud's rotation tracks elapsed time.
    pub fn advance(&mut self, input: &FrameInput) {
        let FieldConfig {
            wave,
            repulsion,
            ramp,
            smoothing,
            ..
        } = self.config;
        let palette = input.theme.palette();
        let (deep, peak) = palette.ramp();

        self.particles.for_each_mut(|x, z, y, color| {
            let target = displaced_height(x, z, input.elapsed, input.cursor, &wave, &repulsion);
            *y = smooth_toward(*y, target, smoothing);
            let c = deep.lerp(peak, height_mix(*y, &ramp));
            color.copy_from_slice(&c.to_array());
        });

        self.fog = self
            .fog
            .lerp(palette.fog.to_linear(), self.config.fog_lerp);
        self.rotation_y = input.elapsed * self.config.rotation_speed;
        self.theme = input.theme;
        self.frames += 1;
        log::trace!(
            "frame {} at t={:.3}s cursor=({:.2}, {:.2})",
            self.frames,
            input.elapsed,
            input.cursor.x,
            input.cursor.y
        );
    }

    fn recolor(&mut self, theme: Theme) {
        let (deep, peak) = theme.palette().ramp();
        let ramp = self.config.ramp;
        self.particles.for_each_mut(|_, _, y, color| {
            let c = deep.lerp(peak, height_mix(*y, &ramp));
            color.copy_from_slice(&c.to_array());
        });
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn fog_color(&self) -> LinearRgb {
        self.fog
    }

    /// Rotation of the whole cloud about the vertical axis, in radians.
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Theme of the most recent frame.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Borrowed view of the current frame for a renderer.
    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            positions: self.particles.positions(),
            colors: self.particles.colors(),
            sizes: self.particles.sizes(),
            rotation_y: self.rotation_y,
            fog_color: self.fog,
            fog_density: self.config.fog_density,
            base_size: self.config.base_size,
            opacity: self.config.opacity,
            background: self.theme.palette().background,
        }
    }
}
