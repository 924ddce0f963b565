//! CPU point-cloud rasterizer.
//!
//! Draws each particle as a glow sprite with additive blending into a linear
//! RGB framebuffer cleared to the theme background. Point size is attenuated
//! by view depth and each point's color is mixed toward the fog color with
//! exponential-squared fog before blending.

use crate::sprite::GlowSprite;
use glam::{Mat4, Vec3};
use tidefield_core::{Camera, FieldError, FrameView, LinearRgb, Renderer, Surface};

/// Points whose alpha falls below this are discarded.
const ALPHA_TEST: f32 = 0.01;

/// Software [`Renderer`] producing a linear RGB framebuffer.
#[derive(Debug)]
pub struct RasterRenderer {
    width: u32,
    height: u32,
    pixels: Vec<LinearRgb>,
    sprite: GlowSprite,
    drawn: usize,
    disposed: bool,
}

/// Allocates a cleared framebuffer for `surface`.
///
/// Returns `FieldError::InvalidDimensions` if the pixel count overflows
/// `usize` or the buffer cannot be allocated.
fn framebuffer(surface: Surface) -> Result<Vec<LinearRgb>, FieldError> {
    let len = (surface.width as usize)
        .checked_mul(surface.height as usize)
        .ok_or(FieldError::InvalidDimensions)?;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| FieldError::InvalidDimensions)?;
    pixels.resize(len, LinearRgb::default());
    Ok(pixels)
}

impl RasterRenderer {
    pub fn new(surface: Surface) -> Result<Self, FieldError> {
        Ok(Self {
            width: surface.width,
            height: surface.height,
            pixels: framebuffer(surface)?,
            sprite: GlowSprite::default(),
            drawn: 0,
            disposed: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Framebuffer contents in row-major order, top row first.
    pub fn pixels(&self) -> &[LinearRgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<LinearRgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Number of particles that landed on screen in the last frame.
    pub fn points_drawn(&self) -> usize {
        self.drawn
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn splat(&mut self, cx: f32, cy: f32, diameter: f32, color: LinearRgb, opacity: f32) {
        let half = diameter / 2.0;
        let x0 = (cx - half).floor().max(0.0) as i64;
        let y0 = (cy - half).floor().max(0.0) as i64;
        let x1 = ((cx + half).ceil() as i64).min(self.width as i64 - 1);
        let y1 = ((cy + half).ceil() as i64).min(self.height as i64 - 1);
        let w = self.width as usize;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let u = (px as f32 + 0.5 - (cx - half)) / diameter;
                let v = (py as f32 + 0.5 - (cy - half)) / diameter;
                let alpha = self.sprite.sample(u, v) * opacity;
                if alpha < ALPHA_TEST {
                    continue;
                }
                let dst = &mut self.pixels[py as usize * w + px as usize];
                dst.r += color.r * alpha;
                dst.g += color.g * alpha;
                dst.b += color.b * alpha;
            }
        }
    }
}

/// Exponential-squared fog factor: 0 at the eye, approaching 1 far away.
pub fn fog_factor(density: f32, depth: f32) -> f32 {
    (1.0 - (-(density * density) * depth * depth).exp()).clamp(0.0, 1.0)
}

impl Renderer for RasterRenderer {
    fn resize(&mut self, surface: Surface) -> Result<(), FieldError> {
        if self.disposed {
            return Err(FieldError::Render("resize after dispose".into()));
        }
        self.pixels = framebuffer(surface)?;
        self.width = surface.width;
        self.height = surface.height;
        Ok(())
    }

    fn render(&mut self, frame: &FrameView<'_>, camera: &Camera) -> Result<(), FieldError> {
        if self.disposed {
            return Err(FieldError::Render("render after dispose".into()));
        }
        if frame.positions.len() != frame.len() * 3 || frame.colors.len() != frame.len() * 3 {
            return Err(FieldError::Render(format!(
                "buffer length mismatch: {} positions, {} colors for {} particles",
                frame.positions.len(),
                frame.colors.len(),
                frame.len()
            )));
        }

        self.pixels.fill(frame.background.to_linear());
        let model = Mat4::from_rotation_y(frame.rotation_y);
        // Pixels per world unit at unit depth.
        let scale = self.height as f32 / 2.0 / (camera.fov_y() / 2.0).tan();
        let (w, h) = (self.width as f32, self.height as f32);

        let mut drawn = 0;
        let points = frame
            .positions
            .chunks_exact(3)
            .zip(frame.colors.chunks_exact(3))
            .zip(frame.sizes);
        for ((p, c), &size) in points {
            let Some((ndc, depth)) = camera.project(model, Vec3::new(p[0], p[1], p[2])) else {
                continue;
            };
            let diameter = (frame.base_size * size * scale / depth).max(1.0);
            let cx = (ndc.x * 0.5 + 0.5) * w;
            let cy = (0.5 - ndc.y * 0.5) * h;
            let half = diameter / 2.0;
            if cx + half < 0.0 || cy + half < 0.0 || cx - half > w || cy - half > h {
                continue;
            }
            let base = LinearRgb {
                r: c[0],
                g: c[1],
                b: c[2],
            };
            let color = base.lerp(frame.fog_color, fog_factor(frame.fog_density, depth));
            self.splat(cx, cy, diameter, color, frame.opacity);
            drawn += 1;
        }
        self.drawn = drawn;
        log::trace!("rasterized {drawn}/{} points", frame.len());
        Ok(())
    }

    fn dispose(&mut self) {
        self.pixels = Vec::new();
        self.drawn = 0;
        self.disposed = true;
        log::debug!("raster renderer disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidefield_core::config::CameraConfig;
    use tidefield_core::Srgb;

    fn camera(w: u32, h: u32) -> Camera {
        Camera::new(&CameraConfig::default(), w, h)
    }

    fn view<'a>(positions: &'a [f32], colors: &'a [f32], sizes: &'a [f32]) -> FrameView<'a> {
        FrameView {
            positions,
            colors,
            sizes,
            rotation_y: 0.0,
            fog_color: LinearRgb::default(),
            fog_density: 0.0,
            base_size: 4.0,
            opacity: 1.0,
            background: Srgb::from_u32(0x000000),
        }
    }

    #[test]
    fn empty_frame_clears_to_background() {
        let mut r = RasterRenderer::new(Surface::new(16, 8).unwrap()).unwrap();
        let mut v = view(&[], &[], &[]);
        v.background = Srgb::from_u32(0xffffff);
        r.render(&v, &camera(16, 8)).unwrap();
        assert!(r.pixels().iter().all(|p| (p.r - 1.0).abs() < 1e-5));
        assert_eq!(r.points_drawn(), 0);
    }

    #[test]
    fn point_at_target_lights_the_center() {
        let mut r = RasterRenderer::new(Surface::new(64, 64).unwrap()).unwrap();
        let v = view(&[0.0, 0.0, 0.0], &[1.0, 0.5, 0.0], &[1.0]);
        r.render(&v, &camera(64, 64)).unwrap();
        assert_eq!(r.points_drawn(), 1);
        let center = r.pixel(32, 32).unwrap();
        assert!(center.r > 0.5, "center = {center:?}");
        assert!(center.g > 0.25 && center.g < center.r);
        let corner = r.pixel(0, 0).unwrap();
        assert_eq!(corner, LinearRgb::default());
    }

    #[test]
    fn additive_blending_accumulates_overlapping_points() {
        let mut single = RasterRenderer::new(Surface::new(64, 64).unwrap()).unwrap();
        let mut double = RasterRenderer::new(Surface::new(64, 64).unwrap()).unwrap();
        let cam = camera(64, 64);
        single
            .render(&view(&[0.0; 3], &[0.2; 3], &[1.0]), &cam)
            .unwrap();
        double
            .render(&view(&[0.0; 6], &[0.2; 6], &[1.0, 1.0]), &cam)
            .unwrap();
        let a = single.pixel(32, 32).unwrap().r;
        let b = double.pixel(32, 32).unwrap().r;
        assert!((b - 2.0 * a).abs() < 1e-5, "single {a}, double {b}");
    }

    #[test]
    fn points_behind_the_camera_are_skipped() {
        let mut r = RasterRenderer::new(Surface::new(32, 32).unwrap()).unwrap();
        r.render(&view(&[0.0, 3.0, 30.0], &[1.0; 3], &[1.0]), &camera(32, 32))
            .unwrap();
        assert_eq!(r.points_drawn(), 0);
    }

    #[test]
    fn fog_factor_grows_with_depth() {
        assert_eq!(fog_factor(0.025, 0.0), 0.0);
        assert_eq!(fog_factor(0.0, 100.0), 0.0);
        assert!(fog_factor(0.025, 10.0) < fog_factor(0.025, 40.0));
        assert!(fog_factor(0.025, 1e6) > 0.999);
    }

    #[test]
    fn mismatched_buffers_are_rejected() {
        let mut r = RasterRenderer::new(Surface::new(8, 8).unwrap()).unwrap();
        let err = r
            .render(&view(&[0.0; 3], &[0.0; 6], &[1.0]), &camera(8, 8))
            .unwrap_err();
        assert!(matches!(err, FieldError::Render(_)));
    }

    #[test]
    fn resize_reallocates_the_framebuffer() {
        let mut r = RasterRenderer::new(Surface::new(8, 8).unwrap()).unwrap();
        r.resize(Surface::new(20, 10).unwrap()).unwrap();
        assert_eq!((r.width(), r.height()), (20, 10));
        assert_eq!(r.pixels().len(), 200);
        assert!(r.pixel(20, 0).is_none());
    }

    #[test]
    fn oversized_surface_is_rejected() {
        let huge = Surface::new(u32::MAX, u32::MAX).unwrap();
        assert!(matches!(
            RasterRenderer::new(huge),
            Err(FieldError::InvalidDimensions)
        ));
        let mut r = RasterRenderer::new(Surface::new(8, 4).unwrap()).unwrap();
        assert!(matches!(r.resize(huge), Err(FieldError::InvalidDimensions)));
        assert_eq!((r.width(), r.height()), (8, 4));
        assert_eq!(r.pixels().len(), 32);
    }

    #[test]
    fn dispose_releases_memory_and_blocks_further_use() {
        let mut r = RasterRenderer::new(Surface::new(8, 8).unwrap()).unwrap();
        r.dispose();
        assert!(r.is_disposed());
        assert!(r.pixels().is_empty());
        assert!(r.render(&view(&[], &[], &[]), &camera(8, 8)).is_err());
        assert!(r.resize(Surface::new(4, 4).unwrap()).is_err());
    }
}
