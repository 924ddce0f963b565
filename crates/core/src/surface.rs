//! Renderer seam: the host surface, the per-frame view handed to a renderer,
//! and the [`Renderer`] trait itself.

use crate::camera::Camera;
use crate::color::{LinearRgb, Srgb};
use crate::error::FieldError;

/// Size of the host render surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    /// Returns `FieldError::InvalidDimensions` if either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }
}

/// Borrowed snapshot of one animated frame.
///
/// `positions` are model-space; the renderer applies `rotation_y` about the
/// vertical axis before the camera transform. `colors` are linear RGB.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub sizes: &'a [f32],
    pub rotation_y: f32,
    pub fog_color: LinearRgb,
    pub fog_density: f32,
    pub base_size: f32,
    pub opacity: f32,
    pub background: Srgb,
}

impl FrameView<'_> {
    /// Number of particles in the view.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Something that can draw frames onto a surface.
///
/// Object-safe so a mount can hold `Box<dyn Renderer>`.
pub trait Renderer {
    /// Reallocates for a new surface size.
    fn resize(&mut self, surface: Surface) -> Result<(), FieldError>;

    /// Draws one frame as seen through `camera`.
    fn render(&mut self, frame: &FrameView<'_>, camera: &Camera) -> Result<(), FieldError>;

    /// Releases every resource the renderer holds. Called once, on unmount.
    fn dispose(&mut self);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn resize(&mut self, surface: Surface) -> Result<(), FieldError> {
        (**self).resize(surface)
    }

    fn render(&mut self, frame: &FrameView<'_>, camera: &Camera) -> Result<(), FieldError> {
        (**self).render(frame, camera)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}
