//! PNG snapshots of the rasterized framebuffer.
//!
//! Feature-gated behind `png` (default on) so embedders that only need the
//! rasterizer do not pull in the `image` crate.

use std::path::Path;
use tidefield_core::FieldError;

use crate::pixel::linear_to_rgba;
use crate::raster::RasterRenderer;

/// Writes the renderer's current framebuffer as a PNG image.
///
/// Returns `FieldError::Render` if the renderer was disposed, or
/// `FieldError::Io` on write failure.
pub fn write_png(renderer: &RasterRenderer, path: &Path) -> Result<(), FieldError> {
    if renderer.is_disposed() {
        return Err(FieldError::Render("snapshot of a disposed renderer".into()));
    }
    let rgba = linear_to_rgba(renderer.pixels());
    let img = image::RgbaImage::from_raw(renderer.width(), renderer.height(), rgba)
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))?;
    log::info!(
        "wrote {}x{} snapshot to {}",
        renderer.width(),
        renderer.height(),
        path.display()
    );
    Ok(())
}
