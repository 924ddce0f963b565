#![deny(unsafe_code)]
//! CPU rendering for tidefield.
//!
//! [`RasterRenderer`] implements the core [`Renderer`](tidefield_core::Renderer)
//! trait by splatting every particle as a soft glow sprite into a linear RGB
//! framebuffer. The `png` feature (default on) adds [`snapshot::write_png`]
//! for writing a frame to disk.

pub mod pixel;
pub mod raster;
pub mod sprite;

#[cfg(feature = "png")]
pub mod snapshot;

pub use raster::RasterRenderer;
pub use sprite::GlowSprite;
