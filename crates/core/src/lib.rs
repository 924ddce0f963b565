#![deny(unsafe_code)]
//! Core types for tidefield, an animated particle-field background.
//!
//! A [`FieldAnimator`] owns a fixed set of particles scattered over a ground
//! plane and, every frame, eases each particle's height toward a closed-form
//! wave plus a cursor repulsion term and recolors it along a theme ramp.
//! [`FieldMount`] and [`FrameLoop`] bind an animator to a host surface and a
//! [`Renderer`] for one mounted lifetime. The `scroll` module carries the
//! page's smooth-scroll easing and scroll-spy helpers.

pub mod animator;
pub mod camera;
pub mod color;
pub mod config;
pub mod cursor;
pub mod error;
pub mod lifecycle;
pub mod params;
pub mod particle;
pub mod prng;
pub mod scroll;
pub mod surface;
pub mod theme;
pub mod wave;

pub use animator::{FieldAnimator, FrameInput};
pub use camera::Camera;
pub use color::{LinearRgb, Srgb};
pub use config::FieldConfig;
pub use cursor::{Cursor, CursorHandle};
pub use error::FieldError;
pub use lifecycle::{
    EventQueue, FieldMount, FixedRateScheduler, FrameLoop, FrameScheduler, HostContext,
    HostEvent, StopToken, Teardown,
};
pub use particle::ParticleSet;
pub use prng::Xorshift64;
pub use surface::{FrameView, Renderer, Surface};
pub use theme::{Theme, ThemeHandle, ThemePalette};
