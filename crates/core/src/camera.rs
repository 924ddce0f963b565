//! Perspective camera looking down at the particle field.

use crate::config::CameraConfig;
use glam::{Mat4, Vec3, Vec4Swizzles};

/// Right-handed perspective camera with a fixed eye and target.
///
/// Only the aspect ratio changes over the camera's lifetime, on resize.
#[derive(Debug, Clone)]
pub struct Camera {
    fov_y: f32,
    near: f32,
    far: f32,
    aspect: f32,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let eye = Vec3::from_array(config.eye);
        let target = Vec3::from_array(config.target);
        let mut camera = Self {
            fov_y: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            aspect: 1.0,
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection: Mat4::IDENTITY,
        };
        camera.set_viewport(width, height);
        camera
    }

    /// Sets the aspect ratio to `width / height` and rebuilds the projection.
    ///
    /// A zero dimension keeps the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("ignoring {width}x{height} viewport");
        } else {
            self.aspect = width as f32 / height as f32;
        }
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Projects a world-space point.
    ///
    /// Returns normalized device coordinates and the view-space depth (distance
    /// along the viewing axis), or `None` when the point lies outside the
    /// near/far range.
    pub fn project(&self, model: Mat4, point: Vec3) -> Option<(Vec3, f32)> {
        let view_pos = self.view * model * point.extend(1.0);
        let depth = -view_pos.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let clip = self.projection * view_pos;
        Some((clip.xyz() / clip.w, depth))
    }
}
