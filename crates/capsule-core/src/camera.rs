use glam::{Mat4, Vec2, Vec3};

use crate::constants::{CAMERA_FAR, CAMERA_NEAR, CAMERA_Z, VIEW_HALF_HEIGHT};

/// Fixed orthographic camera looking down -Z at the origin.
///
/// The visible height is always `2 * VIEW_HALF_HEIGHT` world units; the width
/// follows the target aspect ratio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub aspect: f32,
}

impl Camera {
    pub fn for_target(width: u32, height: u32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(VIEW_HALF_HEIGHT * self.aspect, VIEW_HALF_HEIGHT)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_Z), Vec3::ZERO, Vec3::Y)
    }

    /// Right-handed orthographic projection with a [0, 1] depth range.
    pub fn projection(&self) -> Mat4 {
        let h = self.half_extents();
        Mat4::orthographic_rh(-h.x, h.x, -h.y, h.y, CAMERA_NEAR, CAMERA_FAR)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World-space XY under the centre of pixel `(px, py)`, origin top-left.
    pub fn pixel_to_world(&self, px: u32, py: u32, width: u32, height: u32) -> Vec2 {
        let h = self.half_extents();
        let u = (px as f32 + 0.5) / width.max(1) as f32;
        let v = (py as f32 + 0.5) / height.max(1) as f32;
        Vec2::new((2.0 * u - 1.0) * h.x, (1.0 - 2.0 * v) * h.y)
    }
}
