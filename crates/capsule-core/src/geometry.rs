//! Capsule and glow-plane geometry, built once per object.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::error::RenderError;

/// Interleaved vertex consumed by both the object and glow pipelines.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// A cylinder of `length` capped by two hemispheres of `radius`, axis along Y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CapsuleShape {
    pub radius: f32,
    pub length: f32,
}

impl CapsuleShape {
    pub fn new(radius: f32, length: f32) -> Result<Self, RenderError> {
        let valid = radius.is_finite() && length.is_finite() && radius > 0.0 && length >= 0.0;
        if !valid {
            return Err(RenderError::InvalidShape { radius, length });
        }
        Ok(Self { radius, length })
    }

    pub fn half_length(&self) -> f32 {
        self.length * 0.5
    }

    pub fn width(&self) -> f32 {
        self.radius * 2.0
    }

    pub fn height(&self) -> f32 {
        self.length + self.radius * 2.0
    }

    /// Largest footprint dimension; also the glow influence distance.
    pub fn max_extent(&self) -> f32 {
        self.width().max(self.height())
    }

    /// Front-most surface point seen along -Z through local `(x, y)`.
    ///
    /// Returns the local `z` and the unit surface normal, or `None` when the
    /// ray misses.
    pub fn front_hit(&self, x: f32, y: f32) -> Option<(f32, [f32; 3])> {
        let h = self.half_length();
        let dy = y - y.clamp(-h, h);
        let planar = x * x + dy * dy;
        let r2 = self.radius * self.radius;
        if planar > r2 {
            return None;
        }
        let z = (r2 - planar).sqrt();
        let inv = 1.0 / self.radius;
        Some((z, [x * inv, dy * inv, z * inv]))
    }
}

#[derive(Clone, Debug)]
pub struct CapsuleMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub y_min: f32,
    pub y_max: f32,
}

impl CapsuleMesh {
    pub fn build(shape: &CapsuleShape, radial_segments: u32, cap_segments: u32) -> Self {
        let radial = radial_segments.max(3);
        let caps = cap_segments.max(1);
        let h = shape.half_length();
        let r = shape.radius;

        // (y, ring radius, normal elevation angle) from top pole to bottom pole
        let mut profile: Vec<(f32, f32, f32)> = Vec::with_capacity(2 * (caps as usize + 1));
        for k in 0..=caps {
            let theta = FRAC_PI_2 * (1.0 - k as f32 / caps as f32);
            profile.push((h + r * theta.sin(), r * theta.cos(), theta));
        }
        for k in 0..=caps {
            let theta = -FRAC_PI_2 * (k as f32 / caps as f32);
            profile.push((-h + r * theta.sin(), r * theta.cos(), theta));
        }

        let mut vertices = Vec::with_capacity(profile.len() * (radial as usize + 1));
        for &(y, ring, theta) in &profile {
            for j in 0..=radial {
                let phi = TAU * j as f32 / radial as f32;
                let (s, c) = phi.sin_cos();
                vertices.push(MeshVertex {
                    position: [ring * c, y, ring * s],
                    normal: [theta.cos() * c, theta.sin(), theta.cos() * s],
                });
            }
        }

        let stride = radial + 1;
        let rings = profile.len() as u32;
        let mut indices = Vec::with_capacity(((rings - 1) * radial * 6) as usize);
        for a in 0..rings - 1 {
            for j in 0..radial {
                let i0 = a * stride + j;
                let i1 = i0 + 1;
                let i2 = i0 + stride;
                let i3 = i2 + 1;
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }

        let (y_min, y_max) = y_bounds(&vertices);
        Self {
            vertices,
            indices,
            y_min,
            y_max,
        }
    }
}

/// Flat quad behind an object, large enough for the glow to fade to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct GlowPlane {
    pub width: f32,
    pub height: f32,
    pub segments: u32,
    pub y_min: f32,
    pub y_max: f32,
}

impl GlowPlane {
    pub fn for_shape(shape: &CapsuleShape, segments: u32) -> Self {
        let pad = 2.0 * shape.max_extent();
        let width = shape.width() + pad;
        let height = shape.height() + pad;
        Self {
            width,
            height,
            segments: segments.max(1),
            y_min: -height * 0.5,
            y_max: height * 0.5,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x.abs() <= self.width * 0.5 && y >= self.y_min && y <= self.y_max
    }

    pub fn mesh(&self) -> (Vec<MeshVertex>, Vec<u32>) {
        let hw = self.width * 0.5;
        let mut vertices = Vec::with_capacity(2 * (self.segments as usize + 1));
        for k in 0..=self.segments {
            let y = self.y_min + (self.y_max - self.y_min) * k as f32 / self.segments as f32;
            for x in [-hw, hw] {
                vertices.push(MeshVertex {
                    position: [x, y, 0.0],
                    normal: [0.0, 0.0, 1.0],
                });
            }
        }
        let mut indices = Vec::with_capacity(self.segments as usize * 6);
        for k in 0..self.segments {
            let i0 = k * 2;
            indices.extend_from_slice(&[i0, i0 + 1, i0 + 2, i0 + 1, i0 + 3, i0 + 2]);
        }
        (vertices, indices)
    }
}

fn y_bounds(vertices: &[MeshVertex]) -> (f32, f32) {
    vertices
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v.position[1]), hi.max(v.position[1]))
        })
}
