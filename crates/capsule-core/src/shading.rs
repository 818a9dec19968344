//! Per-object surface shading: gradient by height, bend toward the rim,
//! wave displacement and rim emissive. Mirrors `shaders/object.wgsl`.

use glam::{Mat4, Vec3};

use crate::gradient::{smooth_edge, wave_offset, GradientSpec};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaveParams {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
}

impl WaveParams {
    pub const NONE: Self = Self {
        amplitude: 0.0,
        frequency: 0.0,
        phase: 0.0,
    };

    /// Sideways shift at `world`, with the wave axis tilted by the scene rotation.
    #[inline]
    pub fn offset(&self, world: Vec3, rotation: f32) -> f32 {
        wave_offset(world, rotation, self.frequency, self.phase, self.amplitude)
    }
}

impl Default for WaveParams {
    fn default() -> Self {
        Self::NONE
    }
}

/// Live-mutable uniforms of one shaded object.
///
/// `y_min`/`y_max` are cached from the object's mesh when it is created and
/// normalise local height into [0, 1]. The wave rotation is scene-wide and is
/// passed in by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadingUniforms {
    pub gradient: GradientSpec,
    pub edge_glow: f32,
    pub edge_width: f32,
    pub wave: WaveParams,
    pub y_min: f32,
    pub y_max: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceSample {
    pub color: Vec3,
    pub emissive: Vec3,
}

impl SurfaceSample {
    pub fn radiance(&self) -> Vec3 {
        self.color + self.emissive
    }
}

impl ShadingUniforms {
    pub fn normalized_y(&self, local_y: f32) -> f32 {
        (local_y - self.y_min) / (self.y_max - self.y_min)
    }

    /// Gradient parameter: height plus `bend` times how far the normal turns
    /// away from the camera (0 facing, 1 at the silhouette, 2 facing away).
    pub fn gradient_t(&self, local_y: f32, normal_z: f32) -> f32 {
        let edge = 1.0 - normal_z;
        (self.normalized_y(local_y) + edge * self.gradient.bend()).clamp(0.0, 1.0)
    }

    pub fn shade(&self, local_y: f32, normal_z: f32) -> SurfaceSample {
        let color = self.gradient.sample(self.gradient_t(local_y, normal_z));
        let rim = smooth_edge(self.edge_width, 0.0, normal_z) * self.edge_glow;
        SurfaceSample {
            color,
            emissive: color * rim,
        }
    }

    pub fn to_gpu(&self, model: Mat4) -> ObjectUniformsGpu {
        let c = self.gradient.colors();
        ObjectUniformsGpu {
            model: model.to_cols_array_2d(),
            colors: [
                c[0].extend(1.0).to_array(),
                c[1].extend(1.0).to_array(),
                c[2].extend(1.0).to_array(),
                c[3].extend(1.0).to_array(),
            ],
            stops: self.gradient.stops(),
            bounds_bend: [self.y_min, self.y_max, self.gradient.bend(), self.edge_glow],
            edge_wave: [
                self.edge_width,
                self.wave.amplitude,
                self.wave.frequency,
                self.wave.phase,
            ],
        }
    }
}

/// `ObjectUniforms` in `object.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniformsGpu {
    pub model: [[f32; 4]; 4],
    pub colors: [[f32; 4]; 4],
    pub stops: [f32; 4],
    pub bounds_bend: [f32; 4], // y_min, y_max, bend, edge_glow
    pub edge_wave: [f32; 4],   // edge_width, amplitude, frequency, phase
}

/// `FrameUniforms` shared by the object and glow programs (group 0).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniformsGpu {
    pub view_proj: [[f32; 4]; 4],
    pub params: [f32; 4], // rotation, time, _, _
}
