//! Ambient glow around each object: unsigned capsule distance, power-law
//! falloff, gradient tint and hash dither. Mirrors `shaders/glow.wgsl`.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::constants::{DEFAULT_DITHER_STRENGTH, DEFAULT_GLOW_FALLOFF, DEFAULT_GLOW_INTENSITY};
use crate::geometry::{CapsuleShape, GlowPlane};
use crate::gradient::{hash, GradientSpec};
use crate::shading::{ShadingUniforms, WaveParams};

/// Unsigned distance from `p` to a vertical capsule whose axis sits at `axis_x`.
#[inline]
pub fn capsule_distance(p: Vec2, axis_x: f32, half_length: f32, radius: f32) -> f32 {
    let cy = p.y.clamp(-half_length, half_length);
    let d = Vec2::new(p.x - axis_x, p.y - cy).length();
    (d - radius).max(0.0)
}

/// `(1 - clamp(distance / extent))^exponent`, zero at and beyond `extent`.
#[inline]
pub fn falloff(distance: f32, extent: f32, exponent: f32) -> f32 {
    let base = 1.0 - (distance / extent).clamp(0.0, 1.0);
    if base > 0.0 {
        base.powf(exponent)
    } else {
        0.0
    }
}

/// Glow uniforms. Gradient, bend and wave are mirrored from the parent object
/// every frame; the rest is owned by the glow field.
#[derive(Clone, Debug, PartialEq)]
pub struct GlowUniforms {
    pub intensity: f32,
    pub falloff: f32,
    pub extent: f32,
    pub dither: f32,
    pub gradient: GradientSpec,
    pub wave: WaveParams,
    pub half_length: f32,
    pub radius: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl GlowUniforms {
    pub fn for_object(shape: &CapsuleShape, plane: &GlowPlane, shading: &ShadingUniforms) -> Self {
        Self {
            intensity: DEFAULT_GLOW_INTENSITY,
            falloff: DEFAULT_GLOW_FALLOFF,
            extent: shape.max_extent(),
            dither: DEFAULT_DITHER_STRENGTH,
            gradient: shading.gradient.clone(),
            wave: shading.wave,
            half_length: shape.half_length(),
            radius: shape.radius,
            y_min: plane.y_min,
            y_max: plane.y_max,
        }
    }

    pub fn mirror(&mut self, shading: &ShadingUniforms) {
        if self.gradient != shading.gradient {
            self.gradient = shading.gradient.clone();
        }
        self.wave = shading.wave;
    }

    /// Glow contribution at a plane-local position.
    ///
    /// `world` is the same point in world space; it only feeds the wave so
    /// the distance is measured from the displaced axis. Returns linear RGB
    /// in `xyz` and coverage in `w`, both before additive blending.
    pub fn shade(&self, local: Vec3, world: Vec3, rotation: f32) -> Vec4 {
        let axis_x = self.wave.offset(world, rotation);
        let dist = capsule_distance(local.truncate(), axis_x, self.half_length, self.radius);
        let strength = falloff(dist, self.extent, self.falloff) * self.intensity;
        if strength <= 0.0 {
            return Vec4::ZERO;
        }
        let ny = (local.y - self.y_min) / (self.y_max - self.y_min);
        let t = (ny + self.gradient.bend()).clamp(0.0, 1.0);
        let color = self.gradient.sample(t);
        let dither = (hash(local) - 0.5) * self.dither;
        (color * strength + Vec3::splat(dither)).extend(strength + dither * 0.5)
    }

    pub fn to_gpu(&self, model: Mat4) -> GlowUniformsGpu {
        let c = self.gradient.colors();
        GlowUniformsGpu {
            model: model.to_cols_array_2d(),
            colors: [
                c[0].extend(1.0).to_array(),
                c[1].extend(1.0).to_array(),
                c[2].extend(1.0).to_array(),
                c[3].extend(1.0).to_array(),
            ],
            stops: self.gradient.stops(),
            bounds_bend: [self.y_min, self.y_max, self.gradient.bend(), self.intensity],
            shape: [self.half_length, self.radius, self.extent, self.falloff],
            wave: [
                self.wave.amplitude,
                self.wave.frequency,
                self.wave.phase,
                self.dither,
            ],
        }
    }
}

/// `GlowUniforms` in `glow.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlowUniformsGpu {
    pub model: [[f32; 4]; 4],
    pub colors: [[f32; 4]; 4],
    pub stops: [f32; 4],
    pub bounds_bend: [f32; 4], // plane y_min, y_max, bend, intensity
    pub shape: [f32; 4],       // half_length, radius, extent, falloff
    pub wave: [f32; 4],        // amplitude, frequency, phase, dither
}
