//! Post-pass algebra: emissive extraction, bloom, background masking, noise,
//! fade and debug-view selection. Mirrors `bright.wgsl`, `blur.wgsl` and
//! `composite.wgsl`; the GPU bloom runs at half resolution, so only the
//! structure matches, not the exact blur.

use std::fmt;
use std::str::FromStr;

use glam::{Vec3, Vec4};

use crate::constants::{
    BLOOM_SIGMA_BASE, BLOOM_SIGMA_SPAN, BLOOM_SPREAD_BASE, BLOOM_SPREAD_SPAN, BLOOM_THRESHOLD,
    DEFAULT_BLOOM_RADIUS, DEFAULT_BLOOM_STRENGTH, DEFAULT_NOISE_STRENGTH, DEFAULT_OPACITY,
};
use crate::error::ConfigError;
use crate::gradient::hash;
use crate::targets::TargetSize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DebugView {
    #[default]
    Final,
    Mask,
    Edges,
    Color,
    Glow,
}

impl DebugView {
    pub const ALL: [DebugView; 5] = [
        DebugView::Final,
        DebugView::Mask,
        DebugView::Edges,
        DebugView::Color,
        DebugView::Glow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DebugView::Final => "final",
            DebugView::Mask => "mask",
            DebugView::Edges => "edges",
            DebugView::Color => "color",
            DebugView::Glow => "glow",
        }
    }

    /// Raw views show one intermediate buffer untouched by noise or fade.
    pub fn is_raw(&self) -> bool {
        !matches!(self, DebugView::Final)
    }
}

impl fmt::Display for DebugView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebugView {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DebugView::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "debugView",
                value: s.to_string(),
            })
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BloomSettings {
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            threshold: BLOOM_THRESHOLD,
            strength: DEFAULT_BLOOM_STRENGTH,
            radius: DEFAULT_BLOOM_RADIUS,
        }
    }
}

impl BloomSettings {
    /// Gaussian sigma in full-resolution pixels for the CPU blur.
    pub fn sigma(&self) -> f32 {
        BLOOM_SIGMA_BASE + BLOOM_SIGMA_SPAN * self.radius.clamp(0.0, 1.0)
    }

    /// Tap spacing in half-resolution texels for the GPU blur.
    pub fn spread(&self) -> f32 {
        BLOOM_SPREAD_BASE + BLOOM_SPREAD_SPAN * self.radius.clamp(0.0, 1.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CompositeState {
    pub debug_view: DebugView,
    pub noise_strength: f32,
    pub glow_visible: bool,
    pub edges_visible: bool,
    pub opacity: f32,
    pub bloom: BloomSettings,
}

impl Default for CompositeState {
    fn default() -> Self {
        Self {
            debug_view: DebugView::Final,
            noise_strength: DEFAULT_NOISE_STRENGTH,
            glow_visible: true,
            edges_visible: true,
            opacity: DEFAULT_OPACITY,
            bloom: BloomSettings::default(),
        }
    }
}

impl CompositeState {
    pub fn post_uniforms(&self, size: TargetSize, time: f32) -> PostUniformsGpu {
        PostUniformsGpu {
            resolution: [size.width as f32, size.height as f32],
            bloom_strength: self.bloom.strength,
            bloom_radius: self.bloom.radius,
            threshold: self.bloom.threshold,
            noise_strength: self.noise_strength,
            opacity: self.opacity.clamp(0.0, 1.0),
            time,
            glow_visible: if self.glow_visible { 1.0 } else { 0.0 },
            edges_visible: if self.edges_visible { 1.0 } else { 0.0 },
            _pad: [0.0; 2],
        }
    }
}

/// `PostUniforms` in `bright.wgsl` and `composite.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PostUniformsGpu {
    pub resolution: [f32; 2],
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub threshold: f32,
    pub noise_strength: f32,
    pub opacity: f32,
    pub time: f32,
    pub glow_visible: f32,
    pub edges_visible: f32,
    pub _pad: [f32; 2],
}

/// `BlurUniforms` in `blur.wgsl`; one buffer per direction.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlurUniformsGpu {
    pub direction: [f32; 2],
    pub texel: [f32; 2],
    pub spread: f32,
    pub _pad0: f32,
    pub _pad1: [f32; 2],
}

impl BlurUniformsGpu {
    pub fn new(direction: [f32; 2], size: TargetSize, bloom: &BloomSettings) -> Self {
        Self {
            direction,
            texel: [1.0 / size.width as f32, 1.0 / size.height as f32],
            spread: bloom.spread(),
            _pad0: 0.0,
            _pad1: [0.0; 2],
        }
    }
}

/// Linear RGBA image in row-major order, origin top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    size: TargetSize,
    data: Vec<Vec4>,
}

impl PixelBuffer {
    pub fn new(size: TargetSize, clear: Vec4) -> Self {
        Self {
            size,
            data: vec![clear; size.pixel_count()],
        }
    }

    pub fn size(&self) -> TargetSize {
        self.size
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.data
    }

    pub fn clear(&mut self, value: Vec4) {
        self.data.fill(value);
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: Vec4) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    fn map(&self, f: impl Fn(Vec4) -> Vec4) -> Self {
        Self {
            size: self.size,
            data: self.data.iter().map(|&p| f(p)).collect(),
        }
    }

    fn zip_map(&self, other: &Self, f: impl Fn(Vec4, Vec4) -> Vec4) -> Self {
        debug_assert_eq!(self.size, other.size);
        Self {
            size: self.size,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

/// Rim emissive isolated by cancelling the shared base gradient.
pub fn extract_emissive(scene: &PixelBuffer, color: &PixelBuffer) -> PixelBuffer {
    scene.zip_map(color, |s, c| (s.truncate() - c.truncate()).max(Vec3::ZERO).extend(1.0))
}

pub fn threshold(image: &PixelBuffer, level: f32) -> PixelBuffer {
    image.map(|p| (p.truncate() - Vec3::splat(level)).max(Vec3::ZERO).extend(1.0))
}

/// Normalised 1D Gaussian taps covering three standard deviations.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let sigma = sigma.max(1e-3);
    let reach = (sigma * 3.0).ceil() as i32;
    let mut taps: Vec<f32> = (-reach..=reach)
        .map(|i| (-(i * i) as f32 / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = taps.iter().sum();
    taps.iter_mut().for_each(|w| *w /= sum);
    taps
}

/// Separable Gaussian blur with clamp-to-edge addressing.
pub fn gaussian_blur(image: &PixelBuffer, sigma: f32) -> PixelBuffer {
    let kernel = gaussian_kernel(sigma);
    let horizontal = blur_axis(image, &kernel, true);
    blur_axis(&horizontal, &kernel, false)
}

fn blur_axis(image: &PixelBuffer, kernel: &[f32], horizontal: bool) -> PixelBuffer {
    let TargetSize { width, height } = image.size();
    let reach = (kernel.len() / 2) as i64;
    let mut out = PixelBuffer::new(image.size(), Vec4::ZERO);
    for y in 0..height {
        for x in 0..width {
            let mut acc = Vec3::ZERO;
            for (k, w) in kernel.iter().enumerate() {
                let d = k as i64 - reach;
                let (sx, sy) = if horizontal {
                    ((x as i64 + d).clamp(0, width as i64 - 1) as u32, y)
                } else {
                    (x, (y as i64 + d).clamp(0, height as i64 - 1) as u32)
                };
                acc += image.get(sx, sy).truncate() * *w;
            }
            out.set(x, y, acc.extend(1.0));
        }
    }
    out
}

/// `strength * blur(threshold(emissive))`.
pub fn bloom(emissive: &PixelBuffer, settings: &BloomSettings) -> PixelBuffer {
    let bright = threshold(emissive, settings.threshold);
    gaussian_blur(&bright, settings.sigma()).map(|p| (p.truncate() * settings.strength).extend(1.0))
}

/// Base color inside the silhouette, bloom and glow only behind it.
#[inline]
pub fn composite_pixel(
    color: Vec3,
    mask: f32,
    glow: Vec3,
    bloom: Vec3,
    state: &CompositeState,
) -> Vec3 {
    let inverted = 1.0 - mask;
    let edges = if state.edges_visible { 1.0 } else { 0.0 };
    let glow_on = if state.glow_visible { 1.0 } else { 0.0 };
    color * mask + bloom * inverted * edges + glow * inverted * glow_on
}

/// Screen-space grain seeded by pixel centre and time.
#[inline]
pub fn noise(px: u32, py: u32, time: f32, strength: f32) -> f32 {
    (hash(Vec3::new(px as f32 + 0.5, py as f32 + 0.5, time)) - 0.5) * strength
}

#[inline]
pub fn fade(value: Vec3, opacity: f32) -> Vec3 {
    value * opacity.clamp(0.0, 1.0)
}

/// Offscreen buffers produced by the four geometry passes.
#[derive(Clone, Debug)]
pub struct PassTargets {
    pub color: PixelBuffer,
    pub mask: PixelBuffer,
    pub glow: PixelBuffer,
    pub scene: PixelBuffer,
}

impl PassTargets {
    pub fn new(size: TargetSize) -> Self {
        Self {
            color: PixelBuffer::new(size, Vec4::ZERO),
            mask: PixelBuffer::new(size, Vec4::ZERO),
            glow: PixelBuffer::new(size, Vec4::ZERO),
            scene: PixelBuffer::new(size, Vec4::ZERO),
        }
    }

    pub fn size(&self) -> TargetSize {
        self.color.size()
    }
}

#[derive(Debug, Default)]
pub struct Compositor;

impl Compositor {
    /// Produces the displayed image for one frame.
    pub fn compose(&self, targets: &PassTargets, state: &CompositeState, time: f32) -> PixelBuffer {
        match state.debug_view {
            DebugView::Mask => targets.mask.clone(),
            DebugView::Color => targets.color.clone(),
            DebugView::Glow => targets.glow.map(|p| p.truncate().extend(1.0)),
            DebugView::Edges => {
                bloom(&extract_emissive(&targets.scene, &targets.color), &state.bloom)
            }
            DebugView::Final => self.final_image(targets, state, time),
        }
    }

    fn final_image(&self, targets: &PassTargets, state: &CompositeState, time: f32) -> PixelBuffer {
        let emissive = extract_emissive(&targets.scene, &targets.color);
        let bloomed = bloom(&emissive, &state.bloom);
        let size = targets.size();
        let mut out = PixelBuffer::new(size, Vec4::ZERO);
        for y in 0..size.height {
            for x in 0..size.width {
                let base = composite_pixel(
                    targets.color.get(x, y).truncate(),
                    targets.mask.get(x, y).x,
                    targets.glow.get(x, y).truncate(),
                    bloomed.get(x, y).truncate(),
                    state,
                );
                let grain = noise(x, y, time, state.noise_strength);
                let lit = (base + Vec3::splat(grain)).max(Vec3::ZERO);
                out.set(x, y, fade(lit, state.opacity).extend(1.0));
            }
        }
        out
    }
}
