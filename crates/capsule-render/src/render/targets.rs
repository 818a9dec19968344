use wgpu;

use super::helpers;
use capsule_core::TargetSize;

/// Offscreen targets for one frame.
///
/// - `color`, `mask`, `glow`, `scene` are the four geometry pass outputs at
///   full resolution; the composite samples all but `scene`.
/// - `depth` is shared by the three object passes, each clears it.
/// - `bloom_*` are half-res ping-pong buffers for the bright pass and blur.
pub(crate) struct RenderTargets {
    pub(crate) size: TargetSize,
    pub(crate) color: wgpu::TextureView,
    pub(crate) mask: wgpu::TextureView,
    pub(crate) glow: wgpu::TextureView,
    pub(crate) scene: wgpu::TextureView,
    pub(crate) depth: wgpu::TextureView,
    pub(crate) bloom_a: wgpu::TextureView,
    pub(crate) bloom_b: wgpu::TextureView,
    // keep the textures alive alongside their views
    _textures: Vec<wgpu::Texture>,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, size: TargetSize) -> Self {
        let TargetSize { width, height } = size;
        let half = size.half();
        let (color_tex, color) =
            helpers::create_color_target(device, "color_target", width, height);
        let (mask_tex, mask) = helpers::create_color_target(device, "mask_target", width, height);
        let (glow_tex, glow) = helpers::create_color_target(device, "glow_target", width, height);
        let (scene_tex, scene) =
            helpers::create_color_target(device, "scene_target", width, height);
        let (depth_tex, depth) = helpers::create_texture(
            device,
            "depth_target",
            width,
            height,
            helpers::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let (bloom_a_tex, bloom_a) =
            helpers::create_color_target(device, "bloom_a", half.width, half.height);
        let (bloom_b_tex, bloom_b) =
            helpers::create_color_target(device, "bloom_b", half.width, half.height);
        Self {
            size,
            color,
            mask,
            glow,
            scene,
            depth,
            bloom_a,
            bloom_b,
            _textures: vec![
                color_tex,
                mask_tex,
                glow_tex,
                scene_tex,
                depth_tex,
                bloom_a_tex,
                bloom_b_tex,
            ],
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, size: TargetSize) {
        *self = Self::new(device, size);
    }
}
