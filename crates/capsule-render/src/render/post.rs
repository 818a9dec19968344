use wgpu;

use super::helpers::{self, sampler_entry, texture_entry, uniform_entry, TARGET_FORMAT};
use super::targets::RenderTargets;
use capsule_core::{BlurUniformsGpu, DebugView, PostUniformsGpu};

/// One fullscreen pipeline per debug view; they share a layout and shader.
pub(crate) struct CompositePipelines {
    final_view: wgpu::RenderPipeline,
    mask: wgpu::RenderPipeline,
    edges: wgpu::RenderPipeline,
    color: wgpu::RenderPipeline,
    glow: wgpu::RenderPipeline,
}

impl CompositePipelines {
    pub(crate) fn select(&self, view: DebugView) -> &wgpu::RenderPipeline {
        match view {
            DebugView::Final => &self.final_view,
            DebugView::Mask => &self.mask,
            DebugView::Edges => &self.edges,
            DebugView::Color => &self.color,
            DebugView::Glow => &self.glow,
        }
    }
}

pub(crate) struct PostResources {
    pub(crate) bright_bgl: wgpu::BindGroupLayout, // scene+color+sampler+post
    pub(crate) blur_bgl: wgpu::BindGroupLayout,   // src+sampler+blur
    pub(crate) composite_bgl: wgpu::BindGroupLayout,
    pub(crate) post_buffer: wgpu::Buffer,
    pub(crate) blur_h_buffer: wgpu::Buffer,
    pub(crate) blur_v_buffer: wgpu::Buffer,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite: CompositePipelines,
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let frag = wgpu::ShaderStages::FRAGMENT;
    let bright_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("bright_bgl"),
        entries: &[
            texture_entry(0),
            texture_entry(1),
            sampler_entry(2),
            uniform_entry(3, frag),
        ],
    });
    let blur_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("blur_bgl"),
        entries: &[texture_entry(0), sampler_entry(1), uniform_entry(2, frag)],
    });
    let composite_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("composite_bgl"),
        entries: &[
            texture_entry(0),
            texture_entry(1),
            texture_entry(2),
            texture_entry(3),
            sampler_entry(4),
            uniform_entry(5, frag),
        ],
    });

    let post_buffer = helpers::uniform_buffer::<PostUniformsGpu>(device, "post_uniforms");
    let blur_h_buffer = helpers::uniform_buffer::<BlurUniformsGpu>(device, "blur_h_uniforms");
    let blur_v_buffer = helpers::uniform_buffer::<BlurUniformsGpu>(device, "blur_v_uniforms");

    let shader = |label: &str, source: &'static str| {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    };
    let bright_shader = shader("bright_shader", capsule_core::BRIGHT_WGSL);
    let blur_shader = shader("blur_shader", capsule_core::BLUR_WGSL);
    let composite_shader = shader("composite_shader", capsule_core::COMPOSITE_WGSL);

    let layout = |label: &str, bgl: &wgpu::BindGroupLayout| {
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[bgl],
            push_constant_ranges: &[],
        })
    };
    let pl_bright = layout("pl_bright", &bright_bgl);
    let pl_blur = layout("pl_blur", &blur_bgl);
    let pl_composite = layout("pl_composite", &composite_bgl);

    let bright_pipeline = helpers::make_post_pipeline(
        device,
        "bright_pipeline",
        &pl_bright,
        &bright_shader,
        "fs_bright",
        TARGET_FORMAT,
    );
    let blur_pipeline = helpers::make_post_pipeline(
        device,
        "blur_pipeline",
        &pl_blur,
        &blur_shader,
        "fs_blur",
        TARGET_FORMAT,
    );
    let view_pipeline = |entry: &str| {
        helpers::make_post_pipeline(
            device,
            entry,
            &pl_composite,
            &composite_shader,
            entry,
            swap_format,
        )
    };
    let composite = CompositePipelines {
        final_view: view_pipeline("fs_final"),
        mask: view_pipeline("fs_view_mask"),
        edges: view_pipeline("fs_view_edges"),
        color: view_pipeline("fs_view_color"),
        glow: view_pipeline("fs_view_glow"),
    };

    PostResources {
        bright_bgl,
        blur_bgl,
        composite_bgl,
        post_buffer,
        blur_h_buffer,
        blur_v_buffer,
        bright_pipeline,
        blur_pipeline,
        composite,
    }
}

/// Bind groups that reference the current targets; rebuilt on resize.
pub(crate) struct PostBindGroups {
    pub(crate) bright: wgpu::BindGroup,
    pub(crate) blur_h: wgpu::BindGroup, // samples bloom_a
    pub(crate) blur_v: wgpu::BindGroup, // samples bloom_b
    pub(crate) composite: wgpu::BindGroup,
}

impl PostBindGroups {
    pub(crate) fn new(
        device: &wgpu::Device,
        post: &PostResources,
        targets: &RenderTargets,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let samp = |binding| wgpu::BindGroupEntry {
            binding,
            resource: wgpu::BindingResource::Sampler(sampler),
        };
        let bright = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bright"),
            layout: &post.bright_bgl,
            entries: &[
                tex(0, &targets.scene),
                tex(1, &targets.color),
                samp(2),
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: post.post_buffer.as_entire_binding(),
                },
            ],
        });
        let blur = |label: &str, src: &wgpu::TextureView, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &post.blur_bgl,
                entries: &[
                    tex(0, src),
                    samp(1),
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let blur_h = blur("bg_blur_h", &targets.bloom_a, &post.blur_h_buffer);
        let blur_v = blur("bg_blur_v", &targets.bloom_b, &post.blur_v_buffer);
        let composite = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_composite"),
            layout: &post.composite_bgl,
            entries: &[
                tex(0, &targets.color),
                tex(1, &targets.mask),
                tex(2, &targets.glow),
                tex(3, &targets.bloom_a),
                samp(4),
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: post.post_buffer.as_entire_binding(),
                },
            ],
        });
        Self {
            bright,
            blur_h,
            blur_v,
            composite,
        }
    }
}

fn tex(binding: u32, view: &wgpu::TextureView) -> wgpu::BindGroupEntry<'_> {
    wgpu::BindGroupEntry {
        binding,
        resource: wgpu::BindingResource::TextureView(view),
    }
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    clear: wgpu::Color,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bind_group, &[]);
    r.draw(0..3, 0..1);
}
