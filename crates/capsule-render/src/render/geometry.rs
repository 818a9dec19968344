use wgpu;
use wgpu::util::DeviceExt;

use super::helpers::{self, DEPTH_FORMAT, TARGET_FORMAT};
use capsule_core::{GlowField, MeshVertex, ShadedObject};

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

/// Uploaded geometry plus the uniform buffer and bind group (group 1) of one
/// object or glow field.
pub(crate) struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl GpuMesh {
    fn upload<U>(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        vertices: &[MeshVertex],
        indices: &[u32],
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = helpers::uniform_buffer::<U>(device, label);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    pub(crate) fn for_object(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        object: &ShadedObject,
    ) -> Self {
        let mesh = object.mesh();
        Self::upload::<capsule_core::ObjectUniformsGpu>(
            device,
            layout,
            "capsule_mesh",
            &mesh.vertices,
            &mesh.indices,
        )
    }

    pub(crate) fn for_glow(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        glow: &GlowField,
    ) -> Self {
        let (vertices, indices) = glow.plane().mesh();
        Self::upload::<capsule_core::GlowUniformsGpu>(
            device,
            layout,
            "glow_plane",
            &vertices,
            &indices,
        )
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

pub(crate) struct GeometryResources {
    pub(crate) object_bgl: wgpu::BindGroupLayout,
    pub(crate) frame_buffer: wgpu::Buffer,
    pub(crate) frame_bind_group: wgpu::BindGroup,
    pub(crate) object_pipeline: wgpu::RenderPipeline,
    pub(crate) mask_pipeline: wgpu::RenderPipeline,
    pub(crate) glow_pipeline: wgpu::RenderPipeline,
}

pub(crate) fn create_geometry_resources(device: &wgpu::Device) -> GeometryResources {
    let stages = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
    let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("frame_bgl"),
        entries: &[helpers::uniform_entry(0, stages)],
    });
    let object_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("object_bgl"),
        entries: &[helpers::uniform_entry(0, stages)],
    });
    let frame_buffer =
        helpers::uniform_buffer::<capsule_core::FrameUniformsGpu>(device, "frame_uniforms");
    let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("frame_bg"),
        layout: &frame_bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: frame_buffer.as_entire_binding(),
        }],
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_geometry"),
        bind_group_layouts: &[&frame_bgl, &object_bgl],
        push_constant_ranges: &[],
    });

    let object_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("object_shader"),
        source: wgpu::ShaderSource::Wgsl(capsule_core::OBJECT_WGSL.into()),
    });
    let glow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("glow_shader"),
        source: wgpu::ShaderSource::Wgsl(capsule_core::GLOW_WGSL.into()),
    });

    let depth = Some(wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    });
    let object_pipeline = make_mesh_pipeline(
        device,
        "object_pipeline",
        &layout,
        &object_shader,
        ("vs_object", "fs_object"),
        depth.clone(),
        wgpu::BlendState::REPLACE,
    );
    let mask_pipeline = make_mesh_pipeline(
        device,
        "mask_pipeline",
        &layout,
        &object_shader,
        ("vs_object", "fs_mask"),
        depth,
        wgpu::BlendState::REPLACE,
    );
    // Glow planes overlap, so they sum rather than occlude.
    let additive = wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    };
    let glow_pipeline = make_mesh_pipeline(
        device,
        "glow_pipeline",
        &layout,
        &glow_shader,
        ("vs_glow", "fs_glow"),
        None,
        additive,
    );

    GeometryResources {
        object_bgl,
        frame_buffer,
        frame_bind_group,
        object_pipeline,
        mask_pipeline,
        glow_pipeline,
    }
}

fn make_mesh_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    (vs_entry, fs_entry): (&str, &str),
    depth_stencil: Option<wgpu::DepthStencilState>,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            buffers: &[vertex_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}
