//! wgpu backend for the pass orchestrator.
//!
//! Geometry passes write their uniforms and submit one at a time, so each
//! pass sees the scene state the orchestrator set up for it. The post chain
//! (bright, blur H, blur V, composite) goes out in a single submission and
//! is the only place the surface texture is presented.

use capsule_core::constants::CLEAR_COLOR;
use capsule_core::{
    BlurUniformsGpu, Camera, CompositeState, FrameUniformsGpu, MaterialOverride, PassBackend,
    PassKind, RenderError, Scene, TargetSize,
};
use wgpu;

mod geometry;
mod helpers;
mod post;
mod targets;

use geometry::{GeometryResources, GpuMesh};
use post::{PostBindGroups, PostResources};
use targets::RenderTargets;

pub struct GpuRenderer<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    linear_sampler: wgpu::Sampler,
    targets: RenderTargets,
    geometry: GeometryResources,
    post: PostResources,
    post_groups: PostBindGroups,
    // indexed by ObjectId; the scene never removes objects
    object_meshes: Vec<GpuMesh>,
    glow_meshes: Vec<GpuMesh>,
    frame: Option<wgpu::SurfaceTexture>,
}

impl<'w> GpuRenderer<'w> {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'w>,
        size: TargetSize,
    ) -> anyhow::Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // default limits avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        device.on_uncaptured_error(Box::new(|e| {
            log::error!("[gpu] uncaptured error: {e}");
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "[gpu] adapter={} format={format:?} size={}x{}",
            adapter.get_info().name,
            size.width,
            size.height
        );

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let targets = RenderTargets::new(&device, size);
        let geometry = geometry::create_geometry_resources(&device);
        let post = post::create_post_resources(&device, format);
        let post_groups = PostBindGroups::new(&device, &post, &targets, &linear_sampler);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            linear_sampler,
            targets,
            geometry,
            post,
            post_groups,
            object_meshes: Vec::new(),
            glow_meshes: Vec::new(),
            frame: None,
        })
    }

    /// Largest target edge the device accepts; front-ends cap their sizes to it.
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    pub fn size(&self) -> TargetSize {
        self.targets.size
    }

    fn upload_new_meshes(&mut self, scene: &Scene) {
        for object in scene.objects().iter().skip(self.object_meshes.len()) {
            let mesh = GpuMesh::for_object(&self.device, &self.geometry.object_bgl, object);
            self.object_meshes.push(mesh);
        }
        for glow in scene.glow_fields().iter().skip(self.glow_meshes.len()) {
            let mesh = GpuMesh::for_glow(&self.device, &self.geometry.object_bgl, glow);
            self.glow_meshes.push(mesh);
        }
    }

    fn write_frame_uniforms(&self, scene: &Scene) {
        let size = self.targets.size;
        let camera = Camera::for_target(size.width, size.height);
        let frame = FrameUniformsGpu {
            view_proj: camera.view_proj().to_cols_array_2d(),
            params: [scene.rotation(), scene.clock().elapsed(), 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.geometry.frame_buffer, 0, bytemuck::bytes_of(&frame));
    }

    fn encode_objects(&self, pass: PassKind, scene: &Scene, encoder: &mut wgpu::CommandEncoder) {
        let silhouette = scene.material_override() == Some(MaterialOverride::Silhouette);
        let (target, clear) = match pass {
            PassKind::Mask => (&self.targets.mask, wgpu::Color::TRANSPARENT),
            PassKind::Scene => (&self.targets.scene, helpers::color_to_wgpu(CLEAR_COLOR)),
            _ => (&self.targets.color, helpers::color_to_wgpu(CLEAR_COLOR)),
        };
        let mut meshes = Vec::new();
        for (id, object) in scene.drawn_objects() {
            let Some(mesh) = self.object_meshes.get(id.0) else {
                continue;
            };
            let uniforms = object.uniforms.to_gpu(scene.model_matrix(object.position));
            self.queue
                .write_buffer(&mesh.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
            meshes.push(mesh);
        }

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(pass.label()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_pipeline(if silhouette {
            &self.geometry.mask_pipeline
        } else {
            &self.geometry.object_pipeline
        });
        rpass.set_bind_group(0, &self.geometry.frame_bind_group, &[]);
        for mesh in meshes {
            mesh.draw(&mut rpass);
        }
    }

    fn encode_glow(&self, scene: &Scene, encoder: &mut wgpu::CommandEncoder) {
        let mut meshes = Vec::new();
        for (id, glow) in scene.drawn_glow_fields() {
            let Some(mesh) = self.glow_meshes.get(id.0) else {
                continue;
            };
            let uniforms = glow.uniforms.to_gpu(scene.model_matrix(glow.position));
            self.queue
                .write_buffer(&mesh.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
            meshes.push(mesh);
        }

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(PassKind::Glow.label()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.targets.glow,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_pipeline(&self.geometry.glow_pipeline);
        rpass.set_bind_group(0, &self.geometry.frame_bind_group, &[]);
        for mesh in meshes {
            mesh.draw(&mut rpass);
        }
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl PassBackend for GpuRenderer<'_> {
    fn resize(&mut self, size: TargetSize) -> Result<(), RenderError> {
        if self.frame.is_some() {
            return Err(RenderError::Submission("resize during an open frame".into()));
        }
        let max = self.max_texture_dimension();
        if size.width > max || size.height > max {
            return Err(RenderError::Submission(format!(
                "target {}x{} exceeds device limit {max}",
                size.width, size.height
            )));
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.reconfigure();
        self.targets.recreate(&self.device, size);
        self.post_groups =
            PostBindGroups::new(&self.device, &self.post, &self.targets, &self.linear_sampler);
        Ok(())
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        match self.surface.get_current_texture() {
            Ok(frame) => {
                self.frame = Some(frame);
                Ok(())
            }
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("[gpu] surface {e}, reconfiguring");
                self.reconfigure();
                Err(RenderError::Submission(e.to_string()))
            }
            Err(e) => Err(RenderError::Submission(e.to_string())),
        }
    }

    fn render_pass(&mut self, pass: PassKind, scene: &Scene) -> Result<(), RenderError> {
        self.upload_new_meshes(scene);
        self.write_frame_uniforms(scene);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(pass.label()),
            });
        match pass {
            PassKind::Glow => self.encode_glow(scene, &mut encoder),
            _ => self.encode_objects(pass, scene, &mut encoder),
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn composite(&mut self, state: &CompositeState, time: f32) -> Result<(), RenderError> {
        let frame = self
            .frame
            .take()
            .ok_or_else(|| RenderError::Submission("composite without an open frame".into()))?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let size = self.targets.size;
        let post = state.post_uniforms(size, time);
        let half = size.half();
        let blur_h = BlurUniformsGpu::new([1.0, 0.0], half, &state.bloom);
        let blur_v = BlurUniformsGpu::new([0.0, 1.0], half, &state.bloom);
        self.queue
            .write_buffer(&self.post.post_buffer, 0, bytemuck::bytes_of(&post));
        self.queue
            .write_buffer(&self.post.blur_h_buffer, 0, bytemuck::bytes_of(&blur_h));
        self.queue
            .write_buffer(&self.post.blur_v_buffer, 0, bytemuck::bytes_of(&blur_v));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("composite"),
            });
        // scene minus color -> bloom_a
        post::blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a,
            wgpu::Color::BLACK,
            &self.post.bright_pipeline,
            &self.post_groups.bright,
        );
        post::blit(
            &mut encoder,
            "blur_h",
            &self.targets.bloom_b,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.post_groups.blur_h,
        );
        post::blit(
            &mut encoder,
            "blur_v",
            &self.targets.bloom_a,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.post_groups.blur_v,
        );
        post::blit(
            &mut encoder,
            "composite",
            &view,
            helpers::color_to_wgpu(CLEAR_COLOR),
            self.post.composite.select(state.debug_view),
            &self.post_groups.composite,
        );
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn abort_frame(&mut self) {
        // dropping the surface texture discards it unpresented
        self.frame = None;
    }
}
