#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use capsule_core::constants::DEFAULT_MAX_TEXTURE_DIM;
use capsule_core::{demo_scene, FramePacer, PassOrchestrator};
use capsule_render::GpuRenderer;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod controls;
mod dom;
mod frame;

pub use controls::{set_active, set_param};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("capsule-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::find_canvas(&document, "app-canvas")?;

    let size = dom::canvas_target_size(&canvas, DEFAULT_MAX_TEXTURE_DIM);
    dom::sync_canvas_backing_size(&canvas, size);

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    let renderer = GpuRenderer::new(&instance, surface, size).await?;
    let max_dim = renderer.max_texture_dimension().min(DEFAULT_MAX_TEXTURE_DIM);

    let scene = demo_scene()?;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        canvas,
        scene,
        orchestrator: PassOrchestrator::new(renderer, size),
        pacer: FramePacer::default(),
        max_dim,
    }));

    let resize_ctx = frame_ctx.clone();
    dom::add_window_listener("resize", move || resize_ctx.borrow_mut().on_resize());

    frame::start_loop(frame_ctx);
    Ok(())
}
