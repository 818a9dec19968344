use std::sync::Arc;

use anyhow::Context;
use capsule_core::constants::DEFAULT_MAX_TEXTURE_DIM;
use capsule_core::{demo_scene, FramePacer, ParamKey, PassOrchestrator, RenderConfig, TargetSize};
use capsule_render::GpuRenderer;
use winit::{event::*, event_loop::EventLoop, window::Window, window::WindowBuilder};

fn target_size(window: &Window, max_dim: u32) -> TargetSize {
    let scale = window.scale_factor();
    let logical = window.inner_size().to_logical::<f64>(scale);
    TargetSize::from_viewport(logical.width, logical.height, scale, max_dim)
}

fn parse_args() -> anyhow::Result<RenderConfig> {
    let mut config = RenderConfig::default();
    for arg in std::env::args().skip(1) {
        if arg == "--help" || arg == "-h" {
            let names: Vec<_> = ParamKey::ALL.iter().map(|k| k.name()).collect();
            println!("usage: capsule-native [name=value ...]\nparameters: {}", names.join(", "));
            std::process::exit(0);
        }
        config
            .set_assignment(&arg)
            .with_context(|| format!("bad argument `{arg}`"))?;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("capsule-native starting (log level {})", log::max_level());

    let config = parse_args()?;
    let mut scene = demo_scene()?;
    config.apply(&mut scene);

    let event_loop = EventLoop::new().context("event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Capsules (native)")
            .build(&event_loop)
            .context("window")?,
    );

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(Arc::clone(&window))?;
    let size = target_size(&window, DEFAULT_MAX_TEXTURE_DIM);
    let renderer = pollster::block_on(GpuRenderer::new(&instance, surface, size)).context("gpu")?;
    let max_dim = renderer.max_texture_dimension().min(DEFAULT_MAX_TEXTURE_DIM);
    log::info!("[native] {} objects, target {}x{}", scene.len(), size.width, size.height);

    let mut orchestrator = PassOrchestrator::new(renderer, size);
    let mut pacer = FramePacer::default();
    let inputs = config.frame_inputs();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(_),
            ..
        } => orchestrator.request_resize(target_size(&window, max_dim)),
        Event::WindowEvent {
            event: WindowEvent::Occluded(occluded),
            ..
        } => scene.set_active(!occluded),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => {
            let stats = orchestrator.stats();
            log::info!("[native] exiting, presented={} dropped={}", stats.presented, stats.dropped);
            elwt.exit();
        }
        Event::AboutToWait => {
            if let Some(dt_sec) = pacer.tick() {
                scene.advance_clock(dt_sec);
                // dropped frames are logged by the orchestrator; the next tick retries
                let _ = orchestrator.render_frame(&mut scene, &inputs);
            }
            window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}
