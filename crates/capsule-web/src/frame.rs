use std::cell::RefCell;
use std::rc::Rc;

use capsule_core::{FramePacer, PassOrchestrator, Scene};
use capsule_render::GpuRenderer;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::controls;
use crate::dom;

pub struct FrameContext {
    pub canvas: web::HtmlCanvasElement,
    pub scene: Scene,
    pub orchestrator: PassOrchestrator<GpuRenderer<'static>>,
    pub pacer: FramePacer,
    pub max_dim: u32,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let Some(dt_sec) = self.pacer.tick() else {
            return;
        };
        let inputs = controls::sync(&mut self.scene);
        self.scene.advance_clock(dt_sec);
        // dropped frames are logged by the orchestrator; the next tick retries
        let _ = self.orchestrator.render_frame(&mut self.scene, &inputs);
    }

    pub fn on_resize(&mut self) {
        let size = dom::canvas_target_size(&self.canvas, self.max_dim);
        self.orchestrator.request_resize(size);
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
