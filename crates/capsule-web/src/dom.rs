use capsule_core::TargetSize;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn find_canvas(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("#{id} is not a canvas: {:?}", e)))
}

/// Backing size for the canvas' CSS box at the current device pixel ratio.
pub fn canvas_target_size(canvas: &web::HtmlCanvasElement, max_dim: u32) -> TargetSize {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let rect = canvas.get_bounding_client_rect();
    TargetSize::from_viewport(rect.width(), rect.height(), dpr, max_dim)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, size: TargetSize) {
    canvas.set_width(size.width);
    canvas.set_height(size.height);
}

pub fn add_window_listener(event: &str, mut handler: impl FnMut() + 'static) {
    let Some(window) = web::window() else {
        return;
    };
    let closure =
        wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    if let Err(e) = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::warn!("[dom] could not listen for {event}: {:?}", e);
    }
    closure.forget();
}
