//! JS-facing control surface. Calls land here between frames and are picked
//! up by the next frame.

use std::cell::RefCell;

use capsule_core::{FrameInputs, RenderConfig, Scene};
use wasm_bindgen::prelude::*;

#[derive(Default)]
struct Controls {
    config: RenderConfig,
    dirty: bool,
    active: Option<bool>,
}

thread_local! {
    static CONTROLS: RefCell<Controls> = RefCell::new(Controls {
        dirty: true,
        ..Controls::default()
    });
}

/// Sets a named parameter, e.g. `set_param("edgeGlow", 2.0)`.
///
/// Numbers and booleans are accepted as-is; strings are parsed the same way
/// as native `name=value` arguments.
#[wasm_bindgen]
pub fn set_param(name: &str, value: JsValue) -> Result<(), JsValue> {
    let raw = if let Some(b) = value.as_bool() {
        b.to_string()
    } else if let Some(n) = value.as_f64() {
        n.to_string()
    } else if let Some(s) = value.as_string() {
        s
    } else {
        return Err(JsValue::from_str(&format!("unsupported value for `{name}`")));
    };
    CONTROLS.with(|c| {
        let mut c = c.borrow_mut();
        c.config
            .set_named(name, &raw)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        c.dirty = true;
        Ok(())
    })
}

/// Pauses or resumes rendering; GPU resources are kept while inactive.
#[wasm_bindgen]
pub fn set_active(active: bool) {
    CONTROLS.with(|c| c.borrow_mut().active = Some(active));
}

/// Applies pending changes to the scene and returns this frame's inputs.
pub(crate) fn sync(scene: &mut Scene) -> FrameInputs {
    CONTROLS.with(|c| {
        let mut c = c.borrow_mut();
        if let Some(active) = c.active.take() {
            scene.set_active(active);
        }
        if c.dirty {
            c.config.apply(scene);
            c.dirty = false;
        }
        c.config.frame_inputs()
    })
}
