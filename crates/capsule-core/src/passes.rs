//! Per-frame pass sequencing.
//!
//! The orchestrator owns the order and the scene state each pass sees; the
//! backend owns targets and draw calls. Every frame runs, in order:
//!
//! 1. color pass: edge glow zeroed, glow fields hidden
//! 2. mask pass: constant white silhouette override
//! 3. edge glow restored to the saved value
//! 4. glow pass: objects hidden, glow fields shown
//! 5. scene pass: objects with rim emissive, glow fields hidden
//! 6. composite: emissive extraction, bloom, masking, noise, fade, debug view
//!
//! A failing step aborts the frame. The scene's layer flags, material override
//! and edge glow are restored either way, and nothing is presented, so the
//! previous frame stays on screen.

use std::fmt;

use crate::composite::CompositeState;
use crate::error::RenderError;
use crate::scene::{LayerVisibility, MaterialOverride, Scene};
use crate::targets::{ResizeBarrier, TargetSize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
    Color,
    Mask,
    Glow,
    Scene,
}

impl PassKind {
    pub fn label(&self) -> &'static str {
        match self {
            PassKind::Color => "color pass",
            PassKind::Mask => "mask pass",
            PassKind::Glow => "glow pass",
            PassKind::Scene => "scene pass",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Target-owning side of the pipeline.
pub trait PassBackend {
    /// Recreates every target at `size`. Only called between frames.
    fn resize(&mut self, size: TargetSize) -> Result<(), RenderError>;

    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// Draws whatever the scene currently marks visible into the pass target.
    fn render_pass(&mut self, pass: PassKind, scene: &Scene) -> Result<(), RenderError>;

    /// Combines the pass targets and presents the result.
    fn composite(&mut self, state: &CompositeState, time: f32) -> Result<(), RenderError>;

    /// Discards any partially recorded frame without presenting it.
    fn abort_frame(&mut self) {}
}

/// Values read from the external controller once per frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameInputs {
    pub saved_edge_glow: f32,
    pub composite: CompositeState,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// The scene is deactivated; nothing was drawn and targets are untouched.
    Inactive,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub presented: u64,
    pub dropped: u64,
}

pub struct PassOrchestrator<B: PassBackend> {
    backend: B,
    resize: ResizeBarrier,
    stats: FrameStats,
}

impl<B: PassBackend> PassOrchestrator<B> {
    pub fn new(backend: B, size: TargetSize) -> Self {
        Self {
            backend,
            resize: ResizeBarrier::new(size),
            stats: FrameStats::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn size(&self) -> TargetSize {
        self.resize.current()
    }

    /// Queues a resize; it takes effect at the start of the next frame.
    pub fn request_resize(&mut self, size: TargetSize) {
        self.resize.request(size);
    }

    pub fn render_frame(
        &mut self,
        scene: &mut Scene,
        inputs: &FrameInputs,
    ) -> Result<FrameOutcome, RenderError> {
        if !scene.is_active() {
            return Ok(FrameOutcome::Inactive);
        }

        let layers = scene.layers();
        let material = scene.material_override();
        let result = self.run_frame(scene, inputs);
        scene.set_layers(layers);
        scene.set_material_override(material);
        scene.set_edge_glow_all(inputs.saved_edge_glow);

        match result {
            Ok(()) => {
                self.stats.presented += 1;
                Ok(FrameOutcome::Presented)
            }
            Err(e) => {
                self.backend.abort_frame();
                self.stats.dropped += 1;
                let frame = self.stats.presented + self.stats.dropped;
                log::error!("[frame] dropped frame {frame}: {e}");
                Err(e)
            }
        }
    }

    fn run_frame(&mut self, scene: &mut Scene, inputs: &FrameInputs) -> Result<(), RenderError> {
        let previous = self.resize.current();
        if let Some(size) = self.resize.take_pending() {
            if let Err(e) = self.backend.resize(size) {
                self.resize.requeue(previous, size);
                return Err(e);
            }
        }
        scene.sync_glow_fields();
        self.backend.begin_frame()?;

        scene.set_edge_glow_all(0.0);
        scene.set_layers(LayerVisibility {
            objects: true,
            glow_fields: false,
        });
        scene.set_material_override(None);
        self.pass(PassKind::Color, scene)?;

        scene.set_material_override(Some(MaterialOverride::Silhouette));
        self.pass(PassKind::Mask, scene)?;
        scene.set_material_override(None);
        scene.set_edge_glow_all(inputs.saved_edge_glow);

        scene.set_layers(LayerVisibility {
            objects: false,
            glow_fields: true,
        });
        self.pass(PassKind::Glow, scene)?;
        scene.set_layers(LayerVisibility {
            objects: true,
            glow_fields: false,
        });

        self.pass(PassKind::Scene, scene)?;

        log::trace!("[frame] composite view={}", inputs.composite.debug_view);
        self.backend
            .composite(&inputs.composite, scene.clock().elapsed())
    }

    fn pass(&mut self, pass: PassKind, scene: &Scene) -> Result<(), RenderError> {
        log::trace!("[frame] {pass}");
        self.backend.render_pass(pass, scene)
    }
}
