//! GPU implementation of the capsule pass pipeline.

mod render;

pub use render::GpuRenderer;
