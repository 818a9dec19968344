pub mod camera;
pub mod composite;
pub mod config;
pub mod constants;
pub mod demo;
pub mod error;
pub mod geometry;
pub mod glow;
pub mod gradient;
pub mod pacing;
pub mod passes;
pub mod scene;
pub mod shading;
pub mod software;
pub mod targets;

// Shared math prefix is concatenated in front of both programs that shade
// with the gradient.
pub static GRADIENT_WGSL: &str = include_str!("../shaders/gradient.wgsl");
pub static OBJECT_WGSL: &str = concat!(
    include_str!("../shaders/gradient.wgsl"),
    include_str!("../shaders/object.wgsl")
);
pub static GLOW_WGSL: &str = concat!(
    include_str!("../shaders/gradient.wgsl"),
    include_str!("../shaders/glow.wgsl")
);
pub static BRIGHT_WGSL: &str = concat!(
    include_str!("../shaders/fullscreen.wgsl"),
    include_str!("../shaders/bright.wgsl")
);
pub static BLUR_WGSL: &str = concat!(
    include_str!("../shaders/fullscreen.wgsl"),
    include_str!("../shaders/blur.wgsl")
);
pub static COMPOSITE_WGSL: &str = concat!(
    include_str!("../shaders/fullscreen.wgsl"),
    include_str!("../shaders/gradient.wgsl"),
    include_str!("../shaders/composite.wgsl")
);

pub use camera::*;
pub use composite::*;
pub use config::*;
pub use demo::*;
pub use error::*;
pub use geometry::*;
pub use glow::*;
pub use gradient::*;
pub use pacing::*;
pub use passes::*;
pub use scene::*;
pub use shading::*;
pub use software::*;
pub use targets::*;
