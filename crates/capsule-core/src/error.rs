use thiserror::Error;

/// Rejections raised when a gradient description is built or edited.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradientError {
    #[error("gradient stops must be strictly increasing, got {0:?}")]
    UnsortedStops([f32; 4]),
    #[error("gradient contains a non-finite value")]
    NonFinite,
    #[error("gradient color index {0} out of range (expected 0..4)")]
    ColorIndex(usize),
}

/// Errors from the named configuration surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown parameter `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Failures surfaced by the render pipeline.
///
/// Initialization failures are fatal at startup. Submission failures drop a
/// single frame; the previous frame stays on screen and the next frame is
/// attempted normally.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer initialization failed: {0}")]
    Initialization(String),
    #[error("frame submission failed: {0}")]
    Submission(String),
    #[error("malformed gradient: {0}")]
    MalformedGradient(#[from] GradientError),
    #[error("invalid capsule shape (radius {radius}, length {length})")]
    InvalidShape { radius: f32, length: f32 },
    #[error("no object with id {0}")]
    UnknownObject(usize),
}
