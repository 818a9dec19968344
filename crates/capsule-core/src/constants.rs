// Shared tuning constants used by the CPU reference path and the GPU renderer.

// Hash family used for glow dither and screen grain
pub const HASH_DOT: [f32; 3] = [12.9898, 78.233, 37.719];
pub const HASH_SCALE: f32 = 43758.5453;

// Camera (orthographic, looking down -Z)
pub const VIEW_HALF_HEIGHT: f32 = 3.0; // world units from screen centre to top edge
pub const CAMERA_Z: f32 = 10.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

// Glow planes sit slightly behind their object
pub const GLOW_Z_OFFSET: f32 = 0.05;

// Geometry tessellation
pub const CAPSULE_RADIAL_SEGMENTS: u32 = 48;
pub const CAPSULE_CAP_SEGMENTS: u32 = 16;
pub const GLOW_PLANE_SEGMENTS: u32 = 64; // subdivisions along Y only

// Render targets
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;
pub const DEFAULT_MAX_TEXTURE_DIM: u32 = 8192;

// Frame cadence
pub const TARGET_FPS: f32 = 60.0;
pub const FRAME_SLACK_MS: u64 = 2; // tolerance for vsync jitter before a tick counts as early

// Bloom
pub const BLOOM_THRESHOLD: f32 = 0.0;
pub const BLOOM_SIGMA_BASE: f32 = 1.0; // pixels, at radius 0
pub const BLOOM_SIGMA_SPAN: f32 = 6.0; // additional pixels at radius 1
pub const BLOOM_SPREAD_BASE: f32 = 1.0; // GPU tap spacing in half-res texels, at radius 0
pub const BLOOM_SPREAD_SPAN: f32 = 3.0;

// Glow dither
pub const DEFAULT_DITHER_STRENGTH: f32 = 0.015;

// Configuration defaults (ranges live next to `ParamKey`)
pub const DEFAULT_EDGE_GLOW: f32 = 1.5;
pub const DEFAULT_EDGE_WIDTH: f32 = 0.4;
pub const DEFAULT_BLOOM_STRENGTH: f32 = 1.0;
pub const DEFAULT_BLOOM_RADIUS: f32 = 0.4;
pub const DEFAULT_GLOW_INTENSITY: f32 = 0.6;
pub const DEFAULT_GLOW_FALLOFF: f32 = 2.0;
pub const DEFAULT_NOISE_STRENGTH: f32 = 0.02;
pub const DEFAULT_WAVE_AMP: f32 = 0.08;
pub const DEFAULT_WAVE_FREQ: f32 = 0.8;
pub const DEFAULT_WAVE_PHASE: f32 = 0.0;
pub const DEFAULT_ROTATION_DEG: f32 = 0.0;
pub const DEFAULT_OPACITY: f32 = 1.0;

// Background clear for the color and scene passes
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
