//! Named configuration surface shared by every front-end.
//!
//! Values arrive as `name=value` strings (command line, JS bridge). Numbers
//! outside their range are clamped with a warning; unknown names and values
//! that do not parse are rejected.

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use crate::composite::{BloomSettings, CompositeState, DebugView};
use crate::constants::*;
use crate::error::ConfigError;
use crate::passes::FrameInputs;
use crate::scene::Scene;
use crate::shading::WaveParams;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamKey {
    EdgeGlow,
    EdgeWidth,
    BloomStrength,
    BloomRadius,
    GlowIntensity,
    GlowFalloff,
    GlowVisible,
    EdgesVisible,
    NoiseStrength,
    DebugView,
    WaveAmp,
    WaveFreq,
    WavePhase,
    Rotation,
    Opacity,
}

impl ParamKey {
    pub const ALL: [ParamKey; 15] = [
        ParamKey::EdgeGlow,
        ParamKey::EdgeWidth,
        ParamKey::BloomStrength,
        ParamKey::BloomRadius,
        ParamKey::GlowIntensity,
        ParamKey::GlowFalloff,
        ParamKey::GlowVisible,
        ParamKey::EdgesVisible,
        ParamKey::NoiseStrength,
        ParamKey::DebugView,
        ParamKey::WaveAmp,
        ParamKey::WaveFreq,
        ParamKey::WavePhase,
        ParamKey::Rotation,
        ParamKey::Opacity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParamKey::EdgeGlow => "edgeGlow",
            ParamKey::EdgeWidth => "edgeWidth",
            ParamKey::BloomStrength => "bloomStrength",
            ParamKey::BloomRadius => "bloomRadius",
            ParamKey::GlowIntensity => "glowIntensity",
            ParamKey::GlowFalloff => "glowFalloff",
            ParamKey::GlowVisible => "glowVisible",
            ParamKey::EdgesVisible => "edgesVisible",
            ParamKey::NoiseStrength => "noiseStrength",
            ParamKey::DebugView => "debugView",
            ParamKey::WaveAmp => "waveAmp",
            ParamKey::WaveFreq => "waveFreq",
            ParamKey::WavePhase => "wavePhase",
            ParamKey::Rotation => "rotation",
            ParamKey::Opacity => "opacity",
        }
    }

    /// Inclusive range for numeric parameters. Rotation is in degrees.
    pub fn range(&self) -> Option<(f32, f32)> {
        match self {
            ParamKey::EdgeGlow => Some((0.0, 5.0)),
            ParamKey::EdgeWidth => Some((0.1, 1.0)),
            ParamKey::BloomStrength => Some((0.0, 3.0)),
            ParamKey::BloomRadius => Some((0.0, 1.0)),
            ParamKey::GlowIntensity => Some((0.0, 2.0)),
            ParamKey::GlowFalloff => Some((0.5, 5.0)),
            ParamKey::NoiseStrength => Some((0.0, 0.1)),
            ParamKey::WaveAmp => Some((0.0, 1.0)),
            ParamKey::WaveFreq => Some((0.0, 2.0)),
            ParamKey::WavePhase => Some((0.0, TAU)),
            ParamKey::Rotation => Some((0.0, 360.0)),
            ParamKey::Opacity => Some((0.0, 1.0)),
            ParamKey::GlowVisible | ParamKey::EdgesVisible | ParamKey::DebugView => None,
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ParamKey::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub edge_glow: f32,
    pub edge_width: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub glow_intensity: f32,
    pub glow_falloff: f32,
    pub glow_visible: bool,
    pub edges_visible: bool,
    pub noise_strength: f32,
    pub debug_view: DebugView,
    pub wave_amp: f32,
    pub wave_freq: f32,
    pub wave_phase: f32,
    pub rotation_deg: f32,
    pub opacity: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            edge_glow: DEFAULT_EDGE_GLOW,
            edge_width: DEFAULT_EDGE_WIDTH,
            bloom_strength: DEFAULT_BLOOM_STRENGTH,
            bloom_radius: DEFAULT_BLOOM_RADIUS,
            glow_intensity: DEFAULT_GLOW_INTENSITY,
            glow_falloff: DEFAULT_GLOW_FALLOFF,
            glow_visible: true,
            edges_visible: true,
            noise_strength: DEFAULT_NOISE_STRENGTH,
            debug_view: DebugView::Final,
            wave_amp: DEFAULT_WAVE_AMP,
            wave_freq: DEFAULT_WAVE_FREQ,
            wave_phase: DEFAULT_WAVE_PHASE,
            rotation_deg: DEFAULT_ROTATION_DEG,
            opacity: DEFAULT_OPACITY,
        }
    }
}

impl RenderConfig {
    /// Sets a numeric parameter, clamping into its range.
    pub fn set_number(&mut self, key: ParamKey, value: f32) -> Result<(), ConfigError> {
        let Some((lo, hi)) = key.range() else {
            return Err(ConfigError::InvalidValue {
                key: key.name(),
                value: value.to_string(),
            });
        };
        if !value.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: key.name(),
                value: value.to_string(),
            });
        }
        let clamped = value.clamp(lo, hi);
        if clamped != value {
            log::warn!("[config] {key}={value} outside [{lo}, {hi}], using {clamped}");
        }
        if let Some(slot) = self.number_slot(key) {
            *slot = clamped;
        }
        Ok(())
    }

    fn number_slot(&mut self, key: ParamKey) -> Option<&mut f32> {
        match key {
            ParamKey::EdgeGlow => Some(&mut self.edge_glow),
            ParamKey::EdgeWidth => Some(&mut self.edge_width),
            ParamKey::BloomStrength => Some(&mut self.bloom_strength),
            ParamKey::BloomRadius => Some(&mut self.bloom_radius),
            ParamKey::GlowIntensity => Some(&mut self.glow_intensity),
            ParamKey::GlowFalloff => Some(&mut self.glow_falloff),
            ParamKey::NoiseStrength => Some(&mut self.noise_strength),
            ParamKey::WaveAmp => Some(&mut self.wave_amp),
            ParamKey::WaveFreq => Some(&mut self.wave_freq),
            ParamKey::WavePhase => Some(&mut self.wave_phase),
            ParamKey::Rotation => Some(&mut self.rotation_deg),
            ParamKey::Opacity => Some(&mut self.opacity),
            ParamKey::GlowVisible | ParamKey::EdgesVisible | ParamKey::DebugView => None,
        }
    }

    pub fn set(&mut self, key: ParamKey, raw: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.name(),
            value: raw.to_string(),
        };
        match key {
            ParamKey::GlowVisible => self.glow_visible = parse_bool(raw).ok_or_else(invalid)?,
            ParamKey::EdgesVisible => self.edges_visible = parse_bool(raw).ok_or_else(invalid)?,
            ParamKey::DebugView => self.debug_view = raw.parse()?,
            _ => {
                let value: f32 = raw.trim().parse().map_err(|_| invalid())?;
                self.set_number(key, value)?;
            }
        }
        log::debug!("[config] {key}={raw}");
        Ok(())
    }

    pub fn set_named(&mut self, name: &str, raw: &str) -> Result<(), ConfigError> {
        self.set(name.parse()?, raw)
    }

    /// Parses a `name=value` pair.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<(), ConfigError> {
        match assignment.split_once('=') {
            Some((name, raw)) => self.set_named(name, raw),
            None => Err(ConfigError::UnknownKey(assignment.to_string())),
        }
    }

    pub fn saved_edge_glow(&self) -> f32 {
        self.edge_glow
    }

    pub fn wave(&self) -> WaveParams {
        WaveParams {
            amplitude: self.wave_amp,
            frequency: self.wave_freq,
            phase: self.wave_phase,
        }
    }

    pub fn composite_state(&self) -> CompositeState {
        CompositeState {
            debug_view: self.debug_view,
            noise_strength: self.noise_strength,
            glow_visible: self.glow_visible,
            edges_visible: self.edges_visible,
            opacity: self.opacity,
            bloom: BloomSettings {
                threshold: BLOOM_THRESHOLD,
                strength: self.bloom_strength,
                radius: self.bloom_radius,
            },
        }
    }

    pub fn frame_inputs(&self) -> FrameInputs {
        FrameInputs {
            saved_edge_glow: self.saved_edge_glow(),
            composite: self.composite_state(),
        }
    }

    /// Broadcasts the per-object values to every object and glow field.
    pub fn apply(&self, scene: &mut Scene) {
        let wave = self.wave();
        for object in scene.objects_mut() {
            object.uniforms.edge_width = self.edge_width;
            object.uniforms.edge_glow = self.edge_glow;
            object.uniforms.wave = wave;
        }
        for glow in scene.glow_fields_mut() {
            glow.uniforms.intensity = self.glow_intensity;
            glow.uniforms.falloff = self.glow_falloff;
        }
        scene.set_rotation_degrees(self.rotation_deg);
        scene.sync_glow_fields();
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}
