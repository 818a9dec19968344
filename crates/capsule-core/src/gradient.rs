//! Procedural shading math shared by objects and their glow fields.
//!
//! Every function here has a line-for-line twin in `shaders/gradient.wgsl`.
//! The CPU versions are the reference the tests pin down; the WGSL prefix is
//! concatenated into both GPU programs so they cannot drift apart.

use glam::Vec3;

use crate::constants::{HASH_DOT, HASH_SCALE};
use crate::error::GradientError;

/// Four colors, four stops and a bend amount.
///
/// Stops are validated to be strictly increasing so that every segment in
/// [`bspline_gradient`] has a non-zero length.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientSpec {
    colors: [Vec3; 4],
    stops: [f32; 4],
    bend: f32,
}

impl GradientSpec {
    pub fn new(colors: [Vec3; 4], stops: [f32; 4], bend: f32) -> Result<Self, GradientError> {
        validate_colors(&colors)?;
        validate_stops(stops)?;
        if !bend.is_finite() {
            return Err(GradientError::NonFinite);
        }
        Ok(Self {
            colors,
            stops,
            bend: bend.clamp(-1.0, 1.0),
        })
    }

    /// Evenly spaced stops over [0, 1] with no bend.
    pub fn even(colors: [Vec3; 4]) -> Result<Self, GradientError> {
        Self::new(colors, [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0], 0.0)
    }

    pub fn colors(&self) -> &[Vec3; 4] {
        &self.colors
    }

    pub fn stops(&self) -> [f32; 4] {
        self.stops
    }

    pub fn bend(&self) -> f32 {
        self.bend
    }

    pub fn set_color(&mut self, index: usize, color: Vec3) -> Result<(), GradientError> {
        if index >= 4 {
            return Err(GradientError::ColorIndex(index));
        }
        if !color.is_finite() {
            return Err(GradientError::NonFinite);
        }
        self.colors[index] = color;
        Ok(())
    }

    /// Replaces all stops. On error the previous stops are kept.
    pub fn set_stops(&mut self, stops: [f32; 4]) -> Result<(), GradientError> {
        validate_stops(stops)?;
        self.stops = stops;
        Ok(())
    }

    pub fn set_bend(&mut self, bend: f32) -> Result<(), GradientError> {
        if !bend.is_finite() {
            return Err(GradientError::NonFinite);
        }
        self.bend = bend.clamp(-1.0, 1.0);
        Ok(())
    }

    pub fn sample(&self, t: f32) -> Vec3 {
        let [c1, c2, c3, c4] = self.colors;
        bspline_gradient(t, c1, c2, c3, c4, self.stops)
    }
}

fn validate_colors(colors: &[Vec3; 4]) -> Result<(), GradientError> {
    if colors.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(GradientError::NonFinite)
    }
}

fn validate_stops(stops: [f32; 4]) -> Result<(), GradientError> {
    if stops.iter().any(|s| !s.is_finite()) {
        return Err(GradientError::NonFinite);
    }
    if stops.windows(2).all(|w| w[0] < w[1]) {
        Ok(())
    } else {
        Err(GradientError::UnsortedStops(stops))
    }
}

/// Uniform cubic B-spline basis weights at `t` in [0, 1].
#[inline]
pub fn bspline_weights(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        (-t3 + 3.0 * t2 - 3.0 * t + 1.0) / 6.0,
        (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0,
        (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0,
        t3 / 6.0,
    ]
}

/// Blends four control colors with the cubic B-spline basis, per channel.
#[inline]
pub fn bspline_basis(t: f32, p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Vec3 {
    let [w0, w1, w2, w3] = bspline_weights(t);
    p0 * w0 + p1 * w1 + p2 * w2 + p3 * w3
}

/// Piecewise B-spline gradient over three overlapping segments.
///
/// `t` is clamped into `[s1, s4]`. End control points are repeated so the
/// curve is pinned near the first and last color. Stops must be strictly
/// increasing; [`GradientSpec`] enforces this.
pub fn bspline_gradient(t: f32, c1: Vec3, c2: Vec3, c3: Vec3, c4: Vec3, stops: [f32; 4]) -> Vec3 {
    let [s1, s2, s3, s4] = stops;
    debug_assert!(s1 < s2 && s2 < s3 && s3 < s4, "unsorted stops {stops:?}");
    let t = t.clamp(s1, s4);
    if t < s2 {
        bspline_basis((t - s1) / (s2 - s1), c1, c1, c2, c3)
    } else if t < s3 {
        bspline_basis((t - s2) / (s3 - s2), c1, c2, c3, c4)
    } else {
        bspline_basis((t - s3) / (s4 - s3), c2, c3, c4, c4)
    }
}

/// Shading-language `fract`: `x - floor(x)`, so negatives wrap into [0, 1).
#[inline]
pub fn fract(x: f32) -> f32 {
    let f = x - x.floor();
    // x - floor(x) rounds up to 1.0 for tiny negative x
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

/// Deterministic position hash in [0, 1). Used for dithering only.
#[inline]
pub fn hash(p: Vec3) -> f32 {
    fract(p.dot(Vec3::from(HASH_DOT)).sin() * HASH_SCALE)
}

/// Sideways displacement of a wave travelling along the rotated Y axis.
#[inline]
pub fn wave_offset(pos: Vec3, rotation: f32, freq: f32, phase: f32, amp: f32) -> f32 {
    let along = pos.y * rotation.cos() - pos.x * rotation.sin();
    amp * (along * freq + phase).sin()
}

/// Hermite smoothstep that also accepts `e0 > e1` (falling edge).
#[inline]
pub fn smooth_edge(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
