// Closed-form checks for the shared shading math and its WGSL twin.

use capsule_core::constants::{HASH_DOT, HASH_SCALE};
use capsule_core::{
    bspline_basis, bspline_gradient, bspline_weights, fract, hash, smooth_edge, wave_offset,
    GradientError, GradientSpec, GLOW_WGSL, GRADIENT_WGSL, OBJECT_WGSL,
};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const GREEN: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const BLUE: Vec3 = Vec3::new(0.0, 0.0, 1.0);
const WHITE: Vec3 = Vec3::ONE;

fn close(a: Vec3, b: Vec3, eps: f32) -> bool {
    (a - b).abs().max_element() < eps
}

#[test]
fn basis_weights_form_a_partition_of_unity() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1000 {
        let t: f32 = rng.gen_range(0.0..=1.0);
        let w = bspline_weights(t);
        assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-6, "t={t} w={w:?}");
        assert!(w.iter().all(|x| *x >= -1e-7));
    }
    assert_eq!(bspline_weights(0.0), [1.0 / 6.0, 4.0 / 6.0, 1.0 / 6.0, 0.0]);
}

#[test]
fn basis_is_computed_per_channel() {
    let p = [
        Vec3::new(0.1, 0.9, 0.3),
        Vec3::new(0.4, 0.2, 0.8),
        Vec3::new(0.7, 0.5, 0.0),
        Vec3::new(1.0, 0.6, 0.2),
    ];
    let t = 0.37;
    let w = bspline_weights(t);
    let got = bspline_basis(t, p[0], p[1], p[2], p[3]);
    for axis in 0..3 {
        let expected: f32 = (0..4).map(|i| w[i] * p[i][axis]).sum();
        assert!((got[axis] - expected).abs() < 1e-6);
    }
}

#[test]
fn gradient_is_continuous_across_segment_boundaries() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let c: Vec<Vec3> = (0..4)
            .map(|_| Vec3::new(rng.gen(), rng.gen(), rng.gen()))
            .collect();
        let s2: f32 = rng.gen_range(0.2..0.45);
        let s3: f32 = rng.gen_range(0.55..0.8);
        let stops = [0.0, s2, s3, 1.0];
        for boundary in [s2, s3] {
            let below = bspline_gradient(boundary - 1e-6, c[0], c[1], c[2], c[3], stops);
            let above = bspline_gradient(boundary, c[0], c[1], c[2], c[3], stops);
            assert!(close(below, above, 1e-4), "jump at {boundary}: {below} vs {above}");
        }
        // segment end and next segment start agree exactly in closed form
        let end1 = bspline_basis(1.0, c[0], c[0], c[1], c[2]);
        let start2 = bspline_basis(0.0, c[0], c[1], c[2], c[3]);
        assert!(close(end1, start2, 1e-6));
        let end2 = bspline_basis(1.0, c[0], c[1], c[2], c[3]);
        let start3 = bspline_basis(0.0, c[1], c[2], c[3], c[3]);
        assert!(close(end2, start3, 1e-6));
    }
}

#[test]
fn red_green_blue_white_endpoints_match_closed_form() {
    let stops = [0.0, 0.33, 0.66, 1.0];
    let start = bspline_gradient(0.0, RED, GREEN, BLUE, WHITE, stops);
    let end = bspline_gradient(1.0, RED, GREEN, BLUE, WHITE, stops);

    assert!(close(start, (RED * 5.0 + GREEN) / 6.0, 1e-6), "{start}");
    assert!(close(end, (BLUE + WHITE * 5.0) / 6.0, 1e-6), "{end}");
    // dominated by the end colors, but not equal to them
    assert!(start.x > start.y && start.z == 0.0 && start != RED);
    assert!(end.x > 0.8 && (end.z - 1.0).abs() < 1e-6 && end != WHITE);
}

#[test]
fn gradient_clamps_outside_the_stop_range() {
    let stops = [0.2, 0.4, 0.6, 0.8];
    let lo = bspline_gradient(0.2, RED, GREEN, BLUE, WHITE, stops);
    let hi = bspline_gradient(0.8, RED, GREEN, BLUE, WHITE, stops);
    assert_eq!(bspline_gradient(-3.0, RED, GREEN, BLUE, WHITE, stops), lo);
    assert_eq!(bspline_gradient(9.0, RED, GREEN, BLUE, WHITE, stops), hi);
}

#[test]
fn wave_without_rotation_depends_only_on_height() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..500 {
        let pos = Vec3::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-1.0..1.0),
        );
        let freq: f32 = rng.gen_range(0.0..2.0);
        let amp: f32 = rng.gen_range(0.0..1.0);
        let got = wave_offset(pos, 0.0, freq, 0.0, amp);
        assert!((got - amp * (pos.y * freq).sin()).abs() < 1e-6);
    }
}

#[test]
fn wave_axis_follows_rotation() {
    // a quarter turn makes the wave travel along -X
    let pos = Vec3::new(0.7, 2.0, 0.0);
    let got = wave_offset(pos, std::f32::consts::FRAC_PI_2, 1.3, 0.4, 0.5);
    let expected = 0.5 * (-0.7f32 * 1.3 + 0.4).sin();
    assert!((got - expected).abs() < 1e-5);
}

#[test]
fn hash_is_bit_deterministic() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..1000 {
        let p = Vec3::new(
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-10.0..10.0),
        );
        assert_eq!(hash(p).to_bits(), hash(p).to_bits());
        let h = hash(p);
        assert!((0.0..1.0).contains(&h), "{h}");
    }
}

#[test]
fn hash_is_roughly_uniform_over_a_pixel_grid() {
    const BUCKETS: usize = 8;
    let mut counts = [0usize; BUCKETS];
    for y in 0..100 {
        for x in 0..100 {
            let h = hash(Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 1.25));
            counts[((h * BUCKETS as f32) as usize).min(BUCKETS - 1)] += 1;
        }
    }
    let expected = 10_000.0 / BUCKETS as f32;
    let chi2: f32 = counts
        .iter()
        .map(|&c| (c as f32 - expected).powi(2) / expected)
        .sum();
    // 7 degrees of freedom; 40 is far beyond any reasonable critical value
    assert!(chi2 < 40.0, "chi2={chi2} counts={counts:?}");
}

#[test]
fn fract_wraps_negatives_like_shading_languages() {
    assert!((fract(-0.25) - 0.75).abs() < 1e-6);
    assert!((fract(3.5) - 0.5).abs() < 1e-6);
    assert!(fract(-1e-9) < 1.0);
}

#[test]
fn smooth_edge_accepts_a_falling_edge() {
    assert_eq!(smooth_edge(0.4, 0.0, 0.0), 1.0);
    assert_eq!(smooth_edge(0.4, 0.0, 0.4), 0.0);
    assert_eq!(smooth_edge(0.4, 0.0, 1.0), 0.0);
    assert!((smooth_edge(0.4, 0.0, 0.2) - 0.5).abs() < 1e-6);
    assert!((smooth_edge(0.0, 1.0, 0.25) - 0.15625).abs() < 1e-6);
}

#[test]
fn gradient_spec_rejects_unsorted_or_non_finite_input() {
    let colors = [RED, GREEN, BLUE, WHITE];
    assert!(matches!(
        GradientSpec::new(colors, [0.0, 0.5, 0.5, 1.0], 0.0),
        Err(GradientError::UnsortedStops(_))
    ));
    assert!(matches!(
        GradientSpec::new(colors, [0.0, 0.7, 0.3, 1.0], 0.0),
        Err(GradientError::UnsortedStops(_))
    ));
    assert_eq!(
        GradientSpec::new(colors, [0.0, f32::NAN, 0.6, 1.0], 0.0),
        Err(GradientError::NonFinite)
    );
    assert_eq!(
        GradientSpec::new(
            [RED, GREEN, Vec3::splat(f32::INFINITY), WHITE],
            [0.0, 0.3, 0.6, 1.0],
            0.0
        ),
        Err(GradientError::NonFinite)
    );
}

#[test]
fn gradient_spec_setters_keep_previous_state_on_error() {
    let mut spec = GradientSpec::even([RED, GREEN, BLUE, WHITE]).unwrap();
    let before = spec.stops();
    assert!(spec.set_stops([1.0, 0.5, 0.2, 0.0]).is_err());
    assert_eq!(spec.stops(), before);
    assert_eq!(spec.set_color(4, RED), Err(GradientError::ColorIndex(4)));

    spec.set_bend(3.0).unwrap();
    assert_eq!(spec.bend(), 1.0);
    spec.set_stops([0.0, 0.1, 0.2, 1.0]).unwrap();
    assert_eq!(spec.stops(), [0.0, 0.1, 0.2, 1.0]);
    spec.set_color(0, BLUE).unwrap();
    assert!(close(spec.sample(0.0), (BLUE * 5.0 + GREEN) / 6.0, 1e-6));
}

#[test]
fn wgsl_prefix_carries_the_same_constants() {
    assert_eq!(HASH_DOT, [12.9898, 78.233, 37.719]);
    assert_eq!(HASH_SCALE, 43758.5453);
    for needle in [
        "12.9898",
        "78.233",
        "37.719",
        "43758.5453",
        "(-t3 + 3.0 * t2 - 3.0 * t + 1.0) / 6.0",
        "(3.0 * t3 - 6.0 * t2 + 4.0) / 6.0",
        "(-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0",
        "t3 / 6.0",
        "pos.y * cos(rotation) - pos.x * sin(rotation)",
    ] {
        assert!(GRADIENT_WGSL.contains(needle), "missing `{needle}`");
    }
    assert!(OBJECT_WGSL.starts_with(GRADIENT_WGSL));
    assert!(GLOW_WGSL.starts_with(GRADIENT_WGSL));
}
