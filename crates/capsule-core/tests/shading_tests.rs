// Geometry, object shading and glow-field math checked on the host.

use capsule_core::constants::{DEFAULT_DITHER_STRENGTH, VIEW_HALF_HEIGHT};
use capsule_core::{
    capsule_distance, falloff, BlurUniformsGpu, Camera, CapsuleMesh, CapsuleShape,
    FrameUniformsGpu, GlowPlane, GlowUniforms, GlowUniformsGpu, GradientSpec, MeshVertex,
    ObjectUniformsGpu, PostUniformsGpu, RenderError, ShadingUniforms, WaveParams,
};
use glam::{Mat4, Vec2, Vec3, Vec4};

fn rainbow() -> GradientSpec {
    GradientSpec::new(
        [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::ONE,
        ],
        [0.0, 0.33, 0.66, 1.0],
        0.0,
    )
    .unwrap()
}

fn shading_for(shape: &CapsuleShape) -> ShadingUniforms {
    let mesh = CapsuleMesh::build(shape, 24, 8);
    ShadingUniforms {
        gradient: rainbow(),
        edge_glow: 2.0,
        edge_width: 0.4,
        wave: WaveParams::NONE,
        y_min: mesh.y_min,
        y_max: mesh.y_max,
    }
}

#[test]
fn capsule_shape_rejects_degenerate_dimensions() {
    assert!(matches!(CapsuleShape::new(0.0, 1.0), Err(RenderError::InvalidShape { .. })));
    assert!(CapsuleShape::new(0.5, -1.0).is_err());
    assert!(CapsuleShape::new(f32::NAN, 1.0).is_err());
    let s = CapsuleShape::new(0.5, 2.0).unwrap();
    assert_eq!(s.width(), 1.0);
    assert_eq!(s.height(), 3.0);
    assert_eq!(s.max_extent(), 3.0);
}

#[test]
fn capsule_mesh_is_closed_and_bounded() {
    let shape = CapsuleShape::new(0.5, 2.0).unwrap();
    let mesh = CapsuleMesh::build(&shape, 24, 8);
    assert!((mesh.y_max - 1.5).abs() < 1e-5);
    assert!((mesh.y_min + 1.5).abs() < 1e-5);
    assert_eq!(mesh.indices.len() % 3, 0);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    for v in &mesh.vertices {
        let n = Vec3::from(v.normal);
        assert!((n.length() - 1.0).abs() < 1e-5);
        // every vertex lies on the capsule surface
        let p = Vec3::from(v.position);
        let axis = Vec3::new(0.0, p.y.clamp(-1.0, 1.0), 0.0);
        assert!(((p - axis).length() - 0.5).abs() < 1e-5);
    }
}

#[test]
fn glow_plane_pads_the_footprint_by_twice_the_largest_extent() {
    let shape = CapsuleShape::new(0.5, 2.0).unwrap();
    let plane = GlowPlane::for_shape(&shape, 16);
    assert_eq!(plane.width, 1.0 + 6.0);
    assert_eq!(plane.height, 3.0 + 6.0);
    assert_eq!(plane.y_min, -4.5);
    let (vertices, indices) = plane.mesh();
    assert_eq!(vertices.len(), 2 * 17);
    assert_eq!(indices.len(), 16 * 6);
    assert!(vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    assert!(plane.contains(3.5, 4.5) && !plane.contains(3.6, 0.0));
}

#[test]
fn front_hit_reports_depth_and_normal() {
    let shape = CapsuleShape::new(0.5, 2.0).unwrap();
    let (z, n) = shape.front_hit(0.0, 0.0).unwrap();
    assert_eq!(z, 0.5);
    assert_eq!(n, [0.0, 0.0, 1.0]);

    let (z, n) = shape.front_hit(0.0, 1.3).unwrap();
    assert!((z - 0.4).abs() < 1e-5);
    assert!((n[1] - 0.6).abs() < 1e-5 && (n[2] - 0.8).abs() < 1e-5);

    assert!(shape.front_hit(0.6, 0.0).is_none());
    assert!(shape.front_hit(0.0, 1.6).is_none());
}

#[test]
fn rim_emissive_is_zero_facing_the_camera_and_full_at_the_silhouette() {
    let shape = CapsuleShape::new(0.5, 2.0).unwrap();
    let uniforms = shading_for(&shape);

    let facing = uniforms.shade(0.0, 1.0);
    assert_eq!(facing.emissive, Vec3::ZERO);
    assert_eq!(facing.radiance(), facing.color);

    let grazing = uniforms.shade(0.0, 0.0);
    assert!((grazing.emissive - grazing.color * 2.0).abs().max_element() < 1e-6);
}

#[test]
fn bend_shifts_the_gradient_toward_the_rim() {
    let shape = CapsuleShape::new(0.5, 2.0).unwrap();
    let mut uniforms = shading_for(&shape);
    assert!((uniforms.normalized_y(0.0) - 0.5).abs() < 1e-5);
    assert!((uniforms.gradient_t(0.0, 0.5) - 0.5).abs() < 1e-5);

    uniforms.gradient.set_bend(0.5).unwrap();
    assert!((uniforms.gradient_t(0.0, 0.5) - 0.75).abs() < 1e-5);
    assert!((uniforms.gradient_t(0.0, 1.0) - 0.5).abs() < 1e-5);
    // back-facing normals push t past the end and clamp
    assert_eq!(uniforms.gradient_t(1.5, -1.0), 1.0);
}

#[test]
fn capsule_distance_is_zero_inside_and_grows_outside() {
    assert_eq!(capsule_distance(Vec2::ZERO, 0.0, 1.0, 0.5), 0.0);
    assert_eq!(capsule_distance(Vec2::new(0.3, 0.9), 0.0, 1.0, 0.5), 0.0);
    assert!((capsule_distance(Vec2::new(1.5, 0.0), 0.0, 1.0, 0.5) - 1.0).abs() < 1e-6);
    assert!((capsule_distance(Vec2::new(0.0, 3.0), 0.0, 1.0, 0.5) - 1.5).abs() < 1e-6);
    // distance is measured from the displaced axis
    assert!((capsule_distance(Vec2::new(1.5, 0.0), 0.5, 1.0, 0.5) - 0.5).abs() < 1e-6);
}

#[test]
fn falloff_follows_the_power_law() {
    assert_eq!(falloff(0.0, 2.0, 2.0), 1.0);
    assert_eq!(falloff(2.0, 2.0, 2.0), 0.0);
    assert_eq!(falloff(5.0, 2.0, 0.5), 0.0);
    assert!((falloff(1.0, 2.0, 2.0) - 0.25).abs() < 1e-6);
    assert!((falloff(1.0, 2.0, 0.5) - 0.5f32.sqrt()).abs() < 1e-6);
}

#[test]
fn glow_is_black_without_intensity_or_beyond_extent() {
    let shape = CapsuleShape::new(0.5, 2.0).unwrap();
    let plane = GlowPlane::for_shape(&shape, 16);
    let shading = shading_for(&shape);
    let mut glow = GlowUniforms::for_object(&shape, &plane, &shading);

    assert_eq!(glow.shade(Vec3::new(3.5, 0.0, 0.0), Vec3::new(3.5, 0.0, 0.0), 0.0), Vec4::ZERO);

    glow.intensity = 0.0;
    for x in [0.0, 0.6, 1.2, 2.0] {
        let p = Vec3::new(x, 0.2, 0.0);
        assert_eq!(glow.shade(p, p, 0.0), Vec4::ZERO);
    }
}

#[test]
fn glow_peaks_on_the_capsule_with_bounded_dither() {
    let shape = CapsuleShape::new(0.5, 2.0).unwrap();
    let plane = GlowPlane::for_shape(&shape, 16);
    let shading = shading_for(&shape);
    let mut glow = GlowUniforms::for_object(&shape, &plane, &shading);
    glow.intensity = 1.0;

    let p = Vec3::ZERO;
    let out = glow.shade(p, p, 0.0);
    let tint = glow.gradient.sample(0.5);
    let slack = DEFAULT_DITHER_STRENGTH * 0.5 + 1e-6;
    assert!((out.w - 1.0).abs() <= slack * 0.5);
    assert!((out.truncate() - tint).abs().max_element() <= slack);

    let near = glow.shade(Vec3::new(0.8, 0.0, 0.0), Vec3::new(0.8, 0.0, 0.0), 0.0);
    let far = glow.shade(Vec3::new(1.6, 0.0, 0.0), Vec3::new(1.6, 0.0, 0.0), 0.0);
    assert!(out.w > near.w && near.w > far.w);
}

#[test]
fn glow_mirrors_gradient_and_wave_from_its_object() {
    let shape = CapsuleShape::new(0.5, 2.0).unwrap();
    let plane = GlowPlane::for_shape(&shape, 16);
    let mut shading = shading_for(&shape);
    let mut glow = GlowUniforms::for_object(&shape, &plane, &shading);

    shading.gradient.set_bend(-0.3).unwrap();
    shading.wave = WaveParams {
        amplitude: 0.2,
        frequency: 1.1,
        phase: 0.5,
    };
    glow.mirror(&shading);
    assert_eq!(glow.gradient, shading.gradient);
    assert_eq!(glow.wave, shading.wave);
}

#[test]
fn gpu_layouts_match_their_wgsl_structs() {
    use std::mem::size_of;
    assert_eq!(size_of::<MeshVertex>(), 24);
    assert_eq!(size_of::<FrameUniformsGpu>(), 80);
    assert_eq!(size_of::<ObjectUniformsGpu>(), 176);
    assert_eq!(size_of::<GlowUniformsGpu>(), 192);
    assert_eq!(size_of::<PostUniformsGpu>(), 48);
    assert_eq!(size_of::<BlurUniformsGpu>(), 32);
}

#[test]
fn object_uniforms_pack_in_shader_order() {
    let shape = CapsuleShape::new(0.5, 2.0).unwrap();
    let shading = shading_for(&shape);
    let gpu = shading.to_gpu(Mat4::IDENTITY);
    assert_eq!(gpu.stops, [0.0, 0.33, 0.66, 1.0]);
    assert_eq!(gpu.bounds_bend[3], 2.0);
    assert_eq!(gpu.edge_wave[0], 0.4);
    assert_eq!(gpu.colors[3], [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn orthographic_camera_frames_a_fixed_height() {
    let camera = Camera::for_target(200, 100);
    let clip = camera.view_proj() * Vec4::new(0.0, VIEW_HALF_HEIGHT, 0.0, 1.0);
    assert!((clip.y - 1.0).abs() < 1e-5);
    assert!(clip.z > 0.0 && clip.z < 1.0);
    let right = camera.view_proj() * Vec4::new(2.0 * VIEW_HALF_HEIGHT, 0.0, 0.0, 1.0);
    assert!((right.x - 1.0).abs() < 1e-5);

    let p = camera.pixel_to_world(0, 0, 200, 100);
    assert!(p.x < 0.0 && p.y > 0.0);
    let centre = camera.pixel_to_world(100, 50, 200, 100);
    assert!(centre.length() < 0.07);
}
