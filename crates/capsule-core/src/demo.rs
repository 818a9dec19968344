//! Starter layout shared by the front-ends: three upright capsules in a row,
//! each with its own palette.

use glam::{Vec3, vec3};

use crate::error::RenderError;
use crate::geometry::CapsuleShape;
use crate::gradient::GradientSpec;
use crate::scene::Scene;

pub struct DemoCapsule {
    pub position: Vec3,
    pub radius: f32,
    pub length: f32,
    pub colors: [Vec3; 4],
    pub bend: f32,
}

pub fn demo_capsules() -> [DemoCapsule; 3] {
    [
        DemoCapsule {
            position: vec3(-1.6, 0.0, 0.0),
            radius: 0.45,
            length: 1.8,
            colors: [
                vec3(0.95, 0.35, 0.25),
                vec3(0.98, 0.62, 0.20),
                vec3(0.85, 0.20, 0.45),
                vec3(0.35, 0.10, 0.55),
            ],
            bend: 0.0,
        },
        DemoCapsule {
            position: vec3(0.0, 0.2, 0.0),
            radius: 0.5,
            length: 2.2,
            colors: [
                vec3(0.20, 0.85, 0.75),
                vec3(0.25, 0.55, 0.95),
                vec3(0.55, 0.35, 0.95),
                vec3(0.95, 0.45, 0.80),
            ],
            bend: 0.1,
        },
        DemoCapsule {
            position: vec3(1.6, -0.1, 0.0),
            radius: 0.4,
            length: 1.5,
            colors: [
                vec3(0.98, 0.90, 0.35),
                vec3(0.55, 0.90, 0.40),
                vec3(0.20, 0.70, 0.55),
                vec3(0.15, 0.35, 0.60),
            ],
            bend: -0.05,
        },
    ]
}

pub fn demo_scene() -> Result<Scene, RenderError> {
    let mut scene = Scene::new();
    for capsule in demo_capsules() {
        let shape = CapsuleShape::new(capsule.radius, capsule.length)?;
        let mut gradient = GradientSpec::even(capsule.colors)?;
        gradient.set_bend(capsule.bend)?;
        scene.add_object(capsule.position, shape, gradient);
    }
    Ok(scene)
}
