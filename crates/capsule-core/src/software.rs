//! CPU reference backend.
//!
//! Ray casts the wave-displaced capsules through an orthographic camera and
//! accumulates glow planes additively, then hands the four targets to the
//! [`Compositor`]. Slow, but exact, deterministic and GPU free.

use glam::{Mat4, Vec3, Vec4};

use crate::camera::Camera;
use crate::composite::{CompositeState, Compositor, PassTargets, PixelBuffer};
use crate::constants::CLEAR_COLOR;
use crate::error::RenderError;
use crate::passes::{PassBackend, PassKind};
use crate::scene::{MaterialOverride, Scene};
use crate::targets::TargetSize;

pub struct SoftwareBackend {
    targets: PassTargets,
    presented: Option<PixelBuffer>,
    compositor: Compositor,
    in_frame: bool,
}

impl SoftwareBackend {
    pub fn new(size: TargetSize) -> Self {
        Self {
            targets: PassTargets::new(size),
            presented: None,
            compositor: Compositor,
            in_frame: false,
        }
    }

    pub fn size(&self) -> TargetSize {
        self.targets.size()
    }

    pub fn targets(&self) -> &PassTargets {
        &self.targets
    }

    /// Last image that made it to the screen.
    pub fn presented(&self) -> Option<&PixelBuffer> {
        self.presented.as_ref()
    }

    fn camera(&self) -> Camera {
        let size = self.size();
        Camera::for_target(size.width, size.height)
    }

    fn draw_objects(&mut self, pass: PassKind, scene: &Scene) {
        let camera = self.camera();
        let size = self.size();
        let rotation = scene.rotation();
        let silhouette = scene.material_override() == Some(MaterialOverride::Silhouette);
        let (target, clear) = match pass {
            PassKind::Mask => (&mut self.targets.mask, Vec4::ZERO),
            PassKind::Scene => (&mut self.targets.scene, Vec4::from(CLEAR_COLOR)),
            _ => (&mut self.targets.color, Vec4::from(CLEAR_COLOR)),
        };
        target.clear(clear);

        let placed: Vec<_> = scene
            .drawn_objects()
            .map(|(_, o)| (o, scene.model_matrix(o.position)))
            .map(|(o, m)| (o, m, m.inverse()))
            .collect();

        for py in 0..size.height {
            for px in 0..size.width {
                let world = camera.pixel_to_world(px, py, size.width, size.height);
                let mut nearest = f32::NEG_INFINITY;
                let mut hit_color = None;
                for (object, model, inverse) in &placed {
                    let local = inverse.transform_point3(world.extend(0.0));
                    let axis = object
                        .uniforms
                        .wave
                        .offset(model.transform_point3(local), rotation);
                    let Some((z, normal)) = object.shape().front_hit(local.x - axis, local.y) else {
                        continue;
                    };
                    let depth = object.position.z + z;
                    if depth <= nearest {
                        continue;
                    }
                    nearest = depth;
                    hit_color = Some(if silhouette {
                        Vec3::ONE
                    } else {
                        object.uniforms.shade(local.y, normal[2]).radiance()
                    });
                }
                if let Some(c) = hit_color {
                    target.set(px, py, c.extend(1.0));
                }
            }
        }
    }

    fn draw_glow_fields(&mut self, scene: &Scene) {
        let camera = self.camera();
        let size = self.size();
        let rotation = scene.rotation();
        let target = &mut self.targets.glow;
        target.clear(Vec4::ZERO);

        let placed: Vec<_> = scene
            .drawn_glow_fields()
            .map(|(_, g)| {
                let model: Mat4 = scene.model_matrix(g.position);
                (g, model, model.inverse())
            })
            .collect();

        for py in 0..size.height {
            for px in 0..size.width {
                let world = camera.pixel_to_world(px, py, size.width, size.height);
                let mut acc = Vec4::ZERO;
                for (glow, model, inverse) in &placed {
                    let local = inverse.transform_point3(world.extend(0.0));
                    let local = Vec3::new(local.x, local.y, 0.0);
                    if !glow.plane().contains(local.x, local.y) {
                        continue;
                    }
                    acc += glow.uniforms.shade(local, model.transform_point3(local), rotation);
                }
                target.set(px, py, acc);
            }
        }
    }
}

impl PassBackend for SoftwareBackend {
    fn resize(&mut self, size: TargetSize) -> Result<(), RenderError> {
        if self.in_frame {
            return Err(RenderError::Submission("resize during an open frame".into()));
        }
        self.targets = PassTargets::new(size);
        Ok(())
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.in_frame = true;
        Ok(())
    }

    fn render_pass(&mut self, pass: PassKind, scene: &Scene) -> Result<(), RenderError> {
        match pass {
            PassKind::Glow => self.draw_glow_fields(scene),
            _ => self.draw_objects(pass, scene),
        }
        Ok(())
    }

    fn composite(&mut self, state: &CompositeState, time: f32) -> Result<(), RenderError> {
        self.presented = Some(self.compositor.compose(&self.targets, state, time));
        self.in_frame = false;
        Ok(())
    }

    fn abort_frame(&mut self) {
        self.in_frame = false;
    }
}
