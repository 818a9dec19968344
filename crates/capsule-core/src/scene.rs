//! Object arena handed to the renderer each frame.
//!
//! Layout and choreography belong to the caller: it adds objects, moves them
//! and edits their uniforms in place through [`ObjectId`] handles. The
//! renderer only reads the lists and flips the scene-wide layer flags while
//! it walks the passes.

use glam::{Mat4, Vec3};

use crate::constants::{
    CAPSULE_CAP_SEGMENTS, CAPSULE_RADIAL_SEGMENTS, DEFAULT_EDGE_GLOW, DEFAULT_EDGE_WIDTH,
    GLOW_PLANE_SEGMENTS, GLOW_Z_OFFSET,
};
use crate::error::RenderError;
use crate::geometry::{CapsuleMesh, CapsuleShape, GlowPlane};
use crate::glow::GlowUniforms;
use crate::gradient::GradientSpec;
use crate::shading::{ShadingUniforms, WaveParams};

/// Stable handle to an object and its paired glow field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

pub struct ShadedObject {
    pub position: Vec3,
    pub visible: bool,
    pub uniforms: ShadingUniforms,
    shape: CapsuleShape,
    mesh: CapsuleMesh,
}

impl ShadedObject {
    pub fn shape(&self) -> &CapsuleShape {
        &self.shape
    }

    pub fn mesh(&self) -> &CapsuleMesh {
        &self.mesh
    }
}

pub struct GlowField {
    pub position: Vec3,
    pub visible: bool,
    pub uniforms: GlowUniforms,
    plane: GlowPlane,
}

impl GlowField {
    pub fn plane(&self) -> &GlowPlane {
        &self.plane
    }
}

/// Replacement material applied to every object for one pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaterialOverride {
    /// Unshaded constant white, used for silhouette coverage.
    Silhouette,
}

/// Scene-wide layer switches owned by the pass orchestrator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayerVisibility {
    pub objects: bool,
    pub glow_fields: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            objects: true,
            glow_fields: false,
        }
    }
}

/// Animation clock that only advances while its scene is active.
#[derive(Clone, Debug, Default)]
pub struct SceneClock {
    elapsed: f32,
    inactive: bool,
}

impl SceneClock {
    pub fn advance(&mut self, dt_sec: f32) {
        if !self.inactive && dt_sec.is_finite() && dt_sec > 0.0 {
            self.elapsed += dt_sec;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_active(&self) -> bool {
        !self.inactive
    }
}

#[derive(Default)]
pub struct Scene {
    objects: Vec<ShadedObject>,
    glow_fields: Vec<GlowField>,
    rotation: f32,
    layers: LayerVisibility,
    material_override: Option<MaterialOverride>,
    clock: SceneClock,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a capsule and its glow field. Geometry is built here, once.
    pub fn add_object(
        &mut self,
        position: Vec3,
        shape: CapsuleShape,
        gradient: GradientSpec,
    ) -> ObjectId {
        let mesh = CapsuleMesh::build(&shape, CAPSULE_RADIAL_SEGMENTS, CAPSULE_CAP_SEGMENTS);
        let uniforms = ShadingUniforms {
            gradient,
            edge_glow: DEFAULT_EDGE_GLOW,
            edge_width: DEFAULT_EDGE_WIDTH,
            wave: WaveParams::NONE,
            y_min: mesh.y_min,
            y_max: mesh.y_max,
        };
        let plane = GlowPlane::for_shape(&shape, GLOW_PLANE_SEGMENTS);
        let glow = GlowField {
            position: glow_position(position),
            visible: true,
            uniforms: GlowUniforms::for_object(&shape, &plane, &uniforms),
            plane,
        };
        self.objects.push(ShadedObject {
            position,
            visible: true,
            uniforms,
            shape,
            mesh,
        });
        self.glow_fields.push(glow);
        log::debug!("[scene] added object {} at {:?}", self.objects.len() - 1, position);
        ObjectId(self.objects.len() - 1)
    }

    pub fn objects(&self) -> &[ShadedObject] {
        &self.objects
    }

    pub fn glow_fields(&self) -> &[GlowField] {
        &self.glow_fields
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, id: ObjectId) -> Result<&ShadedObject, RenderError> {
        self.objects.get(id.0).ok_or(RenderError::UnknownObject(id.0))
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut ShadedObject, RenderError> {
        self.objects.get_mut(id.0).ok_or(RenderError::UnknownObject(id.0))
    }

    pub fn glow_field(&self, id: ObjectId) -> Result<&GlowField, RenderError> {
        self.glow_fields.get(id.0).ok_or(RenderError::UnknownObject(id.0))
    }

    pub fn glow_field_mut(&mut self, id: ObjectId) -> Result<&mut GlowField, RenderError> {
        self.glow_fields
            .get_mut(id.0)
            .ok_or(RenderError::UnknownObject(id.0))
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut ShadedObject> {
        self.objects.iter_mut()
    }

    pub fn glow_fields_mut(&mut self) -> impl Iterator<Item = &mut GlowField> {
        self.glow_fields.iter_mut()
    }

    /// Scene tilt in radians, shared by every object's wave.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation_degrees(&mut self, degrees: f32) {
        self.rotation = degrees.to_radians();
    }

    /// Scene rotation about Z applied on top of the object's own position.
    pub fn model_matrix(&self, position: Vec3) -> Mat4 {
        Mat4::from_rotation_z(self.rotation) * Mat4::from_translation(position)
    }

    /// Copies gradient, bend, wave and position into each paired glow field.
    pub fn sync_glow_fields(&mut self) {
        for (object, glow) in self.objects.iter().zip(self.glow_fields.iter_mut()) {
            glow.uniforms.mirror(&object.uniforms);
            glow.position = glow_position(object.position);
        }
    }

    pub fn layers(&self) -> LayerVisibility {
        self.layers
    }

    pub fn set_layers(&mut self, layers: LayerVisibility) {
        self.layers = layers;
    }

    pub fn material_override(&self) -> Option<MaterialOverride> {
        self.material_override
    }

    pub fn set_material_override(&mut self, material: Option<MaterialOverride>) {
        self.material_override = material;
    }

    pub fn set_edge_glow_all(&mut self, value: f32) {
        for object in &mut self.objects {
            object.uniforms.edge_glow = value;
        }
    }

    /// Objects drawn by the current pass.
    pub fn drawn_objects(&self) -> impl Iterator<Item = (ObjectId, &ShadedObject)> {
        let on = self.layers.objects;
        self.objects
            .iter()
            .enumerate()
            .filter(move |(_, o)| on && o.visible)
            .map(|(i, o)| (ObjectId(i), o))
    }

    /// Glow fields drawn by the current pass.
    pub fn drawn_glow_fields(&self) -> impl Iterator<Item = (ObjectId, &GlowField)> {
        let on = self.layers.glow_fields;
        self.glow_fields
            .iter()
            .enumerate()
            .filter(move |(_, g)| on && g.visible)
            .map(|(i, g)| (ObjectId(i), g))
    }

    pub fn clock(&self) -> &SceneClock {
        &self.clock
    }

    pub fn advance_clock(&mut self, dt_sec: f32) {
        self.clock.advance(dt_sec);
    }

    /// Deactivated scenes keep their GPU resources but stop animating and
    /// are not rendered.
    pub fn set_active(&mut self, active: bool) {
        if self.clock.is_active() != active {
            log::info!("[scene] {}", if active { "activated" } else { "deactivated" });
        }
        self.clock.inactive = !active;
    }

    pub fn is_active(&self) -> bool {
        self.clock.is_active()
    }
}

fn glow_position(object_position: Vec3) -> Vec3 {
    object_position - Vec3::new(0.0, 0.0, GLOW_Z_OFFSET)
}
