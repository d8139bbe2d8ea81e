//! Scene description types
//!
//! A [`SceneDescription`] is plain data: which primitives to draw, with which
//! materials, lit by which lights, seen from which camera. It carries no GPU
//! state and can be serialized for inspection.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::Serialize;
use vision3d_shared::HexColor;

use crate::mesh::{
    MeshData, generate_cone, generate_cylinder, generate_grid, generate_octahedron,
    generate_plane,
};

/// Primitive geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        segments: u32,
    },
    Octahedron {
        radius: f32,
        detail: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
}

impl Shape {
    pub fn tessellate(&self) -> MeshData {
        match *self {
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => generate_cylinder(radius_top, radius_bottom, height, segments),
            Shape::Cone {
                radius,
                height,
                segments,
            } => generate_cone(radius, height, segments),
            Shape::Octahedron { radius, detail } => generate_octahedron(radius, detail),
            Shape::Plane { width, height } => generate_plane(width, height),
        }
    }
}

/// What part of the figure a node represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Torso,
    Head,
    Spike,
    Cape,
}

/// Translation plus XYZ Euler rotation (radians).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Vec3::ZERO,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.translation)
    }
}

/// Index into [`SceneDescription::materials`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MaterialId(pub usize);

/// Physically based surface parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MaterialDesc {
    pub color: HexColor,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: HexColor,
    pub emissive_intensity: f32,
    pub double_sided: bool,
}

impl MaterialDesc {
    /// Plain single-sided material with renderer defaults.
    pub fn plain(color: HexColor) -> Self {
        Self {
            color,
            metalness: 0.0,
            roughness: 1.0,
            emissive: HexColor::BLACK,
            emissive_intensity: 1.0,
            double_sided: false,
        }
    }

    /// True when the material adds light of its own.
    pub fn is_emissive(&self) -> bool {
        !self.emissive.is_black() && self.emissive_intensity > 0.0
    }
}

/// One drawable part of the figure.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Node {
    pub role: NodeRole,
    pub shape: Shape,
    pub material: MaterialId,
    pub transform: Transform,
}

/// Static reference grid below the figure.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GridDesc {
    pub size: f32,
    pub divisions: u32,
    pub center_color: HexColor,
    pub line_color: HexColor,
    pub y: f32,
}

impl GridDesc {
    pub fn tessellate(&self) -> MeshData {
        generate_grid(
            self.size,
            self.divisions,
            self.center_color.to_linear(),
            self.line_color.to_linear(),
        )
    }

    pub fn transform(&self) -> Transform {
        Transform::at(Vec3::new(0.0, self.y, 0.0))
    }
}

/// Purpose of a light in the rig.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LightRole {
    Ambient,
    Key,
    Rim,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKind {
    Ambient,
    Directional { position: Vec3, casts_shadow: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Light {
    pub role: LightRole,
    pub kind: LightKind,
    pub color: HexColor,
    pub intensity: f32,
}

/// Perspective camera placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CameraDesc {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

/// Orbit interaction settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OrbitDesc {
    /// Fraction of pending motion applied per update; `None` disables damping
    pub damping_factor: Option<f32>,
    /// Auto-rotate speed (2.0 = one revolution every 30 seconds); `None` disables it
    pub auto_rotate_speed: Option<f32>,
}

/// Everything needed to build a live scene for one attribute record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneDescription {
    /// Overlay label, `"{name}.mesh"`
    pub label: String,
    pub background: HexColor,
    pub materials: Vec<MaterialDesc>,
    /// Nodes of the character group, drawn in order
    pub figure: Vec<Node>,
    pub grid: GridDesc,
    pub lights: Vec<Light>,
    pub camera: CameraDesc,
    pub orbit: OrbitDesc,
}

impl SceneDescription {
    /// Number of figure nodes with the given role.
    pub fn count(&self, role: NodeRole) -> usize {
        self.figure.iter().filter(|n| n.role == role).count()
    }

    pub fn spikes(&self) -> impl Iterator<Item = &Node> {
        self.figure.iter().filter(|n| n.role == NodeRole::Spike)
    }

    pub fn node(&self, role: NodeRole) -> Option<&Node> {
        self.figure.iter().find(|n| n.role == role)
    }

    pub fn material(&self, id: MaterialId) -> Option<&MaterialDesc> {
        self.materials.get(id.0)
    }

    pub fn light(&self, role: LightRole) -> Option<&Light> {
        self.lights.iter().find(|l| l.role == role)
    }

    pub fn rim_light(&self) -> Option<&Light> {
        self.light(LightRole::Rim)
    }
}
