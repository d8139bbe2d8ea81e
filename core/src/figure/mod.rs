//! Procedural figure generator
//!
//! Maps a validated attribute record to a stylized stand-in character: a
//! hexagonal torso, a faceted head, an optional ring of shoulder spikes and
//! a cape, lit by a fixed three-light rig over a reference grid.
//!
//! Generation is a pure function of the record. The only animation (orbit
//! auto-rotation) happens at render time and is not part of the description.

mod types;

pub use types::*;

use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};
use vision3d_shared::{AttributeRecord, HexColor, Lighting, Material, RecordError, ValidRecord};

/// Number of spikes in the shoulder ring.
pub const SPIKE_COUNT: usize = 8;

/// Radius of the spike ring around the torso axis.
pub const SPIKE_RING_RADIUS: f32 = 0.5;

/// Height of the spike ring above the torso centre.
pub const SPIKE_RING_HEIGHT: f32 = 0.4;

pub const BACKGROUND_COLOR: HexColor = HexColor::from_u32(0x0a0a0a);
pub const CAPE_COLOR: HexColor = HexColor::from_u32(0x1a1a1a);
pub const GRID_CENTER_COLOR: HexColor = HexColor::from_u32(0x333333);
pub const GRID_LINE_COLOR: HexColor = HexColor::from_u32(0x1a1a1a);
pub const AMBIENT_COLOR: HexColor = HexColor::from_u32(0x404040);

/// Rim light colour for eerie lighting.
pub const EERIE_RIM_COLOR: HexColor = HexColor::from_u32(0x00ff88);

/// Rim light colour for every other lighting mood.
pub const COOL_RIM_COLOR: HexColor = HexColor::from_u32(0x3366ff);

const METALLIC_METALNESS: f32 = 0.9;
const BASE_METALNESS: f32 = 0.1;
const MATTE_ROUGHNESS: f32 = 0.8;
const BASE_ROUGHNESS: f32 = 0.2;
const EMISSIVE_INTENSITY: f32 = 0.5;

const BODY_MATERIAL: MaterialId = MaterialId(0);
const CAPE_MATERIAL: MaterialId = MaterialId(1);
const SPIKE_MATERIAL: MaterialId = MaterialId(2);

/// Build the scene description for a validated record.
pub fn generate(record: &ValidRecord) -> SceneDescription {
    let mut materials = vec![body_material(record), cape_material()];

    let mut figure = vec![
        Node {
            role: NodeRole::Torso,
            shape: Shape::Cylinder {
                radius_top: 0.5,
                radius_bottom: 0.4,
                height: 1.2,
                segments: 6,
            },
            material: BODY_MATERIAL,
            transform: Transform::default(),
        },
        Node {
            role: NodeRole::Head,
            shape: Shape::Octahedron {
                radius: 0.35,
                detail: 1,
            },
            material: BODY_MATERIAL,
            transform: Transform::at(Vec3::new(0.0, 1.0, 0.0)),
        },
    ];

    if record.record().has_spiked_features() {
        materials.push(MaterialDesc::plain(record.secondary()));
        figure.extend(spike_ring());
    }

    figure.push(Node {
        role: NodeRole::Cape,
        shape: Shape::Plane {
            width: 1.2,
            height: 2.0,
        },
        material: CAPE_MATERIAL,
        transform: Transform::at(Vec3::new(0.0, -0.2, -0.4))
            .with_rotation(Vec3::new(-0.1, 0.0, 0.0)),
    });

    tracing::debug!(
        name = %record.record().name,
        material = %record.material(),
        lighting = %record.lighting(),
        nodes = figure.len(),
        "generated figure"
    );

    SceneDescription {
        label: record.record().mesh_label(),
        background: BACKGROUND_COLOR,
        materials,
        figure,
        grid: GridDesc {
            size: 10.0,
            divisions: 10,
            center_color: GRID_CENTER_COLOR,
            line_color: GRID_LINE_COLOR,
            y: -0.8,
        },
        lights: light_rig(record.lighting()),
        camera: CameraDesc {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 1.0, 5.0),
            target: Vec3::ZERO,
        },
        orbit: OrbitDesc {
            damping_factor: Some(0.05),
            auto_rotate_speed: Some(0.5),
        },
    }
}

/// Validate and generate in one step.
///
/// Fails with the validation error instead of guessing defaults for
/// missing or malformed fields.
pub fn generate_from(record: &AttributeRecord) -> Result<SceneDescription, RecordError> {
    let valid = vision3d_shared::validate(record)?;
    Ok(generate(&valid))
}

fn body_material(record: &ValidRecord) -> MaterialDesc {
    let material = record.material();
    MaterialDesc {
        color: record.primary(),
        metalness: if material == Material::Metallic {
            METALLIC_METALNESS
        } else {
            BASE_METALNESS
        },
        roughness: if material == Material::Matte {
            MATTE_ROUGHNESS
        } else {
            BASE_ROUGHNESS
        },
        emissive: if material == Material::Glowing {
            record.secondary()
        } else {
            HexColor::BLACK
        },
        emissive_intensity: EMISSIVE_INTENSITY,
        double_sided: false,
    }
}

fn cape_material() -> MaterialDesc {
    MaterialDesc {
        double_sided: true,
        ..MaterialDesc::plain(CAPE_COLOR)
    }
}

fn spike_ring() -> impl Iterator<Item = Node> {
    (0..SPIKE_COUNT).map(|i| {
        let angle = (i as f32 / SPIKE_COUNT as f32) * PI * 2.0;
        Node {
            role: NodeRole::Spike,
            shape: Shape::Cone {
                radius: 0.1,
                height: 0.4,
                segments: 4,
            },
            material: SPIKE_MATERIAL,
            transform: Transform::at(Vec3::new(
                angle.cos() * SPIKE_RING_RADIUS,
                SPIKE_RING_HEIGHT,
                angle.sin() * SPIKE_RING_RADIUS,
            ))
            .with_rotation(Vec3::new(FRAC_PI_2, 0.0, angle)),
        }
    })
}

fn light_rig(lighting: Lighting) -> Vec<Light> {
    let rim_color = if lighting == Lighting::Eerie {
        EERIE_RIM_COLOR
    } else {
        COOL_RIM_COLOR
    };

    vec![
        Light {
            role: LightRole::Ambient,
            kind: LightKind::Ambient,
            color: AMBIENT_COLOR,
            intensity: 2.0,
        },
        Light {
            role: LightRole::Key,
            kind: LightKind::Directional {
                position: Vec3::new(5.0, 5.0, 5.0),
                casts_shadow: true,
            },
            color: HexColor::WHITE,
            intensity: 3.0,
        },
        Light {
            role: LightRole::Rim,
            kind: LightKind::Directional {
                position: Vec3::new(-5.0, 2.0, -5.0),
                casts_shadow: false,
            },
            color: rim_color,
            intensity: 2.0,
        },
    ]
}
