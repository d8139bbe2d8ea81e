//! Primitive shape tessellation: cylinder, cone, octahedron, plane, grid

use glam::Vec3;
use std::f32::consts::PI;
use tracing::warn;

use super::types::{MeshBuilder, MeshData, Topology};

/// Generate a cylinder or truncated cone mesh
///
/// # Arguments
/// * `radius_top` - Top radius (>= 0.0)
/// * `radius_bottom` - Bottom radius (>= 0.0)
/// * `height` - Cylinder height, centred on the origin
/// * `segments` - Number of radial divisions (min 3, max 256)
///
/// # Returns
/// Mesh with body and caps (if radii > 0)
pub fn generate_cylinder<M: MeshBuilder + Default>(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    segments: u32,
) -> M {
    let radius_top = if radius_top < 0.0 {
        warn!("generate_cylinder: radius_top must be >= 0.0, clamping to 0.0");
        0.0
    } else {
        radius_top
    };

    let radius_bottom = if radius_bottom < 0.0 {
        warn!("generate_cylinder: radius_bottom must be >= 0.0, clamping to 0.0");
        0.0
    } else {
        radius_bottom
    };

    let height = if height <= 0.0 {
        warn!("generate_cylinder: height must be > 0.0, clamping to 0.001");
        0.001
    } else {
        height
    };

    let segments = segments.clamp(3, 256);

    let mut mesh = M::default();
    let half_height = height * 0.5;
    let slope = radius_bottom - radius_top;

    // Body: one bottom/top vertex pair per segment, starting on +Z
    let mut ring = Vec::with_capacity((segments * 2) as usize);
    for i in 0..segments {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();

        // Surface normal tilts upward when the shape narrows toward the top
        let normal = Vec3::new(sin_theta * height, slope, cos_theta * height).normalize();

        let bottom = mesh.add_vertex(
            Vec3::new(radius_bottom * sin_theta, -half_height, radius_bottom * cos_theta),
            normal,
        );
        let top = mesh.add_vertex(
            Vec3::new(radius_top * sin_theta, half_height, radius_top * cos_theta),
            normal,
        );
        ring.push(bottom);
        ring.push(top);
    }

    for i in 0..segments {
        let next_i = (i + 1) % segments;

        let i0 = ring[(i * 2) as usize];
        let i1 = ring[(i * 2 + 1) as usize];
        let i2 = ring[(next_i * 2) as usize];
        let i3 = ring[(next_i * 2 + 1) as usize];

        // Vertex layout: i0=BR, i1=TR (seg i), i2=BL, i3=TL (seg i+1)
        mesh.add_triangle(i0, i3, i1);
        mesh.add_triangle(i0, i2, i3);
    }

    if radius_bottom > 0.0 {
        add_cap(&mut mesh, radius_bottom, -half_height, segments, false);
    }
    if radius_top > 0.0 {
        add_cap(&mut mesh, radius_top, half_height, segments, true);
    }

    mesh
}

/// Generate a cone (cylinder with a zero top radius)
pub fn generate_cone<M: MeshBuilder + Default>(radius: f32, height: f32, segments: u32) -> M {
    generate_cylinder(0.0, radius, height, segments)
}

fn add_cap<M: MeshBuilder>(mesh: &mut M, radius: f32, y: f32, segments: u32, facing_up: bool) {
    let normal = if facing_up { Vec3::Y } else { Vec3::NEG_Y };
    let center = mesh.add_vertex(Vec3::new(0.0, y, 0.0), normal);

    for i in 0..segments {
        let next_i = (i + 1) % segments;
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        let next_theta = (next_i as f32 / segments as f32) * 2.0 * PI;

        let i0 = mesh.add_vertex(
            Vec3::new(radius * theta.sin(), y, radius * theta.cos()),
            normal,
        );
        let i1 = mesh.add_vertex(
            Vec3::new(radius * next_theta.sin(), y, radius * next_theta.cos()),
            normal,
        );

        if facing_up {
            mesh.add_triangle(center, i0, i1);
        } else {
            mesh.add_triangle(center, i1, i0);
        }
    }
}

/// Base octahedron corners and faces (CCW from outside)
const OCTAHEDRON_VERTICES: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 4],
    [0, 4, 3],
    [0, 3, 5],
    [0, 5, 2],
    [1, 2, 5],
    [1, 5, 3],
    [1, 3, 4],
    [1, 4, 2],
];

/// Generate an octahedron, optionally subdivided toward a sphere
///
/// Each face is split into `(detail + 1)^2` triangles and every vertex is
/// pushed out to `radius`. Detail is clamped to 0..=5.
pub fn generate_octahedron<M: MeshBuilder + Default>(radius: f32, detail: u32) -> M {
    let radius = if radius <= 0.0 {
        warn!("generate_octahedron: radius must be > 0.0, clamping to 0.001");
        0.001
    } else {
        radius
    };
    let n = detail.min(5) + 1;

    let mut mesh = M::default();

    for face in OCTAHEDRON_FACES {
        let a = OCTAHEDRON_VERTICES[face[0]];
        let b = OCTAHEDRON_VERTICES[face[1]];
        let c = OCTAHEDRON_VERTICES[face[2]];

        let point = |i: u32, j: u32| -> Vec3 {
            a + (b - a) * (i as f32 / n as f32) + (c - a) * (j as f32 / n as f32)
        };

        for i in 0..n {
            for j in 0..(n - i) {
                add_sphere_triangle(
                    &mut mesh,
                    radius,
                    point(i, j),
                    point(i + 1, j),
                    point(i, j + 1),
                );
                if j + 1 < n - i {
                    add_sphere_triangle(
                        &mut mesh,
                        radius,
                        point(i + 1, j),
                        point(i + 1, j + 1),
                        point(i, j + 1),
                    );
                }
            }
        }
    }

    mesh
}

fn add_sphere_triangle<M: MeshBuilder>(mesh: &mut M, radius: f32, p0: Vec3, p1: Vec3, p2: Vec3) {
    let mut corner = |p: Vec3| {
        let dir = p.normalize();
        mesh.add_vertex(dir * radius, dir)
    };
    let i0 = corner(p0);
    let i1 = corner(p1);
    let i2 = corner(p2);
    mesh.add_triangle(i0, i1, i2);
}

/// Generate a flat rectangle in the XY plane facing +Z
pub fn generate_plane<M: MeshBuilder + Default>(width: f32, height: f32) -> M {
    let hw = width.abs() * 0.5;
    let hh = height.abs() * 0.5;

    let mut mesh = M::default();
    let i0 = mesh.add_vertex(Vec3::new(-hw, -hh, 0.0), Vec3::Z);
    let i1 = mesh.add_vertex(Vec3::new(hw, -hh, 0.0), Vec3::Z);
    let i2 = mesh.add_vertex(Vec3::new(hw, hh, 0.0), Vec3::Z);
    let i3 = mesh.add_vertex(Vec3::new(-hw, hh, 0.0), Vec3::Z);
    mesh.add_triangle(i0, i1, i2);
    mesh.add_triangle(i0, i2, i3);
    mesh
}

/// Generate a square reference grid on the XZ plane as a line list
///
/// `divisions + 1` lines run along each axis. The two lines through the
/// origin use `center_color`, the rest use `line_color`.
pub fn generate_grid(
    size: f32,
    divisions: u32,
    center_color: [f32; 3],
    line_color: [f32; 3],
) -> MeshData {
    let divisions = divisions.clamp(1, 1000);
    let half = size.abs() * 0.5;
    let step = size.abs() / divisions as f32;
    let center = divisions / 2;

    let mut mesh = MeshData::new(Topology::LineList);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if divisions % 2 == 0 && i == center {
            center_color
        } else {
            line_color
        };
        mesh.add_line(Vec3::new(-half, 0.0, k), Vec3::new(half, 0.0, k), color);
        mesh.add_line(Vec3::new(k, 0.0, -half), Vec3::new(k, 0.0, half), color);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_counts() {
        let mesh: MeshData = generate_cylinder(0.5, 0.4, 1.2, 6);
        // body 12 + two caps of (1 + 12)
        assert_eq!(mesh.vertex_count(), 12 + 13 + 13);
        assert_eq!(mesh.triangle_count(), 12 + 6 + 6);
        assert!(mesh.is_well_formed());
    }

    #[test]
    fn cylinder_ring_starts_on_positive_z() {
        let mesh: MeshData = generate_cylinder(0.5, 0.4, 1.2, 6);
        let bottom = Vec3::from_array(mesh.positions[0]);
        assert!((bottom - Vec3::new(0.0, -0.6, 0.4)).length() < 1e-6);
        // Second corner is 60 degrees round toward +X
        let next = Vec3::from_array(mesh.positions[2]);
        assert!(next.x > 0.0);
        assert!((next.z - 0.4 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn cylinder_faces_point_outward() {
        let mesh: MeshData = generate_cylinder(0.5, 0.5, 1.2, 6);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.positions[i as usize]));
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn cone_has_no_top_cap() {
        let mesh: MeshData = generate_cone(0.1, 0.4, 4);
        assert_eq!(mesh.vertex_count(), 8 + 9);
        assert_eq!(mesh.triangle_count(), 8 + 4);
        let apex = mesh.positions.iter().filter(|p| (p[1] - 0.2).abs() < 1e-6).count();
        assert_eq!(apex, 4);
    }

    #[test]
    fn cylinder_clamps_bad_parameters() {
        let mesh: MeshData = generate_cylinder(-1.0, 0.5, 0.0, 1);
        assert!(mesh.is_well_formed());
        // 3 segments after clamping, top radius 0 so no top cap
        assert_eq!(mesh.triangle_count(), 6 + 3);
    }

    #[test]
    fn octahedron_detail_subdivides_faces() {
        let base: MeshData = generate_octahedron(1.0, 0);
        assert_eq!(base.triangle_count(), 8);

        let head: MeshData = generate_octahedron(0.35, 1);
        assert_eq!(head.triangle_count(), 32);
        assert!(head.is_well_formed());
        for p in &head.positions {
            let len = Vec3::from_array(*p).length();
            assert!((len - 0.35).abs() < 1e-5);
        }
    }

    #[test]
    fn octahedron_faces_point_outward() {
        let mesh: MeshData = generate_octahedron(1.0, 2);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.positions[i as usize]));
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn plane_is_two_triangles() {
        let mesh: MeshData = generate_plane(1.2, 2.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        let max_y = mesh.positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        assert!((max_y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn grid_lines_and_center_colour() {
        let center = [1.0, 0.0, 0.0];
        let line = [0.0, 0.0, 1.0];
        let mesh = generate_grid(10.0, 10, center, line);
        assert_eq!(mesh.topology, Topology::LineList);
        assert_eq!(mesh.line_count(), 22);
        assert_eq!(mesh.triangle_count(), 0);
        let center_vertices = mesh.colors.iter().filter(|c| **c == center).count();
        assert_eq!(center_vertices, 4);
        assert!(mesh.is_well_formed());
    }
}
