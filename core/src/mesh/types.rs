//! Mesh data containers

use glam::Vec3;

/// How the index buffer is assembled into primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    TriangleList,
    LineList,
}

/// Trait for mesh builders that accept positions and normals.
pub trait MeshBuilder {
    /// Add a vertex, returning its index
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u16;

    /// Add a triangle using three vertex indices (CCW winding)
    fn add_triangle(&mut self, i0: u16, i1: u16, i2: u16);
}

/// Tessellated geometry ready for upload (f32 format)
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    /// Vertex positions as [x, y, z]
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals as [x, y, z]
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex colours as linear [r, g, b] (empty if the material supplies colour)
    pub colors: Vec<[f32; 3]>,
    /// Index buffer, interpreted according to `topology`
    pub indices: Vec<u16>,
    pub topology: Topology,
}

impl MeshData {
    pub fn new(topology: Topology) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
            topology,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Triangle count (zero for line lists)
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::TriangleList => self.indices.len() / 3,
            Topology::LineList => 0,
        }
    }

    /// Line segment count (zero for triangle lists)
    pub fn line_count(&self) -> usize {
        match self.topology {
            Topology::TriangleList => 0,
            Topology::LineList => self.indices.len() / 2,
        }
    }

    /// Append a coloured line segment.
    pub fn add_line(&mut self, a: Vec3, b: Vec3, color: [f32; 3]) {
        let i0 = self.add_vertex(a, Vec3::Y);
        let i1 = self.add_vertex(b, Vec3::Y);
        self.colors.push(color);
        self.colors.push(color);
        self.indices.push(i0);
        self.indices.push(i1);
    }

    /// Check that every index is in range and the buffers agree in length.
    pub fn is_well_formed(&self) -> bool {
        let per_primitive = match self.topology {
            Topology::TriangleList => 3,
            Topology::LineList => 2,
        };
        let n = self.positions.len();
        self.normals.len() == n
            && (self.colors.is_empty() || self.colors.len() == n)
            && self.indices.len() % per_primitive == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }
}

impl Default for MeshData {
    fn default() -> Self {
        Self::new(Topology::TriangleList)
    }
}

impl MeshBuilder for MeshData {
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u16 {
        let index = self.positions.len() as u16;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }

    fn add_triangle(&mut self, i0: u16, i1: u16, i2: u16) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }
}
