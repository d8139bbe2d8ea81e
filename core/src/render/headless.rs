//! Headless render backend
//!
//! Tracks resources and draw calls without touching a GPU. Used by the CLI
//! preview loop and by tests that check scene lifecycle accounting.

use glam::Mat4;
use hashbrown::HashMap;
use tracing::{trace, warn};

use super::backend::{FrameParams, MaterialHandle, MeshHandle, RenderBackend, RenderError};
use crate::figure::MaterialDesc;
use crate::mesh::MeshData;

/// Resource and frame counters for a [`HeadlessBackend`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendStats {
    pub live_meshes: usize,
    pub live_materials: usize,
    pub peak_meshes: usize,
    pub meshes_uploaded: u64,
    pub meshes_released: u64,
    pub materials_created: u64,
    pub materials_released: u64,
    pub frames: u64,
    pub draw_calls: u64,
    pub triangles: u64,
    pub resizes: u64,
}

/// Summary of an uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MeshEntry {
    vertices: usize,
    triangles: usize,
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    meshes: HashMap<MeshHandle, MeshEntry>,
    materials: HashMap<MaterialHandle, MaterialDesc>,
    next_mesh: u32,
    next_material: u32,
    /// Refuse uploads once this many meshes are live
    mesh_limit: Option<usize>,
    in_frame: bool,
    size: (u32, u32),
    stats: BackendStats,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }

    /// Fail mesh uploads once `limit` meshes are live.
    pub fn with_mesh_limit(mut self, limit: usize) -> Self {
        self.mesh_limit = Some(limit);
        self
    }

    pub fn stats(&self) -> BackendStats {
        self.stats
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// True when no meshes or materials are held.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.materials.is_empty()
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialDesc> {
        self.materials.get(&handle)
    }

    fn sync_live_counts(&mut self) {
        self.stats.live_meshes = self.meshes.len();
        self.stats.live_materials = self.materials.len();
        self.stats.peak_meshes = self.stats.peak_meshes.max(self.meshes.len());
    }
}

impl RenderBackend for HeadlessBackend {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.stats.resizes += 1;
    }

    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, RenderError> {
        if !mesh.is_well_formed() {
            return Err(RenderError::Upload("mesh buffers are inconsistent".into()));
        }
        if let Some(limit) = self.mesh_limit {
            if self.meshes.len() >= limit {
                return Err(RenderError::Upload(format!(
                    "mesh limit of {} reached",
                    limit
                )));
            }
        }

        let handle = MeshHandle(self.next_mesh);
        self.next_mesh += 1;
        self.meshes.insert(
            handle,
            MeshEntry {
                vertices: mesh.vertex_count(),
                triangles: mesh.triangle_count(),
            },
        );
        self.stats.meshes_uploaded += 1;
        self.sync_live_counts();
        trace!(?handle, vertices = mesh.vertex_count(), "uploaded mesh");
        Ok(handle)
    }

    fn create_material(&mut self, material: &MaterialDesc) -> Result<MaterialHandle, RenderError> {
        let handle = MaterialHandle(self.next_material);
        self.next_material += 1;
        self.materials.insert(handle, *material);
        self.stats.materials_created += 1;
        self.sync_live_counts();
        Ok(handle)
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        if self.meshes.remove(&mesh).is_some() {
            self.stats.meshes_released += 1;
            self.sync_live_counts();
        } else {
            warn!(?mesh, "release of unknown mesh");
        }
    }

    fn release_material(&mut self, material: MaterialHandle) {
        if self.materials.remove(&material).is_some() {
            self.stats.materials_released += 1;
            self.sync_live_counts();
        } else {
            warn!(?material, "release of unknown material");
        }
    }

    fn begin_frame(&mut self, _params: &FrameParams) {
        if self.in_frame {
            warn!("begin_frame called twice without end_frame");
        }
        self.in_frame = true;
    }

    fn draw(
        &mut self,
        mesh: MeshHandle,
        material: Option<MaterialHandle>,
        _model: Mat4,
    ) -> Result<(), RenderError> {
        let entry = self
            .meshes
            .get(&mesh)
            .copied()
            .ok_or(RenderError::UnknownMesh(mesh))?;
        if let Some(material) = material {
            if !self.materials.contains_key(&material) {
                return Err(RenderError::UnknownMaterial(material));
            }
        }
        self.stats.draw_calls += 1;
        self.stats.triangles += entry.triangles as u64;
        trace!(?mesh, vertices = entry.vertices, "draw");
        Ok(())
    }

    fn end_frame(&mut self) {
        self.in_frame = false;
        self.stats.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::generate_plane;
    use vision3d_shared::HexColor;

    #[test]
    fn upload_and_release_balance() {
        let mut backend = HeadlessBackend::new(640, 480);
        let mesh: MeshData = generate_plane(1.0, 1.0);
        let a = backend.upload_mesh(&mesh).unwrap();
        let b = backend.upload_mesh(&mesh).unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.stats().live_meshes, 2);

        backend.release_mesh(a);
        backend.release_mesh(b);
        let stats = backend.stats();
        assert_eq!(stats.live_meshes, 0);
        assert_eq!(stats.peak_meshes, 2);
        assert_eq!(stats.meshes_uploaded, stats.meshes_released);
        assert!(backend.is_empty());
    }

    #[test]
    fn double_release_is_counted_once() {
        let mut backend = HeadlessBackend::default();
        let m = backend
            .create_material(&MaterialDesc::plain(HexColor::WHITE))
            .unwrap();
        backend.release_material(m);
        backend.release_material(m);
        assert_eq!(backend.stats().materials_released, 1);
    }

    #[test]
    fn draw_rejects_released_mesh() {
        let mut backend = HeadlessBackend::default();
        let mesh = backend.upload_mesh(&generate_plane(1.0, 1.0)).unwrap();
        backend.release_mesh(mesh);
        assert_eq!(
            backend.draw(mesh, None, Mat4::IDENTITY),
            Err(RenderError::UnknownMesh(mesh))
        );
    }

    #[test]
    fn mesh_limit_refuses_upload() {
        let mut backend = HeadlessBackend::default().with_mesh_limit(1);
        let mesh: MeshData = generate_plane(1.0, 1.0);
        backend.upload_mesh(&mesh).unwrap();
        assert!(matches!(
            backend.upload_mesh(&mesh),
            Err(RenderError::Upload(_))
        ));
    }

    #[test]
    fn draw_counts_triangles() {
        let mut backend = HeadlessBackend::default();
        let mesh = backend.upload_mesh(&generate_plane(1.0, 1.0)).unwrap();
        backend.draw(mesh, None, Mat4::IDENTITY).unwrap();
        assert_eq!(backend.stats().draw_calls, 1);
        assert_eq!(backend.stats().triangles, 2);
    }
}
