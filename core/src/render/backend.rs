//! Render backend trait and associated types
//!
//! A backend owns GPU-side resources. Scene handles talk to it only through
//! this trait, so the lifecycle rules (upload, draw, release) can be checked
//! against a headless implementation.

use glam::{Mat4, Vec3};
use vision3d_shared::HexColor;

use crate::figure::{Light, MaterialDesc};
use crate::mesh::MeshData;

/// Handle to an uploaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Handle to a created material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

/// Per-frame camera and lighting state
#[derive(Debug, Clone, PartialEq)]
pub struct FrameParams {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
    pub clear_color: HexColor,
    pub lights: Vec<Light>,
}

/// Errors raised by a render backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("mesh upload failed: {0}")]
    Upload(String),

    #[error("material creation failed: {0}")]
    Material(String),

    #[error("unknown mesh handle {0:?}")]
    UnknownMesh(MeshHandle),

    #[error("unknown material handle {0:?}")]
    UnknownMaterial(MaterialHandle),

    #[error("no render backend attached")]
    Detached,
}

/// Trait for render backends
pub trait RenderBackend: Send {
    /// Handle surface resize
    fn resize(&mut self, width: u32, height: u32);

    /// Upload tessellated geometry
    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, RenderError>;

    /// Create a surface material
    fn create_material(&mut self, material: &MaterialDesc) -> Result<MaterialHandle, RenderError>;

    /// Release an uploaded mesh
    fn release_mesh(&mut self, mesh: MeshHandle);

    /// Release a material
    fn release_material(&mut self, material: MaterialHandle);

    /// Begin a new frame
    fn begin_frame(&mut self, params: &FrameParams);

    /// Queue a draw. Meshes without a material use their vertex colours.
    fn draw(
        &mut self,
        mesh: MeshHandle,
        material: Option<MaterialHandle>,
        model: Mat4,
    ) -> Result<(), RenderError>;

    /// End the current frame and present
    fn end_frame(&mut self);
}
