//! Render surface
//!
//! - [`RenderBackend`] - GPU resource and frame interface
//! - [`HeadlessBackend`] - resource-tracking backend without a GPU
//! - [`SceneHandle`] - one live scene built from a
//!   [`SceneDescription`](crate::figure::SceneDescription)
//! - [`Viewport`] - mounts at most one scene at a time
//! - [`Surface`] - drawable size and resize notifications

mod backend;
mod camera;
mod handle;
mod headless;
mod orbit;
mod surface;
mod viewport;

pub use backend::{FrameParams, MaterialHandle, MeshHandle, RenderBackend, RenderError};
pub use camera::Camera;
pub use handle::{BuildFailure, SceneHandle};
pub use headless::{BackendStats, HeadlessBackend};
pub use orbit::OrbitControls;
pub use surface::{ResizeListener, Surface, SurfaceSize};
pub use viewport::Viewport;
