//! Mountable viewport
//!
//! Holds at most one live [`SceneHandle`]. Mounting a new scene always
//! disposes the previous one first, so the backend never carries resources
//! from two scenes at once.

use tracing::{debug, warn};

use super::backend::{RenderBackend, RenderError};
use super::handle::{BuildFailure, SceneHandle};
use super::surface::{Surface, SurfaceSize};
use crate::figure::SceneDescription;

#[derive(Debug)]
pub struct Viewport<B: RenderBackend> {
    /// Backend while no scene is mounted
    backend: Option<B>,
    scene: Option<SceneHandle<B>>,
    surface: Surface,
    builds: u64,
    disposals: u64,
}

impl<B: RenderBackend> Viewport<B> {
    pub fn new(backend: B, size: SurfaceSize) -> Self {
        Self {
            backend: Some(backend),
            scene: None,
            surface: Surface::new(size),
            builds: 0,
            disposals: 0,
        }
    }

    /// Dispose any mounted scene, then build one for `description`.
    pub fn mount(&mut self, description: &SceneDescription) -> Result<(), RenderError> {
        self.unmount();

        let backend = self.backend.take().ok_or(RenderError::Detached)?;
        match SceneHandle::build(description, backend, &self.surface) {
            Ok(scene) => {
                self.builds += 1;
                self.scene = Some(scene);
                Ok(())
            }
            Err(BuildFailure { error, backend }) => {
                warn!(%error, label = %description.label, "scene build failed");
                self.backend = Some(backend);
                Err(error)
            }
        }
    }

    /// Dispose the mounted scene, if any. Returns true when one was disposed.
    pub fn unmount(&mut self) -> bool {
        let Some(scene) = self.scene.take() else {
            return false;
        };
        let label = scene.label().to_string();
        if let Some(backend) = scene.dispose() {
            self.backend = Some(backend);
        }
        self.disposals += 1;
        debug!(%label, disposals = self.disposals, "scene unmounted");
        true
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.surface.resize(SurfaceSize::new(width, height));
    }

    /// Draw one frame of the mounted scene. Does nothing when empty.
    pub fn tick(&mut self, dt: f32) -> Result<(), RenderError> {
        match self.scene.as_mut() {
            Some(scene) => scene.tick(dt),
            None => Ok(()),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    pub fn scene(&self) -> Option<&SceneHandle<B>> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut SceneHandle<B>> {
        self.scene.as_mut()
    }

    /// Backend, whether or not a scene currently holds it.
    pub fn backend(&self) -> Option<&B> {
        match &self.scene {
            Some(scene) => scene.backend(),
            None => self.backend.as_ref(),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Number of live scene handles (0 or 1).
    pub fn live_handles(&self) -> usize {
        usize::from(self.scene.is_some())
    }

    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn disposals(&self) -> u64 {
        self.disposals
    }
}
