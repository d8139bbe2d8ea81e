//! Live scene: uploaded resources, camera, orbit and resize subscription
//!
//! A [`SceneHandle`] owns the render backend while it is alive. Disposing it
//! releases every mesh and material, drops the resize subscription and hands
//! the backend back. Dropping a handle without disposing it releases the same
//! resources.

use glam::Mat4;
use tracing::{debug, info};

use super::backend::{FrameParams, MaterialHandle, MeshHandle, RenderBackend, RenderError};
use super::camera::Camera;
use super::orbit::OrbitControls;
use super::surface::{ResizeListener, Surface};
use crate::figure::{Light, SceneDescription, Shape};
use vision3d_shared::HexColor;

/// One queued draw per frame.
#[derive(Debug, Clone, Copy)]
struct Drawable {
    mesh: MeshHandle,
    material: Option<MaterialHandle>,
    model: Mat4,
}

/// GPU resources held by a scene.
#[derive(Debug, Default)]
struct SceneResources {
    meshes: Vec<MeshHandle>,
    materials: Vec<MaterialHandle>,
    drawables: Vec<Drawable>,
}

impl SceneResources {
    fn upload<B: RenderBackend>(
        &mut self,
        description: &SceneDescription,
        backend: &mut B,
    ) -> Result<(), RenderError> {
        for material in &description.materials {
            let handle = backend.create_material(material)?;
            self.materials.push(handle);
        }

        // Identical shapes share one mesh
        let mut shapes: Vec<(Shape, MeshHandle)> = Vec::new();
        for node in &description.figure {
            let mesh = match shapes.iter().find(|(shape, _)| *shape == node.shape) {
                Some((_, mesh)) => *mesh,
                None => {
                    let mesh = backend.upload_mesh(&node.shape.tessellate())?;
                    self.meshes.push(mesh);
                    shapes.push((node.shape, mesh));
                    mesh
                }
            };
            let material = self.materials.get(node.material.0).copied().ok_or_else(|| {
                RenderError::Material(format!(
                    "node refers to missing material {}",
                    node.material.0
                ))
            })?;
            self.drawables.push(Drawable {
                mesh,
                material: Some(material),
                model: node.transform.matrix(),
            });
        }

        let grid = backend.upload_mesh(&description.grid.tessellate())?;
        self.meshes.push(grid);
        self.drawables.push(Drawable {
            mesh: grid,
            material: None,
            model: description.grid.transform().matrix(),
        });

        Ok(())
    }

    fn release<B: RenderBackend>(&mut self, backend: &mut B) {
        self.drawables.clear();
        for mesh in self.meshes.drain(..) {
            backend.release_mesh(mesh);
        }
        for material in self.materials.drain(..) {
            backend.release_material(material);
        }
    }

    fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.materials.is_empty()
    }
}

/// Failed build: the error and the backend, with anything partially
/// uploaded already released.
pub struct BuildFailure<B> {
    pub error: RenderError,
    pub backend: B,
}

impl<B> std::fmt::Debug for BuildFailure<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildFailure")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct SceneHandle<B: RenderBackend> {
    backend: Option<B>,
    resources: SceneResources,
    label: String,
    background: HexColor,
    lights: Vec<Light>,
    camera: Camera,
    orbit: OrbitControls,
    resize: Option<ResizeListener>,
    frames: u64,
}

impl<B: RenderBackend> SceneHandle<B> {
    /// Upload a scene description and subscribe to surface resizes.
    pub fn build(
        description: &SceneDescription,
        mut backend: B,
        surface: &Surface,
    ) -> Result<Self, BuildFailure<B>> {
        let mut resources = SceneResources::default();
        if let Err(error) = resources.upload(description, &mut backend) {
            resources.release(&mut backend);
            return Err(BuildFailure { error, backend });
        }

        let size = surface.size();
        backend.resize(size.width, size.height);

        info!(
            label = %description.label,
            meshes = resources.meshes.len(),
            materials = resources.materials.len(),
            "scene built"
        );

        Ok(Self {
            backend: Some(backend),
            resources,
            label: description.label.clone(),
            background: description.background,
            lights: description.lights.clone(),
            camera: Camera::from_desc(&description.camera, size.aspect()),
            orbit: OrbitControls::new(&description.camera, &description.orbit),
            resize: Some(surface.subscribe()),
            frames: 0,
        })
    }

    /// Apply pending resizes, advance the orbit and draw one frame.
    pub fn tick(&mut self, dt: f32) -> Result<(), RenderError> {
        let backend = self.backend.as_mut().ok_or(RenderError::Detached)?;

        if let Some(size) = self.resize.as_mut().and_then(ResizeListener::poll) {
            debug!(width = size.width, height = size.height, "surface resized");
            self.camera.set_aspect(size.aspect());
            backend.resize(size.width, size.height);
        }

        self.orbit.update(dt);
        self.camera.position = self.orbit.position();
        self.camera.target = self.orbit.target();

        let params = FrameParams {
            view: self.camera.view(),
            projection: self.camera.projection(),
            eye: self.camera.position,
            clear_color: self.background,
            lights: self.lights.clone(),
        };

        backend.begin_frame(&params);
        let drawn = self
            .resources
            .drawables
            .iter()
            .try_for_each(|d| backend.draw(d.mesh, d.material, d.model));
        backend.end_frame();
        drawn?;

        self.frames += 1;
        Ok(())
    }

    /// Release every resource and return the backend.
    ///
    /// Always `Some` for a handle obtained from [`SceneHandle::build`].
    pub fn dispose(mut self) -> Option<B> {
        self.release();
        self.backend.take()
    }

    fn release(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            if !self.resources.is_empty() {
                self.resources.release(backend);
                debug!(label = %self.label, frames = self.frames, "scene disposed");
            }
        }
        self.resize = None;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Orbit controls, for user rotate/zoom input.
    pub fn orbit_mut(&mut self) -> &mut OrbitControls {
        &mut self.orbit
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn mesh_count(&self) -> usize {
        self.resources.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.resources.materials.len()
    }

    pub fn draw_count(&self) -> usize {
        self.resources.drawables.len()
    }
}

impl<B: RenderBackend> Drop for SceneHandle<B> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::generate;
    use crate::render::headless::HeadlessBackend;
    use crate::render::surface::SurfaceSize;
    use vision3d_shared::{demo_record, validate};

    fn demo_scene() -> SceneDescription {
        generate(&validate(&demo_record()).unwrap())
    }

    fn surface() -> Surface {
        Surface::new(SurfaceSize::new(800, 600))
    }

    #[test]
    fn build_uploads_shared_meshes_once() {
        let surface = surface();
        let scene =
            SceneHandle::build(&demo_scene(), HeadlessBackend::default(), &surface).unwrap();
        // torso, head, one shared spike cone, cape, grid
        assert_eq!(scene.mesh_count(), 5);
        assert_eq!(scene.material_count(), 3);
        // 1 torso + 1 head + 8 spikes + 1 cape + 1 grid
        assert_eq!(scene.draw_count(), 12);
        assert_eq!(surface.listener_count(), 1);
        assert_eq!(scene.backend().unwrap().size(), (800, 600));
    }

    #[test]
    fn dispose_releases_everything() {
        let surface = surface();
        let scene =
            SceneHandle::build(&demo_scene(), HeadlessBackend::default(), &surface).unwrap();
        let backend = scene.dispose().unwrap();
        assert!(backend.is_empty());
        let stats = backend.stats();
        assert_eq!(stats.meshes_uploaded, stats.meshes_released);
        assert_eq!(stats.materials_created, stats.materials_released);
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn drop_unsubscribes_from_resizes() {
        let surface = surface();
        {
            let _scene =
                SceneHandle::build(&demo_scene(), HeadlessBackend::default(), &surface).unwrap();
            assert_eq!(surface.listener_count(), 1);
        }
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn tick_draws_every_node_and_follows_resizes() {
        let surface = surface();
        let mut scene =
            SceneHandle::build(&demo_scene(), HeadlessBackend::default(), &surface).unwrap();
        scene.tick(1.0 / 60.0).unwrap();
        assert_eq!(scene.backend().unwrap().stats().draw_calls, 12);

        surface.resize(SurfaceSize::new(1600, 800));
        scene.tick(1.0 / 60.0).unwrap();
        assert_eq!(scene.camera().aspect, 2.0);
        assert_eq!(scene.backend().unwrap().size(), (1600, 800));
        assert_eq!(scene.frames(), 2);
        assert_eq!(scene.backend().unwrap().stats().frames, 2);
    }

    #[test]
    fn failed_build_releases_partial_uploads() {
        let surface = surface();
        let backend = HeadlessBackend::default().with_mesh_limit(2);
        let failure = SceneHandle::build(&demo_scene(), backend, &surface).unwrap_err();
        assert!(matches!(failure.error, RenderError::Upload(_)));
        assert!(failure.backend.is_empty());
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn auto_rotation_moves_the_camera() {
        let surface = surface();
        let mut scene =
            SceneHandle::build(&demo_scene(), HeadlessBackend::default(), &surface).unwrap();
        let start = scene.camera().position;
        for _ in 0..60 {
            scene.tick(1.0 / 60.0).unwrap();
        }
        assert_ne!(scene.camera().position, start);

        scene.orbit_mut().rotate(0.0, 0.0);
        assert!(!scene.orbit().is_auto_rotating());
    }
}
