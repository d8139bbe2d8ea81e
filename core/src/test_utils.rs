//! Shared test utilities for controller and driver tests

use glam::Mat4;
use tokio::sync::Semaphore;
use vision3d_shared::{AnalysisResult, AttributeRecord, Blueprint};

use crate::analysis::{AnalysisError, Analyzer, SourceImage, StaticAnalyzer};
use crate::figure::MaterialDesc;
use crate::mesh::MeshData;
use crate::render::{
    FrameParams, HeadlessBackend, MaterialHandle, MeshHandle, RenderBackend, RenderError,
};

/// A tiny PNG-signed image.
pub fn test_image() -> SourceImage {
    SourceImage::from_data_url("data:image/png;base64,iVBORw0KGgo=")
        .expect("static data URL is valid")
}

/// Wrap a record in an analysis result with a short blueprint.
pub fn record_result(record: AttributeRecord) -> AnalysisResult {
    AnalysisResult {
        config: record,
        blueprint: Blueprint("Test blueprint.".into()),
    }
}

/// Always fails with the given error.
pub struct FailingAnalyzer {
    error: AnalysisError,
}

impl FailingAnalyzer {
    pub fn new(error: AnalysisError) -> Self {
        Self { error }
    }
}

impl Analyzer for FailingAnalyzer {
    async fn analyze(&self, _image: &SourceImage) -> Result<AnalysisResult, AnalysisError> {
        Err(self.error.clone())
    }
}

/// Holds every analysis until [`GatedAnalyzer::open`] is called, then
/// answers with the demo result.
pub struct GatedAnalyzer {
    gate: Semaphore,
    inner: StaticAnalyzer,
}

impl GatedAnalyzer {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            inner: StaticAnalyzer::demo(),
        }
    }

    /// Let all waiting and future analyses complete.
    pub fn open(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }
}

impl Analyzer for GatedAnalyzer {
    async fn analyze(&self, image: &SourceImage) -> Result<AnalysisResult, AnalysisError> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;
        self.inner.analyze(image).await
    }
}

/// Uploads like [`HeadlessBackend`] but every draw fails, as after a lost
/// graphics device.
#[derive(Debug, Default)]
pub struct LostDeviceBackend {
    pub inner: HeadlessBackend,
    pub draw_attempts: u64,
}

impl RenderBackend for LostDeviceBackend {
    fn resize(&mut self, width: u32, height: u32) {
        self.inner.resize(width, height);
    }

    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, RenderError> {
        self.inner.upload_mesh(mesh)
    }

    fn create_material(&mut self, material: &MaterialDesc) -> Result<MaterialHandle, RenderError> {
        self.inner.create_material(material)
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        self.inner.release_mesh(mesh);
    }

    fn release_material(&mut self, material: MaterialHandle) {
        self.inner.release_material(material);
    }

    fn begin_frame(&mut self, params: &FrameParams) {
        self.inner.begin_frame(params);
    }

    fn draw(
        &mut self,
        _mesh: MeshHandle,
        _material: Option<MaterialHandle>,
        _model: Mat4,
    ) -> Result<(), RenderError> {
        self.draw_attempts += 1;
        Err(RenderError::Detached)
    }

    fn end_frame(&mut self) {
        self.inner.end_frame();
    }
}
