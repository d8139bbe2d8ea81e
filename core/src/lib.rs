//! Vision3D Core - character preview pipeline
//!
//! Turns an analyzed character image into an interactive stand-in figure.
//!
//! # Architecture
//!
//! - [`ViewController`] - Idle / Analyzing / Viewing / Error state machine
//! - [`Analyzer`] - Injectable analysis collaborator ([`GeminiAnalyzer`], [`StaticAnalyzer`])
//! - [`figure::generate`] - Deterministic attribute record to scene description
//! - [`Viewport`] / [`SceneHandle`] - Scene lifecycle over a [`RenderBackend`]
//! - [`Driver`] - Async event loop tying the pieces together

pub mod analysis;
pub mod config;
pub mod export;
pub mod figure;
pub mod mesh;
pub mod render;
pub mod session;
#[cfg(test)]
pub mod test_utils;

pub use analysis::{
    AnalysisError, AnalysisErrorKind, Analyzer, GeminiAnalyzer, SourceImage, StaticAnalyzer,
};
pub use config::Config;
pub use export::{ExportError, export_file_name, export_json, write_export};
pub use figure::{SceneDescription, generate, generate_from};
pub use render::{HeadlessBackend, RenderBackend, RenderError, SceneHandle, SurfaceSize, Viewport};
pub use session::{
    Command, Driver, DriverStatus, IgnoreReason, SessionId, Transition, ViewController, ViewEvent,
    ViewSession, ViewState,
};
