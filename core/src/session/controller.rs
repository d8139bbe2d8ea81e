//! View state controller
//!
//! A finite state machine over [`ViewState`]. Every input arrives as a
//! [`ViewEvent`] and produces a [`Transition`]; inputs that are not defined
//! for the current state are ignored with a reason instead of corrupting it.
//!
//! The controller owns the viewport, so the scene side effects happen inside
//! the transition: entering `Viewing` mounts a scene, and leaving it unmounts
//! the scene before anything else happens.

use std::sync::Arc;
use tracing::{error, info, warn};
use vision3d_shared::{AnalysisResult, validate};

use super::state::{SessionId, ViewSession, ViewState};
use crate::analysis::{AnalysisError, Analyzer, SourceImage};
use crate::figure::{self, SceneDescription};
use crate::render::{RenderBackend, RenderError, Viewport};

/// Inputs to the controller.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// The user picked an image to analyze
    ImageSelected(SourceImage),
    /// The analysis started for `session` finished
    AnalysisSucceeded {
        session: SessionId,
        result: AnalysisResult,
    },
    /// The analysis started for `session` failed
    AnalysisFailed {
        session: SessionId,
        error: AnalysisError,
    },
    /// Return to idle, discarding the session
    Reset,
}

impl ViewEvent {
    fn name(&self) -> &'static str {
        match self {
            ViewEvent::ImageSelected(_) => "image_selected",
            ViewEvent::AnalysisSucceeded { .. } => "analysis_succeeded",
            ViewEvent::AnalysisFailed { .. } => "analysis_failed",
            ViewEvent::Reset => "reset",
        }
    }
}

/// Why an event was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// An analysis is already in flight
    Busy,
    /// A completion for a session that is no longer current
    Stale(SessionId),
    /// The event is not defined for the current state
    Unexpected(ViewState),
}

/// Outcome of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied { from: ViewState, to: ViewState },
    Ignored(IgnoreReason),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }
}

/// One analysis request waiting to be run.
///
/// Owns everything it needs, so [`AnalysisJob::run`] can be spawned.
#[derive(Debug)]
pub struct AnalysisJob<A> {
    session: SessionId,
    analyzer: Arc<A>,
    image: SourceImage,
}

impl<A: Analyzer> AnalysisJob<A> {
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Run the analysis and turn the outcome into a completion event.
    pub async fn run(self) -> ViewEvent {
        match self.analyzer.analyze(&self.image).await {
            Ok(result) => ViewEvent::AnalysisSucceeded {
                session: self.session,
                result,
            },
            Err(error) => ViewEvent::AnalysisFailed {
                session: self.session,
                error,
            },
        }
    }
}

pub struct ViewController<A: Analyzer, B: RenderBackend> {
    analyzer: Arc<A>,
    viewport: Viewport<B>,
    session: ViewSession,
    last_id: SessionId,
    pending: Option<AnalysisJob<A>>,
    scene: Option<SceneDescription>,
    auto_rotate_speed: Option<f32>,
}

impl<A: Analyzer, B: RenderBackend> ViewController<A, B> {
    pub fn new(analyzer: Arc<A>, viewport: Viewport<B>) -> Self {
        Self {
            analyzer,
            viewport,
            session: ViewSession::default(),
            last_id: SessionId::default(),
            pending: None,
            scene: None,
            auto_rotate_speed: None,
        }
    }

    /// Override the generated orbit auto-rotate speed; zero disables it.
    pub fn with_auto_rotate_speed(mut self, speed: f32) -> Self {
        self.auto_rotate_speed = Some(speed);
        self
    }

    pub fn state(&self) -> ViewState {
        self.session.state
    }

    pub fn session(&self) -> &ViewSession {
        &self.session
    }

    pub fn viewport(&self) -> &Viewport<B> {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport<B> {
        &mut self.viewport
    }

    /// Description of the mounted scene, while viewing.
    pub fn scene(&self) -> Option<&SceneDescription> {
        self.scene.as_ref()
    }

    /// Take the analysis job started by the last accepted image selection.
    pub fn take_job(&mut self) -> Option<AnalysisJob<A>> {
        self.pending.take()
    }

    /// Apply one event.
    pub fn handle(&mut self, event: ViewEvent) -> Transition {
        let from = self.state();
        let name = event.name();

        let outcome = match event {
            ViewEvent::ImageSelected(image) => self.select_image(image),
            ViewEvent::AnalysisSucceeded { session, result } => {
                self.check_completion(session).map(|()| self.enter_viewing(result))
            }
            ViewEvent::AnalysisFailed { session, error } => {
                self.check_completion(session).map(|()| {
                    error!(
                        session = %session,
                        kind = %error.kind(),
                        error = %error,
                        "analysis failed"
                    );
                    self.enter_error(error.user_message());
                })
            }
            ViewEvent::Reset => {
                self.reset();
                Ok(())
            }
        };

        match outcome {
            Ok(()) => {
                let to = self.state();
                info!(event = name, %from, %to, session = %self.session.id, "view transition");
                Transition::Applied { from, to }
            }
            Err(reason) => {
                warn!(event = name, state = %from, ?reason, "event ignored");
                Transition::Ignored(reason)
            }
        }
    }

    /// Select an image and run its analysis to completion.
    ///
    /// Returns the transition applied by the completion, or the reason the
    /// selection was ignored.
    pub async fn submit(&mut self, image: SourceImage) -> Transition {
        let selected = self.handle(ViewEvent::ImageSelected(image));
        if !selected.is_applied() {
            return selected;
        }
        match self.take_job() {
            Some(job) => {
                let event = job.run().await;
                self.handle(event)
            }
            None => selected,
        }
    }

    /// Draw one frame of the mounted scene.
    ///
    /// A failed frame disposes the scene and moves the session to `Error`;
    /// the render error is returned so the caller can report it.
    pub fn tick(&mut self, dt: f32) -> Result<(), RenderError> {
        let Err(e) = self.viewport.tick(dt) else {
            return Ok(());
        };
        error!(session = %self.session.id, error = %e, "frame failed, stopping preview");
        self.leave_current();
        self.enter_error(format!("Preview stopped: {}", e));
        Err(e)
    }

    fn select_image(&mut self, image: SourceImage) -> Result<(), IgnoreReason> {
        match self.state() {
            ViewState::Analyzing => return Err(IgnoreReason::Busy),
            // Uploading from a result view replaces the session
            ViewState::Viewing | ViewState::Error => self.leave_current(),
            ViewState::Idle => {}
        }

        self.last_id = self.last_id.next();
        self.session = ViewSession {
            id: self.last_id,
            state: ViewState::Analyzing,
            image: Some(image.clone()),
            result: None,
            error: None,
        };
        self.pending = Some(AnalysisJob {
            session: self.last_id,
            analyzer: Arc::clone(&self.analyzer),
            image,
        });
        Ok(())
    }

    fn check_completion(&self, session: SessionId) -> Result<(), IgnoreReason> {
        if session != self.session.id {
            return Err(IgnoreReason::Stale(session));
        }
        if self.state() != ViewState::Analyzing {
            return Err(IgnoreReason::Unexpected(self.state()));
        }
        Ok(())
    }

    fn enter_viewing(&mut self, result: AnalysisResult) {
        let valid = match validate(&result.config) {
            Ok(valid) => valid,
            Err(e) => {
                let error = AnalysisError::from(e);
                error!(
                    session = %self.session.id,
                    kind = %error.kind(),
                    error = %error,
                    "analysis result rejected"
                );
                self.enter_error(error.user_message());
                return;
            }
        };

        let mut description = figure::generate(&valid);
        if let Some(speed) = self.auto_rotate_speed {
            description.orbit.auto_rotate_speed = (speed > 0.0).then_some(speed);
        }
        if let Err(e) = self.viewport.mount(&description) {
            error!(session = %self.session.id, error = %e, "failed to build preview");
            self.enter_error(format!("Failed to build preview: {}", e));
            return;
        }

        self.scene = Some(description);
        self.session.result = Some(result);
        self.session.state = ViewState::Viewing;
    }

    fn enter_error(&mut self, message: String) {
        self.session.result = None;
        self.session.error = Some(message);
        self.session.state = ViewState::Error;
    }

    /// Dispose the scene and drop any queued job.
    fn leave_current(&mut self) {
        self.viewport.unmount();
        self.scene = None;
        self.pending = None;
    }

    fn reset(&mut self) {
        self.leave_current();
        // A fresh id makes any in-flight completion stale
        self.last_id = self.last_id.next();
        self.session.clear();
        self.session.id = self.last_id;
        self.session.state = ViewState::Idle;
    }
}
