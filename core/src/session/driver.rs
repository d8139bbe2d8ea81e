//! Event loop around the controller
//!
//! Runs on a single thread: user commands arrive on an mpsc channel, analysis
//! jobs are spawned and report back on a second channel tagged with their
//! session id, and the mounted scene is redrawn on a frame interval. Progress
//! is published on a watch channel so callers can wait for a state.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::controller::{Transition, ViewController, ViewEvent};
use super::state::{SessionId, ViewState};
use crate::analysis::{Analyzer, SourceImage};
use crate::render::RenderBackend;

/// User input for the driver.
#[derive(Debug, Clone)]
pub enum Command {
    SelectImage(SourceImage),
    Reset,
    Resize { width: u32, height: u32 },
    /// Orbit rotate by user drag (radians)
    Rotate { dx: f32, dy: f32 },
    Zoom(f32),
    Shutdown,
}

/// Snapshot published after every command, completion and frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverStatus {
    pub state: ViewState,
    pub session: SessionId,
    /// Frames drawn for the current scene
    pub frames: u64,
    /// Most recent transition
    pub last: Option<Transition>,
}

pub struct Driver<A: Analyzer, B: RenderBackend> {
    controller: ViewController<A, B>,
    frame_interval: Duration,
    status: watch::Sender<DriverStatus>,
}

impl<A: Analyzer, B: RenderBackend + 'static> Driver<A, B> {
    pub fn new(controller: ViewController<A, B>, frame_interval: Duration) -> Self {
        let (status, _) = watch::channel(DriverStatus {
            state: controller.state(),
            session: controller.session().id,
            frames: 0,
            last: None,
        });
        Self {
            controller,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            status,
        }
    }

    /// Subscribe to status updates.
    pub fn status(&self) -> watch::Receiver<DriverStatus> {
        self.status.subscribe()
    }

    /// Run until `Shutdown` or until every command sender is dropped.
    /// Returns the controller for inspection.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> ViewController<A, B> {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<ViewEvent>();
        let mut frames = tokio::time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let dt = self.frame_interval.as_secs_f32();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    None | Some(Command::Shutdown) => break,
                    Some(command) => self.apply(command),
                },
                Some(event) = done_rx.recv() => {
                    let transition = self.controller.handle(event);
                    self.publish(Some(transition), false);
                }
                _ = frames.tick() => {
                    if self.controller.viewport().is_mounted() {
                        let from = self.controller.state();
                        match self.controller.tick(dt) {
                            Ok(()) => self.publish(None, true),
                            // The controller has already logged and torn the scene down
                            Err(_) => {
                                let to = self.controller.state();
                                self.publish(Some(Transition::Applied { from, to }), false);
                            }
                        }
                    }
                }
            }

            if let Some(job) = self.controller.take_job() {
                let tx = done_tx.clone();
                let session = job.session();
                debug!(%session, "spawning analysis");
                tokio::spawn(async move {
                    // Receiver is gone once the driver stops
                    let _ = tx.send(job.run().await);
                });
            }
        }

        debug!("driver stopped");
        self.controller
    }

    fn apply(&mut self, command: Command) {
        let transition = match command {
            Command::SelectImage(image) => {
                Some(self.controller.handle(ViewEvent::ImageSelected(image)))
            }
            Command::Reset => Some(self.controller.handle(ViewEvent::Reset)),
            Command::Resize { width, height } => {
                self.controller.viewport().resize(width, height);
                None
            }
            Command::Rotate { dx, dy } => {
                if let Some(scene) = self.controller.viewport_mut().scene_mut() {
                    scene.orbit_mut().rotate(dx, dy);
                }
                None
            }
            Command::Zoom(factor) => {
                if let Some(scene) = self.controller.viewport_mut().scene_mut() {
                    scene.orbit_mut().zoom(factor);
                }
                None
            }
            // Handled by the loop
            Command::Shutdown => None,
        };
        if transition.is_some() {
            self.publish(transition, false);
        }
    }

    fn publish(&self, last: Option<Transition>, frame: bool) {
        let state = self.controller.state();
        let session = self.controller.session().id;
        self.status.send_modify(|status| {
            if status.session != session || status.state != state {
                status.frames = 0;
            }
            status.state = state;
            status.session = session;
            if frame {
                status.frames += 1;
            }
            if last.is_some() {
                status.last = last;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StaticAnalyzer;
    use crate::render::{HeadlessBackend, SurfaceSize, Viewport};
    use crate::session::IgnoreReason;
    use crate::test_utils::{GatedAnalyzer, LostDeviceBackend, test_image};
    use std::sync::Arc;

    fn viewport() -> Viewport<HeadlessBackend> {
        Viewport::new(HeadlessBackend::default(), SurfaceSize::new(800, 600))
    }

    const FRAME: Duration = Duration::from_millis(16);

    #[tokio::test(start_paused = true)]
    async fn analyzes_then_renders_frames() {
        let analyzer = StaticAnalyzer::demo().with_delay(Duration::from_millis(500));
        let controller = ViewController::new(Arc::new(analyzer), viewport());
        let driver = Driver::new(controller, FRAME);
        let mut status = driver.status();
        let (tx, rx) = mpsc::channel(8);

        let script = async move {
            tx.send(Command::SelectImage(test_image())).await.unwrap();
            status
                .wait_for(|s| s.state == ViewState::Viewing && s.frames >= 10)
                .await
                .unwrap();
            tx.send(Command::Resize { width: 1920, height: 1080 }).await.unwrap();
            tx.send(Command::Rotate { dx: 0.1, dy: 0.0 }).await.unwrap();
            let frames = status.borrow().frames;
            status.wait_for(|s| s.frames >= frames + 2).await.unwrap();
            tx.send(Command::Shutdown).await.unwrap();
        };

        let (controller, ()) = tokio::join!(driver.run(rx), script);
        assert_eq!(controller.state(), ViewState::Viewing);
        let scene = controller.viewport().scene().unwrap();
        assert!(scene.frames() >= 12);
        assert!(!scene.orbit().is_auto_rotating());
        assert_eq!(controller.viewport().backend().unwrap().size(), (1920, 1080));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_mid_flight_drops_the_late_result() {
        let analyzer = Arc::new(GatedAnalyzer::new());
        let controller = ViewController::new(Arc::clone(&analyzer), viewport());
        let driver = Driver::new(controller, FRAME);
        let mut status = driver.status();
        let (tx, rx) = mpsc::channel(8);

        let script = async move {
            tx.send(Command::SelectImage(test_image())).await.unwrap();
            status.wait_for(|s| s.state == ViewState::Analyzing).await.unwrap();

            // Rejected while busy
            tx.send(Command::SelectImage(test_image())).await.unwrap();
            status
                .wait_for(|s| s.last == Some(Transition::Ignored(IgnoreReason::Busy)))
                .await
                .unwrap();

            tx.send(Command::Reset).await.unwrap();
            status.wait_for(|s| s.state == ViewState::Idle).await.unwrap();

            analyzer.open();
            status
                .wait_for(|s| matches!(s.last, Some(Transition::Ignored(IgnoreReason::Stale(_)))))
                .await
                .unwrap();
            tx.send(Command::Shutdown).await.unwrap();
        };

        let (controller, ()) = tokio::join!(driver.run(rx), script);
        assert_eq!(controller.state(), ViewState::Idle);
        assert!(controller.session().is_cleared());
        assert_eq!(controller.viewport().builds(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_frames_end_in_error_instead_of_looping() {
        let viewport = Viewport::new(LostDeviceBackend::default(), SurfaceSize::new(800, 600));
        let controller = ViewController::new(Arc::new(StaticAnalyzer::demo()), viewport);
        let driver = Driver::new(controller, FRAME);
        let mut status = driver.status();
        let (tx, rx) = mpsc::channel(8);

        let script = async move {
            tx.send(Command::SelectImage(test_image())).await.unwrap();
            status.wait_for(|s| s.state == ViewState::Error).await.unwrap();
            assert_eq!(
                status.borrow().last,
                Some(Transition::Applied {
                    from: ViewState::Viewing,
                    to: ViewState::Error
                })
            );
            // Let the interval run on with nothing mounted
            tokio::time::sleep(FRAME * 20).await;
            tx.send(Command::Shutdown).await.unwrap();
        };

        let (controller, ()) = tokio::join!(driver.run(rx), script);
        assert_eq!(controller.state(), ViewState::Error);
        assert!(!controller.viewport().is_mounted());
        let backend = controller.viewport().backend().unwrap();
        assert_eq!(backend.draw_attempts, 1);
        assert!(backend.inner.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_senders_are_dropped() {
        let controller = ViewController::new(Arc::new(StaticAnalyzer::demo()), viewport());
        let driver = Driver::new(controller, FRAME);
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        let controller = driver.run(rx).await;
        assert_eq!(controller.state(), ViewState::Idle);
    }
}
