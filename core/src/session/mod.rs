//! View session: state machine and event loop
//!
//! - [`ViewController`] - applies [`ViewEvent`]s to the single [`ViewSession`]
//! - [`Driver`] - single-threaded loop feeding commands, analysis completions and frames

mod controller;
mod driver;
mod state;

pub use controller::{AnalysisJob, IgnoreReason, Transition, ViewController, ViewEvent};
pub use driver::{Command, Driver, DriverStatus};
pub use state::{SessionId, ViewSession, ViewState};
