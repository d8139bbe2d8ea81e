//! View states and the session they describe

use std::fmt;
use vision3d_shared::{AnalysisResult, AttributeRecord, Blueprint};

use crate::analysis::SourceImage;

/// Which view is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewState {
    #[default]
    Idle,
    Analyzing,
    Viewing,
    Error,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewState::Idle => "idle",
            ViewState::Analyzing => "analyzing",
            ViewState::Viewing => "viewing",
            ViewState::Error => "error",
        })
    }
}

/// Identifies one upload. Completions carry the id of the session that
/// started them so late results for abandoned sessions can be dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The single active unit of interaction state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSession {
    pub id: SessionId,
    pub state: ViewState,
    pub image: Option<SourceImage>,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
}

impl ViewSession {
    pub fn record(&self) -> Option<&AttributeRecord> {
        self.result.as_ref().map(|r| &r.config)
    }

    pub fn blueprint(&self) -> Option<&Blueprint> {
        self.result.as_ref().map(|r| &r.blueprint)
    }

    /// Drop the image, result and error; keeps the id.
    pub fn clear(&mut self) {
        self.image = None;
        self.result = None;
        self.error = None;
    }

    pub fn is_cleared(&self) -> bool {
        self.image.is_none() && self.result.is_none() && self.error.is_none()
    }
}
