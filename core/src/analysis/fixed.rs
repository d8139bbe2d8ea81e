//! Offline analyzer returning a fixed result

use std::time::Duration;
use vision3d_shared::constants::DEMO_BLUEPRINT;
use vision3d_shared::{AnalysisResult, Blueprint, demo_record};

use super::{AnalysisError, Analyzer, SourceImage};

/// Answers every image with the same result, optionally after a delay.
#[derive(Debug, Clone)]
pub struct StaticAnalyzer {
    result: AnalysisResult,
    delay: Option<Duration>,
}

impl StaticAnalyzer {
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            result,
            delay: None,
        }
    }

    /// The built-in demo character.
    pub fn demo() -> Self {
        Self::new(AnalysisResult {
            config: demo_record(),
            blueprint: Blueprint(DEMO_BLUEPRINT.to_string()),
        })
    }

    /// Simulate network latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Analyzer for StaticAnalyzer {
    async fn analyze(&self, image: &SourceImage) -> Result<AnalysisResult, AnalysisError> {
        tracing::debug!(?image, "static analysis");
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.result.clone())
    }
}
