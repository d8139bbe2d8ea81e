//! Image analysis collaborator
//!
//! An [`Analyzer`] turns a source image into an [`AnalysisResult`]. The
//! controller holds it behind an `Arc` and never constructs one itself, so
//! tests and offline runs can substitute [`StaticAnalyzer`] for the remote
//! [`GeminiAnalyzer`].
//!
//! Failures fall into three classes that logs can tell apart:
//!
//! - [`AnalysisError::Transport`] - the model could not be reached or refused the request
//! - [`AnalysisError::SchemaViolation`] - the model answered but the payload is unusable
//! - [`AnalysisError::MalformedAttributeRecord`] - the payload parsed but the record is invalid

mod fixed;
mod gemini;
mod source;

pub use fixed::StaticAnalyzer;
pub use gemini::{GeminiAnalyzer, build_request_body, parse_response};
pub use source::{ImageError, SourceImage};

use serde::Deserialize;
use std::fmt;
use std::future::Future;
use vision3d_shared::{
    AnalysisResult, AttributeRecord, Blueprint, FALLBACK_ERROR_MESSAGE, RawAttributeRecord,
    RecordError,
};

/// Why an analysis did not produce a usable result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    SchemaViolation(String),

    #[error("{0}")]
    MalformedAttributeRecord(#[from] RecordError),
}

/// Failure class, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisErrorKind {
    Transport,
    SchemaViolation,
    MalformedAttributeRecord,
}

impl fmt::Display for AnalysisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnalysisErrorKind::Transport => "transport",
            AnalysisErrorKind::SchemaViolation => "schema_violation",
            AnalysisErrorKind::MalformedAttributeRecord => "malformed_attribute_record",
        })
    }
}

impl AnalysisError {
    pub fn kind(&self) -> AnalysisErrorKind {
        match self {
            AnalysisError::Transport(_) => AnalysisErrorKind::Transport,
            AnalysisError::SchemaViolation(_) => AnalysisErrorKind::SchemaViolation,
            AnalysisError::MalformedAttributeRecord(_) => {
                AnalysisErrorKind::MalformedAttributeRecord
            }
        }
    }

    /// Message shown to the user: the error's own text, or the generic
    /// fallback when it has none.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Source of analysis results.
pub trait Analyzer: Send + Sync + 'static {
    /// Analyze one image.
    fn analyze(
        &self,
        image: &SourceImage,
    ) -> impl Future<Output = Result<AnalysisResult, AnalysisError>> + Send;
}

/// Wire form of a full analysis answer.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    config: Option<RawAttributeRecord>,
    blueprint: Option<String>,
}

/// Parse the model's JSON answer into an [`AnalysisResult`].
///
/// JSON that does not match the wire shape, or lacks `config` or `blueprint`,
/// is a schema violation. A `config` missing one of its required fields is a
/// malformed record.
pub fn parse_analysis_json(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let raw: RawAnalysis = serde_json::from_str(text).map_err(|e| {
        tracing::debug!(error = %e, "analysis payload does not parse");
        AnalysisError::SchemaViolation("Invalid response format from AI".to_string())
    })?;

    let config = raw.config.ok_or_else(|| {
        AnalysisError::SchemaViolation("Invalid response format from AI: missing 'config'".into())
    })?;
    let blueprint = raw.blueprint.ok_or_else(|| {
        AnalysisError::SchemaViolation(
            "Invalid response format from AI: missing 'blueprint'".into(),
        )
    })?;

    let config = AttributeRecord::try_from(config).map_err(RecordError::from)?;

    Ok(AnalysisResult {
        config,
        blueprint: Blueprint(blueprint),
    })
}
