//! JSON export of the current session
//!
//! Writes the attribute record and blueprint as `{ "config": ..., "blueprint": ... }`,
//! the same shape the analysis model returns.

use serde::Serialize;
use std::path::Path;
use vision3d_shared::{AttributeRecord, Blueprint};

use crate::session::ViewSession;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export: the session has no analysis result")]
    NoResult,

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    config: &'a AttributeRecord,
    blueprint: &'a Blueprint,
}

/// Serialize the session's record and blueprint as pretty JSON.
pub fn export_json(session: &ViewSession) -> Result<String, ExportError> {
    let result = session.result.as_ref().ok_or(ExportError::NoResult)?;
    let document = ExportDocument {
        config: &result.config,
        blueprint: &result.blueprint,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Write the export document to `path`.
pub fn write_export(path: &Path, session: &ViewSession) -> Result<(), ExportError> {
    let json = export_json(session)?;
    std::fs::write(path, json).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), "exported analysis");
    Ok(())
}

/// Default file name for a record: its name with anything outside
/// `[A-Za-z0-9_-]` replaced by `_`, plus `.json`.
pub fn export_file_name(record: &AttributeRecord) -> String {
    let stem: String = record
        .name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "character.json".to_string()
    } else {
        format!("{}.json", stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionId, ViewState};
    use vision3d_shared::{AnalysisResult, demo_record};

    fn viewing_session() -> ViewSession {
        ViewSession {
            id: SessionId(3),
            state: ViewState::Viewing,
            image: None,
            result: Some(AnalysisResult {
                config: demo_record(),
                blueprint: Blueprint("Start with a cylinder.".into()),
            }),
            error: None,
        }
    }

    #[test]
    fn export_has_config_and_blueprint() {
        let json = export_json(&viewing_session()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["config"]["name"], "Skeleton King Alpha");
        assert_eq!(value["config"]["primaryColor"], "#2d3436");
        assert_eq!(value["config"]["lighting"], "eerie");
        assert_eq!(value["blueprint"], "Start with a cylinder.");
    }

    #[test]
    fn export_reads_back_as_analysis_result() {
        let session = viewing_session();
        let json = export_json(&session).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(Some(&parsed), session.result.as_ref());
    }

    #[test]
    fn empty_session_has_nothing_to_export() {
        assert!(matches!(
            export_json(&ViewSession::default()),
            Err(ExportError::NoResult)
        ));
    }

    #[test]
    fn file_name_is_sanitized() {
        let mut record = demo_record();
        assert_eq!(export_file_name(&record), "Skeleton_King_Alpha.json");
        record.name = "../etc/passwd".into();
        assert_eq!(export_file_name(&record), "___etc_passwd.json");
        record.name = "  ".into();
        assert_eq!(export_file_name(&record), "character.json");
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_export(&path, &viewing_session()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Skeleton King Alpha"));
    }
}
