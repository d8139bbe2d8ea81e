//! Shared types for the Vision3D character previewer.
//!
//! - [`AttributeRecord`] / [`Blueprint`] / [`AnalysisResult`] - what the analysis model returns
//! - [`HexColor`] - parsed palette colours
//! - [`validate`] - the boundary between a parsed record and one fit for generation
//! - [`response_schema`] - the JSON schema the model is asked to follow

pub mod color;
pub mod constants;
pub mod record;
pub mod schema;
pub mod validate;

pub use color::{HexColor, HexColorError};
pub use constants::{DEFAULT_MODEL, FALLBACK_ERROR_MESSAGE, demo_record};
pub use record::{
    AnalysisResult, AttributeRecord, Blueprint, Lighting, Material, MissingField,
    RawAttributeRecord,
};
pub use schema::response_schema;
pub use validate::{RecordError, ValidRecord, validate, validate_raw};
