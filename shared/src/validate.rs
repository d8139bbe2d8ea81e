//! Semantic validation of attribute records
//!
//! A record that parsed against the response schema can still be unusable:
//! a blank name, a colour the model wrote as a word, an empty feature tag.
//! Generation only accepts a [`ValidRecord`], so these are caught here.

use crate::color::{HexColor, HexColorError};
use crate::record::{AttributeRecord, Lighting, Material, MissingField, RawAttributeRecord};

/// Why an attribute record was rejected before generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    MissingField(#[from] MissingField),

    #[error("attribute record has an empty name")]
    EmptyName,

    #[error("invalid {field}: {source}")]
    InvalidColor {
        field: &'static str,
        #[source]
        source: HexColorError,
    },

    #[error("feature tag {0} is blank")]
    BlankFeature(usize),
}

/// An attribute record whose colours have been parsed and whose required
/// fields are known to be meaningful.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidRecord {
    record: AttributeRecord,
    primary: HexColor,
    secondary: HexColor,
}

impl ValidRecord {
    pub fn record(&self) -> &AttributeRecord {
        &self.record
    }

    pub fn into_record(self) -> AttributeRecord {
        self.record
    }

    pub fn primary(&self) -> HexColor {
        self.primary
    }

    pub fn secondary(&self) -> HexColor {
        self.secondary
    }

    pub fn material(&self) -> Material {
        self.record.material
    }

    pub fn lighting(&self) -> Lighting {
        self.record.lighting
    }

    pub fn features(&self) -> &[String] {
        &self.record.features
    }
}

/// Validate a record, parsing its colours.
pub fn validate(record: &AttributeRecord) -> Result<ValidRecord, RecordError> {
    if record.name.trim().is_empty() {
        return Err(RecordError::EmptyName);
    }

    let primary = record
        .primary_color
        .parse::<HexColor>()
        .map_err(|source| RecordError::InvalidColor {
            field: "primaryColor",
            source,
        })?;
    let secondary = record
        .secondary_color
        .parse::<HexColor>()
        .map_err(|source| RecordError::InvalidColor {
            field: "secondaryColor",
            source,
        })?;

    if let Some(index) = record.features.iter().position(|f| f.trim().is_empty()) {
        return Err(RecordError::BlankFeature(index));
    }

    Ok(ValidRecord {
        record: record.clone(),
        primary,
        secondary,
    })
}

/// Convert a wire record and validate it in one step.
pub fn validate_raw(raw: RawAttributeRecord) -> Result<ValidRecord, RecordError> {
    let record = AttributeRecord::try_from(raw)?;
    validate(&record)
}
