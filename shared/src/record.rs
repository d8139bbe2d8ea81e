//! Attribute records returned by the analysis model
//!
//! An [`AttributeRecord`] is the structured part of an analysis: material,
//! palette, feature tags and lighting mood. It is immutable once received.
//! The wire form ([`RawAttributeRecord`]) tolerates missing fields so that a
//! missing field can be reported by name instead of as an opaque parse error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surface kind of the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Metallic,
    Matte,
    Glowing,
}

impl Material {
    pub const ALL: [Material; 3] = [Material::Metallic, Material::Matte, Material::Glowing];

    pub fn as_str(self) -> &'static str {
        match self {
            Material::Metallic => "metallic",
            Material::Matte => "matte",
            Material::Glowing => "glowing",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lighting mood.
///
/// Only `Eerie` changes the generated scene; `Dramatic` and `Soft` light
/// the figure identically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lighting {
    #[default]
    Dramatic,
    Soft,
    Eerie,
}

impl Lighting {
    pub const ALL: [Lighting; 3] = [Lighting::Dramatic, Lighting::Soft, Lighting::Eerie];

    pub fn as_str(self) -> &'static str {
        match self {
            Lighting::Dramatic => "dramatic",
            Lighting::Soft => "soft",
            Lighting::Eerie => "eerie",
        }
    }
}

impl fmt::Display for Lighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured description of a character's modeling attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAttributeRecord")]
pub struct AttributeRecord {
    pub name: String,
    pub material: Material,
    pub primary_color: String,
    pub secondary_color: String,
    pub description: String,
    pub complexity: String,
    pub features: Vec<String>,
    pub lighting: Lighting,
}

/// Free-form modeling guidance paired with an [`AttributeRecord`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blueprint(pub String);

impl Blueprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Blueprint {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A completed analysis: the attribute record and its blueprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub config: AttributeRecord,
    pub blueprint: Blueprint,
}

/// Wire form of an attribute record, every field optional.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttributeRecord {
    pub name: Option<String>,
    pub material: Option<Material>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub description: Option<String>,
    pub complexity: Option<String>,
    pub features: Option<Vec<String>>,
    pub lighting: Option<Lighting>,
}

/// A required field was absent from the wire payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attribute record is missing required field '{0}'")]
pub struct MissingField(pub &'static str);

impl TryFrom<RawAttributeRecord> for AttributeRecord {
    type Error = MissingField;

    fn try_from(raw: RawAttributeRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            name: raw.name.ok_or(MissingField("name"))?,
            material: raw.material.ok_or(MissingField("material"))?,
            primary_color: raw.primary_color.ok_or(MissingField("primaryColor"))?,
            secondary_color: raw.secondary_color.ok_or(MissingField("secondaryColor"))?,
            description: raw.description.ok_or(MissingField("description"))?,
            complexity: raw.complexity.unwrap_or_default(),
            features: raw.features.ok_or(MissingField("features"))?,
            lighting: raw.lighting.unwrap_or_default(),
        })
    }
}

impl AttributeRecord {
    /// True when any feature tag mentions spikes or armor, ignoring case.
    pub fn has_spiked_features(&self) -> bool {
        self.features.iter().any(|f| {
            let lower = f.to_lowercase();
            lower.contains("spike") || lower.contains("armor")
        })
    }

    /// Viewport overlay label for the preview mesh.
    pub fn mesh_label(&self) -> String {
        format!("{}.mesh", self.name)
    }

    /// One-line modeling tip built around the first feature tag.
    pub fn modeling_advice(&self) -> Option<String> {
        let first = self.features.first()?;
        Some(format!(
            "Prioritize the {} as a separate subtool to allow for dynamic vertex animation. \
             Use decimation master for the armor plates to retain sharp edges while \
             optimizing for real-time rendering.",
            first
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(extra: &str) -> String {
        format!(
            r##"{{
                "name": "Ashen Knight",
                "material": "matte",
                "primaryColor": "#333333",
                "secondaryColor": "#aa0000",
                "description": "A burnt husk of a knight.",
                "features": ["Cracked Helm"]{}
            }}"##,
            extra
        )
    }

    #[test]
    fn deserializes_full_record() {
        let json = record_json(r#", "complexity": "Medium", "lighting": "soft""#);
        let record: AttributeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.name, "Ashen Knight");
        assert_eq!(record.material, Material::Matte);
        assert_eq!(record.lighting, Lighting::Soft);
        assert_eq!(record.complexity, "Medium");
        assert_eq!(record.features, vec!["Cracked Helm".to_string()]);
    }

    #[test]
    fn optional_fields_default() {
        let record: AttributeRecord = serde_json::from_str(&record_json("")).unwrap();
        assert_eq!(record.complexity, "");
        assert_eq!(record.lighting, Lighting::Dramatic);
    }

    #[test]
    fn missing_required_field_is_named() {
        let raw: RawAttributeRecord = serde_json::from_str(
            r##"{"name": "x", "material": "metallic", "primaryColor": "#000",
                "secondaryColor": "#fff", "description": "d"}"##,
        )
        .unwrap();
        let err = AttributeRecord::try_from(raw).unwrap_err();
        assert_eq!(err, MissingField("features"));

        let err = serde_json::from_str::<AttributeRecord>(r#"{"material": "metallic"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let json = record_json(r#", "lighting": "neon""#);
        assert!(serde_json::from_str::<AttributeRecord>(&json).is_err());
    }

    #[test]
    fn serializes_camel_case() {
        let record: AttributeRecord = serde_json::from_str(&record_json("")).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["primaryColor"], "#333333");
        assert_eq!(value["secondaryColor"], "#aa0000");
        assert_eq!(value["material"], "matte");
    }

    #[test]
    fn spiked_feature_detection_is_case_insensitive() {
        let mut record: AttributeRecord = serde_json::from_str(&record_json("")).unwrap();
        assert!(!record.has_spiked_features());

        record.features = vec!["Bone Crown".into(), "SPIKED Pauldrons".into()];
        assert!(record.has_spiked_features());

        record.features = vec!["Plate ARMOR".into()];
        assert!(record.has_spiked_features());

        record.features.clear();
        assert!(!record.has_spiked_features());
    }

    #[test]
    fn advice_uses_first_feature() {
        let mut record: AttributeRecord = serde_json::from_str(&record_json("")).unwrap();
        let advice = record.modeling_advice().unwrap();
        assert!(advice.starts_with("Prioritize the Cracked Helm as a separate subtool"));

        record.features.clear();
        assert!(record.modeling_advice().is_none());
        assert_eq!(record.mesh_label(), "Ashen Knight.mesh");
    }
}
