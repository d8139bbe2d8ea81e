//! Response schema sent to the analysis model
//!
//! The model is asked to answer with JSON matching this schema. Field names,
//! enums and the required list mirror [`AttributeRecord`](crate::AttributeRecord).

use serde_json::{Value, json};

use crate::record::{Lighting, Material};

/// Fields the model must always return inside `config`.
pub const REQUIRED_CONFIG_FIELDS: [&str; 6] = [
    "name",
    "material",
    "primaryColor",
    "secondaryColor",
    "description",
    "features",
];

/// Build the machine-checkable output schema.
pub fn response_schema() -> Value {
    let materials: Vec<&str> = Material::ALL.iter().map(|m| m.as_str()).collect();
    let lighting: Vec<&str> = Lighting::ALL.iter().map(|l| l.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "config": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "material": { "type": "STRING", "enum": materials },
                    "primaryColor": { "type": "STRING", "description": "Hex color" },
                    "secondaryColor": { "type": "STRING", "description": "Hex color" },
                    "description": { "type": "STRING" },
                    "complexity": { "type": "STRING" },
                    "features": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "lighting": { "type": "STRING", "enum": lighting }
                },
                "required": REQUIRED_CONFIG_FIELDS
            },
            "blueprint": { "type": "STRING" }
        },
        "required": ["config", "blueprint"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_enums_and_required_fields() {
        let schema = response_schema();
        let config = &schema["properties"]["config"];
        assert_eq!(
            config["properties"]["material"]["enum"],
            json!(["metallic", "matte", "glowing"])
        );
        assert_eq!(
            config["properties"]["lighting"]["enum"],
            json!(["dramatic", "soft", "eerie"])
        );
        assert_eq!(config["required"].as_array().unwrap().len(), 6);
        assert_eq!(schema["required"], json!(["config", "blueprint"]));
    }

    #[test]
    fn every_required_field_has_a_property() {
        let schema = response_schema();
        let props = &schema["properties"]["config"]["properties"];
        for field in REQUIRED_CONFIG_FIELDS {
            assert!(props.get(field).is_some(), "missing property {}", field);
        }
    }
}
