//! Centralized constants for Vision3D.
//!
//! Single-source-of-truth values shared by the analysis client, the
//! generator and the command line front-end.

use crate::record::{AttributeRecord, Lighting, Material};

/// Model used for image analysis.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Generative Language API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Shown when an analysis failure carries no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred during analysis.";

/// Instruction sent alongside the uploaded image.
pub const ANALYSIS_PROMPT: &str = "Analyze this character image and provide a technical \
    3D modeling blueprint. Output the result as a JSON object matching the requested schema. \
    Include details about the materials, colors, and specific geometry features. \
    The 'blueprint' field should be a long-form markdown description of how to model this \
    in ZBrush or Blender.";

/// Built-in record used for offline previews.
pub fn demo_record() -> AttributeRecord {
    AttributeRecord {
        name: "Skeleton King Alpha".to_string(),
        material: Material::Metallic,
        primary_color: "#2d3436".to_string(),
        secondary_color: "#636e72".to_string(),
        description:
            "A dark lord clad in jagged obsidian armor, bearing a crown of bone and steel."
                .to_string(),
        complexity: "Extremely High (2.4M Polygons)".to_string(),
        features: vec![
            "Tattered Cape".to_string(),
            "Soul-lit Eyes".to_string(),
            "Spiked Pauldrons".to_string(),
            "Bone Crown".to_string(),
        ],
        lighting: Lighting::Eerie,
    }
}

/// Blueprint paired with [`demo_record`].
pub const DEMO_BLUEPRINT: &str = "## Skeleton King Alpha\n\n\
1. Block out the torso as a tapered hexagonal cylinder and the skull as a subdivided octahedron.\n\
2. Sculpt the pauldron spikes as a separate subtool, radially arrayed around the shoulder line.\n\
3. Model the cape as a single plane, then cloth-simulate and bake.\n\
4. Metallic PBR: metalness 0.9, roughness 0.2, charcoal base with steel-grey trim.\n";
