//! Project layout configuration.
//!
//! Names the relative paths of every file the editor touches inside a
//! decompilation workspace. The defaults match the pokeemerald tree; forks
//! with a different layout supply a YAML file instead.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Prefix of every object event graphics definition symbol.
pub const DEFINE_PREFIX: &str = "OBJ_EVENT_GFX_";
/// The sibling definition holding the total graphics count.
pub const TOTAL_COUNT_DEFINE: &str = "NUM_OBJ_EVENT_GFX";
/// Name of the graphics info pointer array.
pub const POINTERS_ARRAY: &str = "gObjectEventGraphicsInfoPointers";
/// Type-and-keyword prefix of a graphics info declaration.
pub const INFO_DECL_PREFIX: &str = "const struct ObjectEventGraphicsInfo ";
/// Type-and-keyword prefix of a pic table declaration.
pub const PIC_TABLE_DECL_PREFIX: &str = "static const struct SpriteFrameImage ";
/// Type prefix of a pixel-data INCBIN declaration.
pub const PIC_DECL_PREFIX: &str = "const u32 ";
/// Prefix of palette tag definitions in the movement source.
pub const PAL_TAG_PREFIX: &str = "OBJ_EVENT_PAL_";
/// The sentinel "no palette tag" definition.
pub const PAL_TAG_NONE: &str = "OBJ_EVENT_PAL_TAG_NONE";
/// Marker comment kept in the pointers header as an insertion anchor.
pub const POINTER_INSERT_MARKER: &str =
    "// Decomp Overworld helper: Please don't remove line break at this area for overworld insertion!";

/// Relative paths of the workspace files the editor reads and rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Definition table (`#define OBJ_EVENT_GFX_* id` plus the total count).
    pub event_objects_header: String,
    /// Graphics info struct declarations.
    pub graphics_info_header: String,
    /// Forward declarations plus the definition-indexed pointer array.
    pub graphics_info_pointers_header: String,
    /// Pic table (`SpriteFrameImage`) declarations.
    pub pic_tables_header: String,
    /// INCBIN declarations for pixel and palette data.
    pub graphics_header: String,
    /// Spritesheet build rules.
    pub spritesheet_rules: String,
    /// Palette tag definitions and the palette load table.
    pub object_movement_source: String,
    /// Second holder of the palette sentinel value.
    pub field_effects_source: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            event_objects_header: "include/constants/event_objects.h".to_string(),
            graphics_info_header: "src/data/object_events/object_event_graphics_info.h"
                .to_string(),
            graphics_info_pointers_header:
                "src/data/object_events/object_event_graphics_info_pointers.h".to_string(),
            pic_tables_header: "src/data/object_events/object_event_pic_tables.h".to_string(),
            graphics_header: "src/data/object_events/object_event_graphics.h".to_string(),
            spritesheet_rules: "spritesheet_rules.mk".to_string(),
            object_movement_source: "src/event_object_movement.c".to_string(),
            field_effects_source: "src/field_effect_helpers.c".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Load a layout config from a YAML file.
    ///
    /// Missing keys fall back to the pokeemerald defaults.
    ///
    /// # Errors
    /// `Io` when the file cannot be read, `Parse` on invalid YAML.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| EditorError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&contents).map_err(|e| {
            EditorError::Parse(format!("invalid layout config {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pokeemerald_layout() {
        let config = ProjectConfig::default();
        assert_eq!(config.event_objects_header, "include/constants/event_objects.h");
        assert_eq!(config.spritesheet_rules, "spritesheet_rules.mk");
        assert!(config.graphics_info_header.starts_with("src/data/object_events/"));
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let config: ProjectConfig =
            serde_yaml::from_str("spritesheet_rules: rules/spritesheets.mk\n").unwrap();
        assert_eq!(config.spritesheet_rules, "rules/spritesheets.mk");
        assert_eq!(config.event_objects_header, "include/constants/event_objects.h");
    }
}
