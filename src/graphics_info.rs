//! The fixed-schema graphics info record and its C initializer mapping.
//!
//! A `GraphicsInfo` is parsed from the brace body of a
//! `const struct ObjectEventGraphicsInfo ... = { ... };` declaration and
//! serialized back as a fully positional initializer. Parsing accepts both
//! positional and designated (`.field = value`) elements, mixed freely;
//! serialization always normalizes to positional form, so comments and
//! designated-field naming do not survive a save.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::extract::{purge_braces, purge_whitespace};

/// Schema order of the initializer fields. Load-bearing: positional
/// elements map to this order, and serialization always emits it.
pub const FIELDS: [&str; 16] = [
    "tileTag",
    "paletteTag1",
    "paletteTag2",
    "size",
    "width",
    "height",
    "paletteSlot",
    "shadowSize",
    "inanimate",
    "disableReflectionPaletteLoad",
    "tracks",
    "oam",
    "subspriteTables",
    "anims",
    "images",
    "affineAnims",
];

/// One object event's rendering metadata.
///
/// Every field is kept as the literal C expression text. A field that was
/// never present stays `""`, meaning "unspecified" rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphicsInfo {
    pub tile_tag: String,
    pub palette_tag1: String,
    pub palette_tag2: String,
    pub size: String,
    pub width: String,
    pub height: String,
    pub palette_slot: String,
    pub shadow_size: String,
    pub inanimate: String,
    pub disable_reflection_palette_load: String,
    pub tracks: String,
    pub oam: String,
    pub subsprite_tables: String,
    pub anims: String,
    pub images: String,
    pub affine_anims: String,
}

impl GraphicsInfo {
    /// Parse the brace body of a graphics info initializer.
    ///
    /// `context` names the declaration being parsed and only appears in
    /// error messages.
    ///
    /// # Errors
    /// `Schema` when an element index exceeds the 16-field schema or a
    /// designated field name is not part of it.
    pub fn parse(body: &str, context: &str) -> Result<Self, EditorError> {
        let purged = purge_braces(&purge_whitespace(body));
        let mut elements: Vec<&str> = purged.split(',').collect();
        // A trailing comma leaves one empty element behind; drop it rather
        // than letting it consume the position past the schema end.
        if elements.last() == Some(&"") {
            elements.pop();
        }

        let mut info = GraphicsInfo::default();
        for (i, element) in elements.iter().enumerate() {
            if i >= FIELDS.len() {
                return Err(EditorError::Schema(format!(
                    "unidentified graphics info element at \"{}\", index={}",
                    context, i
                )));
            }
            if let Some((key, value)) = element.split_once('=') {
                let key = key.trim_start_matches('.');
                if !info.set_field(key, value) {
                    return Err(EditorError::Schema(format!(
                        "unknown graphics info field \"{}\" at \"{}\"",
                        key, context
                    )));
                }
            } else {
                info.set_field(FIELDS[i], element);
            }
        }
        Ok(info)
    }

    /// Serialize as a complete positional declaration for `symbol`.
    pub fn to_declaration(&self, symbol: &str) -> String {
        let values: Vec<&str> = FIELDS.iter().map(|key| self.field(key)).collect();
        format!(
            "const struct ObjectEventGraphicsInfo {} = {{{}}};",
            symbol,
            values.join(", ")
        )
    }

    /// Build the record a freshly created entry starts from.
    ///
    /// Tile tag, palette slot, shadow size, tracks and the animation
    /// references take the project's stock defaults; OAM and subsprite
    /// references are picked by sprite dimensions.
    pub fn generated(pic_table: &str, palette_tag: &str, width: u32, height: u32) -> Self {
        GraphicsInfo {
            tile_tag: "0xFFFF".to_string(),
            palette_tag1: palette_tag.to_string(),
            palette_tag2: "OBJ_EVENT_PAL_TAG_NONE".to_string(),
            size: ((width * height * 4) / 8).to_string(),
            width: width.to_string(),
            height: height.to_string(),
            palette_slot: "0".to_string(),
            shadow_size: "SHADOW_SIZE_M".to_string(),
            inanimate: "FALSE".to_string(),
            disable_reflection_palette_load: "FALSE".to_string(),
            tracks: "TRACKS_FOOT".to_string(),
            oam: format!("&gObjectEventBaseOam_{}x{}", width, height),
            subsprite_tables: format!("sOamTables_{}x{}", width, height),
            anims: "sAnimTable_Standard".to_string(),
            images: pic_table.to_string(),
            affine_anims: "gDummySpriteAffineAnimTable".to_string(),
        }
    }

    /// Look up a field by its schema name.
    pub fn field(&self, key: &str) -> &str {
        match key {
            "tileTag" => &self.tile_tag,
            "paletteTag1" => &self.palette_tag1,
            "paletteTag2" => &self.palette_tag2,
            "size" => &self.size,
            "width" => &self.width,
            "height" => &self.height,
            "paletteSlot" => &self.palette_slot,
            "shadowSize" => &self.shadow_size,
            "inanimate" => &self.inanimate,
            "disableReflectionPaletteLoad" => &self.disable_reflection_palette_load,
            "tracks" => &self.tracks,
            "oam" => &self.oam,
            "subspriteTables" => &self.subsprite_tables,
            "anims" => &self.anims,
            "images" => &self.images,
            "affineAnims" => &self.affine_anims,
            _ => "",
        }
    }

    /// Assign a field by its schema name. Returns false for names outside
    /// the schema.
    fn set_field(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "tileTag" => &mut self.tile_tag,
            "paletteTag1" => &mut self.palette_tag1,
            "paletteTag2" => &mut self.palette_tag2,
            "size" => &mut self.size,
            "width" => &mut self.width,
            "height" => &mut self.height,
            "paletteSlot" => &mut self.palette_slot,
            "shadowSize" => &mut self.shadow_size,
            "inanimate" => &mut self.inanimate,
            "disableReflectionPaletteLoad" => &mut self.disable_reflection_palette_load,
            "tracks" => &mut self.tracks,
            "oam" => &mut self.oam,
            "subspriteTables" => &mut self.subsprite_tables,
            "anims" => &mut self.anims,
            "images" => &mut self.images,
            "affineAnims" => &mut self.affine_anims,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITIONAL: &str = "0xFFFF, OBJ_EVENT_PAL_TAG_NPC, OBJ_EVENT_PAL_TAG_NONE, 512, 16, 32, 0, \
SHADOW_SIZE_M, FALSE, FALSE, TRACKS_FOOT, &gObjectEventBaseOam_16x32, sOamTables_16x32, \
sAnimTable_Standard, sPicTable_Npc, gDummySpriteAffineAnimTable";

    #[test]
    fn test_parse_positional() {
        let info = GraphicsInfo::parse(POSITIONAL, "gObjectEventGraphicsInfo_Npc").unwrap();
        assert_eq!(info.tile_tag, "0xFFFF");
        assert_eq!(info.palette_tag1, "OBJ_EVENT_PAL_TAG_NPC");
        assert_eq!(info.width, "16");
        assert_eq!(info.height, "32");
        assert_eq!(info.images, "sPicTable_Npc");
        assert_eq!(info.affine_anims, "gDummySpriteAffineAnimTable");
    }

    #[test]
    fn test_parse_designated() {
        let body = "\n    .tileTag = 0xFFFF,\n    .images = sPicTable_Npc,\n    .shadowSize = SHADOW_SIZE_S,\n";
        let info = GraphicsInfo::parse(body, "gObjectEventGraphicsInfo_Npc").unwrap();
        assert_eq!(info.tile_tag, "0xFFFF");
        assert_eq!(info.images, "sPicTable_Npc");
        assert_eq!(info.shadow_size, "SHADOW_SIZE_S");
        // fields never present stay unspecified, not zero
        assert_eq!(info.oam, "");
    }

    #[test]
    fn test_parse_mixed_styles() {
        let body = "0xFFFF, .width = 16, 0x1103";
        let info = GraphicsInfo::parse(body, "mixed").unwrap();
        assert_eq!(info.tile_tag, "0xFFFF");
        assert_eq!(info.width, "16");
        // positional elements keep their own index even after a designated one
        assert_eq!(info.palette_tag2, "0x1103");
    }

    #[test]
    fn test_parse_unknown_field_is_schema_error() {
        let err = GraphicsInfo::parse(".bogus = 1", "ctx").unwrap_err();
        assert!(matches!(err, EditorError::Schema(_)));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_parse_too_many_elements_is_schema_error() {
        let body = (0..17).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
        let err = GraphicsInfo::parse(&body, "ctx").unwrap_err();
        assert!(matches!(err, EditorError::Schema(_)));
    }

    #[test]
    fn test_parse_tolerates_trailing_comma() {
        let body = format!("{},", POSITIONAL);
        let info = GraphicsInfo::parse(&body, "ctx").unwrap();
        assert_eq!(info.affine_anims, "gDummySpriteAffineAnimTable");
    }

    #[test]
    fn test_round_trip_is_idempotent_after_normalization() {
        let info = GraphicsInfo::parse(POSITIONAL, "ctx").unwrap();
        let decl = info.to_declaration("gObjectEventGraphicsInfo_Npc");
        let body = decl
            .split_once('{')
            .map(|(_, rest)| rest.trim_end_matches("};"))
            .unwrap();
        let reparsed = GraphicsInfo::parse(body, "ctx").unwrap();
        assert_eq!(info, reparsed);
    }

    #[test]
    fn test_generated_defaults() {
        let info = GraphicsInfo::generated("sPicTable_TestNpc", "OBJ_EVENT_PAL_TEST_NPC", 32, 32);
        assert_eq!(info.tile_tag, "0xFFFF");
        assert_eq!(info.palette_tag2, "OBJ_EVENT_PAL_TAG_NONE");
        assert_eq!(info.size, "512");
        assert_eq!(info.shadow_size, "SHADOW_SIZE_M");
        assert_eq!(info.tracks, "TRACKS_FOOT");
        assert_eq!(info.oam, "&gObjectEventBaseOam_32x32");
        assert_eq!(info.images, "sPicTable_TestNpc");
    }

    #[test]
    fn test_declaration_emits_all_fields_positionally() {
        let info = GraphicsInfo::generated("sPicTable_Npc", "OBJ_EVENT_PAL_NPC", 16, 16);
        let decl = info.to_declaration("gObjectEventGraphicsInfo_Npc");
        assert!(decl.starts_with("const struct ObjectEventGraphicsInfo gObjectEventGraphicsInfo_Npc = {"));
        assert_eq!(decl.matches(", ").count(), 15);
        assert!(!decl.contains('.'));
    }
}
