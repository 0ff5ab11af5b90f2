//! Image frame table parsing and generation.
//!
//! A pic table is an ordered sequence of `SpriteFrameImage` initializer
//! macros, each one of two variants: `overworld_frame(ptr, w/8, h/8, index)`
//! for sized animation frames or `obj_frame_tiles(ptr)` for a plain tile
//! reference. Width and height appear in the source already divided by 8;
//! parsing keeps them as-is and only generation performs the division.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::extract::purge_whitespace;

/// Variant tag of a sized animation frame.
pub const OVERWORLD_FRAME: &str = "overworld_frame";
/// Variant tag of a plain tile reference.
pub const OBJ_FRAME_TILES: &str = "obj_frame_tiles";

/// One entry of an image frame table, in wire shape.
///
/// `width`, `height` and `frame` are only present for the
/// `overworld_frame` variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub ptr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

impl FrameRecord {
    /// Serialize back to the initializer macro text.
    ///
    /// # Errors
    /// `Parse` when an `overworld_frame` record is missing its sizing
    /// fields or the variant tag is unknown.
    pub fn to_entry(&self) -> Result<String, EditorError> {
        match self.kind.as_str() {
            OBJ_FRAME_TILES => Ok(format!("{}({})", OBJ_FRAME_TILES, self.ptr)),
            OVERWORLD_FRAME => {
                let (width, height, frame) = match (&self.width, &self.height, &self.frame) {
                    (Some(w), Some(h), Some(f)) => (w, h, f),
                    _ => {
                        return Err(EditorError::Parse(format!(
                            "overworld frame for {} is missing width/height/frame",
                            self.ptr
                        )))
                    }
                };
                Ok(format!(
                    "{}({}, {}, {}, {})",
                    OVERWORLD_FRAME, self.ptr, width, height, frame
                ))
            }
            other => Err(EditorError::Parse(format!(
                "{} is not a frame table entry variant",
                other
            ))),
        }
    }
}

/// Parse the brace body of a pic table declaration into frame records.
///
/// The body is whitespace-purged and split on `"),"` boundaries; every
/// chunk must match one of the two frame variants.
///
/// # Errors
/// `Parse` when a chunk matches neither variant.
pub fn parse_table(body: &str) -> Result<Vec<FrameRecord>, EditorError> {
    let re = Regex::new(
        r"(obj_frame_tiles)\((\w+)|(overworld_frame)\((\w+),\s*(\d+),\s*(\d+),\s*(\d+)",
    )
    .unwrap();

    purge_whitespace(body)
        .split("),")
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let caps = re.captures(chunk).ok_or_else(|| {
                EditorError::Parse(format!(
                    "{} is an invalid overworld frame or object frame tiles entry",
                    chunk
                ))
            })?;
            if caps.get(1).is_some() {
                Ok(FrameRecord {
                    kind: OBJ_FRAME_TILES.to_string(),
                    ptr: caps[2].to_string(),
                    width: None,
                    height: None,
                    frame: None,
                })
            } else {
                Ok(FrameRecord {
                    kind: OVERWORLD_FRAME.to_string(),
                    ptr: caps[4].to_string(),
                    width: Some(caps[5].to_string()),
                    height: Some(caps[6].to_string()),
                    frame: Some(caps[7].to_string()),
                })
            }
        })
        .collect()
}

/// Generate `count` sequential overworld frame entries for a pic symbol.
///
/// `width` and `height` are sprite dimensions in pixels; entries carry them
/// divided by 8, the way the build macros expect.
pub fn generate_frames(pic_symbol: &str, width: u32, height: u32, count: u32) -> String {
    (0..count)
        .map(|index| {
            format!(
                "{}({}, {}, {}, {})",
                OVERWORLD_FRAME,
                pic_symbol,
                width / 8,
                height / 8,
                index
            )
        })
        .collect::<Vec<_>>()
        .join(",\n\t")
}

/// Generate a whole pic table declaration with `count` overworld frames.
pub fn generate_table(
    table_symbol: &str,
    pic_symbol: &str,
    width: u32,
    height: u32,
    count: u32,
) -> String {
    format!(
        "\nstatic const struct SpriteFrameImage {}[] = {{\n\t{}\n}};\n",
        table_symbol,
        generate_frames(pic_symbol, width, height, count)
    )
}

/// Rebuild a pic table declaration from parsed or caller-supplied records.
///
/// Unlike [`generate_table`] this emits no surrounding blank lines; the
/// result replaces an existing declaration instead of being appended.
pub fn table_declaration(
    table_symbol: &str,
    records: &[FrameRecord],
) -> Result<String, EditorError> {
    let entries = records
        .iter()
        .map(FrameRecord::to_entry)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!(
        "static const struct SpriteFrameImage {}[] = {{\n\t{}\n}};",
        table_symbol,
        entries.join(",\n\t")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_then_parse_is_inverse() {
        let body = generate_frames("gObjectEventPic_TestNpc", 32, 32, 9);
        let records = parse_table(&body).unwrap();
        assert_eq!(records.len(), 9);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.kind, OVERWORLD_FRAME);
            assert_eq!(record.ptr, "gObjectEventPic_TestNpc");
            assert_eq!(record.width.as_deref(), Some("4"));
            assert_eq!(record.height.as_deref(), Some("4"));
            assert_eq!(record.frame.as_deref(), Some(i.to_string().as_str()));
        }
    }

    #[test]
    fn test_parse_obj_frame_tiles() {
        let records = parse_table("obj_frame_tiles(gObjectEventPic_LightSprite)").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, OBJ_FRAME_TILES);
        assert_eq!(records[0].ptr, "gObjectEventPic_LightSprite");
        assert_eq!(records[0].width, None);
    }

    #[test]
    fn test_parse_mixed_variants() {
        let body = "\n\toverworld_frame(gObjectEventPic_Npc, 2, 4, 0),\n\tobj_frame_tiles(gObjectEventPic_Npc)\n";
        let records = parse_table(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, OVERWORLD_FRAME);
        assert_eq!(records[1].kind, OBJ_FRAME_TILES);
    }

    #[test]
    fn test_parse_invalid_chunk_is_a_hard_error() {
        let err = parse_table("sideways_frame(gPic, 1, 2, 3)").unwrap_err();
        assert!(matches!(err, EditorError::Parse(_)));
    }

    #[test]
    fn test_width_and_height_are_not_re_divided() {
        // source text already carries w/8 and h/8
        let records = parse_table("overworld_frame(gPic, 4, 4, 0)").unwrap();
        assert_eq!(records[0].width.as_deref(), Some("4"));
    }

    #[test]
    fn test_generate_table_shape() {
        let table = generate_table("sPicTable_TestNpc", "gObjectEventPic_TestNpc", 16, 32, 2);
        assert!(table.contains("static const struct SpriteFrameImage sPicTable_TestNpc[] = {"));
        assert!(table.contains("overworld_frame(gObjectEventPic_TestNpc, 2, 4, 0)"));
        assert!(table.contains("overworld_frame(gObjectEventPic_TestNpc, 2, 4, 1)"));
        assert!(table.ends_with("};\n"));
    }

    #[test]
    fn test_entry_round_trip() {
        let body = "overworld_frame(gPic, 2, 4, 1),obj_frame_tiles(gOther)";
        let records = parse_table(body).unwrap();
        assert_eq!(records[0].to_entry().unwrap(), "overworld_frame(gPic, 2, 4, 1)");
        assert_eq!(records[1].to_entry().unwrap(), "obj_frame_tiles(gOther)");
    }
}
