//! Messages exchanged with the editor panel.
//!
//! The presentation layer is a thin form: it receives one `editEntry`
//! message carrying the parsed record plus display images, and posts back
//! `saveEntry` or `deleteEntry`. Field names and order mirror the form
//! bindings, so the camelCase spelling here is load-bearing.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::frames::FrameRecord;
use crate::graphics_info::GraphicsInfo;

/// Prefix of an inline PNG payload.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64, ";

/// One panel message, tagged by its `command` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelMessage {
    /// Outbound: populate the form with one entry.
    #[serde(rename_all = "camelCase")]
    EditEntry {
        name: String,
        data: GraphicsInfo,
        images: Vec<String>,
        image_tables: Vec<FrameRecord>,
    },
    /// Inbound: persist the edited record, optionally with frame edits.
    #[serde(rename_all = "camelCase")]
    SaveEntry {
        definition: String,
        data: GraphicsInfo,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frames: Option<Vec<FrameRecord>>,
    },
    /// Inbound: remove the entry's graphics data.
    #[serde(rename_all = "camelCase")]
    DeleteEntry { definition: String },
}

impl PanelMessage {
    /// Parse an inbound message from JSON.
    ///
    /// # Errors
    /// `Parse` when the payload is not a well-formed panel message.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json)
            .map_err(|e| EditorError::Parse(format!("invalid panel message: {}", e)))
    }

    /// Serialize for posting to the panel.
    pub fn to_json(&self) -> Result<String, EditorError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| EditorError::Parse(format!("unserializable panel message: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_entry_uses_camel_case_tags() {
        let message = PanelMessage::EditEntry {
            name: "TEST_NPC".to_string(),
            data: GraphicsInfo::default(),
            images: vec![format!("{}AAAA", DATA_URI_PREFIX)],
            image_tables: vec![],
        };
        let json = message.to_json().unwrap();
        assert!(json.contains("\"command\": \"editEntry\""));
        assert!(json.contains("\"imageTables\""));
        assert!(json.contains("\"disableReflectionPaletteLoad\""));
    }

    #[test]
    fn test_save_entry_round_trip() {
        let json = r#"{
            "command": "saveEntry",
            "definition": "OBJ_EVENT_GFX_TEST_NPC",
            "data": { "tileTag": "0xFFFF", "inanimate": "FALSE" }
        }"#;
        let message = PanelMessage::from_json(json).unwrap();
        match &message {
            PanelMessage::SaveEntry {
                definition,
                data,
                frames,
            } => {
                assert_eq!(definition, "OBJ_EVENT_GFX_TEST_NPC");
                assert_eq!(data.tile_tag, "0xFFFF");
                assert_eq!(data.width, "");
                assert!(frames.is_none());
            }
            _ => panic!("expected saveEntry"),
        }
    }

    #[test]
    fn test_delete_entry_parse() {
        let json = r#"{"command":"deleteEntry","definition":"OBJ_EVENT_GFX_NPC"}"#;
        let message = PanelMessage::from_json(json).unwrap();
        assert_eq!(
            message,
            PanelMessage::DeleteEntry {
                definition: "OBJ_EVENT_GFX_NPC".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_command_is_parse_error() {
        let err = PanelMessage::from_json(r#"{"command":"explodeEntry"}"#).unwrap_err();
        assert!(matches!(err, EditorError::Parse(_)));
    }
}
