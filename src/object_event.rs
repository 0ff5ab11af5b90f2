//! The addressable object event entity.
//!
//! An [`ObjectEvent`] binds one definition symbol to its lazily resolved
//! graphics info, frame table and image data, and exposes the load, save,
//! delete and create operations the presentation layer sees. Parse results
//! are cached for the duration of one edit session and invalidated by any
//! write.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::config::{DEFINE_PREFIX, TOTAL_COUNT_DEFINE};
use crate::error::EditorError;
use crate::extract;
use crate::frames::FrameRecord;
use crate::graphics_info::GraphicsInfo;
use crate::wire::{PanelMessage, DATA_URI_PREFIX};
use crate::workspace::editor::{self, CreateParams, CreatedObjectEvent, EditSession};
use crate::workspace::files::Workspace;

/// One object event definition and its cached edit session.
#[derive(Debug, Clone)]
pub struct ObjectEvent {
    /// Definition symbol, e.g. `OBJ_EVENT_GFX_TEST_NPC`.
    pub definition: String,
    /// The definition's integer id, kept as source text.
    pub id: String,
    session: Option<EditSession>,
}

/// Every definition in the workspace plus the total count value.
#[derive(Debug, Clone)]
pub struct DefinitionList {
    pub entries: Vec<ObjectEvent>,
    pub total: String,
}

impl ObjectEvent {
    pub fn new(definition: impl Into<String>, id: impl Into<String>) -> Self {
        ObjectEvent {
            definition: definition.into(),
            id: id.into(),
            session: None,
        }
    }

    /// Human-facing label: the definition with its shared prefix stripped.
    pub fn display_name(&self) -> &str {
        self.definition
            .strip_prefix(DEFINE_PREFIX)
            .unwrap_or(&self.definition)
    }

    /// Cached session from the last successful load, if still valid.
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Resolve this entry across the workspace and build the outbound
    /// `editEntry` message.
    ///
    /// With `include_images` the referenced image files are read (with the
    /// `.4bpp` extension swapped for `.png`) and encoded as base64 data
    /// URIs for display.
    pub fn load(
        &mut self,
        workspace: &Workspace,
        include_images: bool,
    ) -> Result<PanelMessage, EditorError> {
        let session = editor::load_session(workspace, &self.definition)?;
        let images = if include_images {
            session
                .incbins
                .iter()
                .map(|bin| {
                    let image_path = bin.path.replace(".4bpp", ".png");
                    let bytes = workspace.read_bytes(&image_path)?;
                    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(bytes)))
                })
                .collect::<Result<Vec<_>, EditorError>>()?
        } else {
            Vec::new()
        };

        let message = PanelMessage::EditEntry {
            name: self.display_name().to_string(),
            data: session.info.clone(),
            images,
            image_tables: session.frames.clone(),
        };
        self.session = Some(session);
        Ok(message)
    }

    /// Persist an edited record, replacing the declaration located by a
    /// fresh parse. Any cached session is invalidated.
    pub fn save(
        &mut self,
        workspace: &Workspace,
        data: &GraphicsInfo,
        frames: Option<&[FrameRecord]>,
    ) -> Result<(), EditorError> {
        let session = editor::load_session(workspace, &self.definition)?;
        editor::save(workspace, &session, data, frames)?;
        self.session = None;
        Ok(())
    }

    /// Remove this entry's graphics data from every dependent file. The
    /// definition itself is kept so sibling ids never shift.
    pub fn delete(&mut self, workspace: &Workspace) -> Result<(), EditorError> {
        let session = editor::load_session(workspace, &self.definition)?;
        editor::delete(workspace, &session)?;
        self.session = None;
        Ok(())
    }

    /// Create a brand new entry and return its facade.
    pub fn create(
        workspace: &Workspace,
        params: &CreateParams,
    ) -> Result<(Self, CreatedObjectEvent), EditorError> {
        let created = editor::create(workspace, params)?;
        Ok((
            ObjectEvent::new(created.definition.clone(), created.id.clone()),
            created,
        ))
    }
}

/// List every object event definition in file order.
///
/// Aliases of the variable-gfx block and the total count itself are
/// filtered out, matching what the navigation tree shows.
///
/// # Errors
/// `NotFound` when the total count definition is missing.
pub fn definitions(workspace: &Workspace) -> Result<DefinitionList, EditorError> {
    let cfg = workspace.config();
    let text = workspace.read_text(&cfg.event_objects_header)?;
    let all = extract::defines(&text, "");

    let total = all
        .iter()
        .find(|d| d.symbol == TOTAL_COUNT_DEFINE)
        .ok_or_else(|| EditorError::not_found(TOTAL_COUNT_DEFINE, &cfg.event_objects_header))?
        .value
        .clone();

    let entries = all
        .iter()
        .filter(|d| {
            d.symbol.contains(DEFINE_PREFIX)
                && d.symbol != TOTAL_COUNT_DEFINE
                && !d.value.contains("OBJ_EVENT_GFX_VARS")
                && !d.value.contains(TOTAL_COUNT_DEFINE)
        })
        .map(|d| ObjectEvent::new(d.symbol.clone(), d.value.clone()))
        .collect();

    Ok(DefinitionList { entries, total })
}

/// Shadow size options offered by the editor form.
pub fn shadow_sizes(workspace: &Workspace) -> Result<Vec<String>, EditorError> {
    prefixed_symbols(workspace, "SHADOW_SIZE_")
}

/// Track style options offered by the editor form.
pub fn tracks(workspace: &Workspace) -> Result<Vec<String>, EditorError> {
    prefixed_symbols(workspace, "TRACKS_")
}

fn prefixed_symbols(workspace: &Workspace, prefix: &str) -> Result<Vec<String>, EditorError> {
    let cfg = workspace.config();
    let text = workspace.read_text(&cfg.event_objects_header)?;
    Ok(extract::defines(&text, prefix)
        .into_iter()
        .map(|d| d.symbol)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_prefix() {
        let event = ObjectEvent::new("OBJ_EVENT_GFX_TEST_NPC", "5");
        assert_eq!(event.display_name(), "TEST_NPC");
    }

    #[test]
    fn test_display_name_leaves_foreign_symbols_alone() {
        let event = ObjectEvent::new("SOMETHING_ELSE", "1");
        assert_eq!(event.display_name(), "SOMETHING_ELSE");
    }
}
