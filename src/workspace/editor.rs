//! Cross-file consistency editing for object event entries.
//!
//! Creating or deleting one logical entry touches up to six files: the
//! definition table, the graphics info header, the pointer table header,
//! the pic table header, the binary-include header and the spritesheet
//! rules. Every operation here stages its edits in per-file buffers and
//! writes nothing until all extraction and transform steps have succeeded,
//! which narrows (but does not eliminate) the window in which a failure
//! leaves the tree half-edited: a failing write still leaves the files
//! committed before it modified, with no rollback.

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use tracing::{debug, info};

use crate::config::{
    ProjectConfig, DEFINE_PREFIX, INFO_DECL_PREFIX, PAL_TAG_NONE, PAL_TAG_PREFIX,
    PIC_DECL_PREFIX, PIC_TABLE_DECL_PREFIX, POINTERS_ARRAY, POINTER_INSERT_MARKER,
    TOTAL_COUNT_DEFINE,
};
use crate::error::EditorError;
use crate::extract::{self, IncBin};
use crate::frames::{self, FrameRecord};
use crate::graphics_info::GraphicsInfo;
use crate::naming::SymbolSet;
use crate::workspace::files::Workspace;

/// Caller-supplied parameters for a new object event entry.
#[derive(Debug, Clone)]
pub struct CreateParams {
    /// Display name, e.g. "Test Npc". Every symbol derives from it.
    pub name: String,
    /// Sprite width in pixels, a multiple of 8.
    pub width: u32,
    /// Sprite height in pixels, a multiple of 8.
    pub height: u32,
    /// Number of overworld frames to generate.
    pub frame_count: u32,
    /// Existing palette tag to reuse; a fresh tag is allocated when empty.
    pub palette_tag: Option<String>,
}

/// What a successful create produced.
#[derive(Debug, Clone)]
pub struct CreatedObjectEvent {
    pub definition: String,
    pub id: String,
    pub palette_tag: String,
    pub symbols: SymbolSet,
}

/// The parse state of one entry, cached for the duration of an edit
/// session. The `*_matched` strings are the exact substrings located at
/// load time; save and delete splice against them literally, so a session
/// is only valid while the underlying files are unchanged.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub definition: String,
    /// Pointer expression from the array entry, e.g. `&gObjectEventGraphicsInfo_Npc`.
    pub pointer: String,
    /// The pointer with `&` stripped: the graphics info symbol.
    pub info_symbol: String,
    pub info: GraphicsInfo,
    pub info_matched: String,
    /// Forward declaration line in the pointer table header.
    pub pointer_decl: String,
    pub frames: Vec<FrameRecord>,
    pub pic_table_matched: String,
    /// Distinct INCBIN declarations referenced by the frame table.
    pub incbins: Vec<IncBin>,
}

/// In-memory file buffers keyed by workspace-relative path.
struct StagedBuffers<'a> {
    workspace: &'a Workspace,
    buffers: IndexMap<String, String>,
    dirty: IndexSet<String>,
}

impl<'a> StagedBuffers<'a> {
    fn new(workspace: &'a Workspace) -> Self {
        StagedBuffers {
            workspace,
            buffers: IndexMap::new(),
            dirty: IndexSet::new(),
        }
    }

    /// Current buffer contents, loading from disk on first access.
    fn text(&mut self, relative: &str) -> Result<String, EditorError> {
        if let Some(buffer) = self.buffers.get(relative) {
            return Ok(buffer.clone());
        }
        let text = self.workspace.read_text(relative)?;
        self.buffers.insert(relative.to_string(), text.clone());
        Ok(text)
    }

    fn set(&mut self, relative: &str, contents: String) {
        self.buffers.insert(relative.to_string(), contents);
        self.dirty.insert(relative.to_string());
    }

    /// Write every dirty buffer back, in first-touched order.
    fn commit(self) -> Result<(), EditorError> {
        for relative in &self.dirty {
            let buffer = &self.buffers[relative];
            self.workspace.write_text(relative, buffer)?;
            info!(file = relative.as_str(), "wrote workspace file");
        }
        Ok(())
    }
}

/// Resolve one definition into a full edit session.
///
/// Walks definition -> pointer array entry -> graphics info declaration ->
/// frame table -> distinct INCBIN declarations, keeping every matched
/// substring for later splicing.
///
/// # Errors
/// `NotFound` when any link of the chain is missing, `Duplicate` when the
/// graphics info declaration appears more than once.
pub fn load_session(workspace: &Workspace, definition: &str) -> Result<EditSession, EditorError> {
    let cfg = workspace.config();

    let pointers_text = workspace.read_text(&cfg.graphics_info_pointers_header)?;
    let pointer_array = extract::indexed_array(&pointers_text, POINTERS_ARRAY)
        .map_err(|e| e.in_file(&cfg.graphics_info_pointers_header))?;
    let entry = pointer_array
        .items
        .iter()
        .find(|item| item.index == definition)
        .ok_or_else(|| EditorError::not_found(definition, &cfg.graphics_info_pointers_header))?;
    let pointer = entry.value.clone();
    let info_symbol = pointer.trim_start_matches('&').to_string();

    let info_text = workspace.read_text(&cfg.graphics_info_header)?;
    let declaration = format!("{}{}", INFO_DECL_PREFIX, info_symbol);
    let found = extract::structs(&info_text, &declaration);
    let record = match found.as_slice() {
        [] => return Err(EditorError::not_found(&info_symbol, &cfg.graphics_info_header)),
        [one] => one,
        _ => return Err(EditorError::duplicate(&info_symbol, &cfg.graphics_info_header)),
    };
    let pointer_decl = format!("{};", declaration);
    let gfx_info = GraphicsInfo::parse(&record.value, &info_symbol)?;

    if gfx_info.images.is_empty() {
        return Err(EditorError::not_found(
            format!("{}.images", info_symbol),
            &cfg.graphics_info_header,
        ));
    }

    let pic_text = workspace.read_text(&cfg.pic_tables_header)?;
    let pic_table = extract::object_array(
        &pic_text,
        &format!("{}{}", PIC_TABLE_DECL_PREFIX, gfx_info.images),
    )
    .map_err(|e| e.in_file(&cfg.pic_tables_header))?;
    let frame_records = frames::parse_table(&pic_table.body)?;

    let graphics_text = workspace.read_text(&cfg.graphics_header)?;
    let distinct_ptrs: IndexSet<&str> =
        frame_records.iter().map(|f| f.ptr.as_str()).collect();
    let incbins = distinct_ptrs
        .iter()
        .map(|ptr| {
            extract::incbin(&graphics_text, &format!("{}{}", PIC_DECL_PREFIX, ptr))
                .map_err(|e| e.in_file(&cfg.graphics_header))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EditSession {
        definition: definition.to_string(),
        pointer,
        info_symbol,
        info: gfx_info,
        info_matched: record.matched.clone(),
        pointer_decl,
        frames: frame_records,
        pic_table_matched: pic_table.matched,
        incbins,
    })
}

/// Re-serialize a record positionally and splice it over the declaration
/// located at load time. When `frame_records` is given, the pic table
/// declaration is regenerated as well.
pub fn save(
    workspace: &Workspace,
    session: &EditSession,
    data: &GraphicsInfo,
    frame_records: Option<&[FrameRecord]>,
) -> Result<(), EditorError> {
    let cfg = workspace.config();
    let mut stage = StagedBuffers::new(workspace);

    let info_text = stage.text(&cfg.graphics_info_header)?;
    let declaration = data.to_declaration(&session.info_symbol);
    stage.set(
        &cfg.graphics_info_header,
        info_text.replacen(&session.info_matched, &declaration, 1),
    );

    if let Some(records) = frame_records {
        let table_symbol = if data.images.is_empty() {
            &session.info.images
        } else {
            &data.images
        };
        let table = frames::table_declaration(table_symbol, records)?;
        let pic_text = stage.text(&cfg.pic_tables_header)?;
        stage.set(
            &cfg.pic_tables_header,
            pic_text.replacen(&session.pic_table_matched, &table, 1),
        );
    }

    debug!(definition = session.definition.as_str(), "saving entry");
    stage.commit()
}

/// Blank out every declaration belonging to one entry.
///
/// Removes the graphics info, the pointer forward declaration and array
/// entry, the pic table, each distinct INCBIN and its spritesheet rule.
/// The definition `#define` and the total count stay untouched: deleting
/// graphics data never renumbers the remaining entries.
pub fn delete(workspace: &Workspace, session: &EditSession) -> Result<(), EditorError> {
    let cfg = workspace.config();
    let mut stage = StagedBuffers::new(workspace);

    let info_text = stage.text(&cfg.graphics_info_header)?;
    stage.set(
        &cfg.graphics_info_header,
        info_text.replacen(&session.info_matched, "", 1),
    );

    let pointers_text = stage.text(&cfg.graphics_info_pointers_header)?;
    let pointers_text = pointers_text.replacen(&session.pointer_decl, "", 1);
    let entry_re = Regex::new(&format!(
        r"\[{}\]\s*=\s*{},",
        regex::escape(&session.definition),
        regex::escape(&session.pointer)
    ))
    .unwrap();
    let pointers_text = entry_re.replace(&pointers_text, "").into_owned();
    stage.set(&cfg.graphics_info_pointers_header, pointers_text);

    let pic_text = stage.text(&cfg.pic_tables_header)?;
    stage.set(
        &cfg.pic_tables_header,
        pic_text.replacen(&session.pic_table_matched, "", 1),
    );

    let mut graphics_text = stage.text(&cfg.graphics_header)?;
    let mut rules_text = stage.text(&cfg.spritesheet_rules)?;
    for bin in &session.incbins {
        graphics_text = graphics_text.replacen(&bin.matched, "", 1);
        let rule = extract::make_rule(&rules_text, &bin.path)
            .map_err(|e| e.in_file(&cfg.spritesheet_rules))?;
        rules_text = rules_text.replacen(&rule.matched, "", 1);
    }
    stage.set(&cfg.graphics_header, graphics_text);
    stage.set(&cfg.spritesheet_rules, rules_text);

    debug!(definition = session.definition.as_str(), "deleting entry");
    stage.commit()
}

/// Create a complete new entry across every dependent file.
///
/// Allocates the next definition id from the total count (and bumps it),
/// generates the pic table, INCBIN pair and spritesheet rule, allocates a
/// palette tag when none was supplied, and wires the generated graphics
/// info into the pointer table header.
pub fn create(
    workspace: &Workspace,
    params: &CreateParams,
) -> Result<CreatedObjectEvent, EditorError> {
    if params.width == 0 || params.width % 8 != 0 || params.height == 0 || params.height % 8 != 0 {
        return Err(EditorError::Parse(format!(
            "sprite size {}x{} is not a multiple of 8",
            params.width, params.height
        )));
    }
    if params.frame_count == 0 {
        return Err(EditorError::Parse("frame count must be at least 1".to_string()));
    }

    let cfg = workspace.config();
    let symbols = SymbolSet::derive(&params.name);
    let mut stage = StagedBuffers::new(workspace);

    // Definition id allocation: the new id is the current total count.
    let event_objects = stage.text(&cfg.event_objects_header)?;
    let all_defines = extract::defines(&event_objects, "");
    let total = all_defines
        .iter()
        .find(|d| d.symbol == TOTAL_COUNT_DEFINE)
        .ok_or_else(|| EditorError::not_found(TOTAL_COUNT_DEFINE, &cfg.event_objects_header))?;
    let new_id = total.value.trim().to_string();
    let next_total = new_id
        .parse::<u32>()
        .map_err(|_| {
            EditorError::Parse(format!(
                "{} value \"{}\" is not numeric",
                TOTAL_COUNT_DEFINE, new_id
            ))
        })?
        + 1;

    let last_definition = all_defines
        .iter()
        .filter(|d| {
            d.symbol.contains(DEFINE_PREFIX)
                && d.symbol != TOTAL_COUNT_DEFINE
                && !d.value.contains("OBJ_EVENT_GFX_VARS")
                && !d.value.contains(TOTAL_COUNT_DEFINE)
        })
        .next_back()
        .ok_or_else(|| {
            EditorError::not_found(format!("{}*", DEFINE_PREFIX), &cfg.event_objects_header)
        })?;

    let mut event_objects = event_objects.replacen(
        &last_definition.matched,
        &format!(
            "{}\n#define {}\t\t{}",
            last_definition.matched, symbols.definition, new_id
        ),
        1,
    );
    let total_re = Regex::new(&format!(
        r"#define\s+{}\s+{}",
        TOTAL_COUNT_DEFINE,
        regex::escape(&new_id)
    ))
    .unwrap();
    let bumped_total = format!("#define {}\t\t{}", TOTAL_COUNT_DEFINE, next_total);
    event_objects = total_re
        .replace(&event_objects, bumped_total.as_str())
        .into_owned();
    stage.set(&cfg.event_objects_header, event_objects);
    debug!(
        definition = symbols.definition.as_str(),
        id = new_id.as_str(),
        "allocated definition id"
    );

    // Pic table with generated overworld frames.
    let pic_text = stage.text(&cfg.pic_tables_header)?;
    let table = frames::generate_table(
        &symbols.pic_table,
        &symbols.pic,
        params.width,
        params.height,
        params.frame_count,
    );
    stage.set(&cfg.pic_tables_header, format!("{}{}", pic_text, table));

    // INCBIN pair for pixel and palette data.
    let graphics_text = stage.text(&cfg.graphics_header)?;
    let pic_incbin = format!(
        "{}{}[] = INCBIN_U32(\"{}\");",
        PIC_DECL_PREFIX, symbols.pic, symbols.pic_path
    );
    let palette_incbin = format!(
        "const u16 {}[] = INCBIN_U16(\"{}\");",
        symbols.palette, symbols.palette_path
    );
    stage.set(
        &cfg.graphics_header,
        format!("{}{}\n{}\n", graphics_text, pic_incbin, palette_incbin),
    );

    // Spritesheet rule.
    let rules_text = stage.text(&cfg.spritesheet_rules)?;
    let rule = format!(
        "{}: %.4bpp: %.png\n\t$(GFX) $< $@ -mwidth {} -mheight {}",
        symbols.mk_path,
        params.width / 8,
        params.height / 8
    );
    stage.set(&cfg.spritesheet_rules, format!("{}\n{}\n", rules_text, rule));

    // Palette tag: reuse the supplied one or allocate the next free id.
    let palette_tag = match params.palette_tag.as_deref() {
        Some(tag) if !tag.is_empty() => tag.to_string(),
        _ => allocate_palette_tag(&mut stage, &cfg, &symbols)?,
    };

    // Graphics info record with stock defaults.
    let info = GraphicsInfo::generated(&symbols.pic_table, &palette_tag, params.width, params.height);
    let info_text = stage.text(&cfg.graphics_info_header)?;
    stage.set(
        &cfg.graphics_info_header,
        format!(
            "{}{}\n",
            info_text,
            info.to_declaration(&symbols.graphics_info)
        ),
    );

    // Pointer table: forward declaration kept against the marker comment,
    // then the definition-indexed array entry.
    let pointers_text = stage.text(&cfg.graphics_info_pointers_header)?;
    let forward_decl = format!("{}{};", INFO_DECL_PREFIX, symbols.graphics_info);
    let anchor_re = Regex::new(&format!(
        r"(const struct ObjectEventGraphicsInfo [^;]*;\n)\n({})?",
        regex::escape(POINTER_INSERT_MARKER)
    ))
    .unwrap();
    let caps = anchor_re.captures(&pointers_text).ok_or_else(|| {
        EditorError::not_found("ObjectEventGraphicsInfo forward declarations", &cfg.graphics_info_pointers_header)
    })?;
    let anchor = caps[1].to_string();
    // Keep the blank line ahead of the marker intact so the anchor keeps
    // matching on the next insertion.
    let marker = if caps.get(2).is_some() {
        "\n".to_string()
    } else {
        format!("\n\n{}\n", POINTER_INSERT_MARKER)
    };
    let mut pointers_text = pointers_text.replacen(
        &anchor,
        &format!("{}{}{}", anchor, forward_decl, marker),
        1,
    );

    let array_re = Regex::new(&format!(
        r"const struct ObjectEventGraphicsInfo \*const {}\[{}\] = \{{[^}}]*",
        POINTERS_ARRAY, TOTAL_COUNT_DEFINE
    ))
    .unwrap();
    let array_head = array_re
        .find(&pointers_text)
        .ok_or_else(|| {
            EditorError::not_found(POINTERS_ARRAY, &cfg.graphics_info_pointers_header)
        })?
        .as_str()
        .to_string();
    let array_entry = format!("\t[{}] =\t&{},", symbols.definition, symbols.graphics_info);
    pointers_text = pointers_text.replacen(
        &array_head,
        &format!("{}{}\n", array_head, array_entry),
        1,
    );
    stage.set(&cfg.graphics_info_pointers_header, pointers_text);

    stage.commit()?;
    info!(
        definition = symbols.definition.as_str(),
        id = new_id.as_str(),
        "created object event entry"
    );

    Ok(CreatedObjectEvent {
        definition: symbols.definition.clone(),
        id: new_id,
        palette_tag,
        symbols,
    })
}

/// Allocate the next palette tag id and register the palette.
///
/// The new id is one past the highest allocated tag; the sentinel "no
/// palette tag" id is relocated above every allocated id whenever the new
/// tag would reach it, and its value is mirrored into the field effects
/// source. The palette/tag pair is registered ahead of the
/// `{NULL, 0x0000}` terminator of the palette load table.
fn allocate_palette_tag(
    stage: &mut StagedBuffers<'_>,
    cfg: &ProjectConfig,
    symbols: &SymbolSet,
) -> Result<String, EditorError> {
    let movement_text = stage.text(&cfg.object_movement_source)?;
    let tags = extract::defines(&movement_text, PAL_TAG_PREFIX);

    let sentinel = tags
        .iter()
        .find(|d| d.symbol == PAL_TAG_NONE)
        .ok_or_else(|| EditorError::not_found(PAL_TAG_NONE, &cfg.object_movement_source))?;
    let mut sentinel_id = parse_hex(&sentinel.value).ok_or_else(|| {
        EditorError::Parse(format!(
            "{} value \"{}\" is not hexadecimal",
            PAL_TAG_NONE, sentinel.value
        ))
    })?;

    let highest = tags
        .iter()
        .filter(|d| d.symbol != PAL_TAG_NONE)
        .filter_map(|d| parse_hex(&d.value))
        .max()
        .ok_or_else(|| {
            EditorError::not_found(format!("{}*", PAL_TAG_PREFIX), &cfg.object_movement_source)
        })?;
    let new_id = highest + 1;
    if new_id >= sentinel_id {
        sentinel_id = new_id + 1;
    }

    let mut movement_text = movement_text.replacen(
        &sentinel.matched,
        &format!(
            "#define {}\t0x{:X}\n#define {}\t0x{:X}",
            symbols.palette_tag, new_id, PAL_TAG_NONE, sentinel_id
        ),
        1,
    );

    let terminator_re = Regex::new(r"\s*\{NULL,\s*0x0000\},").unwrap();
    let terminator = terminator_re
        .find(&movement_text)
        .ok_or_else(|| EditorError::not_found("{NULL, 0x0000}", &cfg.object_movement_source))?
        .as_str()
        .to_string();
    let registration = format!("\n\t{{{},\t{}}},{}", symbols.palette, symbols.palette_tag, terminator);
    movement_text = movement_text.replacen(&terminator, &registration, 1);
    stage.set(&cfg.object_movement_source, movement_text);

    let effects_text = stage.text(&cfg.field_effects_source)?;
    let sentinel_re = Regex::new(&format!(r"(#define {}\s+0x)(\w+)", PAL_TAG_NONE)).unwrap();
    if sentinel_re.is_match(&effects_text) {
        let updated = sentinel_re
            .replace(&effects_text, |caps: &regex::Captures<'_>| {
                format!("{}{:X}", &caps[1], sentinel_id)
            })
            .into_owned();
        stage.set(&cfg.field_effects_source, updated);
    } else {
        debug!(
            file = cfg.field_effects_source.as_str(),
            "palette sentinel not present, skipping mirror"
        );
    }

    debug!(tag = symbols.palette_tag.as_str(), id = new_id, "allocated palette tag");
    Ok(symbols.palette_tag.clone())
}

fn parse_hex(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))?;
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0x1103"), Some(0x1103));
        assert_eq!(parse_hex(" 0x11FF "), Some(0x11FF));
        assert_eq!(parse_hex("4423"), None);
        assert_eq!(parse_hex("0xZZ"), None);
    }

    #[test]
    fn test_create_rejects_unaligned_size() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(dir.path());
        let err = create(
            &ws,
            &CreateParams {
                name: "Test Npc".to_string(),
                width: 20,
                height: 32,
                frame_count: 9,
                palette_tag: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, EditorError::Parse(_)));
    }
}
