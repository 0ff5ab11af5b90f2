//! Text-pattern extraction over C and makefile sources.
//!
//! Every extractor here is a single anchored regex over the whole file text
//! rather than a tokenizing parser. The host files are large, loosely
//! structured C/Make sources where only small substrings matter, and the
//! matched substring itself becomes the unit of replacement later on. The
//! trade-off: patterns do not understand nested braces or brace characters
//! inside string literals, so extraction is limited to the flat,
//! append-mostly declarations these files actually contain.
//!
//! Symbol anchors always sit on word boundaries, so a symbol that is a
//! substring of another symbol never false-positives.

use regex::Regex;

use crate::error::EditorError;

/// One `#define SYMBOL value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    /// The defined symbol.
    pub symbol: String,
    /// Everything after the symbol up to the end of the line.
    pub value: String,
    /// The exact matched line, reusable for literal replacement.
    pub matched: String,
}

/// One `[KEY] = VALUE` entry inside an indexed array initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayEntry {
    pub index: String,
    pub value: String,
}

/// A whole indexed array declaration plus its parsed entries.
#[derive(Debug, Clone)]
pub struct IndexedArray {
    pub matched: String,
    pub items: Vec<ArrayEntry>,
}

/// A whole `decl[size] = { body };` array declaration.
#[derive(Debug, Clone)]
pub struct ObjectArray {
    pub matched: String,
    pub body: String,
    /// The bracketed size expression, empty when the declaration omits it.
    pub size_spec: String,
}

/// One `decl = { value };` struct initializer occurrence.
#[derive(Debug, Clone)]
pub struct StructMatch {
    pub matched: String,
    pub value: String,
}

/// A `decl[] = INCBIN_U32("path");` binary include.
#[derive(Debug, Clone)]
pub struct IncBin {
    pub matched: String,
    pub path: String,
}

/// A two-line spritesheet make rule.
#[derive(Debug, Clone)]
pub struct MakeRule {
    pub matched: String,
    pub out_ext: String,
    pub in_ext: String,
    pub width: String,
    pub height: String,
}

/// Strip every ASCII whitespace character, newlines included.
pub fn purge_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Strip curly braces.
pub fn purge_braces(s: &str) -> String {
    s.replace(['{', '}'], "")
}

/// Find all `#define` lines, optionally restricted to a symbol prefix.
///
/// Returns entries in file order. Duplicate symbols are all retained; an
/// empty result is valid (absence is not an error at this level).
pub fn defines(text: &str, prefix: &str) -> Vec<Define> {
    let pattern = format!(r"#define\s+({}\w+)[^\S\n]+(.+)", regex::escape(prefix));
    let re = Regex::new(&pattern).unwrap();
    re.captures_iter(text)
        .map(|caps| Define {
            symbol: caps[1].to_string(),
            value: caps[2].to_string(),
            matched: caps[0].to_string(),
        })
        .collect()
}

/// Locate a single array declaration by name and parse its `[KEY] = VALUE`
/// entries.
///
/// Whitespace inside the braces is insignificant. Entry order follows the
/// declaration.
///
/// # Errors
/// `NotFound` when no declaration of that name exists in the text.
pub fn indexed_array(text: &str, name: &str) -> Result<IndexedArray, EditorError> {
    let pattern = format!(
        r"\b{}\b\s*(\[[^\]]*\])?\s*=\s*\{{([^;]*)\}};",
        regex::escape(name)
    );
    let re = Regex::new(&pattern).unwrap();
    let caps = re
        .captures(text)
        .ok_or_else(|| EditorError::not_found(name, ""))?;
    let matched = caps[0].to_string();

    // Entries are scanned inside the braces only, so a bracketed size
    // expression in the declaration head is never mistaken for an entry.
    let entry_re = Regex::new(r"\[([A-Za-z0-9_]*)\]\s*=\s*(&?[A-Za-z0-9_]*)").unwrap();
    let purged = caps[2].replace(' ', "");
    let items = entry_re
        .captures_iter(&purged)
        .map(|c| ArrayEntry {
            index: c[1].to_string(),
            value: c[2].to_string(),
        })
        .collect();

    Ok(IndexedArray { matched, items })
}

/// Locate a single `decl[size] = { body };` declaration.
///
/// `declaration` carries the full type-and-name prefix (for example
/// `static const struct SpriteFrameImage sPicTable_TestNpc`) so that
/// same-named arrays of different element types never collide.
///
/// # Errors
/// `NotFound` when the declaration is absent.
pub fn object_array(text: &str, declaration: &str) -> Result<ObjectArray, EditorError> {
    let pattern = format!(
        r"\b{}\b\s*(\[[^\]]*\])?\s*=\s*\{{([^;]*)\}};",
        regex::escape(declaration)
    );
    let re = Regex::new(&pattern).unwrap();
    let caps = re
        .captures(text)
        .ok_or_else(|| EditorError::not_found(declaration, ""))?;
    Ok(ObjectArray {
        matched: caps[0].to_string(),
        body: caps[2].to_string(),
        size_spec: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
    })
}

/// Find every `decl = { value };` occurrence of a struct initializer.
///
/// Returns all matches; the zero/one/many policy belongs to the caller,
/// which raises `NotFound` or `Duplicate` when exactly one was expected.
pub fn structs(text: &str, declaration: &str) -> Vec<StructMatch> {
    let pattern = format!(r"{}\s*=\s*\{{([^}}]*)\}};", regex::escape(declaration));
    let re = Regex::new(&pattern).unwrap();
    re.captures_iter(text)
        .map(|caps| StructMatch {
            matched: caps[0].to_string(),
            value: caps[1].to_string(),
        })
        .collect()
}

/// Locate a `decl[] = INCBIN_<U|S><bits>("path");` statement and extract
/// the quoted path.
///
/// # Errors
/// `NotFound` when the declaration is absent.
pub fn incbin(text: &str, declaration: &str) -> Result<IncBin, EditorError> {
    let pattern = format!(
        r#"\b{}\b\s*\[?\s*\]?\s*=\s*INCBIN_[US][0-9][0-9]?\(\s*"([^"]*)"\s*\);"#,
        regex::escape(declaration)
    );
    let re = Regex::new(&pattern).unwrap();
    let caps = re
        .captures(text)
        .ok_or_else(|| EditorError::not_found(declaration, ""))?;
    Ok(IncBin {
        matched: caps[0].to_string(),
        path: caps[1].to_string(),
    })
}

/// Locate the two-line spritesheet rule for an image path.
///
/// The rule head uses the `$(OBJEVENTGFXDIR)` make variable where INCBIN
/// paths spell out `graphics/object_events/pics`, so the path is mapped
/// before matching. The second line is the `$(GFX)` invocation carrying the
/// `-mwidth`/`-mheight` conversion parameters.
///
/// # Errors
/// `NotFound` when no rule exists for the path.
pub fn make_rule(text: &str, image_path: &str) -> Result<MakeRule, EditorError> {
    let mk_path = image_path.replace("graphics/object_events/pics", "$(OBJEVENTGFXDIR)");
    let pattern = format!(
        r"{}[^:]*:\s*%\.(\w+):\s*%\.(\w+)\n\s*\$\(GFX\)\s*\$<\s*\$@\s*-mwidth\s*(\d+)\s*-mheight\s*(\d+)",
        regex::escape(&mk_path)
    );
    let re = Regex::new(&pattern).unwrap();
    let caps = re
        .captures(text)
        .ok_or_else(|| EditorError::not_found(&mk_path, ""))?;
    Ok(MakeRule {
        matched: caps[0].to_string(),
        out_ext: caps[1].to_string(),
        in_ext: caps[2].to_string(),
        width: caps[3].to_string(),
        height: caps[4].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defines_with_prefix_in_file_order() {
        let text = "#define SHADOW_SIZE_S 0\n#define SHADOW_SIZE_M 1\n#define SHADOW_SIZE_L 2";
        let found = defines(text, "SHADOW_SIZE_");
        let symbols: Vec<_> = found.iter().map(|d| d.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["SHADOW_SIZE_S", "SHADOW_SIZE_M", "SHADOW_SIZE_L"]);
        assert_eq!(found[1].value, "1");
        assert_eq!(found[0].matched, "#define SHADOW_SIZE_S 0");
    }

    #[test]
    fn test_defines_without_prefix_returns_everything() {
        let text = "#define OBJ_EVENT_GFX_NPC 5\n#define NUM_OBJ_EVENT_GFX 6\n";
        let found = defines(text, "");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].symbol, "OBJ_EVENT_GFX_NPC");
        assert_eq!(found[1].value, "6");
    }

    #[test]
    fn test_defines_empty_is_valid() {
        assert!(defines("int main(void) { return 0; }", "SHADOW_").is_empty());
    }

    #[test]
    fn test_defines_keeps_duplicates() {
        let text = "#define A 1\n#define A 2\n";
        let found = defines(text, "");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value, "1");
        assert_eq!(found[1].value, "2");
    }

    #[test]
    fn test_indexed_array_entries() {
        let text = "\
const struct ObjectEventGraphicsInfo *const gObjectEventGraphicsInfoPointers[NUM_OBJ_EVENT_GFX] = {
    [OBJ_EVENT_GFX_NPC_1] = &gObjectEventGraphicsInfo_Npc1,
    [OBJ_EVENT_GFX_NPC_2] = &gObjectEventGraphicsInfo_Npc2,
};
";
        let arr = indexed_array(text, "gObjectEventGraphicsInfoPointers").unwrap();
        assert_eq!(arr.items.len(), 2);
        assert_eq!(arr.items[0].index, "OBJ_EVENT_GFX_NPC_1");
        assert_eq!(arr.items[0].value, "&gObjectEventGraphicsInfo_Npc1");
        assert!(arr.matched.ends_with("};"));
    }

    #[test]
    fn test_indexed_array_missing_is_not_found() {
        let err = indexed_array("int x;", "gObjectEventGraphicsInfoPointers").unwrap_err();
        assert!(matches!(err, EditorError::NotFound { .. }));
    }

    #[test]
    fn test_object_array_disambiguates_by_declaration_prefix() {
        let text = "\
static const struct SpriteFrameImage sPicTable_Npc[] = {
    overworld_frame(gObjectEventPic_Npc, 2, 4, 0),
};
static const union AnimCmd sPicTable_Other[] = {
    ANIMCMD_FRAME(0, 8),
};
";
        let arr = object_array(text, "static const struct SpriteFrameImage sPicTable_Npc").unwrap();
        assert!(arr.body.contains("overworld_frame"));
        assert!(!arr.body.contains("ANIMCMD_FRAME"));
        assert_eq!(arr.size_spec, "[]");
    }

    #[test]
    fn test_object_array_absent_name_raises_not_found() {
        let text = "static const struct SpriteFrameImage sPicTable_Npc[] = { x };";
        let err = object_array(text, "static const struct SpriteFrameImage sPicTable_Missing");
        assert!(matches!(err, Err(EditorError::NotFound { .. })));
    }

    #[test]
    fn test_object_array_symbol_substring_does_not_false_positive() {
        let text = "static const struct SpriteFrameImage sPicTable_NpcTall[] = { y };";
        let err = object_array(text, "static const struct SpriteFrameImage sPicTable_Npc");
        assert!(err.is_err());
    }

    #[test]
    fn test_structs_returns_every_occurrence() {
        let text = "\
const struct ObjectEventGraphicsInfo gObjectEventGraphicsInfo_Npc = {0xFFFF, 0x1103};
const struct ObjectEventGraphicsInfo gObjectEventGraphicsInfo_Npc = {0x0000, 0x1104};
";
        let found = structs(text, "const struct ObjectEventGraphicsInfo gObjectEventGraphicsInfo_Npc");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value, "0xFFFF, 0x1103");
    }

    #[test]
    fn test_incbin_extracts_quoted_path() {
        let text = r#"const u32 gObjectEventPic_Npc[] = INCBIN_U32("graphics/object_events/pics/people/npc.4bpp");"#;
        let bin = incbin(text, "const u32 gObjectEventPic_Npc").unwrap();
        assert_eq!(bin.path, "graphics/object_events/pics/people/npc.4bpp");
        assert_eq!(bin.matched, text);
    }

    #[test]
    fn test_incbin_u16_palette() {
        let text = r#"const u16 gObjectEventPalette_Npc[] = INCBIN_U16("graphics/object_events/palettes/npc.gbapal");"#;
        let bin = incbin(text, "const u16 gObjectEventPalette_Npc").unwrap();
        assert_eq!(bin.path, "graphics/object_events/palettes/npc.gbapal");
    }

    #[test]
    fn test_make_rule_maps_gfx_dir_variable() {
        let text = "\
$(OBJEVENTGFXDIR)/people/npc.4bpp: %.4bpp: %.png
\t$(GFX) $< $@ -mwidth 4 -mheight 4
";
        let rule = make_rule(text, "graphics/object_events/pics/people/npc.4bpp").unwrap();
        assert_eq!(rule.out_ext, "4bpp");
        assert_eq!(rule.in_ext, "png");
        assert_eq!(rule.width, "4");
        assert_eq!(rule.height, "4");
    }

    #[test]
    fn test_purge_helpers() {
        assert_eq!(purge_whitespace(" a\n\tb c "), "abc");
        assert_eq!(purge_braces("{a, {b}}"), "a, b");
    }
}
