//! Symbol and path derivation for new object event entries.
//!
//! Every generated declaration hangs off one human-supplied display name
//! ("Test Npc"). The conventions mirror the decomp projects themselves:
//! SCREAMING_SNAKE for constants, snake_case for asset paths, PascalCase
//! for symbol infixes.

use convert_case::{Case, Casing};

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    s.to_case(Case::Snake)
}

/// Convert a string to PascalCase
pub fn to_pascal_case(s: &str) -> String {
    s.to_case(Case::Pascal)
}

/// Convert a string to SCREAMING_SNAKE_CASE
pub fn to_screaming_snake_case(s: &str) -> String {
    s.to_case(Case::ScreamingSnake)
}

/// The full set of symbols and paths derived from one display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    /// `OBJ_EVENT_GFX_TEST_NPC`
    pub definition: String,
    /// `sPicTable_TestNpc`
    pub pic_table: String,
    /// `gObjectEventPic_TestNpc`
    pub pic: String,
    /// `gObjectEventPalette_TestNpc`
    pub palette: String,
    /// `gObjectEventGraphicsInfo_TestNpc`
    pub graphics_info: String,
    /// `OBJ_EVENT_PAL_TEST_NPC`
    pub palette_tag: String,
    /// `graphics/object_events/pics/people/test_npc.4bpp`
    pub pic_path: String,
    /// `graphics/object_events/pics/people/test_npc.gbapal`
    pub palette_path: String,
    /// `$(OBJEVENTGFXDIR)/people/test_npc.4bpp`
    pub mk_path: String,
}

impl SymbolSet {
    /// Derive every symbol and path from a display name.
    pub fn derive(name: &str) -> Self {
        let upper_snake = to_screaming_snake_case(name);
        let lower_snake = to_snake_case(name);
        let pascal = to_pascal_case(name);

        SymbolSet {
            definition: format!("OBJ_EVENT_GFX_{}", upper_snake),
            pic_table: format!("sPicTable_{}", pascal),
            pic: format!("gObjectEventPic_{}", pascal),
            palette: format!("gObjectEventPalette_{}", pascal),
            graphics_info: format!("gObjectEventGraphicsInfo_{}", pascal),
            palette_tag: format!("OBJ_EVENT_PAL_{}", upper_snake),
            pic_path: format!("graphics/object_events/pics/people/{}.4bpp", lower_snake),
            palette_path: format!("graphics/object_events/pics/people/{}.gbapal", lower_snake),
            mk_path: format!("$(OBJEVENTGFXDIR)/people/{}.4bpp", lower_snake),
        }
    }
}
