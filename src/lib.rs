//! # owhelper: Object Event Graphics Metadata Editor
//!
//! owhelper maintains the "object event" graphics metadata of a Pokémon
//! decompilation project by parsing and surgically rewriting the C headers
//! and makefile rules that describe overworld sprites, while leaving every
//! other byte of those files untouched.
//!
//! ## Features
//!
//! - **Pattern extraction**: anchored regex extractors for `#define`
//!   tables, indexed pointer arrays, struct initializers, `INCBIN`
//!   statements and spritesheet make rules
//! - **Fixed-schema record mapping**: graphics info initializers parsed
//!   positionally or by designated fields and normalized back to
//!   positional form on save
//! - **Cross-file consistency**: creating or deleting one entry updates
//!   the definition table, pointer table, pic table, binary includes and
//!   build rules together, staged in memory and committed at the end
//! - **Panel wire format**: serde records matching the editor form's
//!   `editEntry`/`saveEntry`/`deleteEntry` messages
//!
//! ## Example: loading one entry
//!
//! ```ignore
//! use owhelper::{ObjectEvent, Workspace};
//!
//! let workspace = Workspace::open("/path/to/pokeemerald");
//! let mut event = ObjectEvent::new("OBJ_EVENT_GFX_BRENDAN_NORMAL", "0");
//! let message = event.load(&workspace, true)?;
//! println!("{}", message.to_json()?);
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod extract;
pub mod frames;
pub mod graphics_info;
pub mod naming;
pub mod object_event;
pub mod wire;
pub mod workspace;

// Re-export key types
pub use config::ProjectConfig;
pub use error::EditorError;
pub use frames::FrameRecord;
pub use graphics_info::GraphicsInfo;
pub use naming::SymbolSet;
pub use object_event::{definitions, shadow_sizes, tracks, DefinitionList, ObjectEvent};
pub use wire::PanelMessage;
pub use workspace::{CreateParams, CreatedObjectEvent, EditSession, Workspace};
