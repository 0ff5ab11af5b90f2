//! Workspace access and multi-file editing.

pub mod editor;
pub mod files;

pub use editor::{CreateParams, CreatedObjectEvent, EditSession};
pub use files::Workspace;
