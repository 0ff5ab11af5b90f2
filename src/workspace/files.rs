//! Rooted file access for a decompilation workspace.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::error::EditorError;

/// A decompilation project tree plus the layout describing where the
/// object event files live inside it.
///
/// All paths handed to the accessors are relative to the root. Writing is
/// restricted to files that already exist: the editor rewrites project
/// files, it never creates them.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: ProjectConfig,
}

impl Workspace {
    /// Open a workspace with the stock pokeemerald layout.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, ProjectConfig::default())
    }

    /// Open a workspace with a custom layout.
    pub fn with_config(root: impl Into<PathBuf>, config: ProjectConfig) -> Self {
        Workspace {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Absolute path of a workspace-relative file.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Read a workspace file as text.
    pub fn read_text(&self, relative: &str) -> Result<String, EditorError> {
        let path = self.resolve(relative);
        fs::read_to_string(&path).map_err(|e| EditorError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Read a workspace file as raw bytes (image assets).
    pub fn read_bytes(&self, relative: &str) -> Result<Vec<u8>, EditorError> {
        let path = self.resolve(relative);
        fs::read(&path).map_err(|e| EditorError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Overwrite an existing workspace file.
    ///
    /// # Errors
    /// `Io` when the target does not already exist or the write fails.
    pub fn write_text(&self, relative: &str, contents: &str) -> Result<(), EditorError> {
        let path = self.resolve(relative);
        if !path.exists() {
            return Err(EditorError::Io {
                path: path.display().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "file does not exist"),
            });
        }
        fs::write(&path, contents).map_err(|e| EditorError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_and_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("file.h"), "#define A 1\n").unwrap();

        let ws = Workspace::open(dir.path());
        assert_eq!(ws.read_text("file.h").unwrap(), "#define A 1\n");

        ws.write_text("file.h", "#define A 2\n").unwrap();
        assert_eq!(ws.read_text("file.h").unwrap(), "#define A 2\n");
    }

    #[test]
    fn test_write_refuses_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(dir.path());
        let err = ws.write_text("missing.h", "x").unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }

    #[test]
    fn test_read_error_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(dir.path());
        let err = ws.read_text("nope/nothing.h").unwrap_err();
        assert!(err.to_string().contains("nothing.h"));
    }
}
