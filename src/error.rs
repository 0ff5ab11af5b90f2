//! Error types for workspace parsing and editing.

use std::fmt;
use std::io;

/// Error type for all extraction, mapping and editing operations.
///
/// Every variant names enough context (symbol and file) that a failed
/// multi-file operation can be reported to the user in one message.
#[derive(Debug)]
pub enum EditorError {
    /// An expected declaration is absent from a file.
    NotFound { symbol: String, file: String },
    /// A declaration that must be unique appears more than once.
    Duplicate { symbol: String, file: String },
    /// A field name or position falls outside the fixed record schema.
    Schema(String),
    /// A substring does not match the expected grammar.
    Parse(String),
    /// A path is inaccessible or a read/write failed.
    Io { path: String, source: io::Error },
}

impl EditorError {
    /// Shorthand for a missing declaration.
    pub fn not_found(symbol: impl Into<String>, file: impl Into<String>) -> Self {
        EditorError::NotFound {
            symbol: symbol.into(),
            file: file.into(),
        }
    }

    /// Shorthand for a declaration that appeared more than once.
    pub fn duplicate(symbol: impl Into<String>, file: impl Into<String>) -> Self {
        EditorError::Duplicate {
            symbol: symbol.into(),
            file: file.into(),
        }
    }

    /// Fill in the file context on an error raised by a file-agnostic
    /// extractor. Errors that already carry a file are left untouched.
    pub fn in_file(self, file: &str) -> Self {
        match self {
            EditorError::NotFound { symbol, file: f } if f.is_empty() => {
                EditorError::not_found(symbol, file)
            }
            EditorError::Duplicate { symbol, file: f } if f.is_empty() => {
                EditorError::duplicate(symbol, file)
            }
            other => other,
        }
    }
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::NotFound { symbol, file } => {
                write!(f, "{} not found in {}", symbol, file)
            }
            EditorError::Duplicate { symbol, file } => {
                write!(f, "Duplicate {} found in {}", symbol, file)
            }
            EditorError::Schema(msg) => write!(f, "Schema error: {}", msg),
            EditorError::Parse(msg) => write!(f, "Parse error: {}", msg),
            EditorError::Io { path, source } => {
                write!(f, "\"{}\" is not accessible: {}", path, source)
            }
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for EditorError {
    fn from(err: io::Error) -> Self {
        EditorError::Io {
            path: String::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_symbol_and_file() {
        let err = EditorError::not_found("gObjectEventGraphicsInfoPointers", "pointers.h");
        let msg = err.to_string();
        assert!(msg.contains("gObjectEventGraphicsInfoPointers"));
        assert!(msg.contains("pointers.h"));
    }

    #[test]
    fn test_duplicate_is_distinct_from_not_found() {
        let dup = EditorError::duplicate("sPicTable_Foo", "pic_tables.h");
        assert!(matches!(dup, EditorError::Duplicate { .. }));
        assert!(dup.to_string().starts_with("Duplicate"));
    }
}
