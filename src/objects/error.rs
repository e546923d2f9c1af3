//! Error types for OBJ parsing.

use std::path::PathBuf;
use thiserror::Error;

pub type ObjResult<T> = Result<T, ObjError>;

/// Attribute sequence a face reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Texture,
    Normal,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::Texture => "texture coordinate",
            Attribute::Normal => "normal",
        };

        return f.write_str(name);
    }
}

/// A line could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid number: {token:?}")]
    InvalidNumber { token: String },

    #[error("invalid {attribute} index {index}: {len} available")]
    InvalidIndex {
        attribute: Attribute,
        index: i64,
        len: usize,
    },

    #[error("malformed vertex reference: {token:?}")]
    MalformedReference { token: String },

    #[error("'{directive}' expects {expected} components, got {got}")]
    ComponentCount {
        directive: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("face has no vertex references")]
    EmptyFace,

    #[error("face has {got} vertex references, at least 3 required")]
    TooFewVertices { got: usize },
}

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("line {line}, column {column}: {source}")]
    Format {
        line: usize,
        column: usize,
        #[source]
        source: FormatError,
    },

    #[error("line {line}: unsupported directive '{directive}'")]
    UnsupportedDirective { line: usize, directive: String },

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObjError {
    /// Line the error was reported on, if it came from decoding.
    pub fn line(&self) -> Option<usize> {
        return match self {
            ObjError::Format { line, .. } | ObjError::UnsupportedDirective { line, .. } => {
                Some(*line)
            }
            _ => None,
        };
    }

    pub fn format_error(&self) -> Option<&FormatError> {
        return match self {
            ObjError::Format { source, .. } => Some(source),
            _ => None,
        };
    }
}
