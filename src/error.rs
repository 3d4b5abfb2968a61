//! Error types for codec, import, and pipeline failures.
//!
//! This module provides:
//! - `CodecError`: Errors raised by codec readers and writers
//! - `ImportError`: Errors raised during recursive import resolution
//! - `FileError`: A single per-file pipeline error with stage and target context
//! - `BatchError`: A collection of per-file errors for a whole batch

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed error used for transform failures and error sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Line-level context attached to parse failures in line-oriented formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineContext {
    /// 0-based index of the offending line
    pub index: usize,
    /// Raw text of the offending line
    pub raw: String,
}

/// Stage where a per-file pipeline error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Error while opening the input or output stream
    Open,
    Parse,
    Transform,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Open => write!(f, "Open"),
            Stage::Parse => write!(f, "Parse"),
            Stage::Transform => write!(f, "Transform"),
            Stage::Write => write!(f, "Write"),
        }
    }
}

/// Errors that can occur inside a codec reader or writer.
#[derive(Debug, Error)]
pub enum CodecError {
    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed structured content; line-oriented formats attach the
    /// offending line.
    #[error("parse error: {source}")]
    Parse {
        line: Option<LineContext>,
        source: BoxError,
    },

    /// Serialization failure while writing a payload
    #[error("serialize error: {0}")]
    Serialize(#[source] BoxError),

    /// Operation not supported for the payload or locator at hand
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl CodecError {
    /// Wrap a deserialization failure without line context.
    pub fn parse(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        CodecError::Parse {
            line: None,
            source: Box::new(source),
        }
    }

    /// Wrap a deserialization failure attributed to a single input line.
    pub fn parse_line(
        index: usize,
        raw: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CodecError::Parse {
            line: Some(LineContext {
                index,
                raw: raw.into(),
            }),
            source: Box::new(source),
        }
    }

    /// Line context carried by this error, if any.
    pub fn line(&self) -> Option<&LineContext> {
        match self {
            CodecError::Parse { line, .. } => line.as_ref(),
            _ => None,
        }
    }
}

/// Errors raised while resolving imports.
///
/// Read failures propagate the underlying I/O error unchanged; the resolver
/// does not re-frame them.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The import chain re-entered a resource it is already expanding.
    #[error("import cycle detected at {}", path.display())]
    Cycle { path: PathBuf },
}

/// A single per-file pipeline error.
#[derive(Debug)]
pub struct FileError {
    /// Stage where the error occurred
    pub stage: Stage,
    /// Friendly name of the locator being processed
    pub target: String,
    /// Line context when the failure is attributable to one input line
    pub line: Option<LineContext>,
    /// The underlying error
    pub error: BoxError,
}

impl FileError {
    /// Create a file error from any boxable source.
    pub fn new(stage: Stage, target: impl Into<String>, error: impl Into<BoxError>) -> Self {
        Self {
            stage,
            target: target.into(),
            line: None,
            error: error.into(),
        }
    }

    /// Create a file error from a codec error, lifting its line context.
    pub fn from_codec(stage: Stage, target: impl Into<String>, error: CodecError) -> Self {
        let line = error.line().cloned();
        Self {
            stage,
            target: target.into(),
            line,
            error: Box::new(error),
        }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.target, self.error)?;
        if let Some(line) = &self.line {
            write!(f, " (line {})", line.index)?;
        }
        Ok(())
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

/// An aggregate of per-file errors for a batch run.
#[derive(Debug, Error)]
pub struct BatchError {
    /// Collection of individual errors
    pub errors: Vec<FileError>,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "batch encountered {} error(s):", self.errors.len())?;
        for (i, e) in self.errors.iter().enumerate() {
            writeln!(f, "  #{}: {}", i + 1, e)?;
        }
        Ok(())
    }
}

impl BatchError {
    /// Create a batch error holding a single file error.
    pub fn single(error: FileError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl From<FileError> for BatchError {
    fn from(error: FileError) -> Self {
        Self::single(error)
    }
}
