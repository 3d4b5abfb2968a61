//! Pluggable format codecs and the registry that resolves them.
//!
//! This module provides:
//! - `Payload`: Closed set of data variants moved through the pipeline
//! - `Reader` / `Writer`: Format-tagged codec halves
//! - `CodecRegistry`: Name-to-codec maps with silent default fallback
//! - Builtin codecs for `json`, `jsonlines`, `yaml`/`yml`, and `none`

use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

use crate::error::CodecError;

mod json;
mod jsonlines;
mod none;
mod yaml;

/// Data payload moved through the pipeline.
///
/// Codecs and transforms work over this closed set of variants instead of an
/// open dynamic value, so each side can state which shapes it accepts and
/// produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A single JSON document
    Json(serde_json::Value),
    /// Newline-delimited JSON values
    JsonLines(Vec<serde_json::Value>),
    /// A single YAML document
    Yaml(serde_yaml::Value),
    /// Raw text
    Text(String),
    /// Nothing to write; produced by transforms that swallow their output
    Suppressed,
}

impl Payload {
    /// View any writable variant as a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value, CodecError> {
        match self {
            Payload::Json(value) => Ok(value.clone()),
            Payload::JsonLines(values) => Ok(serde_json::Value::Array(values.clone())),
            Payload::Yaml(value) => {
                serde_json::to_value(value).map_err(|e| CodecError::Serialize(Box::new(e)))
            }
            Payload::Text(text) => Ok(serde_json::Value::String(text.clone())),
            Payload::Suppressed => Err(CodecError::Unsupported(
                "suppressed payload has no JSON form".into(),
            )),
        }
    }

    /// View any writable variant as a YAML value.
    pub fn to_yaml(&self) -> Result<serde_yaml::Value, CodecError> {
        match self {
            Payload::Yaml(value) => Ok(value.clone()),
            Payload::Json(value) => {
                serde_yaml::to_value(value).map_err(|e| CodecError::Serialize(Box::new(e)))
            }
            Payload::JsonLines(values) => {
                serde_yaml::to_value(values).map_err(|e| CodecError::Serialize(Box::new(e)))
            }
            Payload::Text(text) => Ok(serde_yaml::Value::String(text.clone())),
            Payload::Suppressed => Err(CodecError::Unsupported(
                "suppressed payload has no YAML form".into(),
            )),
        }
    }
}

type ReadFn = dyn Fn(&mut dyn Read) -> Result<Payload, CodecError> + Send + Sync;
type WriteFn = dyn Fn(&Payload, &mut dyn Write) -> Result<(), CodecError> + Send + Sync;

/// The read half of a codec, tagged with its format name.
#[derive(Clone)]
pub struct Reader {
    format: String,
    read: Arc<ReadFn>,
}

impl Reader {
    /// Create a reader for a format name.
    pub fn new(
        format: impl Into<String>,
        read: impl Fn(&mut dyn Read) -> Result<Payload, CodecError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            format: format.into(),
            read: Arc::new(read),
        }
    }

    /// Format name this reader is tagged with.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Read one payload from the source stream.
    pub fn read(&self, source: &mut dyn Read) -> Result<Payload, CodecError> {
        (self.read.as_ref())(source)
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader").field("format", &self.format).finish()
    }
}

/// The write half of a codec: format name, optional extension override, and
/// a suppression marker for sink-less formats.
#[derive(Clone)]
pub struct Writer {
    format: String,
    extension: Option<String>,
    suppressed: bool,
    write: Arc<WriteFn>,
}

impl Writer {
    /// Create a writer for a format name.
    pub fn new(
        format: impl Into<String>,
        write: impl Fn(&Payload, &mut dyn Write) -> Result<(), CodecError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            format: format.into(),
            extension: None,
            suppressed: false,
            write: Arc::new(write),
        }
    }

    /// Create a write-suppressing writer: never opens or writes its target.
    pub fn suppressing(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            extension: None,
            suppressed: true,
            write: Arc::new(|_, _| Ok(())),
        }
    }

    /// Override the extension used when deriving output paths.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Format name this writer is tagged with.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Explicit extension override, if any.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Whether this writer suppresses output entirely.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Extension used for derived output paths: the explicit override, or
    /// `.` + the format name.
    pub fn output_extension(&self) -> String {
        self.extension
            .clone()
            .unwrap_or_else(|| format!(".{}", self.format))
    }

    /// Write a payload to the sink stream.
    pub fn write(&self, payload: &Payload, sink: &mut dyn Write) -> Result<(), CodecError> {
        (self.write.as_ref())(payload, sink)
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("format", &self.format)
            .field("extension", &self.extension)
            .field("suppressed", &self.suppressed)
            .finish()
    }
}

/// Registry mapping format names to codec halves.
///
/// Unknown names resolve to the default codec instead of raising an error;
/// the silent fallback is policy, not a failure. The registry is expected to
/// be configured once before any run begins.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    readers: HashMap<String, Reader>,
    writers: HashMap<String, Writer>,
    default_reader: Reader,
    default_writer: Writer,
}

impl CodecRegistry {
    /// Create an empty registry with the given defaults.
    pub fn new(default_reader: Reader, default_writer: Writer) -> Self {
        Self {
            readers: HashMap::new(),
            writers: HashMap::new(),
            default_reader,
            default_writer,
        }
    }

    /// Install or overwrite the codec registered under `name`.
    pub fn register(&mut self, name: impl Into<String>, reader: Reader, writer: Writer) {
        let name = name.into();
        self.readers.insert(name.clone(), reader);
        self.writers.insert(name, writer);
    }

    /// Install or overwrite only the read half for `name`.
    pub fn register_reader(&mut self, name: impl Into<String>, reader: Reader) {
        self.readers.insert(name.into(), reader);
    }

    /// Install or overwrite only the write half for `name`.
    pub fn register_writer(&mut self, name: impl Into<String>, writer: Writer) {
        self.writers.insert(name.into(), writer);
    }

    /// Resolve the reader for a format name, falling back to the default.
    pub fn reader(&self, format: Option<&str>) -> Reader {
        format
            .and_then(|name| self.readers.get(name))
            .cloned()
            .unwrap_or_else(|| self.default_reader.clone())
    }

    /// Resolve the writer: the output format wins, then the input format,
    /// then the default.
    pub fn writer(&self, output: Option<&str>, input: Option<&str>) -> Writer {
        output
            .and_then(|name| self.writers.get(name))
            .or_else(|| input.and_then(|name| self.writers.get(name)))
            .cloned()
            .unwrap_or_else(|| self.default_writer.clone())
    }

    /// Registered reader format names.
    pub fn reader_formats(&self) -> impl Iterator<Item = &str> {
        self.readers.keys().map(String::as_str)
    }

    /// Registered writer format names.
    pub fn writer_formats(&self) -> impl Iterator<Item = &str> {
        self.writers.keys().map(String::as_str)
    }
}

/// Create the builtin registry: `json`, `jsonlines`, `yaml`/`yml` readers;
/// `json`, `yaml`/`yml`, `none` writers; json is the default both ways.
pub fn default_registry() -> CodecRegistry {
    let mut registry = CodecRegistry::new(json::reader(), json::writer());

    registry.register_reader("json", json::reader());
    registry.register_reader("jsonlines", jsonlines::reader());
    registry.register_reader("yaml", yaml::reader());
    registry.register_reader("yml", yaml::reader());

    registry.register_writer("json", json::writer());
    registry.register_writer("yaml", yaml::writer());
    registry.register_writer("yml", yaml::writer());
    registry.register_writer("none", none::writer());

    registry
}
