//! CLI glue for the query runner binaries.
//!
//! Everything here is thin plumbing over the core modules: logger setup,
//! `@file` / `-` argument indirection, inline `key:value` parsing, and
//! operation-type sniffing on flattened query text.

use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use crate::codec::CodecRegistry;
use crate::error::BoxError;
use crate::import::ImportResolver;
use crate::locator::Locator;

/// Initialize console logging.
///
/// The level defaults to warn; `verbose` raises it to info and `debug` to
/// debug. An explicit `RUST_LOG` overrides both.
pub fn init_tracing(verbose: bool, debug: bool) {
    let default = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .init();
}

/// Classification of a CLI input argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Inline text used as-is
    Literal(String),
    /// `@path`: read the named file
    File(PathBuf),
    /// `-`, `@`, or `@-`: read standard input
    Stdin,
}

/// Classify an argument that may name a file or stdin instead of carrying a
/// literal value.
pub fn classify_input(arg: &str) -> InputSource {
    match arg {
        "-" | "@" | "@-" => InputSource::Stdin,
        _ if arg.starts_with('@') => InputSource::File(PathBuf::from(&arg[1..])),
        _ => InputSource::Literal(arg.to_string()),
    }
}

/// Whether an argument reads standard input.
pub fn is_stdin(arg: &str) -> bool {
    matches!(arg, "-" | "@" | "@-")
}

/// JSON-parse a scalar when possible, else keep it as a string.
pub fn coerce(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

/// Parse an inline `key:value` pair; the value keeps any further colons and
/// is coerced through JSON with a string fallback.
pub fn parse_pair(input: &str) -> (String, Value) {
    match input.split_once(':') {
        Some((key, value)) => (key.trim().to_string(), coerce(value.trim())),
        None => (input.trim().to_string(), Value::String(String::new())),
    }
}

/// Merge JSON objects left to right; later keys override earlier ones.
/// Non-object values are ignored.
pub fn combine(objects: impl IntoIterator<Item = Value>) -> Map<String, Value> {
    let mut combined = Map::new();
    for object in objects {
        if let Value::Object(map) = object {
            combined.extend(map);
        }
    }
    combined
}

/// GraphQL operation kinds the runner distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

/// Sniff the main operation type from flattened query text: the first
/// non-comment token decides; bare selection sets count as queries.
pub fn operation_kind(query: &str) -> OperationKind {
    for line in query.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return if trimmed.starts_with("mutation") {
            OperationKind::Mutation
        } else if trimmed.starts_with("subscription") {
            OperationKind::Subscription
        } else {
            OperationKind::Query
        };
    }
    OperationKind::Query
}

/// Read a json or yaml resource into a JSON value; `.yaml`/`.yml` paths use
/// the yaml codec, everything else json.
pub fn load_value(registry: &CodecRegistry, locator: &Locator) -> Result<Value, BoxError> {
    let format = match locator.extension().as_deref() {
        Some(".yaml") | Some(".yml") => "yaml",
        _ => "json",
    };
    let reader = registry.reader(Some(format));
    let mut source = locator.open_read()?;
    let payload = reader.read(&mut *source)?;
    Ok(payload.to_json()?)
}

/// Resolve a data/header argument to a JSON object: inline `key:value`,
/// `@file` (json or yaml), or stdin.
pub fn read_value_arg(registry: &CodecRegistry, arg: &str) -> Result<Value, BoxError> {
    match classify_input(arg) {
        InputSource::Stdin => load_value(registry, &Locator::Stdin),
        InputSource::File(path) => load_value(registry, &Locator::Path(path)),
        InputSource::Literal(text) => {
            let (key, value) = parse_pair(&text);
            let mut map = Map::new();
            map.insert(key, value);
            Ok(Value::Object(map))
        }
    }
}

/// Resolve the query argument: inline text, `@file` with import expansion,
/// or stdin with import expansion.
pub fn read_query_arg(resolver: &ImportResolver, arg: &str) -> Result<String, BoxError> {
    match classify_input(arg) {
        InputSource::Stdin => Ok(resolver.load(&Locator::Stdin)?),
        InputSource::File(path) => Ok(resolver.load(&Locator::Path(path))?),
        InputSource::Literal(text) => Ok(text),
    }
}
