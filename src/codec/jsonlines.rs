//! JSON-lines codec: one JSON value per line, blank lines skipped.
//!
//! A malformed line fails with the 0-based line index and the raw line text
//! attached, so the pipeline can attribute the error to a single input line.

use std::io::{BufRead, BufReader, Read};

use super::{Payload, Reader};
use crate::error::CodecError;

pub(crate) fn reader() -> Reader {
    Reader::new("jsonlines", |source: &mut dyn Read| {
        let mut values = Vec::new();
        for (index, line) in BufReader::new(&mut *source).lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let value = serde_json::from_str(trimmed)
                .map_err(|e| CodecError::parse_line(index, trimmed, e))?;
            values.push(value);
        }
        Ok(Payload::JsonLines(values))
    })
}
