//! YAML codec: a single document per resource.

use std::io::{Read, Write};

use super::{Payload, Reader, Writer};
use crate::error::CodecError;

pub(crate) fn reader() -> Reader {
    Reader::new("yaml", |source: &mut dyn Read| {
        let value = serde_yaml::from_reader(&mut *source).map_err(CodecError::parse)?;
        Ok(Payload::Yaml(value))
    })
}

pub(crate) fn writer() -> Writer {
    Writer::new("yaml", |payload: &Payload, sink: &mut dyn Write| {
        let value = payload.to_yaml()?;
        serde_yaml::to_writer(&mut *sink, &value).map_err(|e| CodecError::Serialize(Box::new(e)))?;
        sink.flush()?;
        Ok(())
    })
}
