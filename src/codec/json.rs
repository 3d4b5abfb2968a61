//! JSON codec: a single document per resource, pretty-printed on write.

use std::io::{Read, Write};

use super::{Payload, Reader, Writer};
use crate::error::CodecError;

pub(crate) fn reader() -> Reader {
    Reader::new("json", |source: &mut dyn Read| {
        let value = serde_json::from_reader(&mut *source).map_err(CodecError::parse)?;
        Ok(Payload::Json(value))
    })
}

pub(crate) fn writer() -> Writer {
    Writer::new("json", |payload: &Payload, sink: &mut dyn Write| {
        let value = payload.to_json()?;
        serde_json::to_writer_pretty(&mut *sink, &value)
            .map_err(|e| CodecError::Serialize(Box::new(e)))?;
        sink.flush()?;
        Ok(())
    })
}
