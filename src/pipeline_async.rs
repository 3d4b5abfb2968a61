//! Asynchronous batch pipeline.
//!
//! Every file's read -> transform -> write chain starts concurrently on the
//! cooperative executor, without waiting for sibling files; the batch result
//! settles only once every chain has settled. Inputs are read asynchronously
//! into memory and decoded with the same codecs as the synchronous pipeline
//! via an in-memory cursor; completion order across files is unspecified.

use std::io::Cursor;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::codec::{Payload, Reader, Writer};
use crate::error::{BatchError, BoxError, FileError, Stage};
use crate::locator::Locator;
use crate::pipeline::{Job, Pipeline};

/// Asynchronous transform: the writer runs only after the returned future
/// resolves successfully.
pub type AsyncTransform =
    dyn Fn(Payload) -> BoxFuture<'static, Result<Payload, BoxError>> + Send + Sync;

impl Pipeline {
    /// Run the batch concurrently.
    ///
    /// All files start without waiting on siblings; the joined result is
    /// reported once every per-file chain has settled, carrying every
    /// failure. Files that settled successfully have had their writer
    /// invoked exactly once each. With the `exit` option set the process
    /// terminates here instead of returning.
    pub async fn run_async(
        &self,
        files: &[String],
        transform: Arc<AsyncTransform>,
    ) -> Result<Vec<Payload>, BatchError> {
        let result = self.run_async_inner(files, transform).await;
        self.finish(result)
    }

    async fn run_async_inner(
        &self,
        files: &[String],
        transform: Arc<AsyncTransform>,
    ) -> Result<Vec<Payload>, BatchError> {
        if files.is_empty() && self.options().no_stdin_default {
            return Ok(Vec::new());
        }

        let (reader, writer) = self.resolve_codecs();
        let jobs = self.plan(files, &reader, &writer);

        let settled = future::join_all(
            jobs.iter()
                .map(|job| self.process_async(job, &reader, &writer, transform.clone())),
        )
        .await;

        let mut results = Vec::with_capacity(settled.len());
        let mut errors = Vec::new();
        for outcome in settled {
            match outcome {
                Ok(payload) => results.push(payload),
                Err(error) => errors.push(error),
            }
        }

        if errors.is_empty() {
            Ok(results)
        } else {
            Err(BatchError { errors })
        }
    }

    async fn process_async(
        &self,
        job: &Job,
        reader: &Reader,
        writer: &Writer,
        transform: Arc<AsyncTransform>,
    ) -> Result<Payload, FileError> {
        self.notify_init(job);
        match self.process_steps_async(job, reader, writer, transform).await {
            Ok(result) => {
                self.notify_done(job);
                Ok(result)
            }
            Err(error) => {
                self.notify_fail(job, &error);
                Err(error)
            }
        }
    }

    async fn process_steps_async(
        &self,
        job: &Job,
        reader: &Reader,
        writer: &Writer,
        transform: Arc<AsyncTransform>,
    ) -> Result<Payload, FileError> {
        let bytes = read_bytes(&job.input)
            .await
            .map_err(|e| FileError::new(Stage::Open, job.input.friendly(), e))?;

        let data = reader
            .read(&mut Cursor::new(bytes))
            .map_err(|e| FileError::from_codec(Stage::Parse, job.input.friendly(), e))?;

        let data = (transform.as_ref())(data)
            .await
            .map_err(|e| FileError::new(Stage::Transform, job.input.friendly(), e))?;

        write_bytes(&data, &job.output, writer).await?;
        Ok(data)
    }
}

async fn read_bytes(input: &Locator) -> std::io::Result<Vec<u8>> {
    match input {
        Locator::Stdin => {
            let mut buffer = Vec::new();
            tokio::io::stdin().read_to_end(&mut buffer).await?;
            Ok(buffer)
        }
        Locator::Path(path) => tokio::fs::read(path).await,
        other => Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("{} is not readable", other.friendly()),
        )),
    }
}

async fn write_bytes(data: &Payload, output: &Locator, writer: &Writer) -> Result<(), FileError> {
    if writer.is_suppressed() || matches!(data, Payload::Suppressed) {
        return Ok(());
    }

    // Serialize with the sync codec, then hand the bytes to the async sink.
    let mut buffer = Vec::new();
    writer
        .write(data, &mut buffer)
        .map_err(|e| FileError::from_codec(Stage::Write, output.friendly(), e))?;

    match output {
        Locator::Stdout => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&buffer)
                .await
                .map_err(|e| FileError::new(Stage::Write, output.friendly(), e))?;
            stdout
                .flush()
                .await
                .map_err(|e| FileError::new(Stage::Write, output.friendly(), e))
        }
        Locator::Path(path) => tokio::fs::write(path, &buffer)
            .await
            .map_err(|e| FileError::new(Stage::Write, output.friendly(), e)),
        other => Err(FileError::new(
            Stage::Open,
            other.friendly(),
            std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("{} is not writable", other.friendly()),
            ),
        )),
    }
}
