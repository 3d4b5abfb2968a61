//! Synchronous batch pipeline: read, transform, write per locator.
//!
//! The pipeline resolves one reader and one writer for the whole batch, then
//! processes each locator in strict sequence; the first failing file aborts
//! the remainder of the batch. Per-file locator and output-path derivation is
//! pure and shared with the asynchronous entry point.

use std::sync::Arc;

use crate::codec::{CodecRegistry, Payload, Reader, Writer, default_registry};
use crate::error::{BatchError, BoxError, FileError, Stage};
use crate::locator::{Locator, path_without_ext};
use crate::observe::Observer;

/// Transform applied to each file's payload.
pub type Transform = dyn Fn(Payload, &RunOptions) -> Result<Payload, BoxError> + Send + Sync;

/// Options governing a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Format name used to resolve the reader
    pub input_format: Option<String>,
    /// Format name used to resolve the writer; falls back to the input format
    pub output_format: Option<String>,
    /// Perform no work at all when no locators are given
    pub no_stdin_default: bool,
    /// Treat `-` as a literal path instead of substituting stdin
    pub no_stdin: bool,
    /// Inserted between the stripped input path and the output extension
    pub output_suffix: String,
    /// Terminate the process once the batch completes or fails
    pub exit: bool,
    /// Observer notified of per-file progress
    pub observer: Option<Arc<dyn Observer>>,
    /// Explicit reader override, bypassing registry lookup
    pub reader: Option<Reader>,
    /// Explicit writer override, bypassing registry lookup
    pub writer: Option<Writer>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_format(mut self, format: impl Into<String>) -> Self {
        self.input_format = Some(format.into());
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    pub fn with_no_stdin_default(mut self) -> Self {
        self.no_stdin_default = true;
        self
    }

    pub fn with_no_stdin(mut self) -> Self {
        self.no_stdin = true;
        self
    }

    pub fn with_exit(mut self) -> Self {
        self.exit = true;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_reader(mut self, reader: Reader) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn with_writer(mut self, writer: Writer) -> Self {
        self.writer = Some(writer);
        self
    }
}

/// Per-file plan derived before any I/O happens.
#[derive(Debug, Clone)]
pub(crate) struct Job {
    pub(crate) input: Locator,
    pub(crate) output: Locator,
    pub(crate) label: String,
}

/// Batch pipeline bound to a codec registry and run options.
pub struct Pipeline {
    registry: CodecRegistry,
    options: RunOptions,
}

impl Pipeline {
    /// Create a pipeline over an explicit registry.
    pub fn new(registry: CodecRegistry, options: RunOptions) -> Self {
        Self { registry, options }
    }

    /// Create a pipeline over the builtin registry.
    pub fn with_defaults(options: RunOptions) -> Self {
        Self::new(default_registry(), options)
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Run the batch sequentially.
    ///
    /// An empty `files` list reads stdin (unless `no_stdin_default` is set,
    /// in which case no work happens). The first failing file aborts the
    /// remainder of the batch. With the `exit` option set the process
    /// terminates here instead of returning.
    pub fn run(&self, files: &[String], transform: &Transform) -> Result<Vec<Payload>, BatchError> {
        let result = self.run_inner(files, transform);
        self.finish(result)
    }

    fn run_inner(
        &self,
        files: &[String],
        transform: &Transform,
    ) -> Result<Vec<Payload>, BatchError> {
        if files.is_empty() && self.options.no_stdin_default {
            return Ok(Vec::new());
        }

        let (reader, writer) = self.resolve_codecs();
        let jobs = self.plan(files, &reader, &writer);

        let mut results = Vec::with_capacity(jobs.len());
        for job in &jobs {
            results.push(self.process(job, &reader, &writer, transform)?);
        }
        Ok(results)
    }

    /// Resolve the active reader and writer once for the whole batch.
    /// Explicit overrides win over registry lookup.
    pub(crate) fn resolve_codecs(&self) -> (Reader, Writer) {
        let reader = self
            .options
            .reader
            .clone()
            .unwrap_or_else(|| self.registry.reader(self.options.input_format.as_deref()));
        let writer = self.options.writer.clone().unwrap_or_else(|| {
            self.registry.writer(
                self.options.output_format.as_deref(),
                self.options.input_format.as_deref(),
            )
        });
        (reader, writer)
    }

    /// Derive the per-file plans. Pure: no streams are opened here.
    pub(crate) fn plan(&self, files: &[String], reader: &Reader, writer: &Writer) -> Vec<Job> {
        let inputs: Vec<Locator> = if files.is_empty() {
            vec![Locator::Stdin]
        } else {
            files
                .iter()
                .map(|raw| input_locator(raw, &self.options))
                .collect()
        };

        inputs
            .into_iter()
            .map(|input| {
                let output = output_locator(&input, writer, &self.options.output_suffix);
                let label = job_label(&input, &output, reader, writer);
                Job {
                    input,
                    output,
                    label,
                }
            })
            .collect()
    }

    fn process(
        &self,
        job: &Job,
        reader: &Reader,
        writer: &Writer,
        transform: &Transform,
    ) -> Result<Payload, FileError> {
        self.notify_init(job);
        match self.process_steps(job, reader, writer, transform) {
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

    fn process_steps(
        &self,
        job: &Job,
        reader: &Reader,
        writer: &Writer,
        transform: &Transform,
    ) -> Result<Payload, FileError> {
        let data = {
            let mut source = job
                .input
                .open_read()
                .map_err(|e| FileError::new(Stage::Open, job.input.friendly(), e))?;
            reader
                .read(&mut *source)
                .map_err(|e| FileError::from_codec(Stage::Parse, job.input.friendly(), e))?
        };

        let data = transform(data, &self.options)
            .map_err(|e| FileError::new(Stage::Transform, job.input.friendly(), e))?;

        write_output(&data, &job.output, writer)?;
        Ok(data)
    }

    pub(crate) fn finish(
        &self,
        result: Result<Vec<Payload>, BatchError>,
    ) -> Result<Vec<Payload>, BatchError> {
        match &result {
            Ok(_) => {
                if let Some(observer) = &self.options.observer {
                    observer.info("done");
                }
                if self.options.exit {
                    std::process::exit(0);
                }
            }
            Err(_) => {
                if self.options.exit {
                    std::process::exit(1);
                }
            }
        }
        result
    }

    pub(crate) fn notify_init(&self, job: &Job) {
        if let Some(observer) = &self.options.observer {
            observer.info(&format!("init {}", job.label));
        }
    }

    pub(crate) fn notify_done(&self, job: &Job) {
        if let Some(observer) = &self.options.observer {
            observer.info(&format!("done {}", job.input.friendly()));
        }
    }

    pub(crate) fn notify_fail(&self, job: &Job, error: &FileError) {
        if let Some(observer) = &self.options.observer {
            let mut message = format!("fail {}", job.input.friendly());
            if let Some(line) = &error.line {
                message.push_str(&format!(" on line {} [{}]", line.index, line.raw.len()));
            }
            message.push(':');
            if let Some(line) = &error.line {
                message.push_str(&format!("\n{}\n", line.raw));
            }
            message.push_str(&format!(" {}", error.error));
            observer.error(&message);
        }
    }
}

/// Effective input locator: `-` reads stdin unless suppressed.
pub(crate) fn input_locator(raw: &str, options: &RunOptions) -> Locator {
    if raw == "-" && !options.no_stdin {
        Locator::Stdin
    } else {
        Locator::path(raw)
    }
}

/// Effective output locator for an input.
///
/// Suppressed writers get no output at all; stdin pairs with stdout; paths
/// derive `<input-without-extension><suffix><writer-extension>`.
pub(crate) fn output_locator(input: &Locator, writer: &Writer, suffix: &str) -> Locator {
    if writer.is_suppressed() {
        return Locator::Suppressed;
    }
    match input {
        Locator::Path(path) => {
            let name = path.to_string_lossy();
            Locator::path(format!(
                "{}{}{}",
                path_without_ext(&name),
                suffix,
                writer.output_extension()
            ))
        }
        _ => Locator::Stdout,
    }
}

/// Human-readable job label; the arrow segment is omitted for suppressed
/// output.
pub(crate) fn job_label(
    input: &Locator,
    output: &Locator,
    reader: &Reader,
    writer: &Writer,
) -> String {
    let mut label = format!("{} [{}]", input.friendly(), reader.format());
    if !matches!(output, Locator::Suppressed) {
        label.push_str(&format!(" => {} [{}]", output.friendly(), writer.format()));
    }
    label
}

/// Write a payload to its output locator, skipping suppressed writers and
/// suppressed payloads.
pub(crate) fn write_output(
    data: &Payload,
    output: &Locator,
    writer: &Writer,
) -> Result<(), FileError> {
    if writer.is_suppressed() || matches!(data, Payload::Suppressed) {
        return Ok(());
    }
    let mut sink = output
        .open_write()
        .map_err(|e| FileError::new(Stage::Open, output.friendly(), e))?;
    writer
        .write(data, &mut *sink)
        .map_err(|e| FileError::from_codec(Stage::Write, output.friendly(), e))
}
