//! # gqlio
//!
//! A batch file-processing core for command-line query runners.
//!
//! ## Overview
//!
//! gqlio provides:
//! - **Batch pipeline**: Read, transform, and write many files through one
//!   reader/writer pair, with stdin/stdout substitution and derived output
//!   paths
//! - **Pluggable codecs**: Builtin `json`, `jsonlines`, `yaml`, and `none`
//!   formats, extensible through an explicit registry
//! - **Import resolver**: Recursive `#import "ref"` expansion for text
//!   resources, with per-extension post-transforms
//! - **Sync and async**: Two pipeline entry points sharing the same per-file
//!   derivation logic
//! - **Line-level errors**: Line-oriented formats attribute parse failures
//!   to the 0-based offending line and its raw text
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use gqlio::{Pipeline, RunOptions, default_registry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = RunOptions::new()
//!         .with_input_format("json")
//!         .with_output_format("yaml");
//!     let pipeline = Pipeline::new(default_registry(), options);
//!
//!     // report.json -> report.yaml
//!     let results = pipeline.run(&["report.json".into()], &|data, _| Ok(data))?;
//!     println!("{} file(s) processed", results.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Execution contracts
//!
//! The synchronous [`Pipeline::run`] is strictly sequential: each file's
//! read -> transform -> write completes before the next file starts, and the
//! first failure aborts the remainder of the batch.
//!
//! The asynchronous `Pipeline::run_async` (feature `async`) starts every
//! file's chain concurrently on the cooperative executor and settles only
//! after all chains have settled; completion order across files is
//! unspecified, and the joined error carries every failed file. There is no
//! cancellation: once a file starts, it runs to settlement.
//!
//! ## Features
//!
//! - `async` - Asynchronous pipeline entry point backed by Tokio
//! - `client` - Blocking GraphQL-over-HTTP client
//! - `cli` - Argument glue and logger setup for the shipped binaries

// Core modules
pub mod codec;
pub mod error;
pub mod import;
pub mod locator;
pub mod observe;
pub mod pipeline;

// Async pipeline (feature-gated)
#[cfg(feature = "async")]
pub mod pipeline_async;

// Transport and CLI glue (feature-gated)
#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use codec::{CodecRegistry, Payload, Reader, Writer, default_registry};
pub use error::{BatchError, BoxError, CodecError, FileError, ImportError, LineContext, Stage};
pub use import::{ImportResolver, ImportTransform};
pub use locator::{Locator, path_without_ext};
pub use observe::{Observer, TracingObserver};
pub use pipeline::{Pipeline, RunOptions, Transform};

#[cfg(feature = "async")]
pub use pipeline_async::AsyncTransform;

#[cfg(feature = "client")]
pub use client::{ClientError, GraphQlClient};
