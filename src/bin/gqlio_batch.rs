//! Batch format converter driving the pipeline directly.
//!
//! Reads each input with the selected (or default) codec and writes it back
//! out unchanged in the output format, deriving output paths next to the
//! inputs. With no files, reads stdin and writes stdout.

use std::sync::Arc;

use clap::Parser;

use gqlio::cli::init_tracing;
use gqlio::codec::default_registry;
use gqlio::observe::TracingObserver;
use gqlio::pipeline::{Pipeline, RunOptions};

#[derive(Debug, Parser)]
#[command(
    name = "gqlio-batch",
    version,
    about = "Convert files between json, jsonlines, and yaml"
)]
struct Cli {
    /// input files; use "-" for stdin
    files: Vec<String>,

    /// input format (json, jsonlines, yaml)
    #[arg(short, long)]
    input_format: Option<String>,

    /// output format (json, yaml, none); defaults to the input format
    #[arg(short, long)]
    output_format: Option<String>,

    /// suffix inserted before the output extension
    #[arg(short, long, default_value = "")]
    suffix: String,

    /// do nothing when no files are given instead of reading stdin
    #[arg(long)]
    no_stdin_default: bool,

    /// output more details
    #[arg(short, long)]
    verbose: bool,

    /// output debug data
    #[arg(short = 'D', long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);

    let mut options = RunOptions::new()
        .with_output_suffix(cli.suffix.clone())
        .with_observer(Arc::new(TracingObserver))
        .with_exit();
    options.input_format = cli.input_format.clone();
    options.output_format = cli.output_format.clone();
    options.no_stdin_default = cli.no_stdin_default;

    let pipeline = Pipeline::new(default_registry(), options);

    // The exit option terminates the process with the right status; the
    // returned value is never observed here.
    let _ = pipeline.run(&cli.files, &|payload, _| Ok(payload));
}
