//! Tests for the pure per-file derivation helpers.

use crate::codec::default_registry;
use crate::locator::Locator;
use crate::pipeline::{Pipeline, RunOptions, input_locator, job_label, output_locator};

#[test]
fn output_path_derives_from_input_and_writer_format() {
    let registry = default_registry();
    let writer = registry.writer(Some("yaml"), None);

    let output = output_locator(&Locator::path("report.json"), &writer, "");
    assert_eq!(output, Locator::path("report.yaml"));
}

#[test]
fn output_suffix_is_inserted_before_the_extension() {
    let registry = default_registry();
    let writer = registry.writer(Some("yaml"), None);

    let output = output_locator(&Locator::path("report.json"), &writer, ".out");
    assert_eq!(output, Locator::path("report.out.yaml"));
}

#[test]
fn explicit_writer_extension_overrides_the_format_name() {
    let registry = default_registry();
    let writer = registry.writer(Some("yaml"), None).with_extension(".yml");

    let output = output_locator(&Locator::path("report.json"), &writer, "");
    assert_eq!(output, Locator::path("report.yml"));
}

#[test]
fn stdin_input_pairs_with_stdout_output() {
    let registry = default_registry();
    let writer = registry.writer(Some("json"), None);

    assert_eq!(output_locator(&Locator::Stdin, &writer, ""), Locator::Stdout);
}

#[test]
fn suppressed_writer_yields_no_output_locator() {
    let registry = default_registry();
    let writer = registry.writer(Some("none"), None);

    assert_eq!(
        output_locator(&Locator::path("report.json"), &writer, ""),
        Locator::Suppressed
    );
}

#[test]
fn dash_substitutes_stdin_unless_suppressed() {
    let options = RunOptions::new();
    assert_eq!(input_locator("-", &options), Locator::Stdin);

    let options = RunOptions::new().with_no_stdin();
    assert_eq!(input_locator("-", &options), Locator::path("-"));

    let options = RunOptions::new();
    assert_eq!(input_locator("a.json", &options), Locator::path("a.json"));
}

#[test]
fn empty_file_list_plans_exactly_one_stdin_job() {
    let pipeline = Pipeline::with_defaults(RunOptions::new());
    let (reader, writer) = pipeline.resolve_codecs();

    let jobs = pipeline.plan(&[], &reader, &writer);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].input, Locator::Stdin);
    assert_eq!(jobs[0].output, Locator::Stdout);
}

#[test]
fn job_label_names_both_endpoints_with_formats() {
    let registry = default_registry();
    let reader = registry.reader(Some("json"));
    let writer = registry.writer(Some("yaml"), None);

    let input = Locator::path("report.json");
    let output = output_locator(&input, &writer, "");
    assert_eq!(
        job_label(&input, &output, &reader, &writer),
        "report.json [json] => report.yaml [yaml]"
    );
}

#[test]
fn job_label_omits_the_arrow_for_suppressed_output() {
    let registry = default_registry();
    let reader = registry.reader(Some("json"));
    let writer = registry.writer(Some("none"), None);

    let input = Locator::path("report.json");
    let output = output_locator(&input, &writer, "");
    assert_eq!(
        job_label(&input, &output, &reader, &writer),
        "report.json [json]"
    );
}
