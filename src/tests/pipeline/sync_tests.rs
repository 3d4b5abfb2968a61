//! End-to-end tests for the synchronous pipeline.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;

use crate::codec::Payload;
use crate::error::Stage;
use crate::pipeline::{Pipeline, RunOptions};
use crate::tests::support::CollectingObserver;

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("fixture write");
    path.to_string_lossy().into_owned()
}

#[test]
fn json_to_yaml_conversion_writes_derived_output() {
    let dir = tempdir().expect("tempdir");
    let input = write_file(dir.path(), "in.json", "{\"name\": \"a\", \"value\": 1}");

    let options = RunOptions::new()
        .with_input_format("json")
        .with_output_format("yaml");
    let pipeline = Pipeline::with_defaults(options);

    let results = pipeline
        .run(&[input], &|data, _| Ok(data))
        .expect("conversion succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0], Payload::Json(json!({"name": "a", "value": 1})));

    let out = fs::read_to_string(dir.path().join("in.yaml")).expect("output exists");
    let value: serde_json::Value = serde_yaml::from_str(&out).expect("output is valid yaml");
    assert_eq!(value, json!({"name": "a", "value": 1}));
}

#[test]
fn output_format_defaults_to_input_format() {
    let dir = tempdir().expect("tempdir");
    let input = write_file(dir.path(), "in.json", "{\"ok\": true}");

    let options = RunOptions::new()
        .with_input_format("json")
        .with_output_suffix(".copy");
    let pipeline = Pipeline::with_defaults(options);

    pipeline
        .run(&[input], &|data, _| Ok(data))
        .expect("run succeeds");

    assert!(dir.path().join("in.copy.json").exists());
}

#[test]
fn empty_files_with_no_stdin_default_do_no_work() {
    let observer = Arc::new(CollectingObserver::new());
    let options = RunOptions::new()
        .with_no_stdin_default()
        .with_observer(observer.clone());
    let pipeline = Pipeline::with_defaults(options);

    let results = pipeline
        .run(&[], &|data, _| Ok(data))
        .expect("no-op run succeeds");

    assert!(results.is_empty());
    // Only the batch-level completion event fires; no file was initiated.
    assert_eq!(observer.infos(), vec!["done".to_string()]);
}

#[test]
fn suppressed_writer_produces_no_output_file() {
    let dir = tempdir().expect("tempdir");
    let input = write_file(dir.path(), "in.json", "{\"ok\": true}");

    let options = RunOptions::new()
        .with_input_format("json")
        .with_output_format("none");
    let pipeline = Pipeline::with_defaults(options);

    let results = pipeline
        .run(&[input], &|data, _| Ok(data))
        .expect("run succeeds");
    assert_eq!(results.len(), 1);

    let entries: Vec<_> = fs::read_dir(dir.path())
        .expect("read_dir")
        .collect::<Result<_, _>>()
        .expect("entries");
    assert_eq!(entries.len(), 1, "only the input file should exist");
}

#[test]
fn jsonlines_parse_failure_surfaces_line_context_to_the_observer() {
    let dir = tempdir().expect("tempdir");
    let input = write_file(dir.path(), "rows.jsonl", "{\"a\":1}\nnot-json\n{\"b\":2}\n");

    let observer = Arc::new(CollectingObserver::new());
    let options = RunOptions::new()
        .with_input_format("jsonlines")
        .with_output_format("none")
        .with_observer(observer.clone());
    let pipeline = Pipeline::with_defaults(options);

    let err = pipeline
        .run(&[input.clone()], &|data, _| Ok(data))
        .expect_err("malformed line must fail the batch");

    assert_eq!(err.len(), 1);
    let file_err = &err.errors[0];
    assert_eq!(file_err.stage, Stage::Parse);
    assert_eq!(file_err.target, input);

    let line = file_err.line.as_ref().expect("line context attached");
    assert_eq!(line.index, 1);
    assert_eq!(line.raw, "not-json");

    let errors = observer.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("on line 1 [8]"));
    assert!(errors[0].contains("\nnot-json\n"));
}

#[test]
fn first_failure_aborts_the_remaining_batch() {
    let dir = tempdir().expect("tempdir");
    let bad = write_file(dir.path(), "bad.json", "{not-json");
    let good = write_file(dir.path(), "good.json", "{\"ok\": true}");

    let observer = Arc::new(CollectingObserver::new());
    let options = RunOptions::new()
        .with_input_format("json")
        .with_output_format("yaml")
        .with_observer(observer.clone());
    let pipeline = Pipeline::with_defaults(options);

    pipeline
        .run(&[bad, good], &|data, _| Ok(data))
        .expect_err("first file must fail the batch");

    // The second file was never initiated and no output was derived for it.
    let inits: Vec<_> = observer
        .infos()
        .into_iter()
        .filter(|m| m.starts_with("init"))
        .collect();
    assert_eq!(inits.len(), 1);
    assert!(!dir.path().join("good.yaml").exists());
}

#[test]
fn transform_failure_is_attributed_to_the_transform_stage() {
    let dir = tempdir().expect("tempdir");
    let input = write_file(dir.path(), "in.json", "{\"ok\": true}");

    let options = RunOptions::new().with_input_format("json");
    let pipeline = Pipeline::with_defaults(options);

    let err = pipeline
        .run(&[input], &|_, _| Err("boom".into()))
        .expect_err("transform error must fail the batch");

    assert_eq!(err.errors[0].stage, Stage::Transform);
}

#[test]
fn transform_result_is_what_gets_written() {
    let dir = tempdir().expect("tempdir");
    let input = write_file(dir.path(), "in.json", "{\"value\": 1}");

    let options = RunOptions::new().with_input_format("json");
    let pipeline = Pipeline::with_defaults(options);

    pipeline
        .run(&[input], &|data, _| {
            let value = data.to_json()?;
            Ok(Payload::Json(json!({ "wrapped": value })))
        })
        .expect("run succeeds");

    let out = fs::read_to_string(dir.path().join("in.json")).expect("output exists");
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(value, json!({"wrapped": {"value": 1}}));
}

#[test]
fn observer_sees_init_and_done_labels() {
    let dir = tempdir().expect("tempdir");
    let input = write_file(dir.path(), "in.json", "{\"ok\": true}");

    let observer = Arc::new(CollectingObserver::new());
    let options = RunOptions::new()
        .with_input_format("json")
        .with_output_format("yaml")
        .with_observer(observer.clone());
    let pipeline = Pipeline::with_defaults(options);

    pipeline
        .run(&[input.clone()], &|data, _| Ok(data))
        .expect("run succeeds");

    let infos = observer.infos();
    assert_eq!(infos.len(), 3);
    assert!(infos[0].starts_with(&format!("init {input} [json] => ")));
    assert!(infos[0].ends_with("[yaml]"));
    assert_eq!(infos[1], format!("done {input}"));
    assert_eq!(infos[2], "done");
}

#[test]
fn explicit_reader_and_writer_overrides_bypass_the_registry() {
    let dir = tempdir().expect("tempdir");
    let input = write_file(dir.path(), "in.weird", "anything");

    let reader = crate::codec::Reader::new("fixed", |_source| {
        Ok(Payload::Text("fixed".into()))
    });
    let writer = crate::codec::Writer::new("txt", |payload, sink| {
        if let Payload::Text(text) = payload {
            std::io::Write::write_all(sink, text.as_bytes())?;
        }
        Ok(())
    });

    let options = RunOptions::new().with_reader(reader).with_writer(writer);
    let pipeline = Pipeline::with_defaults(options);

    pipeline
        .run(&[input], &|data, _| Ok(data))
        .expect("run succeeds");

    let out = fs::read_to_string(dir.path().join("in.txt")).expect("output exists");
    assert_eq!(out, "fixed");
}
