//! Round-trip tests for the yaml codec.

use std::io::Cursor;

use serde_json::json;

use crate::codec::{Payload, default_registry};

#[test]
fn yaml_reader_parses_document() {
    let registry = default_registry();
    let reader = registry.reader(Some("yaml"));

    let payload = reader
        .read(&mut Cursor::new(b"name: a\nvalue: 1\n".to_vec()))
        .expect("valid yaml should parse");

    let expected: serde_yaml::Value = serde_yaml::from_str("name: a\nvalue: 1\n").expect("fixture");
    assert_eq!(payload, Payload::Yaml(expected));
}

#[test]
fn yml_alias_resolves_to_yaml_codec() {
    let registry = default_registry();
    assert_eq!(registry.reader(Some("yml")).format(), "yaml");
    assert_eq!(registry.writer(Some("yml"), None).format(), "yaml");
}

#[test]
fn yaml_round_trip_preserves_value() {
    let registry = default_registry();
    let reader = registry.reader(Some("yaml"));
    let writer = registry.writer(Some("yaml"), None);

    let fixture = "name: a\nitems:\n- 1\n- 2\n";
    let payload = reader
        .read(&mut Cursor::new(fixture.as_bytes().to_vec()))
        .expect("fixture should parse");

    let mut out = Vec::new();
    writer.write(&payload, &mut out).expect("write succeeds");

    let round = reader
        .read(&mut Cursor::new(out))
        .expect("written yaml parses again");
    assert_eq!(round, payload);
}

#[test]
fn yaml_writer_renders_json_payloads() {
    let registry = default_registry();
    let writer = registry.writer(Some("yaml"), None);

    let mut out = Vec::new();
    writer
        .write(&Payload::Json(json!({"name": "a"})), &mut out)
        .expect("json payload writes as yaml");

    let value: serde_yaml::Value =
        serde_yaml::from_slice(&out).expect("output must be valid yaml");
    let expected: serde_yaml::Value = serde_yaml::from_str("name: a\n").expect("fixture");
    assert_eq!(value, expected);
}
