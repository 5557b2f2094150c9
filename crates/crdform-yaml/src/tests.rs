use super::*;
use crdform_document::{FieldPath, Mapping, Value};
use serde_yaml::Value as YamlValue;

fn path(s: &str) -> FieldPath {
    s.parse().unwrap()
}

#[test]
fn test_basic_values_to_yaml() {
    assert_eq!(value_to_yaml(&Value::Null), YamlValue::Null);
    assert_eq!(value_to_yaml(&Value::Bool(true)), YamlValue::Bool(true));
    assert_eq!(
        value_to_yaml(&Value::Integer(-42)),
        YamlValue::Number((-42).into())
    );
    assert_eq!(value_to_yaml(&Value::Float(0.5)).as_f64(), Some(0.5));
    assert_eq!(
        value_to_yaml(&Value::from("hello")),
        YamlValue::String("hello".to_string())
    );
}

#[test]
fn test_yaml_numbers_to_value() {
    let yaml: YamlValue = serde_yaml::from_str("[1, -2, 2.5, 18446744073709551615]").unwrap();
    let value = yaml_to_value(&yaml).unwrap();
    let items = value.as_sequence().unwrap();
    assert_eq!(items[0], Value::Integer(1));
    assert_eq!(items[1], Value::Integer(-2));
    assert_eq!(items[2], Value::Float(2.5));
    assert_eq!(items[3].kind(), crdform_document::ValueKind::Float);
}

#[test]
fn test_mapping_keeps_document_order() {
    let yaml: YamlValue = serde_yaml::from_str("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
    let value = yaml_to_value(&yaml).unwrap();
    let keys: Vec<_> = value.as_mapping().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}

#[test]
fn test_scalar_keys_are_stringified() {
    let yaml: YamlValue = serde_yaml::from_str("1: one\ntrue: yes\n~: nothing\n").unwrap();
    let value = yaml_to_value(&yaml).unwrap();
    assert_eq!(value.get("1"), Some(&Value::from("one")));
    assert_eq!(value.get("true"), Some(&Value::from("yes")));
    assert_eq!(value.get("null"), Some(&Value::from("nothing")));
}

#[test]
fn test_complex_key_is_rejected() {
    let yaml: YamlValue = serde_yaml::from_str("? [a, b]\n: value\n").unwrap();
    let err = yaml_to_value(&yaml).unwrap_err();
    assert!(matches!(err, Error::ConversionError(_)));
}

#[test]
fn test_tags_are_dropped() {
    let yaml: YamlValue = serde_yaml::from_str("size: !Quantity 10Gi\n").unwrap();
    let value = yaml_to_value(&yaml).unwrap();
    assert_eq!(value.get("size"), Some(&Value::from("10Gi")));
}

#[test]
fn test_parse_documents_skips_empty_documents() {
    let raw = "---\n---\nkind: A\n---\n~\n---\nkind: B\n";
    let docs = parse_documents(raw).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].get("kind"), Some(&Value::from("A")));
    assert_eq!(docs[1].get("kind"), Some(&Value::from("B")));
}

#[test]
fn test_parse_documents_without_content() {
    assert!(parse_documents("").is_err());
    assert!(matches!(parse_documents("~\n"), Err(Error::NoDocuments)));
    assert!(matches!(parse_documents("---\n{}\n"), Err(Error::NoDocuments)));
}

#[test]
fn test_parse_documents_reports_syntax_errors() {
    let err = parse_documents("kind: [unclosed\n").unwrap_err();
    assert!(matches!(err, Error::YamlParseError(_)));
}

#[test]
fn test_to_yaml_string_renders_block_style() {
    let mut root = Value::Mapping(Mapping::new());
    root.set_path(&path("apiVersion"), Value::from("apps/v1")).unwrap();
    root.set_path(&path("kind"), Value::from("Deployment")).unwrap();
    root.set_path(&path("spec.replicas"), Value::Integer(3)).unwrap();
    root.set_path(&path("spec.containers[0].name"), Value::from("web")).unwrap();

    let text = to_yaml_string(&root).unwrap();
    assert_eq!(
        text,
        "apiVersion: apps/v1\nkind: Deployment\nspec:\n  replicas: 3\n  containers:\n  - name: web\n"
    );
}

#[test]
fn test_round_trip_through_text() {
    let mut root = Value::Null;
    root.set_path(&path("metadata.labels.app"), Value::from("true")).unwrap();
    root.set_path(&path("spec.enabled"), Value::Bool(true)).unwrap();
    root.set_path(&path("spec.ratio"), Value::Float(0.75)).unwrap();

    let text = to_yaml_string(&root).unwrap();
    let parsed = parse_documents(&text).unwrap();
    assert_eq!(parsed, vec![root]);
}
