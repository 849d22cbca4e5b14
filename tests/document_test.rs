use std::path::PathBuf;

use chart_golden::document::{extract, extract_str, Document, ResourceIdentity};
use chart_golden::error::Error;
use chart_golden::splitter::Segment;
use serde_yaml::Value;

fn segment(content: &str) -> Segment {
    Segment { index: 0, content: content.to_string() }
}

fn parse(content: &str) -> Document {
    Document::parse(segment(content)).unwrap().unwrap()
}

#[test]
fn test_extract_nested_value() {
    let value: Value =
        serde_yaml::from_str("metadata:\n  name: web\n  labels:\n    app: web\n").unwrap();

    assert_eq!(extract_str(&value, &["metadata", "name"]), Some("web"));
    assert_eq!(extract_str(&value, &["metadata", "labels", "app"]), Some("web"));
    assert_eq!(extract(&value, &[]), Some(&value));
}

#[test]
fn test_extract_is_total() {
    let value: Value =
        serde_yaml::from_str("kind: Service\nreplicas: 3\nmetadata: ~\nitems:\n  - a\n").unwrap();

    // Missing keys
    assert_eq!(extract(&value, &["spec"]), None);
    assert_eq!(extract(&value, &["spec", "template", "metadata"]), None);
    // Intermediate scalar, null and sequence values
    assert_eq!(extract(&value, &["kind", "name"]), None);
    assert_eq!(extract(&value, &["metadata", "name"]), None);
    assert_eq!(extract(&value, &["items", "0"]), None);
    // Non string leaves
    assert_eq!(extract_str(&value, &["replicas"]), None);
    assert_eq!(extract_str(&value, &["items"]), None);
    // Not a mapping at all
    assert_eq!(extract(&Value::Null, &["kind"]), None);
}

#[test]
fn test_identity() {
    let document = parse("apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n");
    let identity = document.identity().unwrap();

    assert_eq!(
        identity,
        ResourceIdentity {
            api_version: Some("apps/v1".to_string()),
            kind: "Deployment".to_string(),
            name: "web".to_string(),
        }
    );
    assert_eq!(identity.relative_path(), PathBuf::from("apps/v1/Deployment/web.yaml"));
}

#[test]
fn test_identity_without_api_version() {
    let identity = parse("kind: X\nmetadata:\n  name: foo\n").identity().unwrap();

    assert_eq!(identity.api_version, None);
    assert_eq!(identity.relative_path(), PathBuf::from("X/foo.yaml"));

    let identity = parse("apiVersion: ''\nkind: X\nmetadata:\n  name: foo\n").identity().unwrap();
    assert_eq!(identity.relative_path(), PathBuf::from("X/foo.yaml"));
}

#[test]
fn test_missing_name_is_an_error() {
    let document = parse("kind: Deployment\nmetadata:\n  labels: {}\n");
    match document.identity() {
        Err(Error::MissingName { content, .. }) => assert!(content.contains("kind: Deployment")),
        other => panic!("Expected MissingName, got {:?}", other),
    }
}

#[test]
fn test_missing_kind_is_an_error() {
    let document = parse("metadata:\n  name: web\n");
    assert!(matches!(document.identity(), Err(Error::MissingKind { .. })));

    let document = parse("kind: 42\nmetadata:\n  name: web\n");
    assert!(matches!(document.identity(), Err(Error::MissingKind { .. })));
}

#[test]
fn test_empty_mapping_is_discarded() {
    assert!(Document::parse(segment("{}\n")).unwrap().is_none());
    assert!(Document::parse(segment("~\n")).unwrap().is_none());
}

#[test]
fn test_invalid_yaml_is_an_error() {
    let result =
        Document::parse(Segment { index: 4, content: "kind: [unclosed\n".to_string() });
    match result {
        Err(Error::InvalidDocument { index, content, .. }) => {
            assert_eq!(index, 4);
            assert_eq!(content, "kind: [unclosed\n");
        }
        other => panic!("Expected InvalidDocument, got {:?}", other),
    }
}

#[test]
fn test_non_mapping_is_an_error() {
    assert!(matches!(
        Document::parse(segment("- a\n- b\n")),
        Err(Error::NotAMapping { .. })
    ));
    assert!(matches!(Document::parse(segment("just text\n")), Err(Error::NotAMapping { .. })));
}

#[test]
fn test_key_order_is_preserved() {
    let document = parse("kind: X\nzeta: 1\nalpha: 2\nmetadata:\n  name: foo\n");
    let keys: Vec<&str> = document
        .value
        .as_mapping()
        .unwrap()
        .keys()
        .filter_map(|k| k.as_str())
        .collect();
    assert_eq!(keys, vec!["kind", "zeta", "alpha", "metadata"]);
}
