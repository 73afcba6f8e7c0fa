//! Tests for path expression evaluation
//!
//! Covers keyed containers, property-bearing objects, mixed expressions and
//! the fallback to absent values for anything that cannot be resolved.

use hab_core::{object_value, PropertyAccess, Value};
use hab_template::get_value;
use serde_json::json;

/// Object exposing a fixed set of properties
#[derive(Debug)]
struct Bean {
    a: String,
    e: Value,
}

impl PropertyAccess for Bean {
    fn get_property(&self, name: &str) -> Option<Value> {
        match name {
            "a" => Some(Value::from(self.a.clone())),
            "e" => Some(self.e.clone()),
            _ => None,
        }
    }
}

fn bean() -> Value {
    object_value(Bean {
        a: "A".to_string(),
        e: Value::from_serialize(json!({"f": "F", "g": {"h": 7}})),
    })
}

fn result_root() -> Value {
    Value::from_serialize(json!({
        "result": {
            "a.b": "V1",
            "a": {"b": "V2"}
        }
    }))
}

#[test]
fn test_bracket_key_with_dot_is_literal() {
    let root = result_root();
    assert_eq!(get_value(&root, "[result][a.b]"), Some(Value::from("V1")));
}

#[test]
fn test_nested_bracket_keys() {
    let root = result_root();
    assert_eq!(get_value(&root, "[result][a][b]"), Some(Value::from("V2")));
}

#[test]
fn test_dotted_run_prefers_literal_key() {
    let root = result_root();
    // "a.b" exists as a key, so it is consumed in one hop
    assert_eq!(get_value(&root, "[result].a.b"), Some(Value::from("V1")));
    assert_eq!(get_value(&root, "result.a.b"), Some(Value::from("V1")));
}

#[test]
fn test_mixed_dot_and_bracket() {
    let root = result_root();
    assert_eq!(get_value(&root, "[result].a[b]"), Some(Value::from("V2")));
}

#[test]
fn test_property_then_container() {
    let root = Value::from_iter([("bean", bean())]);

    assert_eq!(get_value(&root, ".bean.e[f]"), Some(Value::from("F")));
    assert_eq!(get_value(&root, "bean.a"), Some(Value::from("A")));
    assert_eq!(get_value(&root, "bean[e].g.h"), Some(Value::from(7)));
}

#[test]
fn test_property_root() {
    let root = bean();
    assert_eq!(get_value(&root, "a"), Some(Value::from("A")));
    assert_eq!(get_value(&root, "[a]"), Some(Value::from("A")));
    assert_eq!(get_value(&root, "missing"), None);
}

#[test]
fn test_whole_container_returned() {
    let root = result_root();
    let inner = get_value(&root, "result.a").unwrap();
    assert_eq!(get_value(&inner, "b"), Some(Value::from("V2")));
}

#[test]
fn test_unresolvable_paths_are_absent() {
    let root = result_root();

    for path in [
        "missing",
        "[missing]",
        "result.a.b.c",
        "[result][a][b][c]",
        "result.x",
        "[result",
        "[result][]",
        "result.a.b[0]",
    ] {
        assert_eq!(get_value(&root, path), None, "path {path} should be absent");
    }
}

#[test]
fn test_sequences_are_not_traversed() {
    let root = Value::from_serialize(json!({"items": [1, 2, 3]}));
    assert_eq!(get_value(&root, "items[0]"), None);
    assert!(get_value(&root, "items").is_some());
}

#[test]
fn test_null_value_is_present() {
    let root = Value::from_serialize(json!({"nothing": null}));
    let value = get_value(&root, "nothing").unwrap();
    assert!(value.is_none());
    assert_eq!(get_value(&root, "nothing.deeper"), None);
}
