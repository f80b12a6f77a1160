//! Tests for concurrent use of validators and the schema registry.

use a2ui_guard::{SchemaRegistry, SkipConformance, Validator, ViolationKind};
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": { "components": { "items": { "properties": {
            "componentProperties": { "properties": {
                "Column": { "properties": { "children": { "$ref": "#/$defs/ChildList" } } },
                "Card": { "properties": { "child": { "$ref": "#/$defs/ComponentId" } } }
            } }
        } } } },
        "$defs": {
            "ComponentId": {"type": "string"},
            "ChildList": {"type": "array", "items": {"$ref": "#/$defs/ComponentId"}}
        }
    })
}

fn message(i: usize) -> Value {
    match i % 4 {
        0 => json!({"components": [
            {"id": "root", "componentProperties": {"Column": {"children": [format!("c{}", i)]}}},
            {"id": format!("c{}", i)}
        ]}),
        1 => json!({"components": [{"id": "main"}]}),
        2 => json!({"components": [
            {"id": "root", "componentProperties": {"Card": {"child": "a"}}},
            {"id": "a", "componentProperties": {"Card": {"child": "root"}}}
        ]}),
        _ => json!({"updateDataModel": {"path": format!("/items/{}", i)}}),
    }
}

fn expected(i: usize) -> Option<ViolationKind> {
    match i % 4 {
        1 => Some(ViolationKind::MissingRoot),
        2 => Some(ViolationKind::CircularReference),
        _ => None,
    }
}

#[test]
fn test_concurrent_validation() {
    let validator = Validator::new(schema());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let validator = validator.clone();
            thread::spawn(move || {
                let result = validator.validate(&message(i));
                assert_eq!(result.err().map(|v| v.kind), expected(i));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_registry_access() {
    let registry = Arc::new(SchemaRegistry::new());
    registry.register("v0.9", schema()).unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let result = registry.validate("v0.9", &message(i)).unwrap();
                assert_eq!(result.err().map(|v| v.kind), expected(i));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_registration_and_validation() {
    let registry = Arc::new(SchemaRegistry::new().with_conformance(SkipConformance));
    registry.register("base", schema()).unwrap();

    let writers: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry.register(format!("v{}", i), schema()).unwrap();
            })
        })
        .collect();

    let readers: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let result = registry.validate("base", &message(i)).unwrap();
                assert_eq!(result.err().map(|v| v.kind), expected(i));
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(registry.names().len(), 9);
}

#[test]
fn test_parallel_batch_matches_sequential() {
    let validator = Validator::new(schema()).with_conformance(SkipConformance);
    let messages: Vec<Value> = (0..64).map(message).collect();

    let sequential = validator.validate_batch(&messages);
    let parallel = validator.par_validate_batch(&messages);

    let summarize = |result: stillwater::Validation<(), a2ui_guard::Violations>| match result {
        stillwater::Validation::Success(_) => Vec::new(),
        stillwater::Validation::Failure(violations) => {
            let mut out: Vec<(Option<usize>, ViolationKind)> = violations
                .iter()
                .map(|v| (v.message_index, v.kind))
                .collect();
            out.sort_by_key(|(index, _)| *index);
            out
        }
    };

    let sequential = summarize(sequential);
    assert_eq!(sequential.len(), 32);
    assert_eq!(sequential, summarize(parallel));
}

#[test]
fn test_validator_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Validator>();
    assert_send_sync::<SchemaRegistry>();
}
