//! Tests for schema registry operations.

use a2ui_guard::{RegistryError, SchemaRegistry, SkipConformance, ViolationKind};
use serde_json::{json, Value};

fn catalog() -> Value {
    json!({
        "type": "object",
        "properties": { "components": { "type": "array", "items": { "properties": {
            "componentProperties": { "properties": {
                "Column": { "properties": { "children": { "$ref": "#/$defs/ChildList" } } }
            } }
        } } } },
        "$defs": {
            "ComponentId": {"type": "string"},
            "ChildList": {"type": "array", "items": {"$ref": "#/$defs/ComponentId"}}
        }
    })
}

#[test]
fn test_register_and_get() {
    let registry = SchemaRegistry::new();

    registry.register("v0.9", catalog()).unwrap();

    let schema = registry.get("v0.9");
    assert!(schema.is_some());
    assert_eq!(*schema.unwrap(), catalog());

    let missing = registry.get("v0.8");
    assert!(missing.is_none());
}

#[test]
fn test_duplicate_registration_fails() {
    let registry = SchemaRegistry::new();

    registry.register("v0.9", catalog()).unwrap();

    let result = registry.register("v0.9", json!({}));
    assert!(matches!(result, Err(RegistryError::DuplicateName(ref name)) if name == "v0.9"));

    // The first registration is kept.
    assert_eq!(*registry.get("v0.9").unwrap(), catalog());
}

#[test]
fn test_validate_with_registry() {
    let registry = SchemaRegistry::new();
    registry.register("v0.9", catalog()).unwrap();

    let ok = json!({"components": [
        {"id": "root", "componentProperties": {"Column": {"children": ["a"]}}},
        {"id": "a"}
    ]});
    assert!(registry.validate("v0.9", &ok).unwrap().is_ok());

    let dangling = json!({"components": [
        {"id": "root", "componentProperties": {"Column": {"children": ["b"]}}}
    ]});
    let violation = registry.validate("v0.9", &dangling).unwrap().unwrap_err();
    assert_eq!(violation.kind, ViolationKind::DanglingReference);
}

#[test]
fn test_validate_applies_schema_conformance() {
    let registry = SchemaRegistry::new();
    registry.register("v0.9", catalog()).unwrap();

    let violation = registry
        .validate("v0.9", &json!({"components": "nope"}))
        .unwrap()
        .unwrap_err();
    assert_eq!(violation.kind, ViolationKind::SchemaConformance);
}

#[test]
fn test_validate_missing_schema() {
    let registry = SchemaRegistry::new();

    let result = registry.validate("Missing", &json!({}));
    assert!(matches!(result, Err(RegistryError::SchemaNotFound(ref name)) if name == "Missing"));
    assert_eq!(
        result.unwrap_err().to_string(),
        "schema 'Missing' not found"
    );
}

#[test]
fn test_names_are_sorted() {
    let registry = SchemaRegistry::new();
    registry.register("v0.9", json!({})).unwrap();
    registry.register("v0.8", json!({})).unwrap();
    registry.register("v1.0", json!({})).unwrap();

    assert_eq!(registry.names(), vec!["v0.8", "v0.9", "v1.0"]);
}

#[test]
fn test_registry_limits_apply_to_validators() {
    let registry = SchemaRegistry::new()
        .with_conformance(SkipConformance)
        .with_max_depth(3)
        .with_max_call_depth(1);
    registry.register("v0.9", json!({})).unwrap();

    let validator = registry.validator("v0.9").unwrap();
    assert_eq!(validator.limits().max_depth, 3);
    assert_eq!(validator.limits().max_call_depth, 1);

    let deep = json!({"a": {"b": {"c": {"d": 1}}}});
    let violation = registry.validate("v0.9", &deep).unwrap().unwrap_err();
    assert_eq!(violation.kind, ViolationKind::GlobalRecursionLimit);

    let calls = json!({"call": "f", "args": {"x": {"call": "g", "args": {}}}});
    let violation = registry.validate("v0.9", &calls).unwrap().unwrap_err();
    assert_eq!(violation.kind, ViolationKind::FunctionCallRecursionLimit);
}

#[test]
fn test_validate_batch_with_registry() {
    let registry = SchemaRegistry::new().with_conformance(SkipConformance);
    registry.register("v0.9", catalog()).unwrap();

    let messages = vec![
        json!({"components": [{"id": "root"}]}),
        json!({"components": [{"id": "root"}, {"id": "root"}]}),
        json!({"deleteSurface": {"surfaceId": "main"}}),
    ];
    let result = registry.validate_batch("v0.9", &messages).unwrap();
    let violations = match result {
        stillwater::Validation::Failure(v) => v,
        stillwater::Validation::Success(_) => panic!("expected a failure"),
    };
    assert_eq!(violations.len(), 1);
    let violation = violations.for_message(1).unwrap();
    assert_eq!(violation.kind, ViolationKind::DuplicateId);

    assert!(matches!(
        registry.validate_batch("missing", &messages),
        Err(RegistryError::SchemaNotFound(_))
    ));
}

#[test]
fn test_clones_share_schemas() {
    let registry = SchemaRegistry::default();
    let clone = registry.clone();

    registry.register("v0.9", json!({})).unwrap();
    assert!(clone.get("v0.9").is_some());
    assert!(clone.register("v0.9", json!({})).is_err());
}
