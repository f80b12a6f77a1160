//! Integration tests for violation locations.

use a2ui_guard::{
    check_integrity, traverse, JsonPath, Limits, PathSegment, ReferenceFieldMap,
};
use serde_json::json;

#[test]
fn test_path_construction_and_display() {
    assert_eq!(JsonPath::root().to_string(), "");
    assert_eq!(JsonPath::root().push_field("components").to_string(), "components");
    assert_eq!(JsonPath::root().push_index(0).to_string(), "[0]");

    let path = JsonPath::root()
        .push_field("components")
        .push_index(0)
        .push_field("componentProperties")
        .push_field("Card");
    assert_eq!(path.to_string(), "components[0].componentProperties.Card");
}

#[test]
fn test_path_segments_preserved() {
    let path = JsonPath::from_field("args").push_index(42).push_field("path");

    let segments: Vec<&PathSegment> = path.segments().collect();
    assert_eq!(segments.len(), 3);

    match &segments[0] {
        PathSegment::Field(name) => assert_eq!(name, "args"),
        _ => panic!("Expected Field segment"),
    }

    match &segments[1] {
        PathSegment::Index(idx) => assert_eq!(*idx, 42),
        _ => panic!("Expected Index segment"),
    }
}

#[test]
fn test_duplicate_violation_points_at_second_occurrence() {
    let components = vec![json!({"id": "root"}), json!({"id": "a"}), json!({"id": "a"})];
    let violation = check_integrity(&components, &ReferenceFieldMap::new()).unwrap_err();
    assert_eq!(
        violation.path,
        JsonPath::from_field("components").push_index(2)
    );
}

#[test]
fn test_depth_violation_points_at_first_node_past_bound() {
    let message = json!({"a": [[{"b": "deep"}]]});
    let limits = Limits::default().with_max_depth(3);
    let violation = traverse(&message, &limits).unwrap_err();
    assert_eq!(violation.path.to_string(), "a[0][0].b");
    assert_eq!(violation.path.len(), 4);
}
