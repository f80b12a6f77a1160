//! Reading ids and references out of decoded components.
//!
//! A component is a JSON object with an `id` and an optional
//! `componentProperties` bag keyed by component type:
//!
//! ```json
//! { "id": "root", "componentProperties": { "Column": { "children": ["a", "b"] } } }
//! ```
//!
//! Which properties are references is decided by the [`ReferenceFieldMap`];
//! values of the wrong shape are ignored rather than reported.

use serde_json::Value;

use crate::path::JsonPath;
use crate::schema::ReferenceFieldMap;

/// Key holding the component list of a message.
pub const COMPONENTS: &str = "components";
/// Key holding a component's id.
pub const ID: &str = "id";
/// Key holding a component's typed property bags.
pub const COMPONENT_PROPERTIES: &str = "componentProperties";
/// The id every component graph is rooted at.
pub const ROOT: &str = "root";

/// One reference edge out of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    /// The referenced component id.
    pub target: &'a str,
    /// The property holding the reference.
    pub field: &'a str,
    /// Location of the reference value, relative to the component.
    pub path: JsonPath,
}

/// Returns the component's id if it is a string.
pub fn component_id(component: &Value) -> Option<&str> {
    component.get(ID).and_then(Value::as_str)
}

/// Returns the references held by `component`, in document order.
///
/// Order is: type bags as they appear in `componentProperties`, then
/// properties within a bag, then elements within a list-reference field.
pub fn references_of<'a>(component: &'a Value, refs: &ReferenceFieldMap) -> Vec<Reference<'a>> {
    let mut out = Vec::new();

    let Some(bags) = component.get(COMPONENT_PROPERTIES).and_then(Value::as_object) else {
        return out;
    };

    for (component_type, props) in bags {
        let (Some(fields), Some(props)) = (refs.get(component_type), props.as_object()) else {
            continue;
        };
        let base = JsonPath::from_field(COMPONENT_PROPERTIES).push_field(component_type.as_str());

        for (key, value) in props {
            if fields.single.contains(key) {
                if let Some(target) = value.as_str() {
                    out.push(Reference {
                        target,
                        field: key,
                        path: base.push_field(key.as_str()),
                    });
                }
            } else if fields.list.contains(key) {
                let Some(items) = value.as_array() else {
                    continue;
                };
                for (i, item) in items.iter().enumerate() {
                    if let Some(target) = item.as_str() {
                        out.push(Reference {
                            target,
                            field: key,
                            path: base.push_field(key.as_str()).push_index(i),
                        });
                    }
                }
            }
        }
    }

    out
}

/// Prefixes a component-relative path with the component's position in the list.
pub(crate) fn component_path(index: usize, relative: &JsonPath) -> JsonPath {
    JsonPath::from_field(COMPONENTS)
        .push_index(index)
        .join(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RefFields;
    use serde_json::json;

    fn ref_map() -> ReferenceFieldMap {
        let mut map = ReferenceFieldMap::new();
        let mut column = RefFields::default();
        column.list.insert("children".to_string());
        map.insert("Column", column);

        let mut card = RefFields::default();
        card.single.insert("child".to_string());
        map.insert("Card", card);
        map
    }

    #[test]
    fn test_component_id_requires_string() {
        assert_eq!(component_id(&json!({"id": "a"})), Some("a"));
        assert_eq!(component_id(&json!({"id": 7})), None);
        assert_eq!(component_id(&json!({})), None);
        assert_eq!(component_id(&json!("a")), None);
    }

    #[test]
    fn test_single_and_list_references() {
        let component = json!({
            "id": "root",
            "componentProperties": {
                "Column": { "children": ["a", "b"] },
                "Card": { "child": "c" }
            }
        });
        let refs = references_of(&component, &ref_map());
        let pairs: Vec<_> = refs.iter().map(|r| (r.target, r.field)).collect();
        assert_eq!(
            pairs,
            vec![("a", "children"), ("b", "children"), ("c", "child")]
        );
        assert_eq!(
            refs[1].path.to_string(),
            "componentProperties.Column.children[1]"
        );
    }

    #[test]
    fn test_wrong_shapes_are_ignored() {
        let component = json!({
            "id": "root",
            "componentProperties": {
                "Column": { "children": "not-a-list" },
                "Card": { "child": ["not", "a", "string"] }
            }
        });
        assert!(references_of(&component, &ref_map()).is_empty());
    }

    #[test]
    fn test_non_string_list_items_are_skipped() {
        let component = json!({
            "componentProperties": { "Column": { "children": ["a", 3, null, "b"] } }
        });
        let targets: Vec<_> = references_of(&component, &ref_map())
            .into_iter()
            .map(|r| r.target)
            .collect();
        assert_eq!(targets, vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_types_and_fields_yield_nothing() {
        let component = json!({
            "componentProperties": {
                "Text": { "child": "a" },
                "Card": { "children": ["b"] },
                "Column": null
            }
        });
        assert!(references_of(&component, &ref_map()).is_empty());
        assert!(references_of(&json!({"componentProperties": []}), &ref_map()).is_empty());
    }

    #[test]
    fn test_component_path_prefix() {
        let relative = JsonPath::from_field("componentProperties")
            .push_field("Card")
            .push_field("child");
        assert_eq!(
            component_path(4, &relative).to_string(),
            "components[4].componentProperties.Card.child"
        );
    }
}
