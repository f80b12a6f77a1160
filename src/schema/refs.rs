//! Discovery of component reference fields from a message schema.
//!
//! The schema describes, per component type, the properties a component of
//! that type may carry. A property is a *single reference* when its `$ref`
//! names a `...ComponentId` definition, and a *list reference* when its
//! `$ref` names a `...ChildList` definition or it is an array whose items are
//! single references.

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

/// Suffix of `$ref` targets that hold one component id.
pub const COMPONENT_ID_SUFFIX: &str = "ComponentId";

/// Suffix of `$ref` targets that hold a list of component ids.
pub const CHILD_LIST_SUFFIX: &str = "ChildList";

/// Location of the per-type property schemas inside the message schema.
pub const COMPONENT_TYPES_POINTER: &str =
    "/properties/components/items/properties/componentProperties/properties";

/// Reference fields declared for one component type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefFields {
    /// Fields holding a single component id.
    pub single: IndexSet<String>,
    /// Fields holding a list of component ids.
    pub list: IndexSet<String>,
}

impl RefFields {
    /// Returns true if no reference fields are declared.
    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.list.is_empty()
    }
}

/// Reference fields per component type name.
///
/// Built once per validation call from the schema and read-only afterwards.
/// Types without any reference field are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceFieldMap {
    types: IndexMap<String, RefFields>,
}

impl ReferenceFieldMap {
    /// Creates an empty map (no reference fields known).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map from a message schema. See [`extract_reference_fields`].
    pub fn from_schema(schema: &Value) -> Self {
        extract_reference_fields(schema)
    }

    /// Declares reference fields for a component type, replacing any previous entry.
    ///
    /// Entries with no fields are ignored so the map never stores empty types.
    pub fn insert(&mut self, component_type: impl Into<String>, fields: RefFields) {
        if !fields.is_empty() {
            self.types.insert(component_type.into(), fields);
        }
    }

    /// Returns the reference fields of a component type.
    pub fn get(&self, component_type: &str) -> Option<&RefFields> {
        self.types.get(component_type)
    }

    /// Returns the number of component types with reference fields.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no component type has reference fields.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over `(type name, fields)` in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RefFields)> {
        self.types.iter().map(|(name, fields)| (name.as_str(), fields))
    }
}

/// Extracts the reference fields of every component type declared by `schema`.
///
/// Never fails: a schema missing any key along
/// `properties.components.items.properties.componentProperties.properties`
/// (or any per-type `properties`) contributes nothing, so validation against
/// an incomplete schema simply knows fewer references.
///
/// # Example
///
/// ```rust
/// use a2ui_guard::extract_reference_fields;
/// use serde_json::json;
///
/// let schema = json!({
///     "properties": { "components": { "items": { "properties": {
///         "componentProperties": { "properties": {
///             "Card": { "properties": { "child": { "$ref": "#/$defs/ComponentId" } } },
///             "Text": { "properties": { "text": { "type": "string" } } }
///         } }
///     } } } }
/// });
///
/// let refs = extract_reference_fields(&schema);
/// assert!(refs.get("Card").unwrap().single.contains("child"));
/// assert!(refs.get("Text").is_none());
/// ```
pub fn extract_reference_fields(schema: &Value) -> ReferenceFieldMap {
    let mut map = ReferenceFieldMap::new();

    let Some(types) = schema.pointer(COMPONENT_TYPES_POINTER).and_then(Value::as_object) else {
        return map;
    };

    for (type_name, type_schema) in types {
        let Some(props) = type_schema.get("properties").and_then(Value::as_object) else {
            continue;
        };
        map.insert(type_name.as_str(), classify_properties(props));
    }

    tracing::trace!(types = map.len(), "extracted component reference fields");
    map
}

fn classify_properties(props: &Map<String, Value>) -> RefFields {
    let mut fields = RefFields::default();
    for (name, prop_schema) in props {
        if is_component_id_ref(prop_schema) {
            fields.single.insert(name.clone());
        } else if is_child_list_ref(prop_schema) {
            fields.list.insert(name.clone());
        }
    }
    fields
}

fn ref_target(prop_schema: &Value) -> &str {
    prop_schema.get("$ref").and_then(Value::as_str).unwrap_or("")
}

fn is_component_id_ref(prop_schema: &Value) -> bool {
    ref_target(prop_schema).ends_with(COMPONENT_ID_SUFFIX)
}

fn is_child_list_ref(prop_schema: &Value) -> bool {
    if ref_target(prop_schema).ends_with(CHILD_LIST_SUFFIX) {
        return true;
    }
    prop_schema.get("type").and_then(Value::as_str) == Some("array")
        && prop_schema.get("items").is_some_and(is_component_id_ref)
}
