//! Component identity and reference integrity.
//!
//! Enforces, in this order, that component ids are unique, that a `root`
//! component exists and that every reference resolves to a declared id.
//! Self-references, cycles and orphans are left to
//! [`check_topology`](crate::check_topology).

use std::collections::HashSet;

use serde_json::Value;

use crate::component::{component_id, component_path, references_of, COMPONENTS, ROOT};
use crate::error::Violation;
use crate::path::JsonPath;
use crate::schema::ReferenceFieldMap;

/// Checks identity and reference integrity of a component list.
///
/// Reports the first violation in scan order: duplicates in list order, then
/// a missing root after the whole list was scanned, then dangling references
/// in component order, field order and list order. Components without a
/// string id take no part in identity checks but their references are still
/// resolved.
///
/// # Example
///
/// ```rust
/// use a2ui_guard::{check_integrity, ReferenceFieldMap, ViolationKind};
/// use serde_json::json;
///
/// let components = vec![json!({"id": "root"}), json!({"id": "root"})];
/// let violation = check_integrity(&components, &ReferenceFieldMap::new()).unwrap_err();
///
/// assert_eq!(violation.kind, ViolationKind::DuplicateId);
/// assert_eq!(violation.path.to_string(), "components[1]");
/// ```
pub fn check_integrity(components: &[Value], refs: &ReferenceFieldMap) -> Result<(), Violation> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(components.len());

    for (i, component) in components.iter().enumerate() {
        let Some(id) = component_id(component) else {
            continue;
        };
        if !ids.insert(id) {
            return Err(Violation::duplicate_id(id)
                .with_path(JsonPath::from_field(COMPONENTS).push_index(i)));
        }
    }

    if !ids.contains(ROOT) {
        return Err(Violation::missing_root().with_path(JsonPath::from_field(COMPONENTS)));
    }

    for (i, component) in components.iter().enumerate() {
        for reference in references_of(component, refs) {
            if !ids.contains(reference.target) {
                return Err(Violation::dangling_reference(
                    component_id(component),
                    reference.field,
                    reference.target,
                )
                .with_path(component_path(i, &reference.path)));
            }
        }
    }

    Ok(())
}
