//! # a2ui-guard
//!
//! Structural and graph-integrity validation for UI component documents,
//! run before a payload reaches a renderer or crosses a protocol boundary.
//!
//! ## Overview
//!
//! A message may carry a list of components that reference each other by id.
//! Untrusted producers can emit duplicate ids, dangling or cyclic references,
//! unreachable components, malformed data-model pointers, or deeply nested
//! documents meant to exhaust the consumer. Every check here is fail-fast:
//! a message is rejected with the first [`Violation`] found, in a
//! deterministic scan order.
//!
//! ## Checks
//!
//! - **Schema conformance** through a pluggable [`ConformanceChecker`]
//!   (default: [`JsonSchemaChecker`])
//! - **Integrity** ([`check_integrity`]): unique ids, a `root` component,
//!   no dangling references
//! - **Topology** ([`check_topology`]): no self-references, no cycles, every
//!   component reachable from `root`
//! - **Bounded traversal** ([`traverse`]): structural depth (default 50),
//!   nested function calls (default 5) and pointer syntax of `path` strings
//!
//! Which component properties are references is learned from the message
//! schema by [`extract_reference_fields`].
//!
//! ## Example
//!
//! ```rust
//! use a2ui_guard::{SkipConformance, Validator, ViolationKind};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "properties": { "components": { "items": { "properties": {
//!         "componentProperties": { "properties": {
//!             "Card": { "properties": { "child": { "$ref": "#/$defs/ComponentId" } } }
//!         } }
//!     } } } }
//! });
//! let validator = Validator::new(schema).with_conformance(SkipConformance);
//!
//! let message = json!({"components": [
//!     {"id": "root", "componentProperties": {"Card": {"child": "missing"}}}
//! ]});
//!
//! let violation = validator.validate(&message).unwrap_err();
//! assert_eq!(violation.kind, ViolationKind::DanglingReference);
//! assert_eq!(
//!     violation.message,
//!     "Component 'root' references missing ID 'missing' in field 'child'"
//! );
//! ```

pub mod component;
pub mod conformance;
pub mod error;
pub mod integrity;
pub mod path;
pub mod pointer;
pub mod registry;
pub mod schema;
pub mod topology;
pub mod traverse;
pub mod validator;

pub use component::{component_id, references_of, Reference};
pub use conformance::{ConformanceChecker, JsonSchemaChecker, PreparedCheck, SkipConformance};
pub use error::{Violation, ViolationKind, Violations};
pub use integrity::check_integrity;
pub use path::{JsonPath, PathSegment};
pub use pointer::is_valid_pointer;
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{extract_reference_fields, RefFields, ReferenceFieldMap};
pub use topology::{check_topology, Edge, ReferenceGraph};
pub use traverse::{traverse, Limits, MAX_CALL_DEPTH, MAX_GLOBAL_DEPTH};
pub use validator::{validate, Validator};

/// Type alias for batch validation results using Violations
pub type ValidationResult<T> = stillwater::Validation<T, Violations>;
