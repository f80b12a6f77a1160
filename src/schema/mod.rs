//! Schema introspection.
//!
//! The validator never interprets JSON Schema semantics itself (that is the
//! job of a [`ConformanceChecker`](crate::ConformanceChecker)). It only reads
//! the message schema to learn which component properties point at other
//! components.

mod refs;

pub use refs::{
    extract_reference_fields, RefFields, ReferenceFieldMap, CHILD_LIST_SUFFIX,
    COMPONENT_ID_SUFFIX, COMPONENT_TYPES_POINTER,
};
