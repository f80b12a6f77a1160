//! Validation violation types.
//!
//! This module provides [`ViolationKind`] for the taxonomy of failures,
//! [`Violation`] for a single failure and [`Violations`] for accumulating
//! one failure per message across a batch.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::JsonPath;

/// The invariant a message violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// The schema conformance checker reported structural violations.
    SchemaConformance,
    /// Two components share the same id.
    DuplicateId,
    /// No component has the id `root`.
    MissingRoot,
    /// A reference points at an id that is not declared.
    DanglingReference,
    /// A component references its own id.
    SelfReference,
    /// Reference edges form a directed cycle.
    CircularReference,
    /// Some components cannot be reached from `root`.
    OrphanedComponents,
    /// Structural nesting exceeded the global depth bound.
    GlobalRecursionLimit,
    /// Nested function calls exceeded the call depth bound.
    FunctionCallRecursionLimit,
    /// A `path` string is not a valid pointer.
    InvalidPathSyntax,
}

impl ViolationKind {
    /// Every kind, in taxonomy order.
    pub const ALL: [ViolationKind; 10] = [
        ViolationKind::SchemaConformance,
        ViolationKind::DuplicateId,
        ViolationKind::MissingRoot,
        ViolationKind::DanglingReference,
        ViolationKind::SelfReference,
        ViolationKind::CircularReference,
        ViolationKind::OrphanedComponents,
        ViolationKind::GlobalRecursionLimit,
        ViolationKind::FunctionCallRecursionLimit,
        ViolationKind::InvalidPathSyntax,
    ];

    /// Machine-readable code (e.g. `duplicate_id`).
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::SchemaConformance => "schema_conformance",
            ViolationKind::DuplicateId => "duplicate_id",
            ViolationKind::MissingRoot => "missing_root",
            ViolationKind::DanglingReference => "dangling_reference",
            ViolationKind::SelfReference => "self_reference",
            ViolationKind::CircularReference => "circular_reference",
            ViolationKind::OrphanedComponents => "orphaned_components",
            ViolationKind::GlobalRecursionLimit => "global_recursion_limit",
            ViolationKind::FunctionCallRecursionLimit => "function_call_recursion_limit",
            ViolationKind::InvalidPathSyntax => "invalid_path_syntax",
        }
    }

    /// Error name as it appears in reports (e.g. `DuplicateIdError`).
    pub fn name(&self) -> &'static str {
        match self {
            ViolationKind::SchemaConformance => "SchemaConformanceError",
            ViolationKind::DuplicateId => "DuplicateIdError",
            ViolationKind::MissingRoot => "MissingRootError",
            ViolationKind::DanglingReference => "DanglingReferenceError",
            ViolationKind::SelfReference => "SelfReferenceError",
            ViolationKind::CircularReference => "CircularReferenceError",
            ViolationKind::OrphanedComponents => "OrphanedComponentsError",
            ViolationKind::GlobalRecursionLimit => "GlobalRecursionLimitError",
            ViolationKind::FunctionCallRecursionLimit => "FunctionCallRecursionLimitError",
            ViolationKind::InvalidPathSyntax => "InvalidPathSyntaxError",
        }
    }
}

impl Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single violation found while validating a message.
///
/// Each check stops at its first violation, so a message produces at most
/// one `Violation`. The constructors below build the canonical message for
/// each kind; `path` and `message_index` are filled in by the caller that
/// knows them.
///
/// # Example
///
/// ```rust
/// use a2ui_guard::{JsonPath, Violation, ViolationKind};
///
/// let violation = Violation::duplicate_id("root")
///     .with_path(JsonPath::from_field("components").push_index(1));
///
/// assert_eq!(violation.kind, ViolationKind::DuplicateId);
/// assert_eq!(violation.message, "Duplicate component ID found: 'root'");
/// assert_eq!(violation.path.to_string(), "components[1]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Which invariant was violated.
    pub kind: ViolationKind,
    /// Human-readable description naming the offending ids, fields or strings.
    pub message: String,
    /// Location of the offending node inside the message.
    pub path: JsonPath,
    /// Position of the message in a batch, when validated as part of one.
    pub message_index: Option<usize>,
}

impl Violation {
    /// Creates a violation of the given kind with a message at the root path.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: JsonPath::root(),
            message_index: None,
        }
    }

    /// Sets the location and returns self for chaining.
    pub fn with_path(mut self, path: JsonPath) -> Self {
        self.path = path;
        self
    }

    /// Sets the batch position and returns self for chaining.
    pub fn with_message_index(mut self, index: usize) -> Self {
        self.message_index = Some(index);
        self
    }

    /// Machine-readable code of this violation's kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Schema conformance failure; one line per description.
    pub fn schema_conformance(descriptions: &[String]) -> Self {
        Self::new(ViolationKind::SchemaConformance, descriptions.join("\n"))
    }

    /// A second component declares `id`.
    pub fn duplicate_id(id: &str) -> Self {
        Self::new(
            ViolationKind::DuplicateId,
            format!("Duplicate component ID found: '{}'", id),
        )
    }

    /// No component has the id `root`.
    pub fn missing_root() -> Self {
        Self::new(
            ViolationKind::MissingRoot,
            "Missing 'root' component: One component must have 'id' set to 'root'.",
        )
    }

    /// `source` refers to `target` through `field`, but no component has that id.
    pub fn dangling_reference(source: Option<&str>, field: &str, target: &str) -> Self {
        Self::new(
            ViolationKind::DanglingReference,
            format!(
                "Component '{}' references missing ID '{}' in field '{}'",
                source.unwrap_or("<anonymous>"),
                target,
                field
            ),
        )
    }

    /// Component `id` names itself in `field`.
    pub fn self_reference(id: &str, field: &str) -> Self {
        Self::new(
            ViolationKind::SelfReference,
            format!(
                "Self-reference detected: Component '{}' references itself in field '{}'",
                id, field
            ),
        )
    }

    /// A back edge to `id` was found.
    ///
    /// `cycle` lists the ids along the cycle, starting and ending at `id`.
    pub fn circular_reference(id: &str, cycle: &[&str]) -> Self {
        Self::new(
            ViolationKind::CircularReference,
            format!(
                "Circular reference detected involving component '{}' (cycle: {})",
                id,
                cycle.join(" -> ")
            ),
        )
    }

    /// Components not reachable from `root`.
    ///
    /// `orphans` must already be in lexicographic order.
    pub fn orphaned_components(orphans: &[&str]) -> Self {
        let listed: Vec<String> = orphans.iter().map(|id| format!("'{}'", id)).collect();
        Self::new(
            ViolationKind::OrphanedComponents,
            format!(
                "Orphaned components detected (not reachable from 'root'): [{}]",
                listed.join(", ")
            ),
        )
    }

    /// A node sits deeper than `max_depth`.
    pub fn global_recursion_limit(max_depth: usize) -> Self {
        Self::new(
            ViolationKind::GlobalRecursionLimit,
            format!("Global recursion limit exceeded: Depth > {}", max_depth),
        )
    }

    /// More than `max_call_depth` function calls are nested along `args`.
    pub fn function_call_recursion_limit(max_call_depth: usize) -> Self {
        Self::new(
            ViolationKind::FunctionCallRecursionLimit,
            format!(
                "Recursion limit exceeded: functionCall depth > {}",
                max_call_depth
            ),
        )
    }

    /// A `path` string does not match the pointer grammar.
    pub fn invalid_path_syntax(pointer: &str) -> Self {
        Self::new(
            ViolationKind::InvalidPathSyntax,
            format!("Invalid JSON Pointer syntax: '{}'", pointer),
        )
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.message_index {
            write!(f, "message {}: ", index)?;
        }
        write!(f, "{}: {}", self.kind, self.message)?;
        if !self.path.is_root() {
            write!(f, " (at {})", self.path)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violation {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violation>();
    assert_sync::<Violation>();
};

/// A non-empty collection of violations, at most one per message.
///
/// `Violations` implements `Semigroup`, so per-message failures of a batch
/// combine into a single failure:
///
/// ```rust
/// use a2ui_guard::{Violation, Violations};
/// use stillwater::prelude::*;
///
/// let first = Violations::single(Violation::missing_root().with_message_index(0));
/// let second = Violations::single(Violation::duplicate_id("a").with_message_index(2));
///
/// let combined = first.combine(second);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(NonEmptyVec<Violation>);

impl Violations {
    /// Creates a `Violations` containing a single violation.
    pub fn single(violation: Violation) -> Self {
        Self(NonEmptyVec::singleton(violation))
    }

    /// Creates a `Violations` from a `Vec`, or `None` if it is empty.
    pub fn from_vec(violations: Vec<Violation>) -> Option<Self> {
        let mut iter = violations.into_iter();
        let head = Self::single(iter.next()?);
        Some(iter.fold(head, |acc, violation| acc.combine(Self::single(violation))))
    }

    /// Returns the number of violations in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained violations.
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Returns all violations of the given kind.
    pub fn of_kind(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.0.iter().filter(|v| v.kind == kind).collect()
    }

    /// Returns the violation reported for the given batch position, if any.
    pub fn for_message(&self, index: usize) -> Option<&Violation> {
        self.0.iter().find(|v| v.message_index == Some(index))
    }

    /// Returns the first violation in the collection.
    pub fn first(&self) -> &Violation {
        self.0.head()
    }

    /// Converts this collection into a `Vec<Violation>`.
    pub fn into_vec(self) -> Vec<Violation> {
        self.0.into_vec()
    }
}

impl Semigroup for Violations {
    fn combine(self, other: Self) -> Self {
        Violations(self.0.combine(other.0))
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} violation(s):", self.len())?;
        for (i, violation) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violations>();
    assert_sync::<Violations>();
};
