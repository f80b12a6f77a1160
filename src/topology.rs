//! Reference graph topology.
//!
//! Builds the directed graph of component references and checks that it is a
//! DAG rooted at `root` with every component reachable. Self-references are
//! rejected while the graph is built, so every back edge found by the
//! depth-first scan belongs to a cycle through at least two distinct ids.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

use crate::component::{component_id, component_path, references_of, COMPONENTS, ROOT};
use crate::error::Violation;
use crate::path::JsonPath;
use crate::schema::ReferenceFieldMap;

/// A reference edge in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<'a> {
    /// The referenced component id.
    pub target: &'a str,
    /// The property holding the reference.
    pub field: &'a str,
    /// Location of the reference inside the message.
    pub path: JsonPath,
}

/// Component id to its outgoing reference edges, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph<'a> {
    adjacency: IndexMap<&'a str, Vec<Edge<'a>>>,
}

impl<'a> ReferenceGraph<'a> {
    /// Builds the graph, failing on the first component that references itself.
    ///
    /// Components without a string id contribute neither a node nor edges.
    pub fn build(components: &'a [Value], refs: &ReferenceFieldMap) -> Result<Self, Violation> {
        let mut adjacency: IndexMap<&'a str, Vec<Edge<'a>>> = IndexMap::new();

        for (i, component) in components.iter().enumerate() {
            let Some(id) = component_id(component) else {
                continue;
            };
            let edges = adjacency.entry(id).or_default();

            for reference in references_of(component, refs) {
                let path = component_path(i, &reference.path);
                if reference.target == id {
                    return Err(Violation::self_reference(id, reference.field).with_path(path));
                }
                edges.push(Edge {
                    target: reference.target,
                    field: reference.field,
                    path,
                });
            }
        }

        Ok(Self { adjacency })
    }

    /// Returns the outgoing edges of `id` (empty for unknown ids).
    pub fn edges(&self, id: &str) -> &[Edge<'a>] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if `id` is a declared component.
    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Iterates over declared component ids in list order.
    pub fn ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.adjacency.keys().copied()
    }

    /// Returns the number of declared components.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns true if no component is declared.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Depth-first scan from `start`, returning the set of visited ids.
    ///
    /// Fails on the first edge whose target is on the current path. The scan
    /// keeps an explicit stack so deep component chains cannot overflow the
    /// call stack.
    pub fn reachable_from(&self, start: &'a str) -> Result<HashSet<&'a str>, Violation> {
        let mut visited: HashSet<&'a str> = HashSet::new();
        let mut on_stack: HashSet<&'a str> = HashSet::new();
        // (node, index of the next edge to follow)
        let mut frames: Vec<(&'a str, usize)> = Vec::new();

        visited.insert(start);
        on_stack.insert(start);
        frames.push((start, 0));

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;
            let edges = self.edges(node);

            let Some(edge) = edges.get(next) else {
                on_stack.remove(node);
                frames.pop();
                continue;
            };
            frame.1 += 1;

            if !visited.contains(edge.target) {
                visited.insert(edge.target);
                on_stack.insert(edge.target);
                frames.push((edge.target, 0));
            } else if on_stack.contains(edge.target) {
                let cycle = cycle_through(&frames, edge.target);
                return Err(Violation::circular_reference(edge.target, &cycle)
                    .with_path(edge.path.clone()));
            }
        }

        Ok(visited)
    }
}

/// Ids on the current path from `target` back around to `target`.
fn cycle_through<'a>(frames: &[(&'a str, usize)], target: &'a str) -> Vec<&'a str> {
    let start = frames
        .iter()
        .position(|(node, _)| *node == target)
        .unwrap_or(0);
    let mut cycle: Vec<&'a str> = frames[start..].iter().map(|(node, _)| *node).collect();
    cycle.push(target);
    cycle
}

/// Checks that the reference graph has no self-references, no cycles and no orphans.
///
/// The depth-first scan starts at `root` when it is declared; a missing root
/// is reported by [`check_integrity`](crate::check_integrity), so here it
/// only means every component is an orphan. Orphans are listed in
/// lexicographic order.
///
/// # Example
///
/// ```rust
/// use a2ui_guard::{check_topology, extract_reference_fields, ViolationKind};
/// use serde_json::json;
///
/// let schema = json!({
///     "properties": { "components": { "items": { "properties": {
///         "componentProperties": { "properties": {
///             "Card": { "properties": { "child": { "$ref": "#/$defs/ComponentId" } } }
///         } }
///     } } } }
/// });
/// let refs = extract_reference_fields(&schema);
///
/// let components = vec![
///     json!({"id": "root", "componentProperties": {"Card": {"child": "a"}}}),
///     json!({"id": "a", "componentProperties": {"Card": {"child": "root"}}}),
/// ];
/// let violation = check_topology(&components, &refs).unwrap_err();
/// assert_eq!(violation.kind, ViolationKind::CircularReference);
/// ```
pub fn check_topology(components: &[Value], refs: &ReferenceFieldMap) -> Result<(), Violation> {
    let graph = ReferenceGraph::build(components, refs)?;

    let visited = if graph.contains(ROOT) {
        graph.reachable_from(ROOT)?
    } else {
        HashSet::new()
    };

    let mut orphans: Vec<&str> = graph.ids().filter(|id| !visited.contains(id)).collect();
    if orphans.is_empty() {
        return Ok(());
    }

    orphans.sort_unstable();
    Err(Violation::orphaned_components(&orphans).with_path(JsonPath::from_field(COMPONENTS)))
}
