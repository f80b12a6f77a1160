//! Bounded traversal of a whole message.
//!
//! Every node of the message is visited with two independent counters: the
//! structural depth (one per list or map descent) and the function-call depth
//! (one per `args` edge out of a `{call, args}` node). Both are checked before
//! a node's contents are inspected. String values under a `path` key are
//! checked against the pointer grammar on the way.

use serde_json::Value;

use crate::error::Violation;
use crate::path::JsonPath;
use crate::pointer::is_valid_pointer;

/// Default bound on structural nesting depth.
pub const MAX_GLOBAL_DEPTH: usize = 50;
/// Default bound on nested function calls.
pub const MAX_CALL_DEPTH: usize = 5;

/// Key holding a data-model pointer.
pub const PATH: &str = "path";
/// Key naming the function of a function-call node.
pub const CALL: &str = "call";
/// Key holding the arguments of a function-call node.
pub const ARGS: &str = "args";

/// Recursion bounds enforced by [`traverse`].
///
/// # Example
///
/// ```rust
/// use a2ui_guard::Limits;
///
/// let limits = Limits::default();
/// assert_eq!(limits.max_depth, 50);
/// assert_eq!(limits.max_call_depth, 5);
///
/// let strict = Limits::default().with_max_depth(10).with_max_call_depth(2);
/// assert_eq!(strict.max_depth, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest structural depth a node may sit at; the message itself is at 0.
    pub max_depth: usize,
    /// Number of function-call nodes that may be nested along `args` edges.
    pub max_call_depth: usize,
}

impl Limits {
    /// Sets the structural depth bound.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the function-call depth bound.
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: MAX_GLOBAL_DEPTH,
            max_call_depth: MAX_CALL_DEPTH,
        }
    }
}

/// One step from a container down to a child.
#[derive(Clone, Copy)]
enum Segment<'v> {
    Field(&'v str),
    Index(usize),
}

enum Step<'v> {
    Enter {
        node: &'v Value,
        segment: Option<Segment<'v>>,
        depth: usize,
        call_depth: usize,
    },
    /// Leaves the container entered most recently.
    Exit,
}

/// Renders the trail of segments from the message down to the current node.
fn location(trail: &[Segment<'_>]) -> JsonPath {
    trail
        .iter()
        .fold(JsonPath::root(), |path, segment| match *segment {
            Segment::Field(name) => path.push_field(name),
            Segment::Index(i) => path.push_index(i),
        })
}

/// Walks `message` and reports the first depth or path-syntax violation.
///
/// Nodes are visited in document order (pre-order, first child first), so the
/// reported violation is deterministic. The walk keeps its own work stack;
/// its memory use grows with the document, not with the call stack.
///
/// # Example
///
/// ```rust
/// use a2ui_guard::{traverse, Limits, ViolationKind};
/// use serde_json::json;
///
/// let ok = json!({"updateDataModel": {"path": "/user/name", "value": "Ada"}});
/// assert!(traverse(&ok, &Limits::default()).is_ok());
///
/// let bad = json!({"updateDataModel": {"path": "user name", "value": "Ada"}});
/// let violation = traverse(&bad, &Limits::default()).unwrap_err();
/// assert_eq!(violation.kind, ViolationKind::InvalidPathSyntax);
/// assert_eq!(violation.path.to_string(), "updateDataModel.path");
/// ```
pub fn traverse(message: &Value, limits: &Limits) -> Result<(), Violation> {
    // Segments of the node being visited; only turned into a JsonPath on failure.
    let mut trail: Vec<Segment<'_>> = Vec::new();
    let mut stack = vec![Step::Enter {
        node: message,
        segment: None,
        depth: 0,
        call_depth: 0,
    }];

    while let Some(step) = stack.pop() {
        let (node, segment, depth, call_depth) = match step {
            Step::Exit => {
                trail.pop();
                continue;
            }
            Step::Enter {
                node,
                segment,
                depth,
                call_depth,
            } => (node, segment, depth, call_depth),
        };

        let keyed = segment.is_some();
        if let Some(segment) = segment {
            trail.push(segment);
        }

        if depth > limits.max_depth {
            return Err(Violation::global_recursion_limit(limits.max_depth)
                .with_path(location(&trail)));
        }

        match node {
            Value::Array(items) => {
                if keyed {
                    stack.push(Step::Exit);
                }
                for (i, item) in items.iter().enumerate().rev() {
                    stack.push(Step::Enter {
                        node: item,
                        segment: Some(Segment::Index(i)),
                        depth: depth + 1,
                        call_depth,
                    });
                }
            }
            Value::Object(map) => {
                if let Some(pointer) = map.get(PATH).and_then(Value::as_str) {
                    if !is_valid_pointer(pointer) {
                        return Err(Violation::invalid_path_syntax(pointer)
                            .with_path(location(&trail).push_field(PATH)));
                    }
                }

                let is_call = map.contains_key(CALL) && map.contains_key(ARGS);
                if is_call && call_depth >= limits.max_call_depth {
                    return Err(
                        Violation::function_call_recursion_limit(limits.max_call_depth)
                            .with_path(location(&trail)),
                    );
                }

                if keyed {
                    stack.push(Step::Exit);
                }
                for (key, value) in map.iter().rev() {
                    let child_call_depth = if is_call && key == ARGS {
                        call_depth + 1
                    } else {
                        call_depth
                    };
                    stack.push(Step::Enter {
                        node: value,
                        segment: Some(Segment::Field(key.as_str())),
                        depth: depth + 1,
                        call_depth: child_call_depth,
                    });
                }
            }
            _ => {
                if keyed {
                    trail.pop();
                }
            }
        }
    }

    Ok(())
}
