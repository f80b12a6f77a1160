//! Schema conformance collaborators.
//!
//! The validator delegates generic JSON Schema checking to a
//! [`ConformanceChecker`]. It runs once before any structural check and every
//! description it returns becomes one line of a
//! [`SchemaConformance`](crate::ViolationKind::SchemaConformance) violation.

use jsonschema::{Retrieve, Uri};
use serde_json::Value;

/// Checks an instance against a schema document.
///
/// Implementations return one human-readable description per structural
/// violation, or an empty list when the instance conforms. Closures of the
/// right shape implement this trait:
///
/// ```rust
/// use a2ui_guard::{ConformanceChecker, Validator};
/// use serde_json::{json, Value};
///
/// let require_object = |instance: &Value, _schema: &Value| {
///     if instance.is_object() || instance.is_array() {
///         Vec::new()
///     } else {
///         vec!["(root): expected an object".to_string()]
///     }
/// };
///
/// let validator = Validator::new(json!({})).with_conformance(require_object);
/// assert!(validator.validate(&json!(3)).is_err());
/// ```
pub trait ConformanceChecker: Send + Sync {
    /// Returns the violations of `instance` against `schema`.
    fn check(&self, instance: &Value, schema: &Value) -> Vec<String>;

    /// Returns a check bound to `schema`, for validating many instances.
    ///
    /// The default forwards to [`check`](Self::check). Checkers with an
    /// expensive setup step (such as compiling the schema) override it to do
    /// that work once.
    fn prepare<'s>(&'s self, schema: &'s Value) -> PreparedCheck<'s> {
        Box::new(move |instance: &Value| self.check(instance, schema))
    }
}

/// A conformance check bound to one schema; see [`ConformanceChecker::prepare`].
pub type PreparedCheck<'s> = Box<dyn Fn(&Value) -> Vec<String> + Send + Sync + 's>;

impl<F> ConformanceChecker for F
where
    F: Fn(&Value, &Value) -> Vec<String> + Send + Sync,
{
    fn check(&self, instance: &Value, schema: &Value) -> Vec<String> {
        self(instance, schema)
    }
}

/// JSON Schema conformance backed by the `jsonschema` crate.
///
/// The draft is detected from the schema's `$schema` keyword. Remote `$ref`
/// targets are never fetched; a schema that needs one fails to compile and
/// is reported as a single `invalid schema` description.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaChecker;

/// Refuses every external `$ref` so validation never touches the network or disk.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema '{}' is not available offline", uri.as_str()).into())
    }
}

impl JsonSchemaChecker {
    fn compile(schema: &Value) -> Result<jsonschema::Validator, String> {
        let mut opts = jsonschema::options();
        opts.with_retriever(OfflineRetriever);
        opts.build(schema).map_err(|e| format!("invalid schema: {}", e))
    }
}

fn describe_errors(validator: &jsonschema::Validator, instance: &Value) -> Vec<String> {
    validator
        .iter_errors(instance)
        .map(|e| {
            let location = e.instance_path.to_string();
            if location.is_empty() {
                format!("(root): {}", e)
            } else {
                format!("{}: {}", location, e)
            }
        })
        .collect()
}

impl ConformanceChecker for JsonSchemaChecker {
    fn check(&self, instance: &Value, schema: &Value) -> Vec<String> {
        match Self::compile(schema) {
            Ok(validator) => describe_errors(&validator, instance),
            Err(description) => vec![description],
        }
    }

    fn prepare<'s>(&'s self, schema: &'s Value) -> PreparedCheck<'s> {
        match Self::compile(schema) {
            Ok(validator) => Box::new(move |instance: &Value| describe_errors(&validator, instance)),
            Err(description) => Box::new(move |_: &Value| vec![description.clone()]),
        }
    }
}

/// A checker that accepts everything, for payloads already checked upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipConformance;

impl ConformanceChecker for SkipConformance {
    fn check(&self, _instance: &Value, _schema: &Value) -> Vec<String> {
        Vec::new()
    }
}
