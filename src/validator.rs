//! Validation entry point.
//!
//! A [`Validator`] owns the message schema, the recursion [`Limits`] and the
//! [`ConformanceChecker`]. Each call builds its own [`ReferenceFieldMap`] and
//! discards it on return; nothing is shared between calls, so one validator
//! can serve many threads.

use std::sync::Arc;

use rayon::prelude::*;
use serde_json::Value;
use stillwater::Validation;

use crate::component::COMPONENTS;
use crate::conformance::{ConformanceChecker, JsonSchemaChecker, PreparedCheck};
use crate::error::{Violation, Violations};
use crate::integrity::check_integrity;
use crate::schema::ReferenceFieldMap;
use crate::topology::check_topology;
use crate::traverse::{traverse, Limits};
use crate::ValidationResult;

/// Validates UI messages against a schema and the component graph invariants.
///
/// # Example
///
/// ```rust
/// use a2ui_guard::{SkipConformance, Validator, ViolationKind};
/// use serde_json::json;
///
/// let schema = json!({
///     "properties": { "components": { "items": { "properties": {
///         "componentProperties": { "properties": {
///             "Column": { "properties": { "children": { "$ref": "#/$defs/ChildList" } } }
///         } }
///     } } } }
/// });
///
/// let validator = Validator::new(schema).with_conformance(SkipConformance);
///
/// let ok = json!({"components": [
///     {"id": "root", "componentProperties": {"Column": {"children": ["title"]}}},
///     {"id": "title", "componentProperties": {"Text": {"text": "Hi"}}}
/// ]});
/// assert!(validator.validate(&ok).is_ok());
///
/// let orphan = json!({"components": [
///     {"id": "root", "componentProperties": {"Column": {"children": []}}},
///     {"id": "title", "componentProperties": {"Text": {"text": "Hi"}}}
/// ]});
/// let violation = validator.validate(&orphan).unwrap_err();
/// assert_eq!(violation.kind, ViolationKind::OrphanedComponents);
/// ```
#[derive(Clone)]
pub struct Validator {
    schema: Arc<Value>,
    limits: Limits,
    conformance: Arc<dyn ConformanceChecker>,
}

impl Validator {
    /// Creates a validator with default limits and JSON Schema conformance.
    pub fn new(schema: Value) -> Self {
        Self::from_shared(Arc::new(schema))
    }

    pub(crate) fn from_shared(schema: Arc<Value>) -> Self {
        Self {
            schema,
            limits: Limits::default(),
            conformance: Arc::new(JsonSchemaChecker),
        }
    }

    /// Sets the structural depth bound (default 50).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.limits = self.limits.with_max_depth(depth);
        self
    }

    /// Sets the function-call depth bound (default 5).
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.limits = self.limits.with_max_call_depth(depth);
        self
    }

    /// Replaces all limits at once.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the schema conformance collaborator.
    pub fn with_conformance<C>(mut self, checker: C) -> Self
    where
        C: ConformanceChecker + 'static,
    {
        self.conformance = Arc::new(checker);
        self
    }

    pub(crate) fn set_conformance(&mut self, checker: Arc<dyn ConformanceChecker>) {
        self.conformance = checker;
    }

    /// Returns the schema messages are validated against.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Returns the configured limits.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Validates a payload: one message, or an array of messages.
    ///
    /// Conformance is checked once against the payload as a whole. Then each
    /// message goes through the component checks (when it carries a
    /// `components` list) and the bounded traversal. The first violation
    /// stops validation; for an array payload it records the index of the
    /// failing message.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] found.
    pub fn validate(&self, payload: &Value) -> Result<(), Violation> {
        self.check_conformance(payload)?;

        let refs = ReferenceFieldMap::from_schema(&self.schema);
        match payload {
            Value::Array(messages) => {
                tracing::debug!(messages = messages.len(), "validating message batch");
                for (index, message) in messages.iter().enumerate() {
                    self.check_structure(message, &refs)
                        .map_err(|violation| logged(violation.with_message_index(index)))?;
                }
                Ok(())
            }
            message => {
                tracing::debug!("validating single message");
                self.check_structure(message, &refs).map_err(logged)
            }
        }
    }

    /// Validates one message, checking its conformance on its own.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] found.
    pub fn validate_message(&self, message: &Value) -> Result<(), Violation> {
        let refs = ReferenceFieldMap::from_schema(&self.schema);
        let conformance = self.conformance.prepare(&self.schema);
        self.validate_with_refs(message, &refs, &conformance).map_err(logged)
    }

    /// Validates every message independently and collects the failures.
    ///
    /// Each failing message contributes exactly one violation, tagged with its
    /// index; a failure never hides the results of other messages. The
    /// conformance checker is prepared once for the whole batch.
    ///
    /// # Example
    ///
    /// ```rust
    /// use a2ui_guard::{SkipConformance, Validator, ViolationKind};
    /// use serde_json::json;
    ///
    /// let validator = Validator::new(json!({})).with_conformance(SkipConformance);
    /// let messages = vec![
    ///     json!({"components": [{"id": "root"}]}),
    ///     json!({"components": [{"id": "nope"}]}),
    ///     json!({"updateDataModel": {"path": "bad"}}),
    /// ];
    ///
    /// let result = validator.validate_batch(&messages);
    /// let violations = match result {
    ///     stillwater::Validation::Failure(v) => v,
    ///     stillwater::Validation::Success(_) => unreachable!(),
    /// };
    /// assert_eq!(violations.len(), 2);
    /// assert_eq!(violations.for_message(1).unwrap().kind, ViolationKind::MissingRoot);
    /// assert_eq!(violations.for_message(2).unwrap().kind, ViolationKind::InvalidPathSyntax);
    /// ```
    pub fn validate_batch(&self, messages: &[Value]) -> ValidationResult<()> {
        tracing::debug!(messages = messages.len(), "validating messages independently");
        let refs = ReferenceFieldMap::from_schema(&self.schema);
        let conformance = self.conformance.prepare(&self.schema);
        let failures: Vec<Violation> = messages
            .iter()
            .enumerate()
            .filter_map(|(index, message)| {
                self.indexed_failure(index, message, &refs, &conformance)
            })
            .collect();
        into_result(failures)
    }

    /// Same result as [`validate_batch`](Self::validate_batch), checking messages in parallel.
    pub fn par_validate_batch(&self, messages: &[Value]) -> ValidationResult<()> {
        tracing::debug!(messages = messages.len(), "validating messages in parallel");
        let refs = ReferenceFieldMap::from_schema(&self.schema);
        let conformance = self.conformance.prepare(&self.schema);
        let failures: Vec<Violation> = messages
            .par_iter()
            .enumerate()
            .filter_map(|(index, message)| {
                self.indexed_failure(index, message, &refs, &conformance)
            })
            .collect();
        into_result(failures)
    }

    fn indexed_failure(
        &self,
        index: usize,
        message: &Value,
        refs: &ReferenceFieldMap,
        conformance: &PreparedCheck<'_>,
    ) -> Option<Violation> {
        self.validate_with_refs(message, refs, conformance)
            .map_err(|violation| logged(violation.with_message_index(index)))
            .err()
    }

    fn validate_with_refs(
        &self,
        message: &Value,
        refs: &ReferenceFieldMap,
        conformance: &PreparedCheck<'_>,
    ) -> Result<(), Violation> {
        conforms(conformance(message))?;
        self.check_structure(message, refs)
    }

    fn check_conformance(&self, instance: &Value) -> Result<(), Violation> {
        conforms(self.conformance.check(instance, &self.schema))
    }

    fn check_structure(&self, message: &Value, refs: &ReferenceFieldMap) -> Result<(), Violation> {
        match message.get(COMPONENTS).and_then(Value::as_array) {
            Some(components) => {
                check_integrity(components, refs)?;
                check_topology(components, refs)?;
            }
            None => tracing::trace!("message carries no component list"),
        }
        traverse(message, &self.limits)
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

fn logged(violation: Violation) -> Violation {
    tracing::debug!(
        kind = %violation.kind,
        code = violation.code(),
        message_index = ?violation.message_index,
        "message rejected"
    );
    violation
}

fn conforms(descriptions: Vec<String>) -> Result<(), Violation> {
    if descriptions.is_empty() {
        Ok(())
    } else {
        Err(Violation::schema_conformance(&descriptions))
    }
}

fn into_result(failures: Vec<Violation>) -> ValidationResult<()> {
    match Violations::from_vec(failures) {
        Some(violations) => Validation::Failure(violations),
        None => Validation::Success(()),
    }
}

/// Validates `payload` against `schema` with default limits and JSON Schema conformance.
///
/// # Errors
///
/// Returns the first [`Violation`] found.
///
/// # Example
///
/// ```rust
/// use a2ui_guard::{validate, ViolationKind};
/// use serde_json::json;
///
/// let schema = json!({"type": "object"});
/// assert!(validate(&json!({"components": [{"id": "root"}]}), &schema).is_ok());
///
/// let violation = validate(&json!({"components": [{"id": "main"}]}), &schema).unwrap_err();
/// assert_eq!(violation.kind, ViolationKind::MissingRoot);
/// ```
pub fn validate(payload: &Value, schema: &Value) -> Result<(), Violation> {
    Validator::new(schema.clone()).validate(payload)
}
